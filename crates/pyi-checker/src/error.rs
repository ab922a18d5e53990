//! Internal errors of the stub type provider.
//!
//! "No stub", "no matching name" and "type not computable" are never errors;
//! they surface as `Ok(None)`. A `ProviderError` means the declaration trees
//! handed to the provider violate their own invariants, or a query was made
//! with a handle of the wrong kind.

use pyi_syntax::{FileId, NodeIndex, NodeKind};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("file {0:?} is not registered with the stub index")]
    UnknownFile(FileId),

    #[error("node {node:?} does not exist in file {file:?}")]
    DanglingNode { file: FileId, node: NodeIndex },

    #[error("scope chain of node {node:?} in file {file:?} is broken or cyclic")]
    BrokenScopeChain { file: FileId, node: NodeIndex },

    #[error("{kind:?} node {node:?} in file {file:?} has no owning {expected:?}")]
    MissingOwner {
        file: FileId,
        node: NodeIndex,
        kind: NodeKind,
        expected: NodeKind,
    },

    #[error("overload {node:?} in file {file:?} is owned by a {owner:?}, not a class or module")]
    UnexpectedScopeOwner {
        file: FileId,
        node: NodeIndex,
        owner: NodeKind,
    },

    #[error("node {node:?} in file {file:?} is a {found:?}, expected a {expected:?}")]
    KindMismatch {
        file: FileId,
        node: NodeIndex,
        expected: NodeKind,
        found: NodeKind,
    },

    #[error("file {0:?} cannot serve as a stub: it is not a .pyi file")]
    NotAStub(FileId),

    #[error("invalid provider options: {0}")]
    InvalidOptions(String),
}

pub type Result<T> = std::result::Result<T, ProviderError>;
