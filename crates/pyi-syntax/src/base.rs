//! Index types for declaration trees.

/// Index of a node inside one `NodeArena`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    /// Sentinel for "no node" (e.g. the parent of a module).
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    /// The module node is always allocated first.
    pub const ROOT: NodeIndex = NodeIndex(0);

    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// Identifier of a `SourceFile` registered with a program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub u32);

/// A declaration handle: a node in a specific file.
///
/// Declarations are owned by their file's arena and never copied; every
/// component passes `NodeRef`s around instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeRef {
    pub file: FileId,
    pub node: NodeIndex,
}

impl NodeRef {
    #[inline]
    pub const fn new(file: FileId, node: NodeIndex) -> Self {
        Self { file, node }
    }

    /// The module node of the same file.
    #[inline]
    pub const fn module(file: FileId) -> Self {
        Self {
            file,
            node: NodeIndex::ROOT,
        }
    }

    /// Another node in the same file.
    #[inline]
    pub const fn sibling(self, node: NodeIndex) -> Self {
        Self {
            file: self.file,
            node,
        }
    }
}
