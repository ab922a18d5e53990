//! Stub-backed type provider.
//!
//! Lets a real Python declaration borrow its static type from the matching
//! declaration in a companion `.pyi` stub:
//!
//! - `stub_locator` - maps parameters, callables and target bindings to their
//!   stub counterparts by scope path and name
//! - `context` - evaluation contexts and the shallow-to-deep adapter
//! - `overloads` - unions `@overload` groups in declaration order
//! - `provider` - the four type queries (`PyiTypeProvider`)
//! - `chain` - ordered composition of several type providers
//!
//! The host's file index, evaluation context and decorator resolution are
//! consumed through the `StubIndex`, `TypeEvalContext` and
//! `DecoratorResolver` traits. `Program`, `EvalContext` and
//! `KnownDecoratorResolver` implement them over in-memory snapshots.

pub mod chain;
pub mod context;
pub mod decorators;
pub mod error;
pub mod eval;
pub mod options;
pub mod overloads;
pub mod provider;
pub mod stub_index;
pub mod stub_locator;

pub use chain::TypeProviderChain;
pub use context::{ContextAdapter, EffectiveContext, EvalMode, TypeEvalContext};
pub use decorators::{DecoratorResolver, KnownDecoratorResolver, KnownDecorators};
pub use error::{ProviderError, Result};
pub use eval::EvalContext;
pub use options::ProviderOptions;
pub use overloads::OverloadResolver;
pub use provider::{DeclShape, PyiTypeProvider, TypeProvider};
pub use stub_index::{NameMatches, Program, StubIndex};
pub use stub_locator::{StubDeclaration, StubLocator};

#[cfg(test)]
#[path = "../tests/test_fixtures.rs"]
pub(crate) mod test_fixtures;
