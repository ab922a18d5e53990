//! Type representation for the stub type provider.
//!
//! Types are interned into lightweight `TypeId` handles:
//!
//! - O(1) type equality via interning (`TypeId` comparison)
//! - Unions keep their members in insertion order, so the union of an
//!   overload group lists its members the way the stub declares them
//! - The interner is shareable across threads (`RwLock`-guarded tables)

mod format;
mod intern;
pub mod types;

pub use format::TypeFormatter;
pub use intern::TypeInterner;
pub use types::{
    FunctionShape, FunctionShapeId, IntrinsicKind, ParamInfo, ParamKind, TypeData, TypeId,
    TypeListId,
};
