//! Declaration tree snapshots.
//!
//! The stub type provider never parses source text. It reads immutable
//! snapshots of the declarations in a real module and in its companion stub:
//!
//! - `NodeArena` - flat storage of modules, classes, functions, parameters and
//!   target bindings, linked through parent indices
//! - `SourceFile` - one arena plus its path and whether it is a stub
//! - `TypeExpr` / `Expr` - the annotation and initializer shapes the type
//!   evaluator understands
//! - `TreeBuilder` - programmatic construction of snapshots (used by hosts
//!   that already own a parser, and by tests)

pub mod base;
pub use base::{FileId, NodeIndex, NodeRef};

pub mod node;
pub use node::{
    ClassData, Decorator, DottedName, Expr, FunctionData, ImportAlias, ModuleData, Node,
    NodeData, NodeKind, ParameterData, ParameterKind, TargetData, TypeExpr,
};

mod node_access;
mod node_arena;
pub use node_arena::NodeArena;

pub mod source_file;
pub use source_file::SourceFile;

pub mod builder;
pub use builder::TreeBuilder;
