//! pyi - stub-backed type provider for Python analysis engines.
//!
//! Lets a declaration in a real module (`m.py`) borrow its static type from
//! the matching declaration in a companion interface stub (`m.pyi`). The
//! work is split across the workspace crates, re-exported here:
//!
//! - `common` - string interning and walk limits
//! - `syntax` - declaration tree snapshots and `TreeBuilder`
//! - `solver` - interned types, ordered unions, `TypeFormatter`
//! - `checker` - stub lookup, overload unions, context deepening and the
//!   `PyiTypeProvider` query router
//!
//! ```
//! use pyi::{EvalContext, Program, ProviderOptions, PyiTypeProvider, TypeProvider};
//! use pyi::{Interner, NodeRef, TreeBuilder, TypeFormatter, TypeInterner};
//! use std::sync::Arc;
//!
//! // Installs a subscriber only when `PYI_LOG` or `RUST_LOG` is set.
//! pyi::init_tracing();
//!
//! let strings = Arc::new(Interner::new());
//! let mut program = Program::new(strings.clone());
//!
//! let mut real = TreeBuilder::new(&strings, "m.py", false);
//! let f = real.function(real.root(), "f");
//! let x = real.param(f, "x", None);
//! let real = program.add_file(real.finish());
//!
//! let mut stub = TreeBuilder::new(&strings, "m.pyi", true);
//! let sf = stub.function(stub.root(), "f");
//! stub.param(sf, "x", Some(stub.ty("int")));
//! program.add_file(stub.finish());
//! program.associate_by_path();
//!
//! let types = TypeInterner::with_string_interner(strings);
//! let provider = PyiTypeProvider::for_program(&program, &types, ProviderOptions::default());
//! let ctx = EvalContext::shallow(&program, &types);
//! let ty = provider
//!     .parameter_type(NodeRef::new(real, x), NodeRef::new(real, f), &ctx)
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(TypeFormatter::new(&types).format(ty), "int");
//! ```

pub use pyi_checker as checker;
pub use pyi_common as common;
pub use pyi_solver as solver;
pub use pyi_syntax as syntax;

pub use pyi_checker::{
    ContextAdapter, DeclShape, DecoratorResolver, EvalContext, EvalMode, KnownDecoratorResolver,
    KnownDecorators, OverloadResolver, Program, ProviderError, ProviderOptions, PyiTypeProvider,
    StubDeclaration, StubIndex, StubLocator, TypeEvalContext, TypeProvider, TypeProviderChain,
};
pub use pyi_common::{Atom, Interner};
pub use pyi_solver::{TypeData, TypeFormatter, TypeId, TypeInterner};
pub use pyi_syntax::{FileId, NodeIndex, NodeKind, NodeRef, SourceFile, TreeBuilder};

pub mod tracing_config;
pub use tracing_config::{LogFormat, init_tracing};
