//! Programmatic construction of declaration trees.
//!
//! Hosts that already own a Python parser translate their syntax trees into
//! snapshots with this builder; tests use it to write fixtures that read like
//! the source they model:
//!
//! ```
//! use pyi_common::Interner;
//! use pyi_syntax::TreeBuilder;
//!
//! let strings = Interner::new();
//! let mut b = TreeBuilder::new(&strings, "m.pyi", true);
//! let c = b.class(b.root(), "C");
//! let f = b.function(c, "f");
//! b.decorate(f, "overload");
//! b.param(f, "self", None);
//! let int = b.ty("int");
//! b.param(f, "x", Some(int.clone()));
//! b.returns(f, int);
//! let file = b.finish();
//! assert_eq!(file.arena.len(), 5);
//! ```
//!
//! Adding a node under an index that cannot own it yields `NodeIndex::NONE`.

use crate::base::NodeIndex;
use crate::node::*;
use crate::node_arena::NodeArena;
use crate::source_file::SourceFile;
use pyi_common::{Atom, Interner};
use tracing::debug;

pub struct TreeBuilder<'i> {
    interner: &'i Interner,
    path: String,
    is_stub: bool,
    arena: NodeArena,
}

impl<'i> TreeBuilder<'i> {
    pub fn new(interner: &'i Interner, path: &str, is_stub: bool) -> Self {
        let stem = path
            .strip_suffix(".pyi")
            .or_else(|| path.strip_suffix(".py"))
            .unwrap_or(path);
        let module_name = stem.rsplit('/').next().unwrap_or(stem);
        Self {
            interner,
            path: path.to_string(),
            is_stub,
            arena: NodeArena::new(interner.intern(module_name)),
        }
    }

    pub fn root(&self) -> NodeIndex {
        NodeIndex::ROOT
    }

    pub fn atom(&self, s: &str) -> Atom {
        self.interner.intern(s)
    }

    pub fn dotted(&self, s: &str) -> DottedName {
        DottedName::from_parts(s.split('.').map(|part| self.interner.intern(part)))
    }

    // =========================================================================
    // Annotations and expressions
    // =========================================================================

    /// A named type; `"None"` becomes `TypeExpr::NoneLit`.
    pub fn ty(&self, s: &str) -> TypeExpr {
        if s == "None" {
            TypeExpr::NoneLit
        } else {
            TypeExpr::Name(self.dotted(s))
        }
    }

    pub fn generic(&self, base: &str, args: Vec<TypeExpr>) -> TypeExpr {
        TypeExpr::Subscript {
            base: self.dotted(base),
            args,
        }
    }

    pub fn union_ty(&self, members: Vec<TypeExpr>) -> TypeExpr {
        TypeExpr::Union(members)
    }

    pub fn name_expr(&self, s: &str) -> Expr {
        Expr::Name(self.dotted(s))
    }

    pub fn str_expr(&self, s: &str) -> Expr {
        Expr::Str(self.interner.intern(s))
    }

    pub fn call_expr(&self, callee: &str) -> Expr {
        Expr::Call {
            callee: Box::new(self.name_expr(callee)),
        }
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    /// Record `from <module> import <name> as <alias>` (or
    /// `import <module> as <alias>` when `name` is None).
    pub fn import(&mut self, module: &str, name: Option<&str>, alias: &str) {
        let alias = ImportAlias {
            module: self.dotted(module),
            name: name.map(|n| self.interner.intern(n)),
            alias: self.interner.intern(alias),
        };
        if let Some(Node {
            data: NodeData::Module(module),
            ..
        }) = self.arena.get_mut(NodeIndex::ROOT)
        {
            module.imports.push(alias);
        }
    }

    pub fn class(&mut self, parent: NodeIndex, name: &str) -> NodeIndex {
        let atom = self.interner.intern(name);
        let added = self.arena.add_class(parent, atom);
        self.checked(added, parent, name)
    }

    pub fn function(&mut self, parent: NodeIndex, name: &str) -> NodeIndex {
        let atom = self.interner.intern(name);
        let added = self.arena.add_function(parent, atom);
        self.checked(added, parent, name)
    }

    /// Attach a decorator (`"overload"`, `"typing.overload"`) to a function
    /// or class.
    pub fn decorate(&mut self, node: NodeIndex, decorator: &str) {
        let decorator = Decorator {
            name: self.dotted(decorator),
        };
        match self.arena.get_mut(node).map(|n| &mut n.data) {
            Some(NodeData::Function(func)) => func.decorators.push(decorator),
            Some(NodeData::Class(class)) => class.decorators.push(decorator),
            _ => debug!(node = node.0, "TreeBuilder::decorate - not decoratable"),
        }
    }

    pub fn base(&mut self, class: NodeIndex, base: TypeExpr) {
        if let Some(NodeData::Class(data)) = self.arena.get_mut(class).map(|n| &mut n.data) {
            data.bases.push(base);
        }
    }

    pub fn param(
        &mut self,
        function: NodeIndex,
        name: &str,
        annotation: Option<TypeExpr>,
    ) -> NodeIndex {
        self.param_with(
            function,
            name,
            ParameterData {
                annotation,
                ..ParameterData::default()
            },
        )
    }

    pub fn param_with(&mut self, function: NodeIndex, name: &str, data: ParameterData) -> NodeIndex {
        let atom = self.interner.intern(name);
        let added = self.arena.add_parameter(function, atom, data);
        self.checked(added, function, name)
    }

    pub fn returns(&mut self, function: NodeIndex, annotation: TypeExpr) {
        if let Some(NodeData::Function(func)) = self.arena.get_mut(function).map(|n| &mut n.data) {
            func.returns = Some(annotation);
        }
    }

    pub fn set_async(&mut self, function: NodeIndex) {
        if let Some(NodeData::Function(func)) = self.arena.get_mut(function).map(|n| &mut n.data) {
            func.is_async = true;
        }
    }

    pub fn target(&mut self, parent: NodeIndex, name: &str, data: TargetData) -> NodeIndex {
        let atom = self.interner.intern(name);
        let added = self.arena.add_target(parent, atom, data);
        self.checked(added, parent, name)
    }

    /// `name: annotation`
    pub fn annotated(&mut self, parent: NodeIndex, name: &str, annotation: TypeExpr) -> NodeIndex {
        self.target(
            parent,
            name,
            TargetData {
                annotation: Some(annotation),
                ..TargetData::default()
            },
        )
    }

    /// `name = value`
    pub fn assigned(&mut self, parent: NodeIndex, name: &str, value: Expr) -> NodeIndex {
        self.target(
            parent,
            name,
            TargetData {
                value: Some(value),
                ..TargetData::default()
            },
        )
    }

    pub fn finish(self) -> SourceFile {
        SourceFile::new(self.path, self.is_stub, self.arena)
    }

    fn checked(&self, added: Option<NodeIndex>, parent: NodeIndex, name: &str) -> NodeIndex {
        match added {
            Some(idx) => idx,
            None => {
                debug!(
                    parent = parent.0,
                    name,
                    path = %self.path,
                    "TreeBuilder - parent cannot own declaration"
                );
                NodeIndex::NONE
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/builder_tests.rs"]
mod tests;
