//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use pyi::{
    EvalContext, FileId, Interner, KnownDecoratorResolver, NodeIndex, NodeRef, Program,
    ProviderOptions, PyiTypeProvider, TreeBuilder, TypeFormatter, TypeId, TypeInterner,
};
use std::sync::Arc;

pub struct Project {
    pub strings: Arc<Interner>,
    pub program: Program,
    pub types: TypeInterner,
}

impl Project {
    pub fn new() -> Self {
        let strings = Arc::new(Interner::new());
        Self {
            program: Program::new(strings.clone()),
            types: TypeInterner::with_string_interner(strings.clone()),
            strings,
        }
    }

    /// Build and register a file; `.pyi` paths are stubs.
    pub fn file<R>(&mut self, path: &str, build: impl FnOnce(&mut TreeBuilder<'_>) -> R) -> (FileId, R) {
        let mut builder = TreeBuilder::new(&self.strings, path, path.ends_with(".pyi"));
        let out = build(&mut builder);
        (self.program.add_file(builder.finish()), out)
    }

    /// Register `<name>.py` and `<name>.pyi` and pair them.
    pub fn module<R, S>(
        &mut self,
        name: &str,
        real: impl FnOnce(&mut TreeBuilder<'_>) -> R,
        stub: impl FnOnce(&mut TreeBuilder<'_>) -> S,
    ) -> (FileId, R, S) {
        let (real_id, r) = self.file(&format!("{name}.py"), real);
        let (_, s) = self.file(&format!("{name}.pyi"), stub);
        self.program.associate_by_path();
        (real_id, r, s)
    }

    pub fn provider(&self) -> PyiTypeProvider<'_, Program, KnownDecoratorResolver<'_>> {
        PyiTypeProvider::for_program(&self.program, &self.types, ProviderOptions::default())
    }

    pub fn shallow(&self) -> EvalContext<'_> {
        EvalContext::shallow(&self.program, &self.types)
    }

    pub fn deep(&self) -> EvalContext<'_> {
        EvalContext::deep(&self.program, &self.types)
    }

    pub fn show(&self, ty: Option<TypeId>) -> Option<String> {
        ty.map(|ty| TypeFormatter::new(&self.types).format(ty))
    }
}

pub fn at(file: FileId, node: NodeIndex) -> NodeRef {
    NodeRef::new(file, node)
}

/// `def <name>(self, x): ...` inside a new class `<class>`.
pub fn real_method(b: &mut TreeBuilder<'_>, class: &str, name: &str) -> (NodeIndex, NodeIndex) {
    let c = b.class(b.root(), class);
    let f = b.function(c, name);
    b.param(f, "self", None);
    let x = b.param(f, "x", None);
    (f, x)
}
