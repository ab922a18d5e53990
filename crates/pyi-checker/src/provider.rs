//! Type Query Router.
//!
//! `PyiTypeProvider` answers the four type queries a host engine asks of a
//! type source. Each query is classified once into a `DeclShape`, the stub
//! counterpart is located, and the type is computed from the stub:
//!
//! - parameter: type of the same-named stub parameter
//! - return: declared return of the stub callable
//! - callable: the union of the overload group sharing the stub callable's
//!   name, or the stub callable's own type when no member is marked
//! - reference: type of the stub target, deepening the context when the
//!   stub target is only typed by its initializer
//!
//! `Ok(None)` means "no opinion": the host falls through to its other type
//! sources.

use crate::context::{ContextAdapter, EffectiveContext, TypeEvalContext};
use crate::decorators::{DecoratorResolver, KnownDecoratorResolver};
use crate::error::{ProviderError, Result};
use crate::options::ProviderOptions;
use crate::overloads::OverloadResolver;
use crate::stub_index::{Program, StubIndex, arena_of, node_of};
use crate::stub_locator::{StubDeclaration, StubLocator};
use pyi_solver::{TypeId, TypeInterner};
use pyi_syntax::{NodeIndex, NodeKind, NodeRef};
use tracing::{debug, trace};

/// A type source for declarations.
pub trait TypeProvider<C> {
    /// Type of `param`, a parameter of `owner`.
    fn parameter_type(
        &self,
        param: NodeRef,
        owner: NodeRef,
        context: &C,
    ) -> Result<Option<TypeId>>;

    fn return_type(&self, callable: NodeRef, context: &C) -> Result<Option<TypeId>>;

    fn callable_type(&self, callable: NodeRef, context: &C) -> Result<Option<TypeId>>;

    /// Type of a module- or class-level target binding referenced at
    /// `anchor`. Any other declaration kind has no reference type here.
    fn reference_type(
        &self,
        target: NodeRef,
        context: &C,
        anchor: Option<NodeRef>,
    ) -> Result<Option<TypeId>>;
}

/// The shape of a type request, classified once per query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeclShape {
    Parameter { param: NodeRef, owner: NodeRef },
    Callable(NodeRef),
    Return(NodeRef),
    Target {
        target: NodeRef,
        anchor: Option<NodeRef>,
    },
}

pub struct PyiTypeProvider<'a, I: ?Sized, D> {
    index: &'a I,
    types: &'a TypeInterner,
    decorators: D,
    options: ProviderOptions,
}

impl<'a> PyiTypeProvider<'a, Program, KnownDecoratorResolver<'a>> {
    /// A provider over an in-memory program with the known-decorator
    /// resolver, configured by `options`.
    pub fn for_program(
        program: &'a Program,
        types: &'a TypeInterner,
        options: ProviderOptions,
    ) -> Self {
        let decorators = KnownDecoratorResolver::new(program, program.strings())
            .with_overload_decorators(options.overload_decorators.iter().cloned());
        Self::new(program, types, decorators).with_options(options)
    }
}

impl<'a, I: StubIndex + ?Sized, D> PyiTypeProvider<'a, I, D> {
    pub fn new(index: &'a I, types: &'a TypeInterner, decorators: D) -> Self {
        Self {
            index,
            types,
            decorators,
            options: ProviderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ProviderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ProviderOptions {
        &self.options
    }

    pub fn locator(&self) -> StubLocator<'a, I> {
        StubLocator::new(self.index)
    }

    pub fn overloads(&self) -> OverloadResolver<'_, I, D> {
        OverloadResolver::new(self.index, &self.decorators, self.types)
    }

    fn expect_kind(&self, decl: NodeRef, expected: NodeKind) -> Result<()> {
        let found = node_of(self.index, decl)?.kind();
        if found == expected {
            Ok(())
        } else {
            Err(ProviderError::KindMismatch {
                file: decl.file,
                node: decl.node,
                expected,
                found,
            })
        }
    }

    /// The module or class a stub declaration belongs to; deep contexts are
    /// scoped to it.
    fn containing_unit(&self, stub: NodeRef) -> Result<NodeRef> {
        let arena = arena_of(self.index, stub.file)?;
        Ok(match arena.enclosing_scope(stub.node) {
            Some(scope) if arena.kind(scope) == Some(NodeKind::Class) => stub.sibling(scope),
            _ => stub.sibling(NodeIndex::ROOT),
        })
    }

    /// Compute the type a query asks for.
    pub fn resolve<C>(&self, shape: DeclShape, context: &C) -> Result<Option<TypeId>>
    where
        C: TypeEvalContext,
        D: DecoratorResolver<C>,
    {
        let locator = self.locator();
        let result = match shape {
            DeclShape::Parameter { param, owner } => locator
                .locate_parameter(param, owner)?
                .and_then(|stub| context.type_of(stub.decl)),
            DeclShape::Return(callable) => locator
                .locate_callable(callable)?
                .and_then(|stub| context.return_type_of(stub.decl)),
            DeclShape::Callable(callable) => match locator.locate_callable(callable)? {
                Some(stub) => self.stub_callable_type(stub.decl, context)?,
                None => None,
            },
            DeclShape::Target { target, anchor } => match locator.locate_target(target)? {
                Some(stub) => self.stub_target_type(stub, context, anchor)?,
                None => None,
            },
        };
        trace!(?shape, type_id = ?result, "PyiTypeProvider::resolve");
        Ok(result)
    }

    fn stub_callable_type<C>(&self, stub: NodeRef, context: &C) -> Result<Option<TypeId>>
    where
        C: TypeEvalContext,
        D: DecoratorResolver<C>,
    {
        let overloads = self.overloads();
        if overloads.is_overload(stub, context) {
            return overloads.overload_type(stub, context);
        }
        // A plain same-named function may precede the marked members; the
        // group still decides the type.
        let members = overloads.overload_members(stub, context)?;
        if members.is_empty() {
            Ok(context.type_of(stub))
        } else {
            Ok(overloads.group_type(stub, &members, context))
        }
    }

    fn stub_target_type<C>(
        &self,
        stub: StubDeclaration,
        context: &C,
        anchor: Option<NodeRef>,
    ) -> Result<Option<TypeId>>
    where
        C: TypeEvalContext,
        D: DecoratorResolver<C>,
    {
        let effective = if self.options.deepen_references {
            let scope_root = self.containing_unit(stub.decl)?;
            ContextAdapter::new(context).effective(stub.decl, scope_root)
        } else {
            EffectiveContext::Given(context)
        };
        debug!(
            stub_file = stub.decl.file.0,
            stub_node = stub.decl.node.0,
            deepened = effective.is_deepened(),
            anchor = ?anchor.map(|a| a.node.0),
            "PyiTypeProvider - reference target"
        );
        // A stub may declare a real variable as a function, possibly an
        // overloaded one.
        if stub.kind == NodeKind::Function {
            return self.stub_callable_type(stub.decl, &*effective);
        }
        Ok(effective.type_of(stub.decl))
    }
}

impl<I, D, C> TypeProvider<C> for PyiTypeProvider<'_, I, D>
where
    I: StubIndex + ?Sized,
    C: TypeEvalContext,
    D: DecoratorResolver<C>,
{
    #[tracing::instrument(level = "debug", skip_all, fields(file = param.file.0, param = param.node.0))]
    fn parameter_type(
        &self,
        param: NodeRef,
        owner: NodeRef,
        context: &C,
    ) -> Result<Option<TypeId>> {
        self.expect_kind(param, NodeKind::Parameter)?;
        self.expect_kind(owner, NodeKind::Function)?;
        self.resolve(DeclShape::Parameter { param, owner }, context)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(file = callable.file.0, callable = callable.node.0))]
    fn return_type(&self, callable: NodeRef, context: &C) -> Result<Option<TypeId>> {
        self.expect_kind(callable, NodeKind::Function)?;
        self.resolve(DeclShape::Return(callable), context)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(file = callable.file.0, callable = callable.node.0))]
    fn callable_type(&self, callable: NodeRef, context: &C) -> Result<Option<TypeId>> {
        self.expect_kind(callable, NodeKind::Function)?;
        self.resolve(DeclShape::Callable(callable), context)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(file = target.file.0, target = target.node.0))]
    fn reference_type(
        &self,
        target: NodeRef,
        context: &C,
        anchor: Option<NodeRef>,
    ) -> Result<Option<TypeId>> {
        if node_of(self.index, target)?.kind() != NodeKind::Target {
            return Ok(None);
        }
        self.resolve(DeclShape::Target { target, anchor }, context)
    }
}

#[cfg(test)]
#[path = "../tests/provider_tests.rs"]
mod tests;
