//! Overload Resolver: unions the members of an overload group.
//!
//! Given a stub callable marked `@overload`, collect every sibling with the
//! same name that is also marked, compute each member's type and union them
//! in declaration order:
//!
//! ```python
//! class C:
//!     @overload
//!     def f(self, x: int) -> int: ...
//!     @overload
//!     def f(self, x: str) -> str: ...
//! ```
//!
//! gives `((self: C, x: int) -> int) | ((self: C, x: str) -> str)`.
//!
//! Class bodies are scanned through the early-exit method visitor; module
//! scans always run over every top-level function.

use crate::context::TypeEvalContext;
use crate::decorators::{DecoratorResolver, KnownDecorators};
use crate::error::{ProviderError, Result};
use crate::stub_index::{StubIndex, arena_of, node_of};
use pyi_common::Atom;
use pyi_common::limits::MAX_OVERLOAD_GROUP_SIZE;
use pyi_solver::{TypeId, TypeInterner};
use pyi_syntax::{NodeArena, NodeKind, NodeRef};
use std::ops::ControlFlow;
use tracing::{debug, trace, warn};

pub struct OverloadResolver<'a, I: ?Sized, D: ?Sized> {
    index: &'a I,
    decorators: &'a D,
    types: &'a TypeInterner,
}

impl<'a, I: StubIndex + ?Sized, D: ?Sized> OverloadResolver<'a, I, D> {
    pub fn new(index: &'a I, decorators: &'a D, types: &'a TypeInterner) -> Self {
        Self {
            index,
            decorators,
            types,
        }
    }

    /// Whether `callable` carries the overload marker under `context`.
    pub fn is_overload<C>(&self, callable: NodeRef, context: &C) -> bool
    where
        D: DecoratorResolver<C>,
    {
        self.decorators
            .known_tags(callable, context)
            .contains(KnownDecorators::TYPING_OVERLOAD)
    }

    /// The union of the types of `function`'s overload group.
    ///
    /// Members whose type cannot be computed are dropped; if none remain the
    /// result is `None`, never an empty union. Class groups larger than
    /// `MAX_OVERLOAD_GROUP_SIZE` are cut at that size, so the union then
    /// holds only the leading members.
    pub fn overload_type<C>(&self, function: NodeRef, context: &C) -> Result<Option<TypeId>>
    where
        C: TypeEvalContext,
        D: DecoratorResolver<C>,
    {
        let members = self.overload_members(function, context)?;
        Ok(self.group_type(function, &members, context))
    }

    /// The union of the computable types of already collected `members`.
    pub fn group_type<C>(&self, function: NodeRef, members: &[NodeRef], context: &C) -> Option<TypeId>
    where
        C: TypeEvalContext,
    {
        let computed: Vec<TypeId> = members
            .iter()
            .filter_map(|&member| context.type_of(member))
            .collect();
        debug!(
            file = function.file.0,
            node = function.node.0,
            members = members.len(),
            computed = computed.len(),
            "OverloadResolver::group_type"
        );
        if computed.is_empty() {
            return None;
        }
        Some(self.types.union(computed))
    }

    /// Members of `function`'s overload group in declaration order,
    /// `function` included when it is marked itself. An unmarked `function`
    /// still finds its marked same-named siblings.
    pub fn overload_members<C>(&self, function: NodeRef, context: &C) -> Result<Vec<NodeRef>>
    where
        D: DecoratorResolver<C>,
    {
        let arena = arena_of(self.index, function.file)?;
        let node = node_of(self.index, function)?;
        let owner = arena
            .enclosing_scope(function.node)
            .ok_or(ProviderError::MissingOwner {
                file: function.file,
                node: function.node,
                kind: node.kind(),
                expected: NodeKind::Module,
            })?;
        match arena.kind(owner) {
            Some(NodeKind::Class) => {
                Ok(self.class_members(arena, function.sibling(owner), node.name, context))
            }
            Some(NodeKind::Module) => Ok(self.module_members(arena, function, node.name, context)),
            Some(other) => Err(ProviderError::UnexpectedScopeOwner {
                file: function.file,
                node: function.node,
                owner: other,
            }),
            None => Err(ProviderError::DanglingNode {
                file: function.file,
                node: owner,
            }),
        }
    }

    fn class_members<C>(
        &self,
        arena: &NodeArena,
        class: NodeRef,
        name: Atom,
        context: &C,
    ) -> Vec<NodeRef>
    where
        D: DecoratorResolver<C>,
    {
        let mut members = Vec::new();
        let flow = arena.visit_methods(class.node, |method| {
            let method = class.sibling(method);
            if arena.name(method.node) == Some(name) && self.is_overload(method, context) {
                members.push(method);
                if members.len() >= MAX_OVERLOAD_GROUP_SIZE {
                    return ControlFlow::Break(());
                }
            }
            ControlFlow::Continue(())
        });
        if flow.is_break() {
            warn!(
                file = class.file.0,
                class = class.node.0,
                limit = MAX_OVERLOAD_GROUP_SIZE,
                "OverloadResolver - overload group truncated"
            );
        }
        members
    }

    fn module_members<C>(
        &self,
        arena: &NodeArena,
        function: NodeRef,
        name: Atom,
        context: &C,
    ) -> Vec<NodeRef>
    where
        D: DecoratorResolver<C>,
    {
        let members: Vec<NodeRef> = arena
            .top_level_functions()
            .filter(|&f| arena.name(f) == Some(name))
            .map(|f| function.sibling(f))
            .filter(|&f| self.is_overload(f, context))
            .collect();
        trace!(
            file = function.file.0,
            collected = members.len(),
            "OverloadResolver - module scan"
        );
        members
    }
}

#[cfg(test)]
#[path = "../tests/overloads_tests.rs"]
mod tests;
