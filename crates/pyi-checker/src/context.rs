//! Evaluation contexts and the shallow-to-deep adapter.
//!
//! A context answers "what is the type of this declaration". In shallow mode
//! it only trusts what is written down (annotations); in deep mode it may
//! also walk initializer expressions and read type comments. Contexts are
//! immutable values: deepening produces a new context and never changes the
//! one the caller passed in.

use pyi_solver::TypeId;
use pyi_syntax::NodeRef;
use std::ops::Deref;
use tracing::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EvalMode {
    /// Declared and cached signatures only.
    Shallow,
    /// Re-derive types from initializers and type comments.
    Deep,
}

/// Capability surface of a type-evaluation context.
pub trait TypeEvalContext: Sized {
    fn mode(&self) -> EvalMode;

    /// The type of a declaration (parameter, target, function or class).
    fn type_of(&self, decl: NodeRef) -> Option<TypeId>;

    /// The declared or inferred return type of a callable.
    fn return_type_of(&self, callable: NodeRef) -> Option<TypeId>;

    /// Whether evaluating `element` needs expression walking that this
    /// context does not permit. Deep contexts always answer `false`.
    fn can_deepen(&self, element: NodeRef) -> bool;

    /// A deep context scoped to `scope_root` (a module or class).
    fn deepen(&self, scope_root: NodeRef) -> Self;
}

/// The context a query ends up evaluating with: the caller's own, or a
/// deepened one that lives only for the query.
pub enum EffectiveContext<'c, C> {
    Given(&'c C),
    Deepened(C),
}

impl<C> EffectiveContext<'_, C> {
    pub fn is_deepened(&self) -> bool {
        matches!(self, EffectiveContext::Deepened(_))
    }
}

impl<C> Deref for EffectiveContext<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        match self {
            EffectiveContext::Given(context) => context,
            EffectiveContext::Deepened(context) => context,
        }
    }
}

/// Wraps a caller's context with the upgrade decision.
pub struct ContextAdapter<'c, C> {
    context: &'c C,
}

impl<'c, C: TypeEvalContext> ContextAdapter<'c, C> {
    pub fn new(context: &'c C) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &'c C {
        self.context
    }

    /// True when `element` is initializer-typed and the context is shallow.
    pub fn can_deepen(&self, element: NodeRef) -> bool {
        self.context.mode() == EvalMode::Shallow && self.context.can_deepen(element)
    }

    pub fn deepen(&self, scope_root: NodeRef) -> C {
        trace!(
            file = scope_root.file.0,
            scope = scope_root.node.0,
            "ContextAdapter::deepen"
        );
        self.context.deepen(scope_root)
    }

    /// The context to evaluate `element` with: deepened to `scope_root` when
    /// required, the caller's context otherwise.
    pub fn effective(&self, element: NodeRef, scope_root: NodeRef) -> EffectiveContext<'c, C> {
        if self.can_deepen(element) {
            EffectiveContext::Deepened(self.deepen(scope_root))
        } else {
            EffectiveContext::Given(self.context)
        }
    }
}
