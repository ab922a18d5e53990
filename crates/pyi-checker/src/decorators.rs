//! Known decorator detection.
//!
//! The overload resolver never inspects decorator syntax itself. It asks a
//! `DecoratorResolver` for the set of well-known decorators applied to a
//! callable, which lets hosts plug in their own name resolution.
//!
//! `KnownDecoratorResolver` resolves decorator references through the
//! module's import table:
//!
//! ```python
//! from typing import overload as ov      # @ov          -> typing.overload
//! import typing_extensions as te         # @te.overload -> typing_extensions.overload
//! ov2 = ov                               # @ov2         -> deep contexts only
//! ```

use crate::context::{EvalMode, TypeEvalContext};
use crate::stub_index::StubIndex;
use bitflags::bitflags;
use pyi_common::{Atom, Interner};
use pyi_syntax::{Decorator, Expr, ModuleData, NodeArena, NodeData, NodeRef};
use smallvec::SmallVec;
use tracing::trace;

bitflags! {
    /// Well-known decorators recognized on a callable.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct KnownDecorators: u8 {
        /// `typing.overload`: the callable is one partial signature of an
        /// overload group.
        const TYPING_OVERLOAD = 1 << 0;
        const STATICMETHOD = 1 << 1;
        const CLASSMETHOD = 1 << 2;
        const PROPERTY = 1 << 3;
        const ABSTRACTMETHOD = 1 << 4;
    }
}

pub trait DecoratorResolver<C> {
    /// Known decorators applied to `callable`. Resolution may depend on the
    /// evaluation context; results are not cached.
    fn known_tags(&self, callable: NodeRef, context: &C) -> KnownDecorators;
}

/// Maximum number of `alias = other` hops followed for one decorator.
const MAX_ALIAS_HOPS: usize = 8;

type NameParts = SmallVec<[Atom; 4]>;

pub struct KnownDecoratorResolver<'a> {
    index: &'a dyn StubIndex,
    strings: &'a Interner,
    /// Extra fully qualified names treated as the overload marker.
    overload_aliases: Vec<String>,
}

impl<'a> KnownDecoratorResolver<'a> {
    pub fn new(index: &'a dyn StubIndex, strings: &'a Interner) -> Self {
        Self {
            index,
            strings,
            overload_aliases: Vec::new(),
        }
    }

    pub fn with_overload_decorators<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.overload_aliases
            .extend(names.into_iter().map(Into::into));
        self
    }

    /// Fully qualified name of a decorator reference, following import
    /// aliases and, in deep mode, module-level assignment aliases.
    ///
    /// Returns the name unchanged when it is not bound by an import.
    pub fn qualified_name(
        &self,
        file: NodeRef,
        decorator: &Decorator,
        mode: EvalMode,
    ) -> Option<String> {
        let arena = &self.index.file(file.file)?.arena;
        let module = arena.module()?;
        let mut parts: NameParts = decorator.name.parts().iter().copied().collect();

        for _ in 0..MAX_ALIAS_HOPS {
            let head = *parts.first()?;
            if let Some(expanded) = expand_import(module, head) {
                parts = replace_head(&parts, expanded);
                break;
            }
            if mode != EvalMode::Deep {
                break;
            }
            match self.assignment_alias(arena, file, head) {
                Some(expanded) => parts = replace_head(&parts, expanded),
                None => break,
            }
        }

        let mut qualified = String::new();
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                qualified.push('.');
            }
            qualified.push_str(&self.strings.resolve(*part));
        }
        Some(qualified)
    }

    /// `head = some.dotted.name` at module level.
    fn assignment_alias(&self, arena: &NodeArena, file: NodeRef, head: Atom) -> Option<NameParts> {
        let module = NodeRef::module(file.file);
        let binding = *self.index.find_by_name(module, head).last()?;
        match &arena.get(binding.node)?.data {
            NodeData::Target(target) if target.annotation.is_none() => match &target.value {
                Some(Expr::Name(name)) if !name.is_empty() => {
                    Some(name.parts().iter().copied().collect())
                }
                _ => None,
            },
            _ => None,
        }
    }

    fn classify(&self, qualified: &str) -> KnownDecorators {
        match qualified {
            "overload" | "typing.overload" | "typing_extensions.overload" => {
                KnownDecorators::TYPING_OVERLOAD
            }
            "staticmethod" | "builtins.staticmethod" => KnownDecorators::STATICMETHOD,
            "classmethod" | "builtins.classmethod" => KnownDecorators::CLASSMETHOD,
            "property" | "builtins.property" => KnownDecorators::PROPERTY,
            "abstractmethod" | "abc.abstractmethod" => KnownDecorators::ABSTRACTMETHOD,
            other if self.overload_aliases.iter().any(|alias| alias == other) => {
                KnownDecorators::TYPING_OVERLOAD
            }
            _ => KnownDecorators::empty(),
        }
    }
}

/// Expand `head` through the module's import bindings.
fn expand_import(module: &ModuleData, head: Atom) -> Option<NameParts> {
    let import = module.imports.iter().rev().find(|i| i.alias == head)?;
    let mut parts: NameParts = import.module.parts().iter().copied().collect();
    parts.extend(import.name);
    Some(parts)
}

fn replace_head(parts: &[Atom], mut head: NameParts) -> NameParts {
    head.extend(parts.iter().skip(1).copied());
    head
}

impl<C: TypeEvalContext> DecoratorResolver<C> for KnownDecoratorResolver<'_> {
    fn known_tags(&self, callable: NodeRef, context: &C) -> KnownDecorators {
        let Some(function) = self
            .index
            .file(callable.file)
            .and_then(|f| f.arena.function(callable.node))
        else {
            return KnownDecorators::empty();
        };
        let mode = context.mode();
        let tags = function
            .decorators
            .iter()
            .filter_map(|decorator| self.qualified_name(callable, decorator, mode))
            .fold(KnownDecorators::empty(), |acc, name| acc | self.classify(&name));
        trace!(
            file = callable.file.0,
            node = callable.node.0,
            ?mode,
            ?tags,
            "KnownDecoratorResolver::known_tags"
        );
        tags
    }
}

#[cfg(test)]
#[path = "../tests/decorators_tests.rs"]
mod tests;
