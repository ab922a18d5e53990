//! Ordered composition of type providers.
//!
//! The stub provider is usually one of several type sources. A chain asks
//! each provider in turn and returns the first answer that is not absence.
//! An internal error from any provider stops the chain.

use crate::error::Result;
use crate::provider::TypeProvider;
use pyi_solver::TypeId;
use pyi_syntax::NodeRef;

type BoxedProvider<'p, C> = Box<dyn TypeProvider<C> + Send + Sync + 'p>;

pub struct TypeProviderChain<'p, C> {
    providers: Vec<BoxedProvider<'p, C>>,
}

impl<C> Default for TypeProviderChain<'_, C> {
    fn default() -> Self {
        Self {
            providers: Vec::new(),
        }
    }
}

impl<'p, C> TypeProviderChain<'p, C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider; earlier providers take precedence.
    pub fn push<P>(&mut self, provider: P)
    where
        P: TypeProvider<C> + Send + Sync + 'p,
    {
        self.providers.push(Box::new(provider));
    }

    pub fn with<P>(mut self, provider: P) -> Self
    where
        P: TypeProvider<C> + Send + Sync + 'p,
    {
        self.push(provider);
        self
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    fn first_answer<F>(&self, mut query: F) -> Result<Option<TypeId>>
    where
        F: FnMut(&dyn TypeProvider<C>) -> Result<Option<TypeId>>,
    {
        for provider in &self.providers {
            if let Some(type_id) = query(provider.as_ref())? {
                return Ok(Some(type_id));
            }
        }
        Ok(None)
    }
}

impl<C> TypeProvider<C> for TypeProviderChain<'_, C> {
    fn parameter_type(
        &self,
        param: NodeRef,
        owner: NodeRef,
        context: &C,
    ) -> Result<Option<TypeId>> {
        self.first_answer(|p| p.parameter_type(param, owner, context))
    }

    fn return_type(&self, callable: NodeRef, context: &C) -> Result<Option<TypeId>> {
        self.first_answer(|p| p.return_type(callable, context))
    }

    fn callable_type(&self, callable: NodeRef, context: &C) -> Result<Option<TypeId>> {
        self.first_answer(|p| p.callable_type(callable, context))
    }

    fn reference_type(
        &self,
        target: NodeRef,
        context: &C,
        anchor: Option<NodeRef>,
    ) -> Result<Option<TypeId>> {
        self.first_answer(|p| p.reference_type(target, context, anchor))
    }
}

#[cfg(test)]
#[path = "../tests/chain_tests.rs"]
mod tests;
