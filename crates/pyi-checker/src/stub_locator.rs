//! Stub Locator: maps a real declaration to its stub counterpart.
//!
//! Resolution walks the real declaration's scope path (`C.f` for a method
//! `f` of class `C`) and descends the associated stub tree one name at a
//! time. Intermediate segments must be classes: locals of a function body
//! have no stub. At the final segment, the first declaration in stub order
//! whose kind fits the request wins, so an overload group is entered at its
//! first member.
//!
//! "No stub file", "no such name" and "wrong kind under that name" are all
//! absence. Only a corrupted tree is an error.

use crate::error::{ProviderError, Result};
use crate::stub_index::{StubIndex, arena_of, node_of};
use pyi_syntax::{FileId, NodeArena, NodeIndex, NodeKind, NodeRef};
use tracing::{debug, trace};

/// A declaration in a stub tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StubDeclaration {
    pub decl: NodeRef,
    pub kind: NodeKind,
}

pub struct StubLocator<'a, I: ?Sized> {
    index: &'a I,
}

impl<'a, I: StubIndex + ?Sized> StubLocator<'a, I> {
    pub fn new(index: &'a I) -> Self {
        Self { index }
    }

    /// Locate the stub of any declaration, dispatching on its kind.
    ///
    /// A module's stub is the stub module itself.
    pub fn locate(&self, decl: NodeRef) -> Result<Option<StubDeclaration>> {
        match node_of(self.index, decl)?.kind() {
            NodeKind::Module => Ok(self.stub_file_for(decl.file)?.map(|stub| StubDeclaration {
                decl: NodeRef::module(stub),
                kind: NodeKind::Module,
            })),
            NodeKind::Class => self.locate_class(decl),
            NodeKind::Function => self.locate_callable(decl),
            NodeKind::Target => self.locate_target(decl),
            NodeKind::Parameter => {
                let arena = arena_of(self.index, decl.file)?;
                let owner = arena
                    .parent(decl.node)
                    .filter(|&p| arena.kind(p) == Some(NodeKind::Function))
                    .ok_or(ProviderError::MissingOwner {
                        file: decl.file,
                        node: decl.node,
                        kind: NodeKind::Parameter,
                        expected: NodeKind::Function,
                    })?;
                self.locate_parameter(decl, decl.sibling(owner))
            }
        }
    }

    /// Locate the stub of a function or method. Serves both the callable
    /// and the return-position shape.
    pub fn locate_callable(&self, callable: NodeRef) -> Result<Option<StubDeclaration>> {
        self.locate_member(callable, |kind| kind == NodeKind::Function)
    }

    pub fn locate_class(&self, class: NodeRef) -> Result<Option<StubDeclaration>> {
        self.locate_member(class, |kind| kind == NodeKind::Class)
    }

    /// Locate the stub of a module- or class-level target binding.
    ///
    /// A stub may declare a real variable as a variable, or as a function
    /// or class of the same name; a variable is preferred.
    pub fn locate_target(&self, target: NodeRef) -> Result<Option<StubDeclaration>> {
        if let Some(found) = self.locate_member(target, |kind| kind == NodeKind::Target)? {
            return Ok(Some(found));
        }
        self.locate_member(target, |kind| {
            matches!(kind, NodeKind::Function | NodeKind::Class)
        })
    }

    /// Locate the stub parameter with the same name as `param`, through the
    /// stub of its owning callable.
    pub fn locate_parameter(
        &self,
        param: NodeRef,
        owner: NodeRef,
    ) -> Result<Option<StubDeclaration>> {
        let name = node_of(self.index, param)?.name;
        let Some(stub_owner) = self.locate_callable(owner)? else {
            return Ok(None);
        };
        let found = self
            .index
            .find_by_name(stub_owner.decl, name)
            .into_iter()
            .find(|candidate| self.kind_of(*candidate) == Some(NodeKind::Parameter));
        trace!(
            file = param.file.0,
            node = param.node.0,
            found = found.is_some(),
            "StubLocator::locate_parameter"
        );
        Ok(found.map(|decl| StubDeclaration {
            decl,
            kind: NodeKind::Parameter,
        }))
    }

    // =========================================================================
    // Scope path descent
    // =========================================================================

    /// The stub file of `file`. A stub has no stub of its own.
    fn stub_file_for(&self, file: FileId) -> Result<Option<FileId>> {
        let source = self
            .index
            .file(file)
            .ok_or(ProviderError::UnknownFile(file))?;
        if source.is_stub {
            return Ok(None);
        }
        Ok(self.index.associated_stub(file))
    }

    fn kind_of(&self, decl: NodeRef) -> Option<NodeKind> {
        self.index.file(decl.file)?.arena.kind(decl.node)
    }

    fn locate_member(
        &self,
        decl: NodeRef,
        accept: impl Fn(NodeKind) -> bool,
    ) -> Result<Option<StubDeclaration>> {
        let arena = arena_of(self.index, decl.file)?;
        node_of(self.index, decl)?;
        let Some(stub_file) = self.stub_file_for(decl.file)? else {
            trace!(file = decl.file.0, "StubLocator - no stub file");
            return Ok(None);
        };
        let path = arena
            .scope_path(decl.node)
            .ok_or(ProviderError::BrokenScopeChain {
                file: decl.file,
                node: decl.node,
            })?;
        let Some((&last, intermediate)) = path.split_last() else {
            // The module itself is not a member of anything.
            return Ok(None);
        };

        let Some(scope) = self.descend_classes(arena, intermediate, stub_file) else {
            return Ok(None);
        };

        let name = arena.name(last).ok_or(ProviderError::DanglingNode {
            file: decl.file,
            node: last,
        })?;
        let found = self
            .index
            .find_by_name(scope, name)
            .into_iter()
            .find_map(|candidate| {
                let kind = self.kind_of(candidate)?;
                accept(kind).then_some(StubDeclaration {
                    decl: candidate,
                    kind,
                })
            });
        debug!(
            file = decl.file.0,
            node = decl.node.0,
            stub_file = stub_file.0,
            stub_node = ?found.map(|s| s.decl.node.0),
            "StubLocator::locate"
        );
        Ok(found)
    }

    /// Follow the enclosing classes of the real declaration into the stub.
    /// Returns the stub scope owning the final segment.
    fn descend_classes(
        &self,
        arena: &NodeArena,
        classes: &[NodeIndex],
        stub_file: FileId,
    ) -> Option<NodeRef> {
        let mut scope = NodeRef::module(stub_file);
        for &segment in classes {
            if arena.kind(segment) != Some(NodeKind::Class) {
                // Declared inside a function body.
                return None;
            }
            let name = arena.name(segment)?;
            scope = self
                .index
                .find_by_name(scope, name)
                .into_iter()
                .find(|candidate| self.kind_of(*candidate) == Some(NodeKind::Class))?;
        }
        Some(scope)
    }
}

#[cfg(test)]
#[path = "../tests/stub_locator_tests.rs"]
mod tests;
