//! NodeArena access and navigation methods.

use crate::base::NodeIndex;
use crate::node::*;
use crate::node_arena::NodeArena;
use pyi_common::Atom;
use pyi_common::limits::MAX_TREE_WALK_ITERATIONS;
use std::ops::ControlFlow;

impl NodeArena {
    /// Get a node by index
    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.0 as usize)
        }
    }

    #[inline]
    pub fn get_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get_mut(index.0 as usize)
        }
    }

    #[inline]
    pub fn kind(&self, index: NodeIndex) -> Option<NodeKind> {
        self.get(index).map(Node::kind)
    }

    #[inline]
    pub fn name(&self, index: NodeIndex) -> Option<Atom> {
        self.get(index).map(|n| n.name)
    }

    #[inline]
    pub fn parent(&self, index: NodeIndex) -> Option<NodeIndex> {
        self.get(index)
            .map(|n| n.parent)
            .filter(|p| p.is_some())
    }

    pub fn module(&self) -> Option<&ModuleData> {
        match self.get(NodeIndex::ROOT).map(|n| &n.data) {
            Some(NodeData::Module(data)) => Some(data),
            _ => None,
        }
    }

    pub fn class(&self, index: NodeIndex) -> Option<&ClassData> {
        match self.get(index).map(|n| &n.data) {
            Some(NodeData::Class(data)) => Some(data),
            _ => None,
        }
    }

    pub fn function(&self, index: NodeIndex) -> Option<&FunctionData> {
        match self.get(index).map(|n| &n.data) {
            Some(NodeData::Function(data)) => Some(data),
            _ => None,
        }
    }

    pub fn parameter(&self, index: NodeIndex) -> Option<&ParameterData> {
        match self.get(index).map(|n| &n.data) {
            Some(NodeData::Parameter(data)) => Some(data),
            _ => None,
        }
    }

    pub fn target(&self, index: NodeIndex) -> Option<&TargetData> {
        match self.get(index).map(|n| &n.data) {
            Some(NodeData::Target(data)) => Some(data),
            _ => None,
        }
    }

    /// Declarations directly owned by a scope, in declaration order.
    ///
    /// Modules and classes yield their bodies, functions their parameters.
    pub fn children(&self, index: NodeIndex) -> &[NodeIndex] {
        match self.get(index).map(|n| &n.data) {
            Some(NodeData::Module(data)) => &data.body,
            Some(NodeData::Class(data)) => &data.body,
            Some(NodeData::Function(data)) => &data.params,
            _ => &[],
        }
    }

    /// Direct children of `scope` named `name`, in declaration order.
    pub fn children_named(&self, scope: NodeIndex, name: Atom) -> impl Iterator<Item = NodeIndex> + '_ {
        self.children(scope)
            .iter()
            .copied()
            .filter(move |&child| self.name(child) == Some(name))
    }

    /// Top-level functions of the module, in declaration order.
    pub fn top_level_functions(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.children(NodeIndex::ROOT)
            .iter()
            .copied()
            .filter(|&idx| self.kind(idx) == Some(NodeKind::Function))
    }

    /// Methods declared directly in a class body, in declaration order.
    pub fn methods(&self, class: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        let body: &[NodeIndex] = match self.class(class) {
            Some(data) => &data.body,
            None => &[],
        };
        body.iter()
            .copied()
            .filter(|&idx| self.kind(idx) == Some(NodeKind::Function))
    }

    /// Visit the methods of a class in declaration order.
    ///
    /// The visitor may return `ControlFlow::Break` to stop the scan; the
    /// break is passed back to the caller.
    pub fn visit_methods<F>(&self, class: NodeIndex, mut visitor: F) -> ControlFlow<()>
    where
        F: FnMut(NodeIndex) -> ControlFlow<()>,
    {
        for method in self.methods(class) {
            visitor(method)?;
        }
        ControlFlow::Continue(())
    }

    /// Find the nearest enclosing scope (module, class or function) of a node.
    ///
    /// Returns None for the module itself, for dangling indices, and when the
    /// parent chain exceeds the walk limit.
    pub fn enclosing_scope(&self, index: NodeIndex) -> Option<NodeIndex> {
        let mut current = self.parent(index)?;
        let mut iterations = 0;
        loop {
            iterations += 1;
            if iterations > MAX_TREE_WALK_ITERATIONS {
                return None;
            }
            let node = self.get(current)?;
            if node.is_scope() {
                return Some(current);
            }
            current = self.parent(current)?;
        }
    }

    /// Find the class whose body directly declares `index`, if any.
    pub fn owning_class(&self, index: NodeIndex) -> Option<NodeIndex> {
        let scope = self.enclosing_scope(index)?;
        (self.kind(scope) == Some(NodeKind::Class)).then_some(scope)
    }

    /// Scope chain from the module (exclusive) down to `index` (inclusive).
    ///
    /// For a method `C.f` this is `[C, f]`. Returns None when the chain is
    /// broken or cyclic.
    pub fn scope_path(&self, index: NodeIndex) -> Option<Vec<NodeIndex>> {
        self.get(index)?;
        let mut path = vec![index];
        let mut current = index;
        let mut iterations = 0;
        while let Some(parent) = self.parent(current) {
            iterations += 1;
            if iterations > MAX_TREE_WALK_ITERATIONS {
                return None;
            }
            if parent == NodeIndex::ROOT {
                path.reverse();
                return Some(path);
            }
            path.push(parent);
            current = parent;
        }
        // Only the module itself has no parent.
        (index == NodeIndex::ROOT).then(Vec::new)
    }

    /// Whether a function is declared directly in a class body.
    pub fn is_method(&self, function: NodeIndex) -> bool {
        self.kind(function) == Some(NodeKind::Function) && self.owning_class(function).is_some()
    }
}
