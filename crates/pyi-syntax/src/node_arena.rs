//! NodeArena storage and node creation methods (add_* methods).

use crate::base::NodeIndex;
use crate::node::*;
use pyi_common::Atom;

/// Flat storage for the declarations of one file.
///
/// Node 0 is always the module. Children are recorded on their owner in
/// declaration order, which is the order every scan observes.
#[derive(Clone, Debug)]
pub struct NodeArena {
    pub(crate) nodes: Vec<Node>,
}

impl Default for NodeArena {
    fn default() -> Self {
        Self::new(Atom::NONE)
    }
}

impl NodeArena {
    /// Create an arena holding only a module node named `module_name`.
    pub fn new(module_name: Atom) -> NodeArena {
        NodeArena {
            nodes: vec![Node {
                name: module_name,
                parent: NodeIndex::NONE,
                data: NodeData::Module(ModuleData::default()),
            }],
        }
    }

    /// Number of nodes, including the module.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a node and link it into its owner's body (or parameter list).
    ///
    /// Returns `None` if `parent` does not exist or cannot own `data`.
    pub fn add(&mut self, parent: NodeIndex, name: Atom, data: NodeData) -> Option<NodeIndex> {
        let index = NodeIndex(self.nodes.len() as u32);
        let owner = self.nodes.get_mut(parent.0 as usize)?;
        match (&mut owner.data, &data) {
            (NodeData::Function(func), NodeData::Parameter(_)) => func.params.push(index),
            (NodeData::Module(module), NodeData::Class(_) | NodeData::Function(_) | NodeData::Target(_)) => {
                module.body.push(index)
            }
            (NodeData::Class(class), NodeData::Class(_) | NodeData::Function(_) | NodeData::Target(_)) => {
                class.body.push(index)
            }
            // Nested functions and locals are kept so that lookups can detect
            // them, but they are not part of any scanned body.
            (NodeData::Function(_), NodeData::Class(_) | NodeData::Function(_) | NodeData::Target(_)) => {}
            _ => return None,
        }
        self.nodes.push(Node { name, parent, data });
        Some(index)
    }

    pub fn add_class(&mut self, parent: NodeIndex, name: Atom) -> Option<NodeIndex> {
        self.add(parent, name, NodeData::Class(ClassData::default()))
    }

    pub fn add_function(&mut self, parent: NodeIndex, name: Atom) -> Option<NodeIndex> {
        self.add(parent, name, NodeData::Function(FunctionData::default()))
    }

    pub fn add_parameter(
        &mut self,
        function: NodeIndex,
        name: Atom,
        data: ParameterData,
    ) -> Option<NodeIndex> {
        self.add(function, name, NodeData::Parameter(data))
    }

    pub fn add_target(
        &mut self,
        parent: NodeIndex,
        name: Atom,
        data: TargetData,
    ) -> Option<NodeIndex> {
        self.add(parent, name, NodeData::Target(data))
    }
}

#[cfg(test)]
#[path = "../tests/node_arena_tests.rs"]
mod tests;
