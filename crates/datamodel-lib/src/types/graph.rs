use std::sync::Arc;

use datamodel_core::TypeRegistry;

use super::instance::InstanceFactory;
use super::node::{DataType, NodeId};
use super::printer::DataTypePrinter;

/// An immutable, possibly cyclic graph of data type nodes.
///
/// Each node is shared behind an `Arc`, so a rewrite that leaves a node
/// untouched hands out the same instance. Graphs can be shared across
/// threads without synchronization.
#[derive(Clone, Debug)]
pub struct DataTypeGraph {
    nodes: Vec<Arc<DataType>>,
    root: NodeId,
}

impl DataTypeGraph {
    pub(crate) fn from_parts(nodes: Vec<Arc<DataType>>, root: NodeId) -> Self {
        debug_assert!(root.index() < nodes.len());
        Self { nodes, root }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn root_node(&self) -> &DataType {
        self.node(self.root)
    }

    /// # Panics
    /// Panics if the id does not belong to this graph.
    #[inline]
    pub fn node(&self, id: NodeId) -> &DataType {
        &self.nodes[id.index()]
    }

    /// The shared instance behind `id`.
    #[inline]
    pub fn node_arc(&self, id: NodeId) -> &Arc<DataType> {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn try_node(&self, id: NodeId) -> Option<&DataType> {
        self.nodes.get(id.index()).map(|n| n.as_ref())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &DataType)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::from_index(i), n.as_ref()))
    }

    /// Nodes reachable from `from`, in depth-first discovery order.
    pub fn reachable(&self, from: NodeId) -> Vec<NodeId> {
        let mut seen = vec![false; self.nodes.len()];
        let mut order = Vec::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            if std::mem::replace(&mut seen[id.index()], true) {
                continue;
            }
            order.push(id);
            let children = self.node(id).children();
            stack.extend(children.into_iter().rev());
        }
        order
    }

    /// Whether any node reachable from the root refers back to an ancestor.
    pub fn is_cyclic(&self) -> bool {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            Active,
            Done,
        }

        fn visit(graph: &DataTypeGraph, id: NodeId, marks: &mut [Mark]) -> bool {
            match marks[id.index()] {
                Mark::Active => return true,
                Mark::Done => return false,
                Mark::Unvisited => {}
            }
            marks[id.index()] = Mark::Active;
            for child in graph.node(id).children() {
                if visit(graph, child, marks) {
                    return true;
                }
            }
            marks[id.index()] = Mark::Done;
            false
        }

        let mut marks = vec![Mark::Unvisited; self.nodes.len()];
        visit(self, self.root, &mut marks)
    }

    pub fn printer<'a>(&'a self, registry: &'a TypeRegistry) -> DataTypePrinter<'a> {
        DataTypePrinter::new(registry, self)
    }

    /// Canonical short form; see [`DataTypePrinter`].
    pub fn render(&self, registry: &TypeRegistry) -> String {
        self.printer(registry).render()
    }

    pub fn instances<'a>(&'a self, registry: &'a TypeRegistry) -> InstanceFactory<'a> {
        InstanceFactory::new(registry, self)
    }
}
