//! Same-shape graph rewriting.
//!
//! # Usage
//!
//! Implement `Rewrite` and override the hooks for the node kinds to replace.
//! A hook returns `Ok(None)` to keep the node as is.
//!
//! ```ignore
//! impl Rewrite for WidenInts {
//!     fn rewrite_primitive(
//!         &mut self,
//!         _id: NodeId,
//!         node: &PrimitiveType,
//!     ) -> Result<Option<DataType>, VisitError> {
//!         if node.repr != PrimitiveRepr::Atom(Atom::Int32) {
//!             return Ok(None);
//!         }
//!         Ok(Some(DataType::Primitive(PrimitiveType {
//!             host: Atom::Int64.into(),
//!             repr: PrimitiveRepr::Atom(Atom::Int64),
//!             nullable: node.nullable,
//!         })))
//!     }
//! }
//! ```
//!
//! Replacements keep the graph's id space: a replacement refers to other
//! nodes by the same ids the input does. A replaced node and every node that
//! reaches it get fresh instances; all other nodes keep theirs, and a rewrite
//! that replaces nothing returns the input graph's instances unchanged.

use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, trace};

use crate::types::{
    ArrayType, CustomType, DataType, DataTypeGraph, DataTypeKind, ExpressionType, FunctionType,
    NodeId, OpenParameterType, PrimitiveType, Property, QuotationType, StructuralType,
};

use super::VisitError;

type Replacement = Result<Option<DataType>, VisitError>;

pub trait Rewrite {
    fn rewrite_primitive(&mut self, _id: NodeId, _node: &PrimitiveType) -> Replacement {
        Ok(None)
    }

    fn rewrite_array(&mut self, _id: NodeId, _node: &ArrayType) -> Replacement {
        Ok(None)
    }

    /// Called once per property of a structural node, before
    /// [`rewrite_structural`](Self::rewrite_structural) sees the node with
    /// the replaced properties.
    fn rewrite_property(
        &mut self,
        _owner: NodeId,
        _property: &Property,
    ) -> Result<Option<Property>, VisitError> {
        Ok(None)
    }

    fn rewrite_structural(&mut self, _id: NodeId, _node: &StructuralType) -> Replacement {
        Ok(None)
    }

    fn rewrite_function(&mut self, _id: NodeId, _node: &FunctionType) -> Replacement {
        Ok(None)
    }

    fn rewrite_expression(&mut self, _id: NodeId, _node: &ExpressionType) -> Replacement {
        Ok(None)
    }

    fn rewrite_quotation(&mut self, _id: NodeId, _node: &QuotationType) -> Replacement {
        Ok(None)
    }

    fn rewrite_open_parameter(&mut self, _id: NodeId, _node: &OpenParameterType) -> Replacement {
        Ok(None)
    }

    /// Custom nodes have no default behavior.
    fn rewrite_custom(&mut self, id: NodeId, _node: &CustomType) -> Replacement {
        Err(VisitError::NotHandled {
            node: id,
            kind: DataTypeKind::Custom,
        })
    }
}

/// Rewrite `graph` bottom-up and return the resulting graph.
pub fn rewrite<R: Rewrite + ?Sized>(
    rewriter: &mut R,
    graph: &DataTypeGraph,
) -> Result<DataTypeGraph, VisitError> {
    let mut pass = RewritePass {
        rewriter,
        graph,
        visited: vec![false; graph.len()],
        replaced: vec![None; graph.len()],
    };
    pass.visit(graph.root())?;

    let replaced = pass.replaced;
    if replaced.iter().all(Option::is_none) {
        debug!("rewrite replaced no nodes");
        return Ok(graph.clone());
    }

    let changed = mark_ancestors(graph, &replaced);
    debug!(
        "rewrite replaced {} nodes, {} including ancestors",
        replaced.iter().flatten().count(),
        changed.len()
    );
    let nodes: Vec<Arc<DataType>> = graph
        .iter()
        .zip(replaced)
        .map(|((id, node), replacement)| match replacement {
            Some(new) => Arc::new(new),
            None if changed.contains(&id) => Arc::new(node.clone()),
            None => Arc::clone(graph.node_arc(id)),
        })
        .collect();

    let output = DataTypeGraph::from_parts(nodes, graph.root());
    check_consistency(&output)?;
    Ok(output)
}

struct RewritePass<'a, R: ?Sized> {
    rewriter: &'a mut R,
    graph: &'a DataTypeGraph,
    visited: Vec<bool>,
    replaced: Vec<Option<DataType>>,
}

impl<R: Rewrite + ?Sized> RewritePass<'_, R> {
    fn visit(&mut self, id: NodeId) -> Result<(), VisitError> {
        // Marked on entry, so a back-edge is not followed.
        if std::mem::replace(&mut self.visited[id.index()], true) {
            return Ok(());
        }
        let graph = self.graph;
        let node = graph.node(id);
        for child in node.children() {
            self.visit(child)?;
        }

        let replacement = match node {
            DataType::Primitive(n) => self.rewriter.rewrite_primitive(id, n)?,
            DataType::Array(n) => self.rewriter.rewrite_array(id, n)?,
            DataType::Structural(n) => self.structural(id, n)?,
            DataType::Function(n) => self.rewriter.rewrite_function(id, n)?,
            DataType::Expression(n) => self.rewriter.rewrite_expression(id, n)?,
            DataType::Quotation(n) => self.rewriter.rewrite_quotation(id, n)?,
            DataType::OpenParameter(n) => self.rewriter.rewrite_open_parameter(id, n)?,
            DataType::Custom(n) => self.rewriter.rewrite_custom(id, n)?,
        };
        if let Some(new) = replacement.filter(|new| new != node) {
            trace!("{id}: {} replaced by {}", node.kind(), new.kind());
            self.replaced[id.index()] = Some(new);
        }
        Ok(())
    }

    fn structural(&mut self, id: NodeId, node: &StructuralType) -> Replacement {
        let mut properties = None;
        for (i, property) in node.properties.iter().enumerate() {
            let Some(new) = self.rewriter.rewrite_property(id, property)? else {
                continue;
            };
            properties.get_or_insert_with(|| node.properties.clone())[i] = new;
        }
        let Some(properties) = properties else {
            return self.rewriter.rewrite_structural(id, node);
        };
        let updated = StructuralType {
            properties,
            ..node.clone()
        };
        Ok(Some(
            self.rewriter
                .rewrite_structural(id, &updated)?
                .unwrap_or(DataType::Structural(updated)),
        ))
    }
}

/// Replaced nodes plus every node from which one is reachable.
fn mark_ancestors(graph: &DataTypeGraph, replaced: &[Option<DataType>]) -> HashSet<NodeId> {
    let mut parents: Vec<Vec<NodeId>> = vec![Vec::new(); graph.len()];
    for (id, node) in graph.iter() {
        for child in node.children() {
            parents[child.index()].push(id);
        }
    }
    let mut changed = HashSet::new();
    let mut stack: Vec<NodeId> = replaced
        .iter()
        .enumerate()
        .filter(|(_, r)| r.is_some())
        .map(|(i, _)| NodeId::from_index(i))
        .collect();
    while let Some(id) = stack.pop() {
        if changed.insert(id) {
            stack.extend(parents[id.index()].iter().copied());
        }
    }
    changed
}

fn check_consistency(graph: &DataTypeGraph) -> Result<(), VisitError> {
    let inconsistent = |node, reason| VisitError::InconsistentRewrite { node, reason };

    for (id, node) in graph.iter() {
        for child in node.children() {
            if graph.try_node(child).is_none() {
                return Err(inconsistent(id, format!("child {child} does not exist")));
            }
        }
        match node {
            DataType::Quotation(q) => {
                let kind = graph.node(q.function).kind();
                if kind != DataTypeKind::Function {
                    return Err(inconsistent(
                        id,
                        format!("quoted slot must be a function, found {kind}"),
                    ));
                }
            }
            DataType::Structural(s) => {
                let mut names = HashSet::new();
                if let Some(dup) = s.properties.iter().find(|p| !names.insert(&p.name)) {
                    return Err(inconsistent(
                        id,
                        format!("duplicate property `{}`", dup.name),
                    ));
                }
            }
            _ => {}
        }
    }
    Ok(())
}
