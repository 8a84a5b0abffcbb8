//! Generic-result folding.
//!
//! Every reachable node is folded exactly once, children first, and the
//! result is memoized by node id. An edge back to a node whose fold is still
//! in progress goes to [`Fold::fold_back_reference`] instead.

use crate::types::{
    ArrayType, CustomType, DataType, DataTypeGraph, DataTypeKind, ExpressionType, FunctionType,
    NodeId, OpenParameterType, PrimitiveType, QuotationType, StructuralType,
};

use super::VisitError;

pub trait Fold {
    type Output: Clone;

    fn fold_primitive(
        &mut self,
        id: NodeId,
        node: &PrimitiveType,
    ) -> Result<Self::Output, VisitError>;

    fn fold_array(
        &mut self,
        id: NodeId,
        node: &ArrayType,
        element: Self::Output,
    ) -> Result<Self::Output, VisitError>;

    /// `properties` are the folded property types, in property order.
    fn fold_structural(
        &mut self,
        id: NodeId,
        node: &StructuralType,
        properties: Vec<Self::Output>,
    ) -> Result<Self::Output, VisitError>;

    fn fold_function(
        &mut self,
        id: NodeId,
        node: &FunctionType,
        parameters: Vec<Self::Output>,
        result: Self::Output,
    ) -> Result<Self::Output, VisitError>;

    fn fold_expression(
        &mut self,
        id: NodeId,
        node: &ExpressionType,
    ) -> Result<Self::Output, VisitError>;

    fn fold_quotation(
        &mut self,
        id: NodeId,
        node: &QuotationType,
        function: Self::Output,
    ) -> Result<Self::Output, VisitError>;

    fn fold_open_parameter(
        &mut self,
        id: NodeId,
        node: &OpenParameterType,
    ) -> Result<Self::Output, VisitError>;

    fn fold_custom(&mut self, id: NodeId, _node: &CustomType) -> Result<Self::Output, VisitError> {
        Err(VisitError::NotHandled {
            node: id,
            kind: DataTypeKind::Custom,
        })
    }

    /// A reference to `id` from inside its own fold.
    fn fold_back_reference(
        &mut self,
        id: NodeId,
        _node: &DataType,
    ) -> Result<Self::Output, VisitError> {
        Err(VisitError::CyclicGraph { node: id })
    }
}

/// Fold `graph` from its root.
pub fn fold<F: Fold + ?Sized>(
    folder: &mut F,
    graph: &DataTypeGraph,
) -> Result<F::Output, VisitError> {
    let mut pass = FoldPass {
        folder,
        graph,
        active: vec![false; graph.len()],
        done: vec![None; graph.len()],
    };
    pass.visit(graph.root())
}

struct FoldPass<'a, F: Fold + ?Sized> {
    folder: &'a mut F,
    graph: &'a DataTypeGraph,
    active: Vec<bool>,
    done: Vec<Option<F::Output>>,
}

impl<F: Fold + ?Sized> FoldPass<'_, F> {
    fn visit(&mut self, id: NodeId) -> Result<F::Output, VisitError> {
        if let Some(output) = &self.done[id.index()] {
            return Ok(output.clone());
        }
        let graph = self.graph;
        let node = graph.node(id);
        if self.active[id.index()] {
            return self.folder.fold_back_reference(id, node);
        }

        self.active[id.index()] = true;
        let output = self.fold_node(id, node);
        self.active[id.index()] = false;

        let output = output?;
        self.done[id.index()] = Some(output.clone());
        Ok(output)
    }

    fn fold_node(&mut self, id: NodeId, node: &DataType) -> Result<F::Output, VisitError> {
        match node {
            DataType::Primitive(n) => self.folder.fold_primitive(id, n),
            DataType::Array(n) => {
                let element = self.visit(n.element)?;
                self.folder.fold_array(id, n, element)
            }
            DataType::Structural(n) => {
                let properties = n
                    .properties
                    .iter()
                    .map(|p| self.visit(p.ty))
                    .collect::<Result<Vec<_>, _>>()?;
                self.folder.fold_structural(id, n, properties)
            }
            DataType::Function(n) => {
                let parameters = n
                    .parameters
                    .iter()
                    .map(|p| self.visit(*p))
                    .collect::<Result<Vec<_>, _>>()?;
                let result = self.visit(n.result)?;
                self.folder.fold_function(id, n, parameters, result)
            }
            DataType::Expression(n) => self.folder.fold_expression(id, n),
            DataType::Quotation(n) => {
                let function = self.visit(n.function)?;
                self.folder.fold_quotation(id, n, function)
            }
            DataType::OpenParameter(n) => self.folder.fold_open_parameter(id, n),
            DataType::Custom(n) => self.folder.fold_custom(id, n),
        }
    }
}
