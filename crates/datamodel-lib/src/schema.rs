//! Serialization schema derived from a classified graph.
//!
//! Structural nodes become named definitions keyed by mapping name. A
//! back-edge in a cyclic graph becomes a `ref` to the enclosing definition.

use datamodel_core::TypeRegistry;
use serde::Serialize;

use crate::types::{
    ArrayType, DataType, DataTypeGraph, ExpressionType, FunctionType, NodeId, OpenParameterType,
    PrimitiveRepr, PrimitiveType, QuotationType, StructuralKind, StructuralType,
};
use crate::visitor::{Fold, VisitError, fold};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Schema {
    Primitive {
        name: String,
        nullable: bool,
    },
    Array {
        element: Box<Schema>,
    },
    Struct {
        name: String,
        structural: StructuralKind,
        fields: Vec<SchemaField>,
    },
    Function {
        parameters: Vec<Schema>,
        result: Box<Schema>,
    },
    Expression {
        name: String,
    },
    Quotation {
        function: Box<Schema>,
    },
    Parameter {
        name: String,
    },
    Ref {
        target: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SchemaField {
    pub name: String,
    pub schema: Schema,
}

/// Derives a [`Schema`] for each node it folds.
pub struct SchemaBuilder<'r> {
    registry: &'r TypeRegistry,
}

impl<'r> SchemaBuilder<'r> {
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self { registry }
    }
}

impl Fold for SchemaBuilder<'_> {
    type Output = Schema;

    fn fold_primitive(&mut self, _id: NodeId, node: &PrimitiveType) -> Result<Schema, VisitError> {
        let name = match node.repr {
            PrimitiveRepr::Atom(atom) => atom.name().to_owned(),
            PrimitiveRepr::Enum(ty) => self.registry.display(ty),
        };
        Ok(Schema::Primitive {
            name,
            nullable: node.nullable,
        })
    }

    fn fold_array(
        &mut self,
        _id: NodeId,
        _node: &ArrayType,
        element: Schema,
    ) -> Result<Schema, VisitError> {
        Ok(Schema::Array {
            element: Box::new(element),
        })
    }

    fn fold_structural(
        &mut self,
        _id: NodeId,
        node: &StructuralType,
        properties: Vec<Schema>,
    ) -> Result<Schema, VisitError> {
        let fields = node
            .properties
            .iter()
            .zip(properties)
            .map(|(p, schema)| SchemaField {
                name: p.name.clone(),
                schema,
            })
            .collect();
        Ok(Schema::Struct {
            name: self.registry.display(node.host),
            structural: node.kind,
            fields,
        })
    }

    fn fold_function(
        &mut self,
        _id: NodeId,
        _node: &FunctionType,
        parameters: Vec<Schema>,
        result: Schema,
    ) -> Result<Schema, VisitError> {
        Ok(Schema::Function {
            parameters,
            result: Box::new(result),
        })
    }

    fn fold_expression(
        &mut self,
        _id: NodeId,
        node: &ExpressionType,
    ) -> Result<Schema, VisitError> {
        Ok(Schema::Expression {
            name: self.registry.display(node.host),
        })
    }

    fn fold_quotation(
        &mut self,
        _id: NodeId,
        _node: &QuotationType,
        function: Schema,
    ) -> Result<Schema, VisitError> {
        Ok(Schema::Quotation {
            function: Box::new(function),
        })
    }

    fn fold_open_parameter(
        &mut self,
        _id: NodeId,
        node: &OpenParameterType,
    ) -> Result<Schema, VisitError> {
        Ok(Schema::Parameter {
            name: self.registry.display(node.host),
        })
    }

    fn fold_back_reference(&mut self, _id: NodeId, node: &DataType) -> Result<Schema, VisitError> {
        Ok(Schema::Ref {
            target: self.registry.display(node.host()),
        })
    }
}

pub fn derive_schema(registry: &TypeRegistry, graph: &DataTypeGraph) -> Result<Schema, VisitError> {
    fold(&mut SchemaBuilder::new(registry), graph)
}
