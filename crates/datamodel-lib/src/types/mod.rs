//! The data type node model.

mod graph;
mod instance;
mod node;
mod printer;


pub use graph::DataTypeGraph;
pub use instance::{ArrayView, InstanceError, InstanceFactory};
pub use node::{
    ArrayType, Construction, CustomType, DataType, DataTypeKind, ExpressionType, FunctionType,
    MemberBinding, NodeId, OpenParameterType, PrimitiveRepr, PrimitiveType, Property,
    QuotationType, StructuralKind, StructuralType,
};
pub use printer::DataTypePrinter;
