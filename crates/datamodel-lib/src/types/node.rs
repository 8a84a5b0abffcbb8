//! Data type nodes.
//!
//! Nodes live in a [`DataTypeGraph`](super::DataTypeGraph) arena and refer to
//! each other by [`NodeId`]. A back-edge in a cyclic graph is just an id equal
//! to an ancestor's.

use datamodel_core::{Atom, HostTypeId, ObjectRef, Value};

use super::instance::InstanceError;

/// Index of a node in its graph.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Variant summary of a node.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum DataTypeKind {
    Primitive,
    Array,
    Structural,
    Function,
    Expression,
    Quotation,
    OpenParameter,
    Custom,
}

impl std::fmt::Display for DataTypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Primitive => "primitive",
            Self::Array => "array",
            Self::Structural => "structural",
            Self::Function => "function",
            Self::Expression => "expression",
            Self::Quotation => "quotation",
            Self::OpenParameter => "open parameter",
            Self::Custom => "custom",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StructuralKind {
    Anonymous,
    Tuple,
    Record,
    Entity,
}

/// What a primitive node's values are made of.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PrimitiveRepr {
    Atom(Atom),
    /// An enumeration, by its declaring type.
    Enum(HostTypeId),
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct PrimitiveType {
    pub host: HostTypeId,
    pub repr: PrimitiveRepr,
    pub nullable: bool,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct ArrayType {
    pub host: HostTypeId,
    pub element: NodeId,
    /// Fixed-size host representation: no insert or remove.
    pub fixed_size: bool,
}

/// The host member a property reads and writes.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct MemberBinding {
    /// The type declaring the member.
    pub owner: HostTypeId,
    pub name: String,
    pub slot: usize,
    pub writable: bool,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Property {
    /// Mapping name: the identity used for equality and serialization.
    pub name: String,
    pub ty: NodeId,
    pub member: MemberBinding,
}

impl Property {
    /// Read the bound member of `instance`.
    pub fn get(&self, instance: &Value) -> Result<Value, InstanceError> {
        let object = self.expect_owner(instance)?;
        object
            .get(self.member.slot)
            .ok_or_else(|| InstanceError::NotSupported(format!("member `{}`", self.member.name)))
    }

    /// Write the bound member of `instance` without checking `value`
    /// against the property's type. Positional shapes are construction-only.
    ///
    /// [`InstanceFactory::set_property`](super::InstanceFactory::set_property)
    /// is the checked entry point.
    pub(crate) fn write(&self, instance: &Value, value: Value) -> Result<(), InstanceError> {
        if !self.member.writable {
            return Err(InstanceError::ReadOnlyProperty(self.name.clone()));
        }
        let object = self.expect_owner(instance)?;
        if object.set(self.member.slot, value) {
            Ok(())
        } else {
            Err(InstanceError::NotSupported(format!(
                "member `{}`",
                self.member.name
            )))
        }
    }

    /// The object behind `instance`, if its type declares the bound member.
    fn expect_owner<'v>(&self, instance: &'v Value) -> Result<&'v ObjectRef, InstanceError> {
        match instance {
            Value::Object(object) if object.ty() == self.member.owner => Ok(object),
            Value::Object(_) => Err(InstanceError::WrongValue {
                expected: format!("an object declaring `{}`", self.member.name),
                found: "object of another type",
            }),
            other => Err(InstanceError::WrongValue {
                expected: "object".into(),
                found: other.kind_name(),
            }),
        }
    }
}

/// How values of a structural node are constructed.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Construction {
    /// One argument per property, in order.
    Positional,
    /// Through a mapped initializer. Argument `i` fills slot `slots[i]`;
    /// other slots start at their default.
    Constructor(Vec<usize>),
    /// No-argument construction, then property setters.
    Default,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct StructuralType {
    pub host: HostTypeId,
    pub kind: StructuralKind,
    pub properties: Vec<Property>,
    pub construction: Construction,
}

impl StructuralType {
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Number of member slots an instance carries.
    pub fn slot_count(&self) -> usize {
        self.properties
            .iter()
            .map(|p| p.member.slot + 1)
            .max()
            .unwrap_or(0)
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct FunctionType {
    pub host: HostTypeId,
    pub parameters: Vec<NodeId>,
    pub result: NodeId,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct ExpressionType {
    pub host: HostTypeId,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct QuotationType {
    pub host: HostTypeId,
    pub function: NodeId,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct OpenParameterType {
    pub host: HostTypeId,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct CustomType {
    pub host: HostTypeId,
}

/// A node of the closed classification algebra.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum DataType {
    Primitive(PrimitiveType),
    Array(ArrayType),
    Structural(StructuralType),
    Function(FunctionType),
    Expression(ExpressionType),
    Quotation(QuotationType),
    OpenParameter(OpenParameterType),
    Custom(CustomType),
}

impl DataType {
    pub fn kind(&self) -> DataTypeKind {
        match self {
            DataType::Primitive(_) => DataTypeKind::Primitive,
            DataType::Array(_) => DataTypeKind::Array,
            DataType::Structural(_) => DataTypeKind::Structural,
            DataType::Function(_) => DataTypeKind::Function,
            DataType::Expression(_) => DataTypeKind::Expression,
            DataType::Quotation(_) => DataTypeKind::Quotation,
            DataType::OpenParameter(_) => DataTypeKind::OpenParameter,
            DataType::Custom(_) => DataTypeKind::Custom,
        }
    }

    pub fn host(&self) -> HostTypeId {
        match self {
            DataType::Primitive(n) => n.host,
            DataType::Array(n) => n.host,
            DataType::Structural(n) => n.host,
            DataType::Function(n) => n.host,
            DataType::Expression(n) => n.host,
            DataType::Quotation(n) => n.host,
            DataType::OpenParameter(n) => n.host,
            DataType::Custom(n) => n.host,
        }
    }

    /// Child ids in slot order.
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            DataType::Array(n) => vec![n.element],
            DataType::Structural(n) => n.properties.iter().map(|p| p.ty).collect(),
            DataType::Function(n) => {
                let mut ids = n.parameters.clone();
                ids.push(n.result);
                ids
            }
            DataType::Quotation(n) => vec![n.function],
            DataType::Primitive(_)
            | DataType::Expression(_)
            | DataType::OpenParameter(_)
            | DataType::Custom(_) => Vec::new(),
        }
    }

    pub fn as_structural(&self) -> Option<&StructuralType> {
        match self {
            DataType::Structural(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_primitive(&self) -> Option<&PrimitiveType> {
        match self {
            DataType::Primitive(n) => Some(n),
            _ => None,
        }
    }

    /// Whether `null` is an admissible value of this node.
    pub fn admits_null(&self) -> bool {
        match self {
            DataType::Primitive(n) => n.nullable,
            _ => true,
        }
    }
}
