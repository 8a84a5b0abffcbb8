//! Constructing and accessing host values through classified nodes.
//!
//! These are runtime usage errors of an already-valid node, separate from
//! classification failures.

use datamodel_core::{ArrayValue, EnumValue, HostKind, ObjectRef, TypeRegistry, Value};

use super::graph::DataTypeGraph;
use super::node::{Construction, DataType, NodeId, PrimitiveRepr, PrimitiveType, Property};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InstanceError {
    #[error("missing argument for `{0}`")]
    MissingArgument(String),

    #[error("invalid construction of `{ty}`: {reason}")]
    ConstructionInvalid { ty: String, reason: String },

    #[error("{0} is not supported")]
    NotSupported(String),

    #[error("property `{0}` is read-only")]
    ReadOnlyProperty(String),

    #[error("expected {expected}, found {found}")]
    WrongValue {
        expected: String,
        found: &'static str,
    },

    #[error("index {index} is out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Instance operations over the nodes of one graph.
#[derive(Debug, Clone, Copy)]
pub struct InstanceFactory<'a> {
    registry: &'a TypeRegistry,
    graph: &'a DataTypeGraph,
}

impl<'a> InstanceFactory<'a> {
    pub fn new(registry: &'a TypeRegistry, graph: &'a DataTypeGraph) -> Self {
        Self { registry, graph }
    }

    /// Construct a host value of node `id`'s shape.
    ///
    /// `None` models an absent argument list, which is distinct from an
    /// empty one.
    pub fn create_instance(
        &self,
        id: NodeId,
        args: Option<&[Value]>,
    ) -> Result<Value, InstanceError> {
        let node = self.graph.node(id);
        let name = || self.registry.display(node.host());
        match node {
            DataType::Primitive(n) => {
                let arg = self.single(id, args)?;
                if arg.is_null() {
                    return if n.nullable {
                        Ok(Value::Null)
                    } else {
                        Err(self.invalid(id, "null is not a value of a non-nullable primitive"))
                    };
                }
                if !primitive_accepts(n, arg) {
                    return Err(self.invalid(
                        id,
                        format!("expected {}, found {}", name(), arg.kind_name()),
                    ));
                }
                Ok(arg.clone())
            }
            DataType::Array(n) => {
                let items = args.unwrap_or_default();
                for (i, item) in items.iter().enumerate() {
                    if !self.conforms(n.element, item) {
                        return Err(self.invalid(
                            id,
                            format!("element {i} is {}", item.kind_name()),
                        ));
                    }
                }
                let items = items.to_vec();
                Ok(Value::Array(if n.fixed_size {
                    ArrayValue::fixed(items)
                } else {
                    ArrayValue::growable(items)
                }))
            }
            DataType::Structural(n) => {
                let mut slots: Vec<Value> = vec![Value::Null; n.slot_count()];
                for prop in &n.properties {
                    slots[prop.member.slot] = self.default_value(prop.ty);
                }
                match &n.construction {
                    Construction::Positional => {
                        let Some(args) = args else {
                            if n.properties.is_empty() {
                                return Ok(Value::Object(ObjectRef::new(n.host, slots)));
                            }
                            return Err(InstanceError::MissingArgument(name()));
                        };
                        self.check_arity(id, n.properties.len(), args.len())?;
                        for (prop, arg) in n.properties.iter().zip(args) {
                            self.check_argument(id, prop.ty, &prop.name, arg)?;
                            slots[prop.member.slot] = arg.clone();
                        }
                    }
                    Construction::Constructor(targets) => {
                        let Some(args) = args else {
                            return Err(InstanceError::MissingArgument(name()));
                        };
                        self.check_arity(id, targets.len(), args.len())?;
                        for (&slot, arg) in targets.iter().zip(args) {
                            let Some(prop) = n.properties.iter().find(|p| p.member.slot == slot)
                            else {
                                return Err(self.invalid(id, format!("no member in slot {slot}")));
                            };
                            self.check_argument(id, prop.ty, &prop.name, arg)?;
                            slots[slot] = arg.clone();
                        }
                    }
                    Construction::Default => {
                        if let Some(args) = args {
                            self.check_arity(id, 0, args.len())?;
                        }
                    }
                }
                Ok(Value::Object(ObjectRef::new(n.host, slots)))
            }
            DataType::Function(_) => {
                let arg = self.single(id, args)?;
                match arg {
                    Value::Function(_) | Value::Null => Ok(arg.clone()),
                    other => Err(self.invalid(
                        id,
                        format!("expected function, found {}", other.kind_name()),
                    )),
                }
            }
            DataType::Expression(_) | DataType::Quotation(_) => {
                let arg = self.single(id, args)?;
                match arg {
                    Value::Code(_) | Value::Null => Ok(arg.clone()),
                    other => Err(self.invalid(
                        id,
                        format!("expected code, found {}", other.kind_name()),
                    )),
                }
            }
            DataType::OpenParameter(_) | DataType::Custom(_) => Err(InstanceError::NotSupported(
                format!("constructing `{}`", name()),
            )),
        }
    }

    /// The value a member of node `id`'s type holds before assignment.
    pub fn default_value(&self, id: NodeId) -> Value {
        match self.graph.node(id) {
            DataType::Primitive(n) if n.nullable => Value::Null,
            DataType::Primitive(n) => match n.repr {
                PrimitiveRepr::Atom(atom) => atom.default_value(),
                PrimitiveRepr::Enum(ty) => match self.registry.kind(ty) {
                    HostKind::Enum(decl) => {
                        let raw = decl.members.first().map_or(0, |m| m.value);
                        Value::Enum(EnumValue { ty, raw })
                    }
                    _ => Value::Null,
                },
            },
            _ => Value::Null,
        }
    }

    /// Shallow check that `value` has node `id`'s shape. Children of arrays
    /// and objects are not inspected.
    pub fn conforms(&self, id: NodeId, value: &Value) -> bool {
        let node = self.graph.node(id);
        if value.is_null() {
            return node.admits_null();
        }
        match node {
            DataType::Primitive(n) => primitive_accepts(n, value),
            DataType::Array(_) => matches!(value, Value::Array(_)),
            DataType::Structural(n) => matches!(value, Value::Object(o) if o.ty() == n.host),
            DataType::Function(_) => matches!(value, Value::Function(_)),
            DataType::Expression(_) | DataType::Quotation(_) => matches!(value, Value::Code(_)),
            DataType::OpenParameter(_) | DataType::Custom(_) => true,
        }
    }

    /// Write `prop` on `instance`. The value must conform to the property's
    /// type and the instance must be of the type declaring the member.
    pub fn set_property(
        &self,
        prop: &Property,
        instance: &Value,
        value: Value,
    ) -> Result<(), InstanceError> {
        self.check_value(prop.ty, &value)?;
        prop.write(instance, value)
    }

    /// Indexable view over an array value of node `id`. Written elements
    /// must conform to the element node.
    pub fn as_mutable_view(
        &self,
        id: NodeId,
        value: &Value,
    ) -> Result<ArrayView<'a>, InstanceError> {
        let DataType::Array(n) = self.graph.node(id) else {
            return Err(InstanceError::NotSupported(format!(
                "array view over {} node",
                self.graph.node(id).kind()
            )));
        };
        match value {
            Value::Array(array) => Ok(ArrayView {
                array: array.clone(),
                fixed_size: n.fixed_size || array.is_fixed(),
                element: n.element,
                factory: *self,
            }),
            other => Err(InstanceError::WrongValue {
                expected: "array".into(),
                found: other.kind_name(),
            }),
        }
    }

    /// The underlying callable or code value, by identity.
    pub fn unwrap(&self, id: NodeId, value: &Value) -> Result<Value, InstanceError> {
        let node = self.graph.node(id);
        let ok = match node {
            DataType::Function(_) => matches!(value, Value::Function(_)),
            DataType::Expression(_) | DataType::Quotation(_) => matches!(value, Value::Code(_)),
            _ => {
                return Err(InstanceError::NotSupported(format!(
                    "unwrapping a {} node",
                    node.kind()
                )));
            }
        };
        if ok {
            Ok(value.clone())
        } else {
            Err(InstanceError::WrongValue {
                expected: node.kind().to_string(),
                found: value.kind_name(),
            })
        }
    }

    fn single<'v>(
        &self,
        id: NodeId,
        args: Option<&'v [Value]>,
    ) -> Result<&'v Value, InstanceError> {
        let Some(args) = args else {
            return Err(InstanceError::MissingArgument(
                self.registry.display(self.graph.node(id).host()),
            ));
        };
        self.check_arity(id, 1, args.len())?;
        Ok(&args[0])
    }

    fn check_arity(&self, id: NodeId, expected: usize, found: usize) -> Result<(), InstanceError> {
        if expected == found {
            return Ok(());
        }
        Err(self.invalid(
            id,
            format!("expected {expected} argument(s), found {found}"),
        ))
    }

    fn check_argument(
        &self,
        id: NodeId,
        ty: NodeId,
        name: &str,
        arg: &Value,
    ) -> Result<(), InstanceError> {
        if self.conforms(ty, arg) {
            return Ok(());
        }
        Err(self.invalid(
            id,
            format!("argument for `{name}` is {}", arg.kind_name()),
        ))
    }

    fn check_value(&self, ty: NodeId, value: &Value) -> Result<(), InstanceError> {
        if self.conforms(ty, value) {
            return Ok(());
        }
        Err(InstanceError::WrongValue {
            expected: self.registry.display(self.graph.node(ty).host()),
            found: value.kind_name(),
        })
    }

    fn invalid(&self, id: NodeId, reason: impl Into<String>) -> InstanceError {
        InstanceError::ConstructionInvalid {
            ty: self.registry.display(self.graph.node(id).host()),
            reason: reason.into(),
        }
    }
}

fn primitive_accepts(node: &PrimitiveType, value: &Value) -> bool {
    match node.repr {
        PrimitiveRepr::Atom(atom) => atom.accepts(value),
        PrimitiveRepr::Enum(ty) => matches!(value, Value::Enum(e) if e.ty == ty),
    }
}

/// Indexable, length-reporting view over an array value.
///
/// Fixed-size arrays allow index assignment but reject insert and remove.
#[derive(Debug, Clone)]
pub struct ArrayView<'a> {
    array: ArrayValue,
    fixed_size: bool,
    element: NodeId,
    factory: InstanceFactory<'a>,
}

impl ArrayView<'_> {
    pub fn len(&self) -> usize {
        self.array.len()
    }

    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    pub fn is_fixed_size(&self) -> bool {
        self.fixed_size
    }

    pub fn get(&self, index: usize) -> Result<Value, InstanceError> {
        self.array.get(index).ok_or(InstanceError::IndexOutOfRange {
            index,
            len: self.len(),
        })
    }

    pub fn set(&self, index: usize, value: Value) -> Result<(), InstanceError> {
        self.factory.check_value(self.element, &value)?;
        match self.array.set(index, value) {
            Some(_) => Ok(()),
            None => Err(InstanceError::IndexOutOfRange {
                index,
                len: self.len(),
            }),
        }
    }

    pub fn insert(&self, index: usize, value: Value) -> Result<(), InstanceError> {
        self.ensure_growable("insert")?;
        self.factory.check_value(self.element, &value)?;
        if self.array.insert(index, value) {
            Ok(())
        } else {
            Err(InstanceError::IndexOutOfRange {
                index,
                len: self.len(),
            })
        }
    }

    pub fn remove(&self, index: usize) -> Result<Value, InstanceError> {
        self.ensure_growable("remove")?;
        self.array.remove(index).ok_or(InstanceError::IndexOutOfRange {
            index,
            len: self.len(),
        })
    }

    pub fn push(&self, value: Value) -> Result<(), InstanceError> {
        self.ensure_growable("push")?;
        self.factory.check_value(self.element, &value)?;
        self.array.push(value);
        Ok(())
    }

    pub fn to_vec(&self) -> Vec<Value> {
        self.array.snapshot()
    }

    fn ensure_growable(&self, op: &str) -> Result<(), InstanceError> {
        if self.fixed_size {
            return Err(InstanceError::NotSupported(format!(
                "{op} on a fixed-size array"
            )));
        }
        Ok(())
    }
}
