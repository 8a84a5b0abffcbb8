//! Runtime host values.
//!
//! Scalars are held inline. Arrays and objects are shared handles with
//! interior mutability so a value graph can contain itself. Functions and
//! code values are opaque and carry identity only.

use std::fmt;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, TimeDelta, Utc};

use crate::atom::Atom;
use crate::host::HostTypeId;

#[derive(Clone)]
pub enum Value {
    Null,
    Unit,
    Bool(bool),
    Char(char),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    Text(Arc<str>),
    DateTime(DateTime<Utc>),
    Duration(TimeDelta),
    Uuid(u128),
    Uri(Arc<str>),
    Enum(EnumValue),
    Array(ArrayValue),
    Object(ObjectRef),
    Function(FunctionValue),
    Code(CodeValue),
}

impl Value {
    pub fn text(s: impl Into<Arc<str>>) -> Self {
        Value::Text(s.into())
    }

    pub fn uri(s: impl Into<Arc<str>>) -> Self {
        Value::Uri(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The atom this value is an instance of, for non-null scalars.
    pub fn atom(&self) -> Option<Atom> {
        Some(match self {
            Value::Unit => Atom::Unit,
            Value::Bool(_) => Atom::Bool,
            Value::Char(_) => Atom::Char,
            Value::Int8(_) => Atom::Int8,
            Value::Int16(_) => Atom::Int16,
            Value::Int32(_) => Atom::Int32,
            Value::Int64(_) => Atom::Int64,
            Value::UInt8(_) => Atom::UInt8,
            Value::UInt16(_) => Atom::UInt16,
            Value::UInt32(_) => Atom::UInt32,
            Value::UInt64(_) => Atom::UInt64,
            Value::Float32(_) => Atom::Float32,
            Value::Float64(_) => Atom::Float64,
            Value::Text(_) => Atom::Text,
            Value::DateTime(_) => Atom::DateTime,
            Value::Duration(_) => Atom::Duration,
            Value::Uuid(_) => Atom::Uuid,
            Value::Uri(_) => Atom::Uri,
            _ => return None,
        })
    }

    /// Integer payload widened to `i128`, for integer atoms and enum values.
    pub fn as_integer(&self) -> Option<i128> {
        Some(match self {
            Value::Int8(v) => *v as i128,
            Value::Int16(v) => *v as i128,
            Value::Int32(v) => *v as i128,
            Value::Int64(v) => *v as i128,
            Value::UInt8(v) => *v as i128,
            Value::UInt16(v) => *v as i128,
            Value::UInt32(v) => *v as i128,
            Value::UInt64(v) => *v as i128,
            Value::Enum(e) => e.raw as i128,
            _ => return None,
        })
    }

    /// Short description of the value's kind for error messages.
    pub fn kind_name(&self) -> &'static str {
        if let Some(atom) = self.atom() {
            return atom.name();
        }
        match self {
            Value::Null => "null",
            Value::Enum(_) => "enum",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
            Value::Code(_) => "code",
            _ => "value",
        }
    }
}

/// Host equality: scalars by value, shared values by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) | (Value::Unit, Value::Unit) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Int8(a), Value::Int8(b)) => a == b,
            (Value::Int16(a), Value::Int16(b)) => a == b,
            (Value::Int32(a), Value::Int32(b)) => a == b,
            (Value::Int64(a), Value::Int64(b)) => a == b,
            (Value::UInt8(a), Value::UInt8(b)) => a == b,
            (Value::UInt16(a), Value::UInt16(b)) => a == b,
            (Value::UInt32(a), Value::UInt32(b)) => a == b,
            (Value::UInt64(a), Value::UInt64(b)) => a == b,
            (Value::Float32(a), Value::Float32(b)) => a == b,
            (Value::Float64(a), Value::Float64(b)) => a == b,
            (Value::Text(a), Value::Text(b)) | (Value::Uri(a), Value::Uri(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Duration(a), Value::Duration(b)) => a == b,
            (Value::Uuid(a), Value::Uuid(b)) => a == b,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Code(a), Value::Code(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Unit => f.write_str("Unit"),
            Value::Bool(v) => write!(f, "Bool({v})"),
            Value::Char(v) => write!(f, "Char({v:?})"),
            Value::Int8(v) => write!(f, "Int8({v})"),
            Value::Int16(v) => write!(f, "Int16({v})"),
            Value::Int32(v) => write!(f, "Int32({v})"),
            Value::Int64(v) => write!(f, "Int64({v})"),
            Value::UInt8(v) => write!(f, "UInt8({v})"),
            Value::UInt16(v) => write!(f, "UInt16({v})"),
            Value::UInt32(v) => write!(f, "UInt32({v})"),
            Value::UInt64(v) => write!(f, "UInt64({v})"),
            Value::Float32(v) => write!(f, "Float32({v:?})"),
            Value::Float64(v) => write!(f, "Float64({v:?})"),
            Value::Text(v) => write!(f, "Text({v:?})"),
            Value::DateTime(v) => write!(f, "DateTime({v})"),
            Value::Duration(v) => write!(f, "Duration({v})"),
            Value::Uuid(v) => write!(f, "Uuid({v:032x})"),
            Value::Uri(v) => write!(f, "Uri({v:?})"),
            Value::Enum(v) => write!(f, "Enum({}, {})", v.ty.as_u32(), v.raw),
            Value::Array(v) => v.fmt(f),
            Value::Object(v) => v.fmt(f),
            Value::Function(v) => v.fmt(f),
            Value::Code(v) => v.fmt(f),
        }
    }
}

/// A boxed enumeration value: its declaring type plus raw integer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct EnumValue {
    pub ty: HostTypeId,
    pub raw: i64,
}

#[derive(Debug)]
struct ArrayData {
    fixed: bool,
    items: RwLock<Vec<Value>>,
}

/// Shared array handle. Fixed-size arrays still allow index assignment.
#[derive(Clone)]
pub struct ArrayValue(Arc<ArrayData>);

impl ArrayValue {
    pub fn fixed(items: Vec<Value>) -> Self {
        Self::new(true, items)
    }

    pub fn growable(items: Vec<Value>) -> Self {
        Self::new(false, items)
    }

    fn new(fixed: bool, items: Vec<Value>) -> Self {
        Self(Arc::new(ArrayData {
            fixed,
            items: RwLock::new(items),
        }))
    }

    pub fn is_fixed(&self) -> bool {
        self.0.fixed
    }

    pub fn len(&self) -> usize {
        self.0.items.read().expect("array lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.0
            .items
            .read()
            .expect("array lock poisoned")
            .get(index)
            .cloned()
    }

    /// Replace the element at `index`, returning the previous one.
    pub fn set(&self, index: usize, value: Value) -> Option<Value> {
        let mut items = self.0.items.write().expect("array lock poisoned");
        let slot = items.get_mut(index)?;
        Some(std::mem::replace(slot, value))
    }

    /// Returns `false` when `index` is past the end.
    pub fn insert(&self, index: usize, value: Value) -> bool {
        let mut items = self.0.items.write().expect("array lock poisoned");
        if index > items.len() {
            return false;
        }
        items.insert(index, value);
        true
    }

    pub fn remove(&self, index: usize) -> Option<Value> {
        let mut items = self.0.items.write().expect("array lock poisoned");
        (index < items.len()).then(|| items.remove(index))
    }

    pub fn push(&self, value: Value) {
        self.0
            .items
            .write()
            .expect("array lock poisoned")
            .push(value);
    }

    /// Copy of the current elements. The lock is released before returning.
    pub fn snapshot(&self) -> Vec<Value> {
        self.0.items.read().expect("array lock poisoned").clone()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Address used as an identity key while traversing value graphs.
    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}

impl fmt::Debug for ArrayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_fixed() { "fixed" } else { "growable" };
        write!(f, "Array({kind}, len={})", self.len())
    }
}

struct ObjectData {
    ty: HostTypeId,
    slots: RwLock<Vec<Value>>,
}

/// Shared object handle with one slot per declared member.
#[derive(Clone)]
pub struct ObjectRef(Arc<ObjectData>);

impl ObjectRef {
    pub fn new(ty: HostTypeId, slots: Vec<Value>) -> Self {
        Self(Arc::new(ObjectData {
            ty,
            slots: RwLock::new(slots),
        }))
    }

    pub fn ty(&self) -> HostTypeId {
        self.0.ty
    }

    pub fn slot_count(&self) -> usize {
        self.0.slots.read().expect("object lock poisoned").len()
    }

    pub fn get(&self, slot: usize) -> Option<Value> {
        self.0
            .slots
            .read()
            .expect("object lock poisoned")
            .get(slot)
            .cloned()
    }

    /// Returns `false` when the slot does not exist.
    pub fn set(&self, slot: usize, value: Value) -> bool {
        let mut slots = self.0.slots.write().expect("object lock poisoned");
        match slots.get_mut(slot) {
            Some(target) => {
                *target = value;
                true
            }
            None => false,
        }
    }

    pub fn snapshot(&self) -> Vec<Value> {
        self.0.slots.read().expect("object lock poisoned").clone()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}

// Shallow: slots may refer back to this object.
impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object(ty={}, slots={})", self.ty().as_u32(), self.slot_count())
    }
}

type Callable = dyn Fn(&[Value]) -> Value + Send + Sync;

/// Opaque callable, compared by identity only.
#[derive(Clone)]
pub struct FunctionValue(Arc<Callable>);

impl FunctionValue {
    pub fn new(f: impl Fn(&[Value]) -> Value + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self, args: &[Value]) -> Value {
        (self.0)(args)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Function(..)")
    }
}

#[derive(Debug)]
struct Code {
    text: String,
}

/// Opaque code value, compared by identity only.
#[derive(Clone)]
pub struct CodeValue(Arc<Code>);

impl CodeValue {
    pub fn new(text: impl Into<String>) -> Self {
        Self(Arc::new(Code { text: text.into() }))
    }

    pub fn text(&self) -> &str {
        &self.0.text
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}

impl fmt::Debug for CodeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Code({:?})", self.text())
    }
}
