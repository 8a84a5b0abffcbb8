//! Catalog of intrinsically atomic host types.
//!
//! Atoms are the leaves of every data type graph. The catalog is closed:
//! numeric widths, boolean, character, text, date/time, duration, unique id,
//! locator, and the unit marker. Enumerations and nullable wrappers of value
//! atoms are classified as primitives too, but they are declared types and
//! live in the registry rather than here.

use crate::value::Value;

/// An intrinsically atomic host type.
///
/// Discriminants double as the pre-registered [`HostTypeId`](crate::HostTypeId)
/// of each atom, so the order here is load-bearing.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum Atom {
    /// The unit/void marker.
    #[serde(rename = "Unit")]
    Unit = 0,
    #[serde(rename = "bool")]
    Bool = 1,
    #[serde(rename = "char")]
    Char = 2,
    #[serde(rename = "sbyte")]
    Int8 = 3,
    #[serde(rename = "short")]
    Int16 = 4,
    #[serde(rename = "int")]
    Int32 = 5,
    #[serde(rename = "long")]
    Int64 = 6,
    #[serde(rename = "byte")]
    UInt8 = 7,
    #[serde(rename = "ushort")]
    UInt16 = 8,
    #[serde(rename = "uint")]
    UInt32 = 9,
    #[serde(rename = "ulong")]
    UInt64 = 10,
    #[serde(rename = "float")]
    Float32 = 11,
    #[serde(rename = "double")]
    Float64 = 12,
    /// Text. Reference-like: nullable without a wrapper.
    #[serde(rename = "string")]
    Text = 13,
    #[serde(rename = "DateTime")]
    DateTime = 14,
    #[serde(rename = "TimeSpan")]
    Duration = 15,
    #[serde(rename = "Guid")]
    Uuid = 16,
    /// Resource locator. Reference-like: nullable without a wrapper.
    #[serde(rename = "Uri")]
    Uri = 17,
}

impl Atom {
    /// Every atom, in discriminant order.
    pub const ALL: [Atom; 18] = [
        Atom::Unit,
        Atom::Bool,
        Atom::Char,
        Atom::Int8,
        Atom::Int16,
        Atom::Int32,
        Atom::Int64,
        Atom::UInt8,
        Atom::UInt16,
        Atom::UInt32,
        Atom::UInt64,
        Atom::Float32,
        Atom::Float64,
        Atom::Text,
        Atom::DateTime,
        Atom::Duration,
        Atom::Uuid,
        Atom::Uri,
    ];

    /// Canonical short name, as used by the pretty-printer.
    pub fn name(self) -> &'static str {
        match self {
            Atom::Unit => "Unit",
            Atom::Bool => "bool",
            Atom::Char => "char",
            Atom::Int8 => "sbyte",
            Atom::Int16 => "short",
            Atom::Int32 => "int",
            Atom::Int64 => "long",
            Atom::UInt8 => "byte",
            Atom::UInt16 => "ushort",
            Atom::UInt32 => "uint",
            Atom::UInt64 => "ulong",
            Atom::Float32 => "float",
            Atom::Float64 => "double",
            Atom::Text => "string",
            Atom::DateTime => "DateTime",
            Atom::Duration => "TimeSpan",
            Atom::Uuid => "Guid",
            Atom::Uri => "Uri",
        }
    }

    pub fn from_name(name: &str) -> Option<Atom> {
        Self::ALL.into_iter().find(|atom| atom.name() == name)
    }

    pub fn from_u8(v: u8) -> Option<Atom> {
        Self::ALL.get(v as usize).copied()
    }

    /// Reference-like atoms admit null without a nullable wrapper.
    pub fn is_reference(self) -> bool {
        matches!(self, Atom::Text | Atom::Uri)
    }

    pub fn is_value_type(self) -> bool {
        !self.is_reference()
    }

    /// Whether this atom can be the underlying type of an enumeration.
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            Atom::Int8
                | Atom::Int16
                | Atom::Int32
                | Atom::Int64
                | Atom::UInt8
                | Atom::UInt16
                | Atom::UInt32
                | Atom::UInt64
        )
    }

    /// The value a freshly default-constructed member of this type holds.
    pub fn default_value(self) -> Value {
        match self {
            Atom::Unit => Value::Unit,
            Atom::Bool => Value::Bool(false),
            Atom::Char => Value::Char('\0'),
            Atom::Int8 => Value::Int8(0),
            Atom::Int16 => Value::Int16(0),
            Atom::Int32 => Value::Int32(0),
            Atom::Int64 => Value::Int64(0),
            Atom::UInt8 => Value::UInt8(0),
            Atom::UInt16 => Value::UInt16(0),
            Atom::UInt32 => Value::UInt32(0),
            Atom::UInt64 => Value::UInt64(0),
            Atom::Float32 => Value::Float32(0.0),
            Atom::Float64 => Value::Float64(0.0),
            Atom::Text | Atom::Uri => Value::Null,
            Atom::DateTime => Value::DateTime(chrono::DateTime::<chrono::Utc>::default()),
            Atom::Duration => Value::Duration(chrono::TimeDelta::zero()),
            Atom::Uuid => Value::Uuid(0),
        }
    }

    /// Whether `value` is a non-null instance of this atom.
    pub fn accepts(self, value: &Value) -> bool {
        value.atom() == Some(self)
    }
}

impl std::fmt::Display for Atom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
