//! Structural equality over host values.
//!
//! Values are compared by what their classification says they are, not by
//! host identity:
//!
//! - Integers and enumeration values compare by numeric value across widths.
//! - Floats compare by value across widths, with `-0.0 == 0.0` and all NaNs
//!   equal to each other.
//! - Arrays compare elementwise, whatever their container.
//! - Objects compare by the mapping names of their classified properties. A
//!   name present on one side only makes them unequal.
//! - Functions and code values compare by identity.
//!
//! A pair of shared values under comparison is assumed equal while it is
//! being compared, so cyclic values terminate.

use std::collections::HashSet;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;

use datamodel_core::{ArrayValue, ObjectRef, Value};
use log::trace;

use crate::cache::DataTypeCache;
use crate::types::{DataType, DataTypeGraph};

/// How deep hashing descends into arrays and objects.
const HASH_DEPTH: usize = 4;

/// Equality and hashing driven by data type classification.
///
/// Object types are classified through the shared cache with cycles
/// allowed. An object whose type does not classify to a structural node is
/// compared by identity.
#[derive(Clone, Debug)]
pub struct StructuralComparer {
    cache: Arc<DataTypeCache>,
}

/// Normalized scalar payload.
#[derive(PartialEq, Eq, Hash)]
enum Scalar<'v> {
    Unit,
    Bool(bool),
    Char(char),
    Integer(i128),
    Float(u64),
    Text(&'v str),
    Uri(&'v str),
    DateTime(i64, u32),
    Duration(i64, i32),
    Uuid(u128),
}

impl<'v> Scalar<'v> {
    fn of(value: &'v Value) -> Option<Self> {
        if let Some(int) = value.as_integer() {
            return Some(Scalar::Integer(int));
        }
        Some(match value {
            Value::Unit => Scalar::Unit,
            Value::Bool(v) => Scalar::Bool(*v),
            Value::Char(v) => Scalar::Char(*v),
            Value::Float32(v) => Scalar::Float(float_bits(f64::from(*v))),
            Value::Float64(v) => Scalar::Float(float_bits(*v)),
            Value::Text(v) => Scalar::Text(v),
            Value::Uri(v) => Scalar::Uri(v),
            Value::DateTime(v) => Scalar::DateTime(v.timestamp(), v.timestamp_subsec_nanos()),
            Value::Duration(v) => Scalar::Duration(v.num_seconds(), v.subsec_nanos()),
            Value::Uuid(v) => Scalar::Uuid(*v),
            _ => return None,
        })
    }
}

fn float_bits(v: f64) -> u64 {
    if v.is_nan() {
        f64::NAN.to_bits()
    } else if v == 0.0 {
        0.0f64.to_bits()
    } else {
        v.to_bits()
    }
}

impl StructuralComparer {
    pub fn new(cache: Arc<DataTypeCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<DataTypeCache> {
        &self.cache
    }

    pub fn equals(&self, a: &Value, b: &Value) -> bool {
        Comparison {
            comparer: self,
            assumed: HashSet::new(),
        }
        .eq(a, b)
    }

    /// A hash consistent with [`equals`](Self::equals). Terminates on cyclic
    /// values by hashing only the first few levels.
    pub fn hash_value(&self, value: &Value) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash_into(value, HASH_DEPTH, &mut hasher);
        hasher.finish()
    }

    fn hash_into(&self, value: &Value, depth: usize, state: &mut DefaultHasher) {
        if let Some(scalar) = Scalar::of(value) {
            scalar.hash(state);
            return;
        }
        std::mem::discriminant(value).hash(state);
        if depth == 0 {
            return;
        }
        match value {
            Value::Array(array) => {
                let items = array.snapshot();
                items.len().hash(state);
                for item in &items {
                    self.hash_into(item, depth - 1, state);
                }
            }
            Value::Object(object) => {
                let Some(layout) = self.layout(object) else {
                    object.addr().hash(state);
                    return;
                };
                // Order-independent over mapping names.
                let mut combined = 0u64;
                for (name, slot) in layout.fields() {
                    let mut field = DefaultHasher::new();
                    name.hash(&mut field);
                    let item = object.get(slot).unwrap_or(Value::Null);
                    self.hash_into(&item, depth - 1, &mut field);
                    combined = combined.wrapping_add(field.finish());
                }
                combined.hash(state);
            }
            Value::Function(f) => f.addr().hash(state),
            Value::Code(c) => c.addr().hash(state),
            _ => {}
        }
    }

    fn layout(&self, object: &ObjectRef) -> Option<Layout> {
        let graph = self.cache.get_or_classify(object.ty(), true).ok()?;
        matches!(graph.root_node(), DataType::Structural(_)).then_some(Layout(graph))
    }
}

/// The classified structural shape of an object's type.
struct Layout(Arc<DataTypeGraph>);

impl Layout {
    /// Mapping names with the slots they read.
    fn fields(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0
            .root_node()
            .as_structural()
            .into_iter()
            .flat_map(|s| s.properties.iter())
            .map(|p| (p.name.as_str(), p.member.slot))
    }

    fn slot(&self, name: &str) -> Option<usize> {
        self.fields().find(|(n, _)| *n == name).map(|(_, slot)| slot)
    }
}

struct Comparison<'c> {
    comparer: &'c StructuralComparer,
    /// Pairs of shared values currently assumed equal.
    assumed: HashSet<(usize, usize)>,
}

impl Comparison<'_> {
    fn eq(&mut self, a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Null, Value::Null) => true,
            (Value::Null, _) | (_, Value::Null) => false,
            (Value::Array(x), Value::Array(y)) => {
                self.assuming((x.addr(), y.addr()), |c| c.arrays_eq(x, y))
            }
            (Value::Object(x), Value::Object(y)) => {
                self.assuming((x.addr(), y.addr()), |c| c.objects_eq(x, y))
            }
            (Value::Function(x), Value::Function(y)) => x.ptr_eq(y),
            (Value::Code(x), Value::Code(y)) => x.ptr_eq(y),
            _ => match (Scalar::of(a), Scalar::of(b)) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            },
        }
    }

    fn assuming(&mut self, pair: (usize, usize), compare: impl FnOnce(&mut Self) -> bool) -> bool {
        if !self.assumed.insert(pair) {
            trace!("pair {pair:?} already under comparison, assumed equal");
            return true;
        }
        let equal = compare(self);
        self.assumed.remove(&pair);
        equal
    }

    fn arrays_eq(&mut self, x: &ArrayValue, y: &ArrayValue) -> bool {
        let (xs, ys) = (x.snapshot(), y.snapshot());
        xs.len() == ys.len() && xs.iter().zip(&ys).all(|(a, b)| self.eq(a, b))
    }

    fn objects_eq(&mut self, x: &ObjectRef, y: &ObjectRef) -> bool {
        let comparer = self.comparer;
        let (Some(lx), Some(ly)) = (comparer.layout(x), comparer.layout(y)) else {
            return x.ptr_eq(y);
        };
        let names_x: HashSet<&str> = lx.fields().map(|(n, _)| n).collect();
        let names_y: HashSet<&str> = ly.fields().map(|(n, _)| n).collect();
        if names_x != names_y {
            return false;
        }
        lx.fields().all(|(name, slot)| {
            let Some(other) = ly.slot(name) else {
                return false;
            };
            let a = x.get(slot).unwrap_or(Value::Null);
            let b = y.get(other).unwrap_or(Value::Null);
            self.eq(&a, &b)
        })
    }
}
