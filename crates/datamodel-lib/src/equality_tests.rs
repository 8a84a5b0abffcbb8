use std::sync::Arc;

use datamodel_core::{ArrayValue, EnumValue, FunctionValue, HostTypeId, ObjectRef, Value};
use indoc::indoc;

use crate::cache::DataTypeCache;
use crate::equality::StructuralComparer;
use crate::test_utils::{registry, ty};

const DECLS: &str = indoc! {r#"
    { "types": [
        { "kind": "class", "name": "Person",
          "members": [
            { "name": "Name", "type": "string", "mapping": "name" },
            { "name": "Age", "type": "int", "mapping": "age" }
          ] },
        { "kind": "class", "name": "Contact",
          "members": [
            { "name": "Years", "type": "long", "mapping": "age" },
            { "name": "FullName", "type": "string", "mapping": "name" }
          ] },
        { "kind": "class", "name": "Employee",
          "members": [
            { "name": "Name", "type": "string", "mapping": "name" },
            { "name": "Age", "type": "int", "mapping": "age" },
            { "name": "Title", "type": "string", "mapping": "title" }
          ] },
        { "kind": "class", "name": "Node",
          "members": [
            { "name": "Value", "type": "int", "mapping": "value" },
            { "name": "Next", "type": "Node", "mapping": "next" }
          ] },
        { "kind": "class", "name": "Opaque",
          "members": [{ "name": "Value", "type": "int" }] },
        { "kind": "enum", "name": "Color",
          "members": [{ "name": "Red", "value": 0 }, { "name": "Green", "value": 1 }] }
    ] }
"#};

struct Fixture {
    comparer: StructuralComparer,
    person: HostTypeId,
    contact: HostTypeId,
    employee: HostTypeId,
    node: HostTypeId,
    opaque: HostTypeId,
    color: HostTypeId,
}

fn fixture() -> Fixture {
    let mut registry = registry(DECLS);
    let mut id = |name| ty(&mut registry, name);
    let (person, contact, employee) = (id("Person"), id("Contact"), id("Employee"));
    let (node, opaque, color) = (id("Node"), id("Opaque"), id("Color"));
    let cache = DataTypeCache::new(Arc::new(registry));
    Fixture {
        comparer: StructuralComparer::new(Arc::new(cache)),
        person,
        contact,
        employee,
        node,
        opaque,
        color,
    }
}

fn object(ty: HostTypeId, slots: Vec<Value>) -> Value {
    Value::Object(ObjectRef::new(ty, slots))
}

/// A `Node` whose `next` points back at itself.
fn self_loop(ty: HostTypeId, value: i32) -> Value {
    let node = ObjectRef::new(ty, vec![Value::Int32(value), Value::Null]);
    node.set(1, Value::Object(node.clone()));
    Value::Object(node)
}

#[test]
fn nulls() {
    let f = fixture();
    assert!(f.comparer.equals(&Value::Null, &Value::Null));
    assert!(!f.comparer.equals(&Value::Null, &Value::Int32(0)));
    assert!(!f.comparer.equals(&Value::text(""), &Value::Null));
}

#[test]
fn integers_compare_across_widths() {
    let f = fixture();
    assert!(f.comparer.equals(&Value::Int8(5), &Value::UInt64(5)));
    assert!(f.comparer.equals(&Value::Int64(-1), &Value::Int16(-1)));
    assert!(!f.comparer.equals(&Value::Int32(-1), &Value::UInt32(u32::MAX)));

    let green = Value::Enum(EnumValue {
        ty: f.color,
        raw: 1,
    });
    assert!(f.comparer.equals(&green, &Value::Int32(1)));
    assert!(!f.comparer.equals(&green, &Value::Int32(0)));
}

#[test]
fn floats_normalize_zero_and_nan() {
    let f = fixture();
    assert!(f.comparer.equals(&Value::Float32(1.5), &Value::Float64(1.5)));
    assert!(f.comparer.equals(&Value::Float64(-0.0), &Value::Float64(0.0)));
    assert!(f.comparer.equals(&Value::Float64(f64::NAN), &Value::Float32(f32::NAN)));
    assert!(!f.comparer.equals(&Value::Float64(1.0), &Value::Int32(1)));
}

#[test]
fn text_and_uri_stay_distinct() {
    let f = fixture();
    let site = "https://example.org/";
    assert!(f.comparer.equals(&Value::text(site), &Value::text(site)));
    assert!(!f.comparer.equals(&Value::text(site), &Value::uri(site)));
}

#[test]
fn arrays_ignore_their_container() {
    let f = fixture();
    let fixed = Value::Array(ArrayValue::fixed(vec![Value::Int32(1), Value::Int32(2)]));
    let growable = Value::Array(ArrayValue::growable(vec![Value::Int64(1), Value::Int64(2)]));
    let shorter = Value::Array(ArrayValue::growable(vec![Value::Int64(1)]));

    assert!(f.comparer.equals(&fixed, &growable));
    assert!(!f.comparer.equals(&fixed, &shorter));
}

#[test]
fn objects_compare_by_mapping_names() {
    let f = fixture();
    let person = object(f.person, vec![Value::text("Ada"), Value::Int32(36)]);
    let contact = object(f.contact, vec![Value::Int64(36), Value::text("Ada")]);
    let older = object(f.contact, vec![Value::Int64(37), Value::text("Ada")]);

    assert!(f.comparer.equals(&person, &contact));
    assert!(f.comparer.equals(&contact, &person));
    assert!(!f.comparer.equals(&person, &older));
}

#[test]
fn extra_mapping_names_are_unequal_both_ways() {
    let f = fixture();
    let person = object(f.person, vec![Value::text("Ada"), Value::Int32(36)]);
    let employee = object(
        f.employee,
        vec![Value::text("Ada"), Value::Int32(36), Value::Null],
    );

    assert!(!f.comparer.equals(&person, &employee));
    assert!(!f.comparer.equals(&employee, &person));
}

#[test]
fn cyclic_objects_terminate() {
    let f = fixture();
    let a = self_loop(f.node, 1);
    let b = self_loop(f.node, 1);
    let c = self_loop(f.node, 2);

    assert!(f.comparer.equals(&a, &a));
    assert!(f.comparer.equals(&a, &b));
    assert!(!f.comparer.equals(&a, &c));
}

#[test]
fn unclassifiable_objects_compare_by_identity() {
    let f = fixture();
    let a = object(f.opaque, vec![Value::Int32(1)]);
    let b = object(f.opaque, vec![Value::Int32(1)]);

    assert!(f.comparer.equals(&a, &a.clone()));
    assert!(!f.comparer.equals(&a, &b));
}

#[test]
fn callables_compare_by_identity() {
    let f = fixture();
    let one = FunctionValue::new(|_| Value::Int32(1));
    let same = FunctionValue::new(|_| Value::Int32(1));

    assert!(f.comparer.equals(&Value::Function(one.clone()), &Value::Function(one.clone())));
    assert!(!f.comparer.equals(&Value::Function(one), &Value::Function(same)));
}

#[test]
fn equal_values_hash_alike() {
    let f = fixture();
    let pairs = [
        (Value::Int8(5), Value::UInt64(5)),
        (Value::Float64(-0.0), Value::Float32(0.0)),
        (
            Value::Array(ArrayValue::fixed(vec![Value::Int32(1)])),
            Value::Array(ArrayValue::growable(vec![Value::Int64(1)])),
        ),
        (
            object(f.person, vec![Value::text("Ada"), Value::Int32(36)]),
            object(f.contact, vec![Value::Int64(36), Value::text("Ada")]),
        ),
    ];
    for (a, b) in &pairs {
        assert!(f.comparer.equals(a, b));
        assert_eq!(f.comparer.hash_value(a), f.comparer.hash_value(b));
    }
}

#[test]
fn hashing_cyclic_values_terminates() {
    let f = fixture();
    let a = self_loop(f.node, 1);
    let b = self_loop(f.node, 1);

    assert_eq!(f.comparer.hash_value(&a), f.comparer.hash_value(&b));
}
