use crate::{ArrayValue, Atom, CodeValue, EnumValue, FunctionValue, HostTypeId, ObjectRef, Value};

#[test]
fn scalar_atoms() {
    assert_eq!(Value::Int32(3).atom(), Some(Atom::Int32));
    assert_eq!(Value::text("a").atom(), Some(Atom::Text));
    assert_eq!(Value::uri("http://x").atom(), Some(Atom::Uri));
    assert_eq!(Value::Null.atom(), None);
    assert_eq!(Value::Array(ArrayValue::fixed(vec![])).atom(), None);
}

#[test]
fn integer_widening_includes_enums() {
    let color = EnumValue {
        ty: HostTypeId::of_atom(Atom::Int32),
        raw: 2,
    };
    assert_eq!(Value::Enum(color).as_integer(), Some(2));
    assert_eq!(Value::UInt64(u64::MAX).as_integer(), Some(u64::MAX as i128));
    assert_eq!(Value::Float64(2.0).as_integer(), None);
}

#[test]
fn host_equality_is_identity_for_shared_values() {
    let a = ArrayValue::growable(vec![Value::Int32(1)]);
    let b = ArrayValue::growable(vec![Value::Int32(1)]);

    assert_eq!(Value::Array(a.clone()), Value::Array(a.clone()));
    assert_ne!(Value::Array(a), Value::Array(b));
    assert_eq!(Value::text("x"), Value::text("x"));
    assert_ne!(Value::text("x"), Value::uri("x"));
}

#[test]
fn array_mutation() {
    let arr = ArrayValue::growable(vec![Value::Int32(1), Value::Int32(2)]);

    assert_eq!(arr.set(0, Value::Int32(10)), Some(Value::Int32(1)));
    assert_eq!(arr.set(5, Value::Int32(0)), None);
    assert!(arr.insert(2, Value::Int32(3)));
    assert!(!arr.insert(9, Value::Int32(3)));
    assert_eq!(arr.remove(0), Some(Value::Int32(10)));
    assert_eq!(arr.remove(7), None);
    arr.push(Value::Int32(4));

    insta::assert_debug_snapshot!(arr.snapshot(), @r"
    [
        Int32(2),
        Int32(3),
        Int32(4),
    ]
    ");
}

#[test]
fn objects_can_contain_themselves() {
    let ty = HostTypeId::of_atom(Atom::Unit);
    let obj = ObjectRef::new(ty, vec![Value::Null]);
    assert!(obj.set(0, Value::Object(obj.clone())));
    assert!(!obj.set(1, Value::Null));

    let Some(Value::Object(inner)) = obj.get(0) else {
        panic!("expected object slot");
    };
    assert!(inner.ptr_eq(&obj));
    assert_eq!(format!("{obj:?}"), "Object(ty=0, slots=1)");
}

#[test]
fn functions_and_code_compare_by_identity() {
    let f = FunctionValue::new(|args| args.first().cloned().unwrap_or(Value::Null));
    let g = FunctionValue::new(|args| args.first().cloned().unwrap_or(Value::Null));
    assert!(f.ptr_eq(&f.clone()));
    assert!(!f.ptr_eq(&g));
    assert_eq!(f.call(&[Value::Int32(7)]), Value::Int32(7));

    let c = CodeValue::new("x => x");
    let d = CodeValue::new("x => x");
    assert!(!c.ptr_eq(&d));
    assert_eq!(c.text(), "x => x");
}
