use crate::{Interner, Symbol};

#[test]
fn intern_deduplicates_names() {
    let mut interner = Interner::new();

    let person = interner.intern("Person");
    let again = interner.intern("Person");
    let order = interner.intern("Order");

    assert_eq!(person, again);
    assert_ne!(person, order);
    assert_eq!(interner.len(), 2);
}

#[test]
fn intern_owned_matches_borrowed() {
    let mut interner = Interner::new();

    let a = interner.intern("Color");
    let b = interner.intern_owned("Color".to_string());

    assert_eq!(a, b);
    assert_eq!(interner.len(), 1);
}

#[test]
fn get_does_not_intern() {
    let mut interner = Interner::new();
    interner.intern("Foo");

    assert!(interner.get("Foo").is_some());
    assert_eq!(interner.get("Bar"), None);
    assert_eq!(interner.len(), 1);
}

#[test]
fn resolve_and_try_resolve() {
    let mut interner = Interner::new();
    let sym = interner.intern("Tuple");

    assert_eq!(interner.resolve(sym), "Tuple");
    assert_eq!(interner.try_resolve(sym), Some("Tuple"));

    let other = Interner::new();
    assert_eq!(other.try_resolve(sym), None);
}

#[test]
fn iteration_follows_insertion_order() {
    let mut interner = Interner::new();
    let z: Symbol = interner.intern("z");
    let a: Symbol = interner.intern("a");

    assert!(z < a);
    let names: Vec<_> = interner.iter().map(|(_, s)| s).collect();
    assert_eq!(names, vec!["z", "a"]);
}
