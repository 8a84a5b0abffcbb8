use crate::{
    Atom, ClassDecl, EnumDecl, EnumMember, Field, HostKind, HostTypeId, MemberDecl,
    RegistryError, TypeRegistry,
};

#[test]
fn atoms_are_preregistered() {
    let registry = TypeRegistry::new();

    assert_eq!(registry.len(), Atom::ALL.len());
    for atom in Atom::ALL {
        let id = HostTypeId::of_atom(atom);
        assert_eq!(registry.kind(id), &HostKind::Atom(atom));
        assert_eq!(registry.lookup(atom.name()), Some(id));
    }
}

#[test]
fn shapes_are_interned() {
    let mut registry = TypeRegistry::new();
    let int = registry.atom(Atom::Int32);

    let a = registry.array(int);
    let b = registry.array(int);
    let list = registry.list(int);

    assert_eq!(a, b);
    assert_ne!(a, list);

    let f1 = registry.function([int], Atom::Bool.into());
    let f2 = registry.function([int], Atom::Bool.into());
    assert_eq!(f1, f2);
}

#[test]
fn display_names() {
    let mut registry = TypeRegistry::new();
    let int = registry.atom(Atom::Int32);
    let double = registry.atom(Atom::Float64);
    let boolean = registry.atom(Atom::Bool);
    let string = registry.atom(Atom::Text);

    let nullable = registry.nullable(int);
    let array = registry.array(int);
    let list = registry.list(int);
    let seq = registry.sequence(int);
    let grid = registry.multi_array(int, 2);
    let ptr = registry.pointer(int);
    let by_ref = registry.by_ref(int);
    let tuple = registry.tuple([string, int]);
    let func = registry.function([int, double], boolean);
    let pred = registry.function([int], boolean);
    let quoted = registry.quoted(pred);
    let anon = registry.anonymous([Field::new("a", int), Field::new("b", string)]);

    let rendered: Vec<_> = [
        nullable, array, list, seq, grid, ptr, by_ref, tuple, func, quoted, anon,
    ]
    .into_iter()
    .map(|id| registry.display(id))
    .collect();

    insta::assert_debug_snapshot!(rendered, @r#"
    [
        "int?",
        "int[]",
        "List<int>",
        "IEnumerable<int>",
        "int[,]",
        "int*",
        "int&",
        "Tuple<string, int>",
        "Func<int, double, bool>",
        "Expression<Func<int, bool>>",
        "{ a : int; b : string }",
    ]
    "#);
}

#[test]
fn duplicate_names_are_rejected() {
    let mut registry = TypeRegistry::new();
    registry.class("Person", ClassDecl::new()).unwrap();

    let err = registry.class("Person", ClassDecl::new()).unwrap_err();
    assert_eq!(err, RegistryError::DuplicateName("Person".into()));

    let err = registry.custom("int").unwrap_err();
    assert_eq!(err, RegistryError::DuplicateName("int".into()));
}

#[test]
fn declare_then_define() {
    let mut registry = TypeRegistry::new();
    let node = registry.declare("Node").unwrap();
    let nodes = registry.array(node);

    let decl = ClassDecl::new().member(MemberDecl::new("Children", nodes).mapped("children"));
    registry.define(node, HostKind::Class(decl.clone())).unwrap();

    assert_eq!(registry.kind(node), &HostKind::Class(decl));
    assert_eq!(registry.display(nodes), "Node[]");

    let err = registry
        .define(node, HostKind::Enum(EnumDecl::new(Atom::Int32)))
        .unwrap_err();
    assert_eq!(err, RegistryError::AlreadyDefined("Node".into()));
}

#[test]
fn define_rejects_unnamed_shapes() {
    let mut registry = TypeRegistry::new();
    let id = registry.declare("Thing").unwrap();

    let err = registry.define(id, HostKind::Handle).unwrap_err();
    assert_eq!(err, RegistryError::NotDefinable("Thing".into(), "handle"));

    let err = registry
        .define(id, HostKind::Array(Atom::Int32.into()))
        .unwrap_err();
    assert_eq!(err, RegistryError::NotDefinable("Thing".into(), "unnamed shape"));
}

#[test]
fn value_types() {
    let mut registry = TypeRegistry::new();
    let color = registry
        .enumeration(
            "Color",
            EnumDecl::new(Atom::Int32).member(EnumMember::new("Red", 0)),
        )
        .unwrap();
    let nullable = registry.nullable(Atom::Int32.into());

    assert!(registry.is_value_type(Atom::Int32.into()));
    assert!(registry.is_value_type(color));
    assert!(!registry.is_value_type(Atom::Text.into()));
    assert!(!registry.is_value_type(nullable));
}

#[test]
fn known_type_marker() {
    let mut registry = TypeRegistry::new();
    let id = registry.class("Empty", ClassDecl::new()).unwrap();
    assert!(!registry.get(id).known_type);

    registry.mark_known_type(id);
    assert!(registry.get(id).known_type);
}
