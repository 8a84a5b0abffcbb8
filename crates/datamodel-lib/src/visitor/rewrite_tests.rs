use std::sync::Arc;

use datamodel_core::{Atom, TypeRegistry};
use indoc::indoc;

use super::{Rewrite, VisitError, rewrite};
use crate::test_utils::{BAR_FOO, NODE, classify_ok, registry, ty};
use crate::types::{
    CustomType, DataType, DataTypeGraph, DataTypeKind, FunctionType, NodeId, PrimitiveRepr,
    PrimitiveType, Property, QuotationType,
};

const DECLS: &str = indoc! {r#"
    { "types": [
        { "kind": "class", "name": "Person",
          "members": [
            { "name": "Name", "type": "string", "mapping": "name" },
            { "name": "Age", "type": "int", "mapping": "age" }
          ] },
        { "kind": "custom", "name": "Geometry" }
    ] }
"#};

fn setup(json: &str, text: &str) -> (TypeRegistry, DataTypeGraph) {
    let mut registry = registry(json);
    let id = ty(&mut registry, text);
    let graph = classify_ok(&registry, id, true);
    (registry, graph)
}

struct Identity;

impl Rewrite for Identity {}

/// Replaces `int` with `long`.
struct WidenInts;

impl Rewrite for WidenInts {
    fn rewrite_primitive(
        &mut self,
        _id: NodeId,
        node: &PrimitiveType,
    ) -> Result<Option<DataType>, VisitError> {
        if node.repr != PrimitiveRepr::Atom(Atom::Int32) {
            return Ok(None);
        }
        Ok(Some(DataType::Primitive(PrimitiveType {
            host: Atom::Int64.into(),
            repr: PrimitiveRepr::Atom(Atom::Int64),
            nullable: node.nullable,
        })))
    }
}

#[test]
fn identity_rewrite_shares_every_node() {
    let (_, graph) = setup(BAR_FOO, "Bar");
    let output = rewrite(&mut Identity, &graph).unwrap();

    assert_eq!(output.len(), graph.len());
    for (id, _) in graph.iter() {
        assert!(Arc::ptr_eq(output.node_arc(id), graph.node_arc(id)), "{id}");
    }
}

#[test]
fn replaced_node_and_ancestors_are_fresh() {
    let (registry, graph) = setup(DECLS, "List<Person>");
    let output = rewrite(&mut WidenInts, &graph).unwrap();

    insta::assert_snapshot!(output.render(&registry), @"{ name : string; age : long }[]");

    let list = graph.root();
    let person = graph.node(list).children()[0];
    let [name, age] = graph.node(person).children()[..] else {
        panic!("person has two properties");
    };
    assert!(!Arc::ptr_eq(output.node_arc(list), graph.node_arc(list)));
    assert!(!Arc::ptr_eq(output.node_arc(person), graph.node_arc(person)));
    assert!(!Arc::ptr_eq(output.node_arc(age), graph.node_arc(age)));
    assert!(Arc::ptr_eq(output.node_arc(name), graph.node_arc(name)));
}

#[test]
fn rewrite_keeps_cycles_intact() {
    let (registry, graph) = setup(NODE, "Node");
    let output = rewrite(&mut WidenInts, &graph).unwrap();

    assert!(output.is_cyclic());
    insta::assert_snapshot!(output.render(&registry), @r"
    let t0 = { value : long; next : t0 }
    in t0
    ");
}

/// Renames `age` to `years`.
struct RenameAge;

impl Rewrite for RenameAge {
    fn rewrite_property(
        &mut self,
        _owner: NodeId,
        property: &Property,
    ) -> Result<Option<Property>, VisitError> {
        if property.name != "age" {
            return Ok(None);
        }
        Ok(Some(Property {
            name: "years".into(),
            ..property.clone()
        }))
    }
}

#[test]
fn property_rewrite() {
    let (registry, graph) = setup(DECLS, "Person");
    let output = rewrite(&mut RenameAge, &graph).unwrap();

    insta::assert_snapshot!(output.render(&registry), @"{ name : string; years : int }");
    let node = output.root_node().as_structural().unwrap();
    assert_eq!(node.property("years").unwrap().member.name, "Age");
}

#[test]
fn duplicate_property_names_are_inconsistent() {
    struct Collapse;

    impl Rewrite for Collapse {
        fn rewrite_property(
            &mut self,
            _owner: NodeId,
            property: &Property,
        ) -> Result<Option<Property>, VisitError> {
            Ok(Some(Property {
                name: "same".into(),
                ..property.clone()
            }))
        }
    }

    let (_, graph) = setup(DECLS, "Person");
    let err = rewrite(&mut Collapse, &graph).unwrap_err();
    insta::assert_snapshot!(err, @"inconsistent rewrite at #0: duplicate property `same`");
}

#[test]
fn quotation_must_keep_a_function() {
    struct Flatten;

    impl Rewrite for Flatten {
        fn rewrite_function(
            &mut self,
            _id: NodeId,
            _node: &FunctionType,
        ) -> Result<Option<DataType>, VisitError> {
            Ok(Some(DataType::Primitive(PrimitiveType {
                host: Atom::Bool.into(),
                repr: PrimitiveRepr::Atom(Atom::Bool),
                nullable: false,
            })))
        }
    }

    let (_, graph) = setup(DECLS, "Expression<Func<int, bool>>");
    let err = rewrite(&mut Flatten, &graph).unwrap_err();
    assert_eq!(
        err,
        VisitError::InconsistentRewrite {
            node: graph.root(),
            reason: "quoted slot must be a function, found primitive".into(),
        }
    );
}

#[test]
fn unreached_hooks_are_not_invoked() {
    struct Strict;

    impl Rewrite for Strict {
        fn rewrite_quotation(
            &mut self,
            _id: NodeId,
            _node: &QuotationType,
        ) -> Result<Option<DataType>, VisitError> {
            panic!("no quotation in the graph");
        }
    }

    let (_, graph) = setup(DECLS, "Func<Person, int>");
    let output = rewrite(&mut Strict, &graph).unwrap();
    assert!(Arc::ptr_eq(output.node_arc(output.root()), graph.node_arc(graph.root())));
}

#[test]
fn custom_nodes_need_a_hook() {
    let (_, graph) = setup(DECLS, "List<Geometry>");
    let custom = graph.root_node().children()[0];

    let err = rewrite(&mut Identity, &graph).unwrap_err();
    assert_eq!(
        err,
        VisitError::NotHandled {
            node: custom,
            kind: DataTypeKind::Custom,
        }
    );

    struct KeepCustom;

    impl Rewrite for KeepCustom {
        fn rewrite_custom(
            &mut self,
            _id: NodeId,
            _node: &CustomType,
        ) -> Result<Option<DataType>, VisitError> {
            Ok(None)
        }
    }

    let output = rewrite(&mut KeepCustom, &graph).unwrap();
    assert!(Arc::ptr_eq(output.node_arc(custom), graph.node_arc(custom)));
}
