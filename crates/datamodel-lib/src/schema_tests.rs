use indoc::indoc;
use serde_json::json;

use crate::schema::{Schema, derive_schema};
use crate::test_utils::{BAR_FOO, classify_ok, registry, ty};
use crate::types::DataTypeKind;
use crate::visitor::VisitError;

fn schema_json(decls: &str, text: &str) -> serde_json::Value {
    let mut registry = registry(decls);
    let id = ty(&mut registry, text);
    let graph = classify_ok(&registry, id, true);
    let schema = derive_schema(&registry, &graph).unwrap();
    serde_json::to_value(schema).unwrap()
}

const DECLS: &str = indoc! {r#"
    { "types": [
        { "kind": "class", "name": "Person",
          "members": [
            { "name": "Name", "type": "string", "mapping": "name" },
            { "name": "Age", "type": "int?", "mapping": "age" },
            { "name": "Tags", "type": "List<string>", "mapping": "tags" }
          ] },
        { "kind": "enum", "name": "Level",
          "members": [{ "name": "Low", "value": 0 }, { "name": "High", "value": 1 }] },
        { "kind": "custom", "name": "Geometry" }
    ] }
"#};

#[test]
fn entity_schema() {
    assert_eq!(
        schema_json(DECLS, "Person"),
        json!({
            "kind": "struct",
            "name": "Person",
            "structural": "entity",
            "fields": [
                {
                    "name": "name",
                    "schema": { "kind": "primitive", "name": "string", "nullable": true }
                },
                {
                    "name": "age",
                    "schema": { "kind": "primitive", "name": "int", "nullable": true }
                },
                {
                    "name": "tags",
                    "schema": {
                        "kind": "array",
                        "element": { "kind": "primitive", "name": "string", "nullable": true }
                    }
                }
            ]
        })
    );
}

#[test]
fn back_edges_become_refs() {
    assert_eq!(
        schema_json(BAR_FOO, "Bar"),
        json!({
            "kind": "struct",
            "name": "Bar",
            "structural": "entity",
            "fields": [{
                "name": "foos",
                "schema": {
                    "kind": "array",
                    "element": {
                        "kind": "struct",
                        "name": "Foo",
                        "structural": "entity",
                        "fields": [{
                            "name": "bar",
                            "schema": { "kind": "ref", "target": "Bar" }
                        }]
                    }
                }
            }]
        })
    );
}

#[test]
fn callable_and_enum_schema() {
    assert_eq!(
        schema_json(DECLS, "Expression<Func<Level, (int, bool)>>"),
        json!({
            "kind": "quotation",
            "function": {
                "kind": "function",
                "parameters": [{ "kind": "primitive", "name": "Level", "nullable": false }],
                "result": {
                    "kind": "struct",
                    "name": "Tuple<int, bool>",
                    "structural": "tuple",
                    "fields": [
                        {
                            "name": "Item1",
                            "schema": { "kind": "primitive", "name": "int", "nullable": false }
                        },
                        {
                            "name": "Item2",
                            "schema": { "kind": "primitive", "name": "bool", "nullable": false }
                        }
                    ]
                }
            }
        })
    );
}

#[test]
fn custom_nodes_have_no_schema() {
    let mut registry = registry(DECLS);
    let id = ty(&mut registry, "Geometry");
    let graph = classify_ok(&registry, id, true);

    let err = derive_schema(&registry, &graph).unwrap_err();
    assert_eq!(
        err,
        VisitError::NotHandled {
            node: graph.root(),
            kind: DataTypeKind::Custom,
        }
    );
}

#[test]
fn schemas_compare_structurally() {
    let mut registry = registry(BAR_FOO);
    let bar = ty(&mut registry, "Bar");
    let a = derive_schema(&registry, &classify_ok(&registry, bar, true)).unwrap();
    let b = derive_schema(&registry, &classify_ok(&registry, bar, true)).unwrap();

    assert_eq!(a, b);
    assert!(matches!(a, Schema::Struct { ref fields, .. } if fields.len() == 1));
}
