use datamodel_core::decl::{load_declarations, resolve};
use datamodel_core::{HostTypeId, TypeRegistry};

use crate::Classifier;
use crate::diagnostics::ErrorReport;
use crate::types::DataTypeGraph;

/// Registry from a JSON declaration document.
pub fn registry(json: &str) -> TypeRegistry {
    load_declarations(json).expect("fixture declarations should load")
}

/// Resolve a type reference such as `List<Person>` in `registry`.
pub fn ty(registry: &mut TypeRegistry, text: &str) -> HostTypeId {
    resolve(registry, text).expect("fixture type should resolve")
}

pub fn classify_ok(registry: &TypeRegistry, ty: HostTypeId, allow_cycles: bool) -> DataTypeGraph {
    match Classifier::new(registry)
        .allow_cycles(allow_cycles)
        .try_classify(ty)
    {
        Ok(graph) => graph,
        Err(report) => panic!("expected success, got:\n{}", report.render()),
    }
}

pub fn classify_err(registry: &TypeRegistry, ty: HostTypeId, allow_cycles: bool) -> ErrorReport {
    match Classifier::new(registry)
        .allow_cycles(allow_cycles)
        .try_classify(ty)
    {
        Ok(graph) => panic!("expected failure, got `{}`", graph.render(registry)),
        Err(report) => report,
    }
}

/// Render the classification of `text` in a fresh registry built from `json`.
pub fn render(json: &str, text: &str) -> String {
    let mut registry = registry(json);
    let id = ty(&mut registry, text);
    classify_ok(&registry, id, true).render(&registry)
}

/// `Bar { foos : Foo[] }` and `Foo { bar : Bar }`.
pub const BAR_FOO: &str = r#"{ "types": [
    { "kind": "class", "name": "Bar",
      "members": [{ "name": "Foos", "type": "Foo[]", "mapping": "foos" }] },
    { "kind": "class", "name": "Foo",
      "members": [{ "name": "Bar", "type": "Bar", "mapping": "bar" }] }
] }"#;

/// A self-referential node type.
pub const NODE: &str = r#"{ "types": [
    { "kind": "class", "name": "Node",
      "members": [
        { "name": "Value", "type": "int", "mapping": "value" },
        { "name": "Next", "type": "Node", "mapping": "next" }
      ] }
] }"#;
