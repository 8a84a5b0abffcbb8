use datamodel_core::TypeRegistry;
use indoc::indoc;

use super::{Fold, VisitError, fold};
use crate::test_utils::{NODE, classify_ok, registry, ty};
use crate::types::{
    ArrayType, DataType, DataTypeGraph, DataTypeKind, ExpressionType, FunctionType, NodeId,
    OpenParameterType, PrimitiveType, QuotationType, StructuralType,
};

const DECLS: &str = indoc! {r#"
    { "types": [
        { "kind": "record", "name": "Pair",
          "fields": [
            { "name": "Left", "type": "int" },
            { "name": "Right", "type": "int" }
          ] },
        { "kind": "custom", "name": "Geometry" },
        { "kind": "parameter", "name": "T", "wildcard": true }
    ] }
"#};

fn setup(json: &str, text: &str) -> (TypeRegistry, DataTypeGraph) {
    let mut registry = registry(json);
    let id = ty(&mut registry, text);
    let graph = classify_ok(&registry, id, true);
    (registry, graph)
}

/// Folds to a compact outline and counts the nodes it folds.
#[derive(Default)]
struct Outline {
    folded: usize,
}

impl Fold for Outline {
    type Output = String;

    fn fold_primitive(&mut self, _id: NodeId, node: &PrimitiveType) -> Result<String, VisitError> {
        self.folded += 1;
        Ok(if node.nullable { "p?" } else { "p" }.to_owned())
    }

    fn fold_array(
        &mut self,
        _id: NodeId,
        _node: &ArrayType,
        element: String,
    ) -> Result<String, VisitError> {
        self.folded += 1;
        Ok(format!("[{element}]"))
    }

    fn fold_structural(
        &mut self,
        _id: NodeId,
        node: &StructuralType,
        properties: Vec<String>,
    ) -> Result<String, VisitError> {
        self.folded += 1;
        let fields: Vec<String> = node
            .properties
            .iter()
            .zip(properties)
            .map(|(p, ty)| format!("{}:{ty}", p.name))
            .collect();
        Ok(format!("{{{}}}", fields.join(",")))
    }

    fn fold_function(
        &mut self,
        _id: NodeId,
        _node: &FunctionType,
        parameters: Vec<String>,
        result: String,
    ) -> Result<String, VisitError> {
        self.folded += 1;
        Ok(format!("({})->{result}", parameters.join(",")))
    }

    fn fold_expression(
        &mut self,
        _id: NodeId,
        _node: &ExpressionType,
    ) -> Result<String, VisitError> {
        self.folded += 1;
        Ok("expr".to_owned())
    }

    fn fold_quotation(
        &mut self,
        _id: NodeId,
        _node: &QuotationType,
        function: String,
    ) -> Result<String, VisitError> {
        self.folded += 1;
        Ok(format!("@{function}"))
    }

    fn fold_open_parameter(
        &mut self,
        _id: NodeId,
        _node: &OpenParameterType,
    ) -> Result<String, VisitError> {
        self.folded += 1;
        Ok("T".to_owned())
    }
}

#[test]
fn folds_children_first() {
    let (_, graph) = setup(DECLS, "Func<Pair[], Expression<Func<T, int?>>, bool>");
    let mut outline = Outline::default();

    let output = fold(&mut outline, &graph).unwrap();
    insta::assert_snapshot!(output, @"([{Left:p,Right:p}],@(T)->p?)->p");
}

#[test]
fn shared_nodes_fold_once() {
    let (_, graph) = setup(DECLS, "Pair");
    let mut outline = Outline::default();

    assert_eq!(fold(&mut outline, &graph).unwrap(), "{Left:p,Right:p}");
    // One node for `Pair`, one for the `int` both properties share.
    assert_eq!(graph.len(), 2);
    assert_eq!(outline.folded, 2);
}

#[test]
fn back_references_fail_by_default() {
    let (_, graph) = setup(NODE, "Node");

    let err = fold(&mut Outline::default(), &graph).unwrap_err();
    assert_eq!(err, VisitError::CyclicGraph { node: graph.root() });
}

#[test]
fn back_reference_hook() {
    struct Named(Outline);

    impl Fold for Named {
        type Output = String;

        fn fold_primitive(
            &mut self,
            id: NodeId,
            node: &PrimitiveType,
        ) -> Result<String, VisitError> {
            self.0.fold_primitive(id, node)
        }

        fn fold_array(
            &mut self,
            id: NodeId,
            node: &ArrayType,
            element: String,
        ) -> Result<String, VisitError> {
            self.0.fold_array(id, node, element)
        }

        fn fold_structural(
            &mut self,
            id: NodeId,
            node: &StructuralType,
            properties: Vec<String>,
        ) -> Result<String, VisitError> {
            self.0.fold_structural(id, node, properties)
        }

        fn fold_function(
            &mut self,
            id: NodeId,
            node: &FunctionType,
            parameters: Vec<String>,
            result: String,
        ) -> Result<String, VisitError> {
            self.0.fold_function(id, node, parameters, result)
        }

        fn fold_expression(
            &mut self,
            id: NodeId,
            node: &ExpressionType,
        ) -> Result<String, VisitError> {
            self.0.fold_expression(id, node)
        }

        fn fold_quotation(
            &mut self,
            id: NodeId,
            node: &QuotationType,
            function: String,
        ) -> Result<String, VisitError> {
            self.0.fold_quotation(id, node, function)
        }

        fn fold_open_parameter(
            &mut self,
            id: NodeId,
            node: &OpenParameterType,
        ) -> Result<String, VisitError> {
            self.0.fold_open_parameter(id, node)
        }

        fn fold_back_reference(
            &mut self,
            id: NodeId,
            node: &DataType,
        ) -> Result<String, VisitError> {
            assert_eq!(node.kind(), DataTypeKind::Structural);
            Ok(id.to_string())
        }
    }

    let (_, graph) = setup(NODE, "Node[]");
    let output = fold(&mut Named(Outline::default()), &graph).unwrap();
    insta::assert_snapshot!(output, @"[{value:p,next:#1}]");
}

#[test]
fn custom_nodes_are_not_handled_by_default() {
    let (_, graph) = setup(DECLS, "Func<Geometry, bool>");
    let custom = graph.root_node().children()[0];

    let err = fold(&mut Outline::default(), &graph).unwrap_err();
    assert_eq!(
        err,
        VisitError::NotHandled {
            node: custom,
            kind: DataTypeKind::Custom,
        }
    );
    insta::assert_snapshot!(err, @"custom node #1 is not handled");
}
