//! Builder-pattern printer for data type graphs.
//!
//! Acyclic graphs render inline:
//!
//! ```text
//! { name : string; tags : string[]; score : (int) => double }
//! ```
//!
//! Cyclic graphs bind every structural node to a synthetic name once and
//! render references by name:
//!
//! ```text
//! let t0 = { foos : t1[] }
//! and t1 = { bar : t0 }
//! in t0
//! ```

use std::collections::HashMap;
use std::fmt::Write;

use datamodel_core::TypeRegistry;

use super::graph::DataTypeGraph;
use super::node::{DataType, NodeId};

pub struct DataTypePrinter<'a> {
    registry: &'a TypeRegistry,
    graph: &'a DataTypeGraph,
    multiline: bool,
}

impl<'a> DataTypePrinter<'a> {
    pub fn new(registry: &'a TypeRegistry, graph: &'a DataTypeGraph) -> Self {
        Self {
            registry,
            graph,
            multiline: true,
        }
    }

    /// Separate `let` bindings with newlines (default) or single spaces.
    pub fn multiline(mut self, value: bool) -> Self {
        self.multiline = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let root = self.graph.root();
        if !self.graph.is_cyclic() {
            return self.write_node(w, root, &HashMap::new());
        }

        let bound: Vec<NodeId> = self
            .graph
            .reachable(root)
            .into_iter()
            .filter(|id| matches!(self.graph.node(*id), DataType::Structural(_)))
            .collect();
        let names: HashMap<NodeId, String> = bound
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, format!("t{i}")))
            .collect();

        let sep = if self.multiline { "\n" } else { " " };
        for (i, id) in bound.iter().enumerate() {
            if i > 0 {
                write!(w, "{sep}and ")?;
            } else {
                write!(w, "let ")?;
            }
            write!(w, "t{i} = ")?;
            self.write_body(w, *id, &names)?;
        }
        write!(w, "{sep}in ")?;
        self.write_node(w, root, &names)
    }

    /// A reference to `id`: its binding name if it has one, else its body.
    fn write_node(
        &self,
        w: &mut impl Write,
        id: NodeId,
        names: &HashMap<NodeId, String>,
    ) -> std::fmt::Result {
        if let Some(name) = names.get(&id) {
            return w.write_str(name);
        }
        self.write_body(w, id, names)
    }

    fn write_body(
        &self,
        w: &mut impl Write,
        id: NodeId,
        names: &HashMap<NodeId, String>,
    ) -> std::fmt::Result {
        match self.graph.node(id) {
            DataType::Primitive(n) => w.write_str(&self.registry.display(n.host)),
            DataType::Array(n) => {
                let wrap = !names.contains_key(&n.element)
                    && matches!(self.graph.node(n.element), DataType::Function(_));
                if wrap {
                    w.write_char('(')?;
                }
                self.write_node(w, n.element, names)?;
                if wrap {
                    w.write_char(')')?;
                }
                w.write_str("[]")
            }
            DataType::Structural(n) => {
                if n.properties.is_empty() {
                    return w.write_str("{}");
                }
                w.write_str("{ ")?;
                for (i, prop) in n.properties.iter().enumerate() {
                    if i > 0 {
                        w.write_str("; ")?;
                    }
                    write!(w, "{} : ", prop.name)?;
                    self.write_node(w, prop.ty, names)?;
                }
                w.write_str(" }")
            }
            DataType::Function(n) => {
                w.write_char('(')?;
                for (i, param) in n.parameters.iter().enumerate() {
                    if i > 0 {
                        w.write_str(", ")?;
                    }
                    self.write_node(w, *param, names)?;
                }
                w.write_str(") => ")?;
                self.write_node(w, n.result, names)
            }
            DataType::Quotation(n) => {
                w.write_str("@{ ")?;
                self.write_node(w, n.function, names)?;
                w.write_str(" }")
            }
            DataType::Expression(n) => w.write_str(&self.registry.display(n.host)),
            DataType::OpenParameter(n) => w.write_str(&self.registry.display(n.host)),
            DataType::Custom(n) => w.write_str(&self.registry.display(n.host)),
        }
    }
}
