//! Host type classification.
//!
//! Classification maps a host type onto the data type algebra and validates
//! its declarations in the same pass. The result is either a complete
//! [`DataTypeGraph`] or an [`ErrorReport`] with every problem found. There is
//! no partial success.
//!
//! All entry points agree on pass/fail for the same type and cycle policy;
//! they differ only in how a failure is surfaced:
//!
//! - [`Classifier::try_classify`] returns the report.
//! - [`Classifier::classify`] fails with the first entry as a
//!   category-specific [`Error`].
//! - [`Classifier::try_check`] returns a flag alongside the report.
//! - [`Classifier::check`] fails with one [`Error::CheckFailed`] bundling
//!   every entry.

mod builder;
mod validate;


use datamodel_core::{HostTypeId, TypeRegistry};
use log::debug;

use crate::Error;
use crate::diagnostics::ErrorReport;
use crate::types::DataTypeGraph;

use builder::GraphBuilder;

/// Classification options over a registry.
#[derive(Clone, Copy, Debug)]
pub struct Classifier<'r> {
    registry: &'r TypeRegistry,
    allow_cycles: bool,
}

impl<'r> Classifier<'r> {
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self {
            registry,
            allow_cycles: false,
        }
    }

    /// Resolve references back to a type under construction to its node
    /// instead of reporting a cycle.
    pub fn allow_cycles(mut self, value: bool) -> Self {
        self.allow_cycles = value;
        self
    }

    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    pub fn cycles_allowed(&self) -> bool {
        self.allow_cycles
    }

    pub fn try_classify(&self, ty: HostTypeId) -> Result<DataTypeGraph, ErrorReport> {
        debug!(
            "classifying `{}` (allow_cycles: {})",
            self.registry.display(ty),
            self.allow_cycles
        );
        let result = GraphBuilder::new(self.registry, self.allow_cycles).build(ty);
        match &result {
            Ok(graph) => debug!("classified into {} nodes", graph.len()),
            Err(report) => debug!("classification failed with {} errors", report.len()),
        }
        result
    }

    pub fn classify(&self, ty: HostTypeId) -> crate::Result<DataTypeGraph> {
        self.try_classify(ty).map_err(Error::from_report)
    }

    pub fn try_check(&self, ty: HostTypeId) -> (bool, ErrorReport) {
        match self.try_classify(ty) {
            Ok(_) => (true, ErrorReport::new()),
            Err(report) => (false, report),
        }
    }

    pub fn check(&self, ty: HostTypeId) -> crate::Result<()> {
        match self.try_check(ty) {
            (true, _) => Ok(()),
            (false, report) => Err(Error::CheckFailed(report)),
        }
    }

    pub fn is_data_type(&self, ty: HostTypeId) -> bool {
        self.try_check(ty).0
    }
}

pub fn try_classify(
    registry: &TypeRegistry,
    ty: HostTypeId,
    allow_cycles: bool,
) -> Result<DataTypeGraph, ErrorReport> {
    Classifier::new(registry)
        .allow_cycles(allow_cycles)
        .try_classify(ty)
}

pub fn classify(
    registry: &TypeRegistry,
    ty: HostTypeId,
    allow_cycles: bool,
) -> crate::Result<DataTypeGraph> {
    Classifier::new(registry)
        .allow_cycles(allow_cycles)
        .classify(ty)
}

pub fn check(registry: &TypeRegistry, ty: HostTypeId, allow_cycles: bool) -> crate::Result<()> {
    Classifier::new(registry)
        .allow_cycles(allow_cycles)
        .check(ty)
}
