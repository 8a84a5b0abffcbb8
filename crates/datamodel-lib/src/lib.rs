//! Datamodel: a closed data type algebra over a host object model.
//!
//! # Example
//!
//! ```
//! use datamodel_core::{Atom, TypeRegistry};
//! use datamodel_lib::Classifier;
//!
//! let mut registry = TypeRegistry::new();
//! let ty = registry.function([Atom::Int32.into(), Atom::Float64.into()], Atom::Bool.into());
//!
//! let graph = Classifier::new(&registry).classify(ty).expect("functions classify");
//! assert_eq!(graph.render(&registry), "(int, double) => bool");
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod cache;
pub mod classify;
pub mod diagnostics;
pub mod equality;
pub mod schema;
pub mod types;
pub mod visitor;

#[cfg(test)]
mod cache_tests;
#[cfg(test)]
mod equality_tests;
#[cfg(test)]
mod schema_tests;
#[cfg(test)]
mod test_utils;

pub use cache::{CacheConfig, Classification, DataTypeCache};
pub use classify::Classifier;
pub use diagnostics::{ClassifyError, DiagnosticKind, ErrorCategory, ErrorReport};
pub use equality::StructuralComparer;
pub use schema::{Schema, SchemaField, derive_schema};
pub use types::{DataType, DataTypeGraph, DataTypeKind, InstanceError, NodeId};
pub use visitor::{Fold, Rewrite, VisitError};

/// Errors surfaced by the throwing classification entry points.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// The type can never be expressed in the algebra.
    #[error("unsupported type: {0}")]
    UnsupportedType(ClassifyError),

    /// The type's shape is admissible but its declarations are malformed.
    #[error("invalid declaration: {0}")]
    InvalidDeclaration(ClassifyError),

    #[error("type check failed with {} errors", .0.len())]
    CheckFailed(ErrorReport),
}

impl Error {
    /// The category-specific error for the first entry of a failed report.
    pub fn from_report(report: ErrorReport) -> Self {
        let Some(first) = report.first().cloned() else {
            return Error::CheckFailed(report);
        };
        match first.category() {
            ErrorCategory::Unsupported => Error::UnsupportedType(first),
            ErrorCategory::InvalidDeclaration => Error::InvalidDeclaration(first),
        }
    }

    pub fn category(&self) -> Option<ErrorCategory> {
        match self {
            Error::UnsupportedType(_) => Some(ErrorCategory::Unsupported),
            Error::InvalidDeclaration(_) => Some(ErrorCategory::InvalidDeclaration),
            Error::CheckFailed(_) => None,
        }
    }
}

/// Result type for classification operations.
pub type Result<T> = std::result::Result<T, Error>;
