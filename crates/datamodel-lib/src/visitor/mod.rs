//! Graph visitors.
//!
//! Two flavors over a classified [`DataTypeGraph`](crate::DataTypeGraph):
//!
//! - [`Rewrite`]: same-shape rewriting. Override `rewrite_*` hooks to replace
//!   nodes; nodes left alone keep their shared instance, and the result is
//!   checked for consistency before it is returned.
//! - [`Fold`]: generic-result folding. Each node kind maps to a combination of
//!   its already-folded children, for deriving an unrelated representation.
//!
//! Both visit only nodes reachable from the root, children before parents.

mod fold;
mod rewrite;

#[cfg(test)]
mod fold_tests;
#[cfg(test)]
mod rewrite_tests;

pub use fold::{Fold, fold};
pub use rewrite::{Rewrite, rewrite};

use crate::types::{DataTypeKind, NodeId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VisitError {
    /// No behavior applies to this node kind.
    #[error("{kind} node {node} is not handled")]
    NotHandled { node: NodeId, kind: DataTypeKind },

    /// A replacement does not fit the slot it fills.
    #[error("inconsistent rewrite at {node}: {reason}")]
    InconsistentRewrite { node: NodeId, reason: String },

    /// A back-edge reached a fold without a back-reference hook.
    #[error("cyclic graph: back-edge to {node}")]
    CyclicGraph { node: NodeId },
}
