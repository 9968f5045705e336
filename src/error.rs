//! Error types for graph construction and attribute updates.
//!
//! Everything fallible in this crate happens either while a graph is being
//! built from a loader, or on the narrow attribute-mutation surface. The
//! search itself never fails; feasibility predicates answer `false` instead.

use thiserror::Error;

use crate::graph::NodeId;

/// Errors raised while building a graph or updating its attributes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// The loader reported a node count that cannot be represented by
    /// [`NodeId`]. Rejected before any allocation happens.
    #[error("loader reported {0} nodes; at most 65534 are representable")]
    LoaderOverflow(usize),

    /// `set_edge_attr` was called for an edge the graph does not contain.
    /// The graph is left untouched.
    #[error("no edge from node {from} to node {target}")]
    UnknownEdge { from: NodeId, target: NodeId },

    /// The loader described an adjacency structure that does not hold
    /// together: an edge endpoint outside `0..n`, a duplicate edge, or an
    /// in-list whose filled length disagrees with the count collected
    /// during ingestion.
    #[error("loader produced an inconsistent graph: {0}")]
    InconsistentGraph(String),
}

impl GraphError {
    /// Create a [`GraphError::InconsistentGraph`] with a formatted detail.
    pub(crate) fn inconsistent(msg: impl Into<String>) -> Self {
        Self::InconsistentGraph(msg.into())
    }
}
