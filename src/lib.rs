//! Attributed-relational-graph matching.
//!
//! This crate implements the VF state-space search for finding isomorphisms
//! (and induced subgraph isomorphisms) between directed graphs whose nodes
//! and edges carry opaque attributes. It has three layers:
//!
//! - [`Graph`]: the immutable attributed graph, built once from a
//!   [`GraphLoader`] (usually a [`GraphBuilder`]) and tuned for the matching
//!   hot path — sorted adjacency in both directions and logarithmic edge
//!   lookup.
//! - [`VfState`]: the search state — a partial mapping plus the terminal-set
//!   bookkeeping the VF feasibility rules prune with.
//! - [`Matcher`]: the enumeration driver that grows states by
//!   clone/extend/backtrack and reports complete [`Matching`]s.
//!
//! Attribute semantics are entirely caller-supplied through the capability
//! hooks in [`attr`]: comparators decide compatibility during matching,
//! destroyers observe teardown. Absent hooks mean structural-only matching
//! and plain drops.
//!
//! ```
//! use argmatch::{Config, GraphBuilder, Matcher};
//!
//! // Two directed triangles.
//! let mut b = GraphBuilder::new();
//! for _ in 0..3 {
//!     b.insert_node(()).unwrap();
//! }
//! b.insert_edge(0, 1, ()).unwrap();
//! b.insert_edge(1, 2, ()).unwrap();
//! b.insert_edge(2, 0, ()).unwrap();
//! let g1 = b.build().unwrap();
//!
//! let mut b = GraphBuilder::new();
//! for _ in 0..3 {
//!     b.insert_node(()).unwrap();
//! }
//! b.insert_edge(0, 1, ()).unwrap();
//! b.insert_edge(1, 2, ()).unwrap();
//! b.insert_edge(2, 0, ()).unwrap();
//! let g2 = b.build().unwrap();
//!
//! let config = Config::isomorphism();
//! let found = Matcher::new(&g1, &g2, &config).enumerate_all();
//! assert_eq!(found.len(), 3); // the three rotations
//! ```

pub mod attr;
pub mod builder;
pub mod config;
pub mod error;
pub mod generate;
pub mod graph;
pub mod loader;
pub mod matcher;
pub mod state;

pub use attr::{AttrComparator, AttrDestroyer, FnComparator, FnDestroyer};
pub use builder::GraphBuilder;
pub use config::{Config, MatchMode};
pub use error::GraphError;
pub use graph::{Graph, NodeId, NULL_NODE};
pub use loader::GraphLoader;
pub use matcher::{MatchSet, Matcher, Matching};
pub use state::VfState;

/// Enumerate matchings of `g1` into `g2` under `config`.
///
/// Convenience wrapper over [`Matcher::enumerate_all`].
pub fn find_matchings<N: Sync, E: Sync>(
    g1: &Graph<N, E>,
    g2: &Graph<N, E>,
    config: &Config,
) -> MatchSet {
    Matcher::new(g1, g2, config).enumerate_all()
}
