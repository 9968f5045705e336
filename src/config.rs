//! Configuration for the enumeration driver.
//!
//! The single substantive knob is the [`MatchMode`]: whether a complete
//! matching must cover both graphs (full isomorphism, the default) or only
//! the first (induced subgraph isomorphism). The mode is fixed when a state
//! is created; it selects the goal test, the dead test, and the strictness
//! of the cardinality look-ahead as one unit.

/// Which terminal predicate a matching must satisfy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// A matching is complete when it covers both graphs. Requires equal
    /// node counts; this is the historical behavior.
    #[default]
    Isomorphism,
    /// A matching is complete when it covers the first graph; the second
    /// graph may be larger. The mapped image is an induced subgraph: edges
    /// of the second graph between mapped nodes must be present in the
    /// first graph too.
    Subgraph,
}

/// Search configuration for [`Matcher`](crate::Matcher).
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Terminal predicate for the search.
    pub mode: MatchMode,
    /// Stop after collecting this many matchings. `None` enumerates all.
    pub limit: Option<usize>,
}

impl Config {
    pub fn new(mode: MatchMode) -> Self {
        Config { mode, limit: None }
    }

    /// Full-isomorphism search (the default).
    pub fn isomorphism() -> Self {
        Self::new(MatchMode::Isomorphism)
    }

    /// Induced-subgraph search.
    pub fn subgraph() -> Self {
        Self::new(MatchMode::Subgraph)
    }

    /// Bound the number of collected matchings.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
