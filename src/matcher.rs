//! Enumeration of matchings.
//!
//! The driver grows a [`VfState`] by the clone/extend discipline: for every
//! candidate pair that passes the feasibility test it clones the state,
//! commits the pair to the clone and recurses, so backtracking is simply
//! dropping the clone. With the `rayon` feature enabled the first-level
//! candidates are explored in parallel, each branch on its own clone while
//! the graphs are shared read-only.

#[cfg(feature = "rayon")]
use rayon::prelude::*;

#[cfg(feature = "rayon")]
use tracing::debug;
use tracing::info;

use crate::config::Config;
use crate::graph::{Graph, NodeId};
use crate::state::VfState;

/// One complete matching: node pairs in ascending first-graph order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matching {
    pairs: Vec<(NodeId, NodeId)>,
}

impl Matching {
    pub fn pairs(&self) -> &[(NodeId, NodeId)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Image of `n1`, if it is part of this matching.
    pub fn image_of(&self, n1: NodeId) -> Option<NodeId> {
        self.pairs
            .binary_search_by_key(&n1, |&(u, _)| u)
            .ok()
            .map(|i| self.pairs[i].1)
    }
}

/// All matchings found by a search.
#[derive(Clone, Debug, Default)]
pub struct MatchSet {
    pub items: Vec<Matching>,
}

impl MatchSet {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Matching> {
        self.items.iter()
    }
}

/// Entry point for matching searches over a pair of graphs.
pub struct Matcher<'g, 'cfg, N, E> {
    g1: &'g Graph<N, E>,
    g2: &'g Graph<N, E>,
    config: &'cfg Config,
}

impl<'g, 'cfg, N, E> Matcher<'g, 'cfg, N, E> {
    pub fn new(g1: &'g Graph<N, E>, g2: &'g Graph<N, E>, config: &'cfg Config) -> Self {
        Matcher { g1, g2, config }
    }

    /// Enumerate matchings of `g1` into `g2` under `config`.
    pub fn enumerate_all(&self) -> MatchSet
    where
        N: Sync,
        E: Sync,
    {
        info!(
            g1_nodes = self.g1.node_count(),
            g2_nodes = self.g2.node_count(),
            mode = ?self.config.mode,
            "starting match enumeration"
        );

        let state = VfState::with_mode(self.g1, self.g2, self.config.mode);
        let mut out = Vec::new();

        #[cfg(feature = "rayon")]
        {
            if self.config.limit.is_none() {
                out = self.enumerate_root_parallel(&state);
                info!(matches = out.len(), "match enumeration complete");
                return MatchSet { items: out };
            }
        }

        let mut remaining = self.config.limit.unwrap_or(usize::MAX);
        if remaining > 0 {
            Self::recurse(&state, &mut |m| {
                out.push(m.clone());
                remaining -= 1;
                remaining > 0
            });
        }
        info!(matches = out.len(), "match enumeration complete");
        MatchSet { items: out }
    }

    /// The first matching found, if any.
    pub fn find_first(&self) -> Option<Matching> {
        let state = VfState::with_mode(self.g1, self.g2, self.config.mode);
        let mut found = None;
        Self::recurse(&state, &mut |m| {
            found = Some(m.clone());
            false
        });
        found
    }

    /// Walk matchings, handing each to `visitor` as it is found. Returning
    /// `false` from the visitor stops the search; this is also the hook for
    /// cooperative cancellation. Returns the number of matchings visited.
    pub fn visit_all(&self, mut visitor: impl FnMut(&Matching) -> bool) -> usize {
        let state = VfState::with_mode(self.g1, self.g2, self.config.mode);
        let mut count = 0;
        Self::recurse(&state, &mut |m| {
            count += 1;
            visitor(m)
        });
        count
    }

    /// Depth-first enumeration over `state`. The visitor returns whether to
    /// keep searching.
    fn recurse(state: &VfState<'g, N, E>, visit: &mut impl FnMut(&Matching) -> bool) -> bool {
        if state.is_goal() {
            let found = Matching {
                pairs: state.core_set(),
            };
            return visit(&found);
        }
        if state.is_dead() {
            return true;
        }

        let mut prev = None;
        while let Some((n1, n2)) = state.next_pair(prev) {
            if state.is_feasible_pair(n1, n2) {
                let mut next = state.clone();
                next.add_pair(n1, n2);
                if !Self::recurse(&next, visit) {
                    return false;
                }
            }
            prev = Some((n1, n2));
        }
        true
    }

    /// Fan the feasible first-level pairs out across workers; each branch
    /// runs the sequential recursion on its own cloned state.
    #[cfg(feature = "rayon")]
    fn enumerate_root_parallel(&self, state: &VfState<'g, N, E>) -> Vec<Matching>
    where
        N: Sync,
        E: Sync,
    {
        if state.is_goal() {
            return vec![Matching {
                pairs: state.core_set(),
            }];
        }
        if state.is_dead() {
            return Vec::new();
        }

        let mut roots = Vec::new();
        let mut prev = None;
        while let Some(pair) = state.next_pair(prev) {
            if state.is_feasible_pair(pair.0, pair.1) {
                roots.push(pair);
            }
            prev = Some(pair);
        }
        debug!(roots = roots.len(), "fanning out first-level candidates");

        roots
            .into_par_iter()
            .flat_map_iter(|(n1, n2)| {
                let mut branch = state.clone();
                branch.add_pair(n1, n2);
                let mut found = Vec::new();
                Self::recurse(&branch, &mut |m| {
                    found.push(m.clone());
                    true
                });
                found
            })
            .collect()
    }
}
