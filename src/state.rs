//! The VF state-space search state.
//!
//! A [`VfState`] encodes a partial injective mapping between the nodes of
//! two graphs together with the bookkeeping the VF algorithm prunes with:
//! per-node membership flags for the core and the in/out terminal sets, and
//! the four terminal-set cardinalities. A driver grows the mapping by asking
//! for candidate pairs ([`next_pair`](VfState::next_pair)), testing them
//! ([`is_feasible_pair`](VfState::is_feasible_pair)) and committing them
//! ([`add_pair`](VfState::add_pair)); it backtracks by cloning the state
//! before each descent and discarding the clone.

use crate::config::MatchMode;
use crate::graph::{Graph, NodeId, NULL_NODE};

const ST_CORE: u8 = 0x01;
const ST_TERM_IN: u8 = 0x02;
const ST_TERM_OUT: u8 = 0x04;
const ST_TERM: u8 = ST_TERM_IN | ST_TERM_OUT;

/// Which pool [`VfState::next_pair`] is currently drawing candidates from.
#[derive(Clone, Copy, PartialEq, Eq)]
enum CandidatePool {
    TermOut,
    TermIn,
    Unmapped,
}

impl CandidatePool {
    fn contains(self, flags: u8) -> bool {
        match self {
            CandidatePool::TermOut => flags & (ST_CORE | ST_TERM_OUT) == ST_TERM_OUT,
            CandidatePool::TermIn => flags & (ST_CORE | ST_TERM_IN) == ST_TERM_IN,
            CandidatePool::Unmapped => flags & ST_CORE == 0,
        }
    }
}

/// A state of the matching process between two graphs.
///
/// Cloning shares the graphs and copies the mapping and flag arrays, so a
/// clone can be extended without disturbing the original.
pub struct VfState<'g, N, E> {
    g1: &'g Graph<N, E>,
    g2: &'g Graph<N, E>,
    mode: MatchMode,
    n1: usize,
    n2: usize,

    core_len: usize,
    t1in_len: usize,
    t1out_len: usize,
    t2in_len: usize,
    t2out_len: usize,

    /// For each node of the first graph, its image or [`NULL_NODE`].
    core_1: Vec<NodeId>,
    /// For each node of the second graph, its preimage or [`NULL_NODE`].
    core_2: Vec<NodeId>,
    flags_1: Vec<u8>,
    flags_2: Vec<u8>,
}

impl<'g, N, E> VfState<'g, N, E> {
    /// Empty state over `(g1, g2)` with the default full-isomorphism
    /// terminal tests.
    pub fn new(g1: &'g Graph<N, E>, g2: &'g Graph<N, E>) -> Self {
        Self::with_mode(g1, g2, MatchMode::Isomorphism)
    }

    /// Empty state with the terminal tests selected by `mode`.
    pub fn with_mode(g1: &'g Graph<N, E>, g2: &'g Graph<N, E>, mode: MatchMode) -> Self {
        let n1 = g1.node_count();
        let n2 = g2.node_count();
        VfState {
            g1,
            g2,
            mode,
            n1,
            n2,
            core_len: 0,
            t1in_len: 0,
            t1out_len: 0,
            t2in_len: 0,
            t2out_len: 0,
            core_1: vec![NULL_NODE; n1],
            core_2: vec![NULL_NODE; n2],
            flags_1: vec![0; n1],
            flags_2: vec![0; n2],
        }
    }

    pub fn graph1(&self) -> &'g Graph<N, E> {
        self.g1
    }

    pub fn graph2(&self) -> &'g Graph<N, E> {
        self.g2
    }

    /// Number of matched pairs.
    pub fn core_len(&self) -> usize {
        self.core_len
    }

    /// Image of `n1` under the current mapping, if mapped.
    pub fn mapped_to(&self, n1: NodeId) -> Option<NodeId> {
        let v = self.core_1[n1 as usize];
        (v != NULL_NODE).then_some(v)
    }

    /// Whether the mapping is complete for the configured mode.
    pub fn is_goal(&self) -> bool {
        match self.mode {
            MatchMode::Isomorphism => self.core_len == self.n1 && self.core_len == self.n2,
            MatchMode::Subgraph => self.core_len == self.n1,
        }
    }

    /// Whether no completion of this mapping can exist.
    pub fn is_dead(&self) -> bool {
        match self.mode {
            MatchMode::Isomorphism => {
                self.n1 != self.n2
                    || self.t1out_len != self.t2out_len
                    || self.t1in_len != self.t2in_len
            }
            MatchMode::Subgraph => {
                self.n1 > self.n2
                    || self.t1out_len > self.t2out_len
                    || self.t1in_len > self.t2in_len
            }
        }
    }

    /// The next candidate pair to try after `prev`, or `None` when the
    /// current pool is exhausted and the caller must backtrack.
    ///
    /// Pass `None` to start enumerating. On subsequent calls pass the pair
    /// returned previously: the left node stays fixed while the right node
    /// advances, so all images of one candidate are tried before the search
    /// moves on.
    pub fn next_pair(&self, prev: Option<(NodeId, NodeId)>) -> Option<(NodeId, NodeId)> {
        let pool = self.candidate_pool();
        let (mut c1, mut c2) = match prev {
            None => (0usize, 0usize),
            Some((p1, p2)) => (p1 as usize, p2 as usize + 1),
        };

        while c1 < self.n1 && !pool.contains(self.flags_1[c1]) {
            c1 += 1;
            c2 = 0;
        }
        if c1 >= self.n1 {
            return None;
        }
        while c2 < self.n2 && !pool.contains(self.flags_2[c2]) {
            c2 += 1;
        }
        if c2 >= self.n2 {
            return None;
        }
        Some((c1 as NodeId, c2 as NodeId))
    }

    fn candidate_pool(&self) -> CandidatePool {
        if self.t1out_len > 0 && self.t2out_len > 0 {
            CandidatePool::TermOut
        } else if self.t1in_len > 0 && self.t2in_len > 0 {
            CandidatePool::TermIn
        } else {
            CandidatePool::Unmapped
        }
    }

    /// Whether extending the mapping with `(n1, n2)` can still lead to a
    /// valid matching: node attributes must be compatible, every edge
    /// between the candidates and the mapped core must exist on the other
    /// side with a compatible attribute, and the terminal-set cardinality
    /// look-ahead must hold.
    pub fn is_feasible_pair(&self, n1: NodeId, n2: NodeId) -> bool {
        debug_assert!((n1 as usize) < self.n1 && (n2 as usize) < self.n2);
        debug_assert_eq!(self.core_1[n1 as usize], NULL_NODE);
        debug_assert_eq!(self.core_2[n2 as usize], NULL_NODE);

        if !self
            .g1
            .compatible_node(self.g1.node_attr(n1), self.g2.node_attr(n2))
        {
            return false;
        }

        // Per side and per direction, count candidate neighbors that fall
        // into the in-terminal set, the out-terminal set, or neither.
        let mut pred1 = NeighborCounts::default();
        let mut succ1 = NeighborCounts::default();
        let mut pred2 = NeighborCounts::default();
        let mut succ2 = NeighborCounts::default();

        // Predecessors of n1: each mapped one must send an edge to n2 in g2.
        for (u, attr1) in self.g1.in_edges(n1) {
            let f = self.flags_1[u as usize];
            if f & ST_CORE != 0 {
                match self.g2.edge_attr(self.core_1[u as usize], n2) {
                    Some(attr2) if self.g1.compatible_edge(attr1, attr2) => {}
                    _ => return false,
                }
            } else {
                pred1.tally(f);
            }
        }

        // Successors of n1: each mapped one must receive an edge from n2.
        for (u, attr1) in self.g1.out_edges(n1) {
            let f = self.flags_1[u as usize];
            if f & ST_CORE != 0 {
                match self.g2.edge_attr(n2, self.core_1[u as usize]) {
                    Some(attr2) if self.g1.compatible_edge(attr1, attr2) => {}
                    _ => return false,
                }
            } else {
                succ1.tally(f);
            }
        }

        // Predecessors of n2: each mapped one must send an edge to n1 in g1.
        for (v, attr2) in self.g2.in_edges(n2) {
            let f = self.flags_2[v as usize];
            if f & ST_CORE != 0 {
                match self.g1.edge_attr(self.core_2[v as usize], n1) {
                    Some(attr1) if self.g1.compatible_edge(attr1, attr2) => {}
                    _ => return false,
                }
            } else {
                pred2.tally(f);
            }
        }

        // Successors of n2: each mapped one must receive an edge from n1.
        for (v, attr2) in self.g2.out_edges(n2) {
            let f = self.flags_2[v as usize];
            if f & ST_CORE != 0 {
                match self.g1.edge_attr(n1, self.core_2[v as usize]) {
                    Some(attr1) if self.g1.compatible_edge(attr1, attr2) => {}
                    _ => return false,
                }
            } else {
                succ2.tally(f);
            }
        }

        match self.mode {
            MatchMode::Isomorphism => pred1 == pred2 && succ1 == succ2,
            MatchMode::Subgraph => pred1.fits_within(&pred2) && succ1.fits_within(&succ2),
        }
    }

    /// Commit the pair `(n1, n2)` to the mapping and promote its unmapped
    /// neighbors into the terminal sets.
    ///
    /// Must only be called after [`is_feasible_pair`](Self::is_feasible_pair)
    /// returned `true` for the pair. Destructive: callers that need to
    /// backtrack clone the state first.
    pub fn add_pair(&mut self, n1: NodeId, n2: NodeId) {
        let (i1, i2) = (n1 as usize, n2 as usize);
        assert!(i1 < self.n1 && i2 < self.n2);
        debug_assert_eq!(self.core_1[i1], NULL_NODE);
        debug_assert_eq!(self.core_2[i2], NULL_NODE);

        self.core_len += 1;
        if self.flags_1[i1] & ST_TERM_IN != 0 {
            self.t1in_len -= 1;
        }
        if self.flags_1[i1] & ST_TERM_OUT != 0 {
            self.t1out_len -= 1;
        }
        if self.flags_2[i2] & ST_TERM_IN != 0 {
            self.t2in_len -= 1;
        }
        if self.flags_2[i2] & ST_TERM_OUT != 0 {
            self.t2out_len -= 1;
        }

        self.core_1[i1] = n2;
        self.core_2[i2] = n1;
        self.flags_1[i1] |= ST_CORE;
        self.flags_2[i2] |= ST_CORE;

        for (u, _) in self.g1.in_edges(n1) {
            let f = &mut self.flags_1[u as usize];
            if *f & (ST_CORE | ST_TERM_IN) == 0 {
                *f |= ST_TERM_IN;
                self.t1in_len += 1;
            }
        }
        for (u, _) in self.g1.out_edges(n1) {
            let f = &mut self.flags_1[u as usize];
            if *f & (ST_CORE | ST_TERM_OUT) == 0 {
                *f |= ST_TERM_OUT;
                self.t1out_len += 1;
            }
        }
        for (v, _) in self.g2.in_edges(n2) {
            let f = &mut self.flags_2[v as usize];
            if *f & (ST_CORE | ST_TERM_IN) == 0 {
                *f |= ST_TERM_IN;
                self.t2in_len += 1;
            }
        }
        for (v, _) in self.g2.out_edges(n2) {
            let f = &mut self.flags_2[v as usize];
            if *f & (ST_CORE | ST_TERM_OUT) == 0 {
                *f |= ST_TERM_OUT;
                self.t2out_len += 1;
            }
        }
    }

    /// The mapped pairs in ascending order of the first-graph node.
    pub fn core_set(&self) -> Vec<(NodeId, NodeId)> {
        self.core_1
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v != NULL_NODE)
            .map(|(u, &v)| (u as NodeId, v))
            .collect()
    }

    #[cfg(test)]
    fn assert_invariants(&self) {
        for (u, &v) in self.core_1.iter().enumerate() {
            if v != NULL_NODE {
                assert_eq!(self.core_2[v as usize] as usize, u);
            }
        }
        for (v, &u) in self.core_2.iter().enumerate() {
            if u != NULL_NODE {
                assert_eq!(self.core_1[u as usize] as usize, v);
            }
        }
        let core1 = self.flags_1.iter().filter(|&&f| f & ST_CORE != 0).count();
        let core2 = self.flags_2.iter().filter(|&&f| f & ST_CORE != 0).count();
        assert_eq!(core1, self.core_len);
        assert_eq!(core2, self.core_len);
        let pop = |flags: &[u8], bit: u8| {
            flags
                .iter()
                .filter(|&&f| f & ST_CORE == 0 && f & bit != 0)
                .count()
        };
        assert_eq!(pop(&self.flags_1, ST_TERM_IN), self.t1in_len);
        assert_eq!(pop(&self.flags_1, ST_TERM_OUT), self.t1out_len);
        assert_eq!(pop(&self.flags_2, ST_TERM_IN), self.t2in_len);
        assert_eq!(pop(&self.flags_2, ST_TERM_OUT), self.t2out_len);
        assert!(!(self.is_goal() && self.is_dead()));
    }
}

// Not derived: a clone shares the graphs and must not require `N: Clone`
// or `E: Clone`.
impl<'g, N, E> Clone for VfState<'g, N, E> {
    fn clone(&self) -> Self {
        VfState {
            g1: self.g1,
            g2: self.g2,
            mode: self.mode,
            n1: self.n1,
            n2: self.n2,
            core_len: self.core_len,
            t1in_len: self.t1in_len,
            t1out_len: self.t1out_len,
            t2in_len: self.t2in_len,
            t2out_len: self.t2out_len,
            core_1: self.core_1.clone(),
            core_2: self.core_2.clone(),
            flags_1: self.flags_1.clone(),
            flags_2: self.flags_2.clone(),
        }
    }
}

/// Classification of a candidate's unmapped neighbors, one counter per
/// terminal set plus one for nodes in no set at all.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
struct NeighborCounts {
    term_in: usize,
    term_out: usize,
    fresh: usize,
}

impl NeighborCounts {
    fn tally(&mut self, flags: u8) {
        if flags & ST_TERM_IN != 0 {
            self.term_in += 1;
        }
        if flags & ST_TERM_OUT != 0 {
            self.term_out += 1;
        }
        if flags & ST_TERM == 0 {
            self.fresh += 1;
        }
    }

    fn fits_within(&self, other: &NeighborCounts) -> bool {
        self.term_in <= other.term_in
            && self.term_out <= other.term_out
            && self.fresh <= other.fresh
    }
}
