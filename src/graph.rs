//! The attributed relational graph.
//!
//! A [`Graph`] is a directed graph whose nodes and edges carry opaque
//! attributes. It is built once from a [`GraphLoader`] and is structurally
//! immutable afterwards, which lets the representation be tuned for the
//! matching hot path: per-node out- and in-adjacency lists sorted by neighbor
//! id, so edge existence is a binary search over the out-list.
//!
//! Edge attributes live in a flat store indexed by edge id; the out-entry at
//! the source and the in-entry at the target of an edge both carry that id.
//! Looking an edge up from either direction therefore yields the same
//! attribute, and teardown visits each edge attribute exactly once.

use std::fmt;

use tracing::debug;

use crate::attr::{AttrComparator, AttrDestroyer};
use crate::error::GraphError;
use crate::loader::GraphLoader;

/// Node identifier. Ids in a graph of `n` nodes are exactly `0..n`.
pub type NodeId = u16;

/// Sentinel meaning "no node".
pub const NULL_NODE: NodeId = u16::MAX;

/// Index into the flat edge-attribute store.
type EdgeId = u32;

/// An immutable directed graph with opaque node attributes `N` and edge
/// attributes `E`.
pub struct Graph<N, E> {
    node_attrs: Vec<N>,
    edge_attrs: Vec<E>,
    /// Per node, `(neighbor, edge id)` for each outgoing edge, strictly
    /// increasing by neighbor.
    out: Vec<Vec<(NodeId, EdgeId)>>,
    /// Per node, `(neighbor, edge id)` for each incoming edge, strictly
    /// increasing by neighbor. Edge ids are shared with `out`.
    inn: Vec<Vec<(NodeId, EdgeId)>>,

    node_comparator: Option<Box<dyn AttrComparator<N>>>,
    edge_comparator: Option<Box<dyn AttrComparator<E>>>,
    node_destroyer: Option<Box<dyn AttrDestroyer<N>>>,
    edge_destroyer: Option<Box<dyn AttrDestroyer<E>>>,
}

impl<N, E> Graph<N, E> {
    /// Build a graph by pulling nodes and out-edges from `loader`.
    ///
    /// Ingestion happens in two phases: out-adjacency is read and sorted
    /// per node, then in-adjacency is derived from it. Iterating sources in
    /// increasing id order during the second phase leaves every in-list
    /// already sorted.
    pub fn from_loader<L: GraphLoader<N, E>>(loader: &mut L) -> Result<Self, GraphError> {
        let n = loader.node_count();
        if n >= NULL_NODE as usize {
            return Err(GraphError::LoaderOverflow(n));
        }

        let mut node_attrs = Vec::with_capacity(n);
        for u in 0..n {
            node_attrs.push(loader.node_attr(u as NodeId));
        }

        let mut edge_attrs: Vec<E> = Vec::new();
        let mut out: Vec<Vec<(NodeId, EdgeId)>> = Vec::with_capacity(n);
        let mut in_count = vec![0usize; n];

        for u in 0..n {
            let k = loader.out_edge_count(u as NodeId);
            let mut list: Vec<(NodeId, EdgeId)> = Vec::with_capacity(k);
            for i in 0..k {
                let (v, attr) = loader.out_edge(u as NodeId, i);
                if v as usize >= n {
                    return Err(GraphError::inconsistent(format!(
                        "edge {u}->{v} references a node outside 0..{n}"
                    )));
                }
                let id = edge_attrs.len() as EdgeId;
                edge_attrs.push(attr);
                list.push((v, id));
                in_count[v as usize] += 1;
            }
            list.sort_unstable_by_key(|&(v, _)| v);
            if list.windows(2).any(|w| w[0].0 == w[1].0) {
                return Err(GraphError::inconsistent(format!(
                    "duplicate out-edge at node {u}"
                )));
            }
            out.push(list);
        }

        let mut inn: Vec<Vec<(NodeId, EdgeId)>> = in_count
            .iter()
            .map(|&k| Vec::with_capacity(k))
            .collect();
        for u in 0..n {
            for &(v, id) in &out[u] {
                inn[v as usize].push((u as NodeId, id));
            }
        }
        for v in 0..n {
            if inn[v].len() != in_count[v] {
                return Err(GraphError::inconsistent(format!(
                    "in-list of node {v} filled {} entries, expected {}",
                    inn[v].len(),
                    in_count[v]
                )));
            }
        }

        debug!(nodes = n, edges = edge_attrs.len(), "graph constructed");

        Ok(Graph {
            node_attrs,
            edge_attrs,
            out,
            inn,
            node_comparator: None,
            edge_comparator: None,
            node_destroyer: None,
            edge_destroyer: None,
        })
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.node_attrs.len()
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.edge_attrs.len()
    }

    /// Attribute of `node`. Panics if `node` is out of range.
    pub fn node_attr(&self, node: NodeId) -> &N {
        &self.node_attrs[node as usize]
    }

    /// Replace the attribute of `node`.
    ///
    /// With `destroy_old` the previous attribute is handed to the installed
    /// node destroyer (or dropped when none is installed) and `None` is
    /// returned; otherwise the previous attribute is returned and managing
    /// it becomes the caller's responsibility.
    pub fn set_node_attr(&mut self, node: NodeId, attr: N, destroy_old: bool) -> Option<N> {
        let old = std::mem::replace(&mut self.node_attrs[node as usize], attr);
        if destroy_old {
            match &self.node_destroyer {
                Some(d) => d.destroy(old),
                None => drop(old),
            }
            None
        } else {
            Some(old)
        }
    }

    /// Whether the edge `source -> target` exists. O(log deg⁺(source)).
    pub fn has_edge(&self, source: NodeId, target: NodeId) -> bool {
        self.find_out(source, target).is_some()
    }

    /// Attribute of the edge `source -> target`, if the edge exists.
    pub fn edge_attr(&self, source: NodeId, target: NodeId) -> Option<&E> {
        self.find_out(source, target)
            .map(|id| &self.edge_attrs[id as usize])
    }

    /// Replace the attribute of the edge `source -> target`.
    ///
    /// Both the out-view at `source` and the in-view at `target` observe the
    /// new attribute, since they share one store entry. `destroy_old` works
    /// as in [`set_node_attr`](Self::set_node_attr). Fails with
    /// [`GraphError::UnknownEdge`] when the edge is absent, leaving the
    /// graph untouched.
    pub fn set_edge_attr(
        &mut self,
        source: NodeId,
        target: NodeId,
        attr: E,
        destroy_old: bool,
    ) -> Result<Option<E>, GraphError> {
        let id = self
            .find_out(source, target)
            .ok_or(GraphError::UnknownEdge { from: source, target })?;
        let old = std::mem::replace(&mut self.edge_attrs[id as usize], attr);
        if destroy_old {
            match &self.edge_destroyer {
                Some(d) => d.destroy(old),
                None => drop(old),
            }
            Ok(None)
        } else {
            Ok(Some(old))
        }
    }

    /// Number of edges leaving `node`.
    pub fn out_degree(&self, node: NodeId) -> usize {
        self.out[node as usize].len()
    }

    /// Number of edges entering `node`.
    pub fn in_degree(&self, node: NodeId) -> usize {
        self.inn[node as usize].len()
    }

    /// Number of edges touching `node`.
    pub fn degree(&self, node: NodeId) -> usize {
        self.out_degree(node) + self.in_degree(node)
    }

    /// The `i`-th out-edge of `node`: target and attribute.
    pub fn out_edge(&self, node: NodeId, i: usize) -> (NodeId, &E) {
        let (v, id) = self.out[node as usize][i];
        (v, &self.edge_attrs[id as usize])
    }

    /// The `i`-th in-edge of `node`: source and attribute.
    pub fn in_edge(&self, node: NodeId, i: usize) -> (NodeId, &E) {
        let (u, id) = self.inn[node as usize][i];
        (u, &self.edge_attrs[id as usize])
    }

    /// Out-edges of `node` in increasing target order.
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = (NodeId, &E)> {
        self.out[node as usize]
            .iter()
            .map(|&(v, id)| (v, &self.edge_attrs[id as usize]))
    }

    /// In-edges of `node` in increasing source order.
    pub fn in_edges(&self, node: NodeId) -> impl Iterator<Item = (NodeId, &E)> {
        self.inn[node as usize]
            .iter()
            .map(|&(u, id)| (u, &self.edge_attrs[id as usize]))
    }

    /// Install the comparator consulted for node-attribute compatibility.
    /// Replaces (and drops) any previously installed comparator.
    pub fn set_node_comparator(&mut self, comparator: impl AttrComparator<N> + 'static) {
        self.node_comparator = Some(Box::new(comparator));
    }

    /// Install the comparator consulted for edge-attribute compatibility.
    pub fn set_edge_comparator(&mut self, comparator: impl AttrComparator<E> + 'static) {
        self.edge_comparator = Some(Box::new(comparator));
    }

    /// Install the hook invoked once per node attribute at teardown.
    pub fn set_node_destroyer(&mut self, destroyer: impl AttrDestroyer<N> + 'static) {
        self.node_destroyer = Some(Box::new(destroyer));
    }

    /// Install the hook invoked once per edge attribute at teardown.
    pub fn set_edge_destroyer(&mut self, destroyer: impl AttrDestroyer<E> + 'static) {
        self.edge_destroyer = Some(Box::new(destroyer));
    }

    /// Whether two node attributes are compatible. Always true when no
    /// comparator is installed.
    pub fn compatible_node(&self, a: &N, b: &N) -> bool {
        self.node_comparator
            .as_ref()
            .map_or(true, |c| c.compatible(a, b))
    }

    /// Whether two edge attributes are compatible. Always true when no
    /// comparator is installed.
    pub fn compatible_edge(&self, a: &E, b: &E) -> bool {
        self.edge_comparator
            .as_ref()
            .map_or(true, |c| c.compatible(a, b))
    }

    fn find_out(&self, source: NodeId, target: NodeId) -> Option<EdgeId> {
        self.out[source as usize]
            .binary_search_by_key(&target, |&(v, _)| v)
            .ok()
            .map(|i| self.out[source as usize][i].1)
    }
}

impl<N, E> Drop for Graph<N, E> {
    fn drop(&mut self) {
        // The flat store holds each edge attribute once, so draining it is
        // the exactly-once teardown walk. Attributes without an installed
        // destroyer are dropped by the Vec as usual.
        if let Some(d) = self.edge_destroyer.take() {
            for attr in self.edge_attrs.drain(..) {
                d.destroy(attr);
            }
        }
        if let Some(d) = self.node_destroyer.take() {
            for attr in self.node_attrs.drain(..) {
                d.destroy(attr);
            }
        }
    }
}

impl<N, E> fmt::Debug for Graph<N, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("nodes", &self.node_count())
            .field("edges", &self.edge_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::FnComparator;
    use crate::builder::GraphBuilder;
    use crate::loader::GraphLoader;

    fn diamond() -> Graph<u32, &'static str> {
        // 0 -> 1, 0 -> 2, 1 -> 3, 2 -> 3
        let mut b = GraphBuilder::new();
        for attr in [10u32, 11, 12, 13] {
            b.insert_node(attr).unwrap();
        }
        b.insert_edge(0, 2, "02").unwrap();
        b.insert_edge(0, 1, "01").unwrap();
        b.insert_edge(1, 3, "13").unwrap();
        b.insert_edge(2, 3, "23").unwrap();
        b.build().unwrap()
    }

    #[test]
    fn adjacency_is_sorted_regardless_of_insertion_order() {
        let g = diamond();
        let targets: Vec<NodeId> = g.out_edges(0).map(|(v, _)| v).collect();
        assert_eq!(targets, vec![1, 2]);
        let sources: Vec<NodeId> = g.in_edges(3).map(|(u, _)| u).collect();
        assert_eq!(sources, vec![1, 2]);
    }

    #[test]
    fn edge_lookup_and_degrees() {
        let g = diamond();
        assert!(g.has_edge(0, 1));
        assert!(g.has_edge(2, 3));
        assert!(!g.has_edge(1, 0));
        assert!(!g.has_edge(3, 3));
        assert_eq!(g.edge_attr(1, 3), Some(&"13"));
        assert_eq!(g.edge_attr(3, 1), None);
        assert_eq!(g.out_degree(0), 2);
        assert_eq!(g.in_degree(3), 2);
        assert_eq!(g.degree(1), 2);
        let out_total: usize = (0..g.node_count()).map(|u| g.out_degree(u as NodeId)).sum();
        let in_total: usize = (0..g.node_count()).map(|u| g.in_degree(u as NodeId)).sum();
        assert_eq!(out_total, in_total);
    }

    #[test]
    fn set_edge_attr_is_visible_from_both_directions() {
        let mut g = diamond();
        g.set_edge_attr(0, 2, "new", true).unwrap();
        assert_eq!(g.edge_attr(0, 2), Some(&"new"));
        let via_in = g
            .in_edges(2)
            .find(|&(u, _)| u == 0)
            .map(|(_, a)| *a)
            .unwrap();
        assert_eq!(via_in, "new");
    }

    #[test]
    fn set_edge_attr_on_missing_edge_fails() {
        let mut g = diamond();
        assert_eq!(
            g.set_edge_attr(3, 0, "x", false),
            Err(GraphError::UnknownEdge {
                from: 3,
                target: 0
            })
        );
        // untouched
        assert_eq!(g.edge_attr(0, 1), Some(&"01"));
    }

    #[test]
    fn set_node_attr_returns_old_when_not_destroying() {
        let mut g = diamond();
        assert_eq!(g.set_node_attr(1, 99, false), Some(11));
        assert_eq!(g.set_node_attr(1, 100, true), None);
        assert_eq!(*g.node_attr(1), 100);
    }

    #[test]
    fn comparator_defaults_to_true() {
        let mut g = diamond();
        assert!(g.compatible_node(&1, &2));
        g.set_node_comparator(FnComparator::<u32>(|a, b| a == b));
        assert!(g.compatible_node(&5, &5));
        assert!(!g.compatible_node(&1, &2));
    }

    #[test]
    fn self_loops_are_representable() {
        let mut b = GraphBuilder::new();
        b.insert_node(()).unwrap();
        b.insert_edge(0, 0, ()).unwrap();
        let g = b.build().unwrap();
        assert!(g.has_edge(0, 0));
        assert_eq!(g.in_degree(0), 1);
        assert_eq!(g.out_degree(0), 1);
    }

    /// Loader that reports more nodes than `NodeId` can address.
    struct OverflowLoader;

    impl GraphLoader<(), ()> for OverflowLoader {
        fn node_count(&self) -> usize {
            NULL_NODE as usize
        }
        fn node_attr(&mut self, _node: NodeId) {
            unreachable!("rejected before any attribute is pulled")
        }
        fn out_edge_count(&self, _node: NodeId) -> usize {
            0
        }
        fn out_edge(&mut self, _node: NodeId, _i: usize) -> (NodeId, ()) {
            unreachable!()
        }
    }

    #[test]
    fn node_count_at_sentinel_is_rejected() {
        assert_eq!(
            Graph::from_loader(&mut OverflowLoader).map(|_| ()),
            Err(GraphError::LoaderOverflow(NULL_NODE as usize))
        );
    }

    /// Loader whose reported edges point outside the node range.
    struct StrayEdgeLoader;

    impl GraphLoader<(), ()> for StrayEdgeLoader {
        fn node_count(&self) -> usize {
            2
        }
        fn node_attr(&mut self, _node: NodeId) {}
        fn out_edge_count(&self, node: NodeId) -> usize {
            usize::from(node == 0)
        }
        fn out_edge(&mut self, _node: NodeId, _i: usize) -> (NodeId, ()) {
            (9, ())
        }
    }

    #[test]
    fn stray_edge_target_is_rejected() {
        assert!(matches!(
            Graph::from_loader(&mut StrayEdgeLoader).map(|_| ()),
            Err(GraphError::InconsistentGraph(_))
        ));
    }
}
