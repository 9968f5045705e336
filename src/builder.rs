//! In-memory graph assembly.
//!
//! [`GraphBuilder`] is the loader most callers reach for: push nodes and
//! edges in any order, then [`build`](GraphBuilder::build) the immutable
//! [`Graph`]. It is also the natural base when adapting a file format — parse
//! into a builder, then build.

use crate::error::GraphError;
use crate::graph::{Graph, NodeId, NULL_NODE};
use crate::loader::GraphLoader;

/// An edit buffer implementing [`GraphLoader`].
///
/// ```
/// use argmatch::GraphBuilder;
///
/// let mut b = GraphBuilder::new();
/// let a = b.insert_node("a").unwrap();
/// let c = b.insert_node("c").unwrap();
/// b.insert_edge(a, c, 7u32).unwrap();
/// let g = b.build().unwrap();
/// assert!(g.has_edge(a, c));
/// ```
#[derive(Debug)]
pub struct GraphBuilder<N, E> {
    nodes: Vec<Option<N>>,
    out: Vec<Vec<(NodeId, Option<E>)>>,
}

impl<N, E> Default for GraphBuilder<N, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E> GraphBuilder<N, E> {
    pub fn new() -> Self {
        GraphBuilder {
            nodes: Vec::new(),
            out: Vec::new(),
        }
    }

    /// Number of nodes inserted so far.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Append a node carrying `attr`, returning its id. Ids are assigned
    /// consecutively from zero.
    pub fn insert_node(&mut self, attr: N) -> Result<NodeId, GraphError> {
        let id = self.nodes.len();
        if id + 1 >= NULL_NODE as usize {
            return Err(GraphError::LoaderOverflow(id + 1));
        }
        self.nodes.push(Some(attr));
        self.out.push(Vec::new());
        Ok(id as NodeId)
    }

    /// Record a directed edge `source -> target` carrying `attr`. Both
    /// endpoints must already be inserted; a second edge between the same
    /// ordered pair is rejected.
    pub fn insert_edge(&mut self, source: NodeId, target: NodeId, attr: E) -> Result<(), GraphError> {
        let n = self.nodes.len();
        if source as usize >= n || target as usize >= n {
            return Err(GraphError::inconsistent(format!(
                "edge {source}->{target} references a node outside 0..{n}"
            )));
        }
        let list = &mut self.out[source as usize];
        if list.iter().any(|&(v, _)| v == target) {
            return Err(GraphError::inconsistent(format!(
                "duplicate edge {source}->{target}"
            )));
        }
        list.push((target, Some(attr)));
        Ok(())
    }

    /// Freeze the accumulated structure into a [`Graph`].
    pub fn build(mut self) -> Result<Graph<N, E>, GraphError> {
        Graph::from_loader(&mut self)
    }
}

impl<N, E> GraphLoader<N, E> for GraphBuilder<N, E> {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node_attr(&mut self, node: NodeId) -> N {
        self.nodes[node as usize]
            .take()
            .expect("node attribute requested twice")
    }

    fn out_edge_count(&self, node: NodeId) -> usize {
        self.out[node as usize].len()
    }

    fn out_edge(&mut self, node: NodeId, i: usize) -> (NodeId, E) {
        let (target, attr) = &mut self.out[node as usize][i];
        (
            *target,
            attr.take().expect("edge attribute requested twice"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_duplicate_edges() {
        let mut b = GraphBuilder::new();
        let u = b.insert_node(()).unwrap();
        let v = b.insert_node(()).unwrap();
        b.insert_edge(u, v, ()).unwrap();
        assert!(matches!(
            b.insert_edge(u, v, ()),
            Err(GraphError::InconsistentGraph(_))
        ));
    }

    #[test]
    fn rejects_unknown_endpoints() {
        let mut b = GraphBuilder::<(), ()>::new();
        let u = b.insert_node(()).unwrap();
        assert!(matches!(
            b.insert_edge(u, 5, ()),
            Err(GraphError::InconsistentGraph(_))
        ));
    }
}
