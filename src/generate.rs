//! Seeded generation of isomorphic graph pairs.
//!
//! Useful for exercising the matcher: the second graph is a node-relabeling
//! of the first, so a full-isomorphism search over the pair always succeeds.
//! Generation is deterministic for a given seed.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

use crate::builder::GraphBuilder;
use crate::graph::{Graph, NodeId};

/// Generate a pair of isomorphic attribute-free graphs with `nodes` nodes
/// and `edges` distinct directed edges (no self-loops).
///
/// With `connected` the first `nodes - 1` edges form a random spanning tree
/// over the undirected skeleton, so both graphs are weakly connected; this
/// requires `edges >= nodes - 1`. Panics when the requested edge count does
/// not fit the node count.
pub fn isomorphic_pair(
    nodes: u16,
    edges: usize,
    connected: bool,
    seed: u64,
) -> (Graph<(), ()>, Graph<(), ()>) {
    let n = nodes as usize;
    assert!(
        edges <= n.saturating_mul(n.saturating_sub(1)),
        "{edges} edges do not fit in a simple digraph of {n} nodes"
    );
    assert!(
        !connected || edges + 1 >= n,
        "a weakly connected graph of {n} nodes needs at least {} edges",
        n - 1
    );

    let mut rng = Pcg64Mcg::seed_from_u64(seed);
    let mut chosen: HashSet<(NodeId, NodeId)> = HashSet::with_capacity(edges);

    if connected {
        // Random spanning tree over shuffled nodes, each tree edge in a
        // random orientation.
        let mut order: Vec<NodeId> = (0..nodes).collect();
        order.shuffle(&mut rng);
        for i in 1..n {
            let a = order[i];
            let b = order[rng.gen_range(0..i)];
            let pair = if rng.gen_bool(0.5) { (a, b) } else { (b, a) };
            chosen.insert(pair);
        }
    }

    while chosen.len() < edges {
        let u = rng.gen_range(0..nodes);
        let v = rng.gen_range(0..nodes);
        if u != v {
            chosen.insert((u, v));
        }
    }

    let mut permutation: Vec<NodeId> = (0..nodes).collect();
    permutation.shuffle(&mut rng);

    let mut edge_list: Vec<(NodeId, NodeId)> = chosen.into_iter().collect();
    edge_list.sort_unstable();

    let g1 = build(nodes, edge_list.iter().copied());
    let g2 = build(
        nodes,
        edge_list
            .iter()
            .map(|&(u, v)| (permutation[u as usize], permutation[v as usize])),
    );
    (g1, g2)
}

fn build(nodes: u16, edges: impl Iterator<Item = (NodeId, NodeId)>) -> Graph<(), ()> {
    let mut b = GraphBuilder::new();
    for _ in 0..nodes {
        b.insert_node(()).expect("node count below the id limit");
    }
    for (u, v) in edges {
        b.insert_edge(u, v, ()).expect("generator emits simple edges");
    }
    b.build().expect("generator emits a consistent graph")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::matcher::Matcher;

    #[test]
    fn pair_has_requested_shape() {
        let (g1, g2) = isomorphic_pair(7, 12, true, 41);
        assert_eq!(g1.node_count(), 7);
        assert_eq!(g2.node_count(), 7);
        assert_eq!(g1.edge_count(), 12);
        assert_eq!(g2.edge_count(), 12);
    }

    #[test]
    fn same_seed_reproduces_the_pair() {
        let (a1, a2) = isomorphic_pair(6, 9, true, 7);
        let (b1, b2) = isomorphic_pair(6, 9, true, 7);
        for u in 0..6 {
            let edges = |g: &Graph<(), ()>, u: NodeId| -> Vec<NodeId> {
                g.out_edges(u).map(|(v, _)| v).collect()
            };
            assert_eq!(edges(&a1, u), edges(&b1, u));
            assert_eq!(edges(&a2, u), edges(&b2, u));
        }
    }

    #[test]
    fn generated_pair_is_isomorphic() {
        let (g1, g2) = isomorphic_pair(6, 8, true, 1234);
        let config = Config::isomorphism().with_limit(1);
        let found = Matcher::new(&g1, &g2, &config).enumerate_all();
        assert!(!found.is_empty());
    }
}
