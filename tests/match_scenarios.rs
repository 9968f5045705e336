//! End-to-end match-count scenarios over small hand-built graphs.

use rstest::rstest;

use argmatch::{Config, FnComparator, Graph, GraphBuilder, MatchMode, Matcher};

fn graph(nodes: u16, edges: &[(u16, u16)]) -> Graph<(), ()> {
    let mut b = GraphBuilder::new();
    for _ in 0..nodes {
        b.insert_node(()).unwrap();
    }
    for &(u, v) in edges {
        b.insert_edge(u, v, ()).unwrap();
    }
    b.build().unwrap()
}

const TRIANGLE: &[(u16, u16)] = &[(0, 1), (1, 2), (2, 0)];
const SQUARE: &[(u16, u16)] = &[(0, 1), (1, 2), (2, 3), (3, 0)];
const PATH3: &[(u16, u16)] = &[(0, 1), (1, 2)];

#[rstest]
#[case::triangle_rotations(3, TRIANGLE, 3, TRIANGLE, MatchMode::Isomorphism, 3)]
#[case::square_rotations(4, SQUARE, 4, SQUARE, MatchMode::Isomorphism, 4)]
#[case::path_identity_only(3, PATH3, 3, PATH3, MatchMode::Isomorphism, 1)]
#[case::size_mismatch_is_dead(3, TRIANGLE, 4, SQUARE, MatchMode::Isomorphism, 0)]
#[case::disjoint_edge_pairs_swap(4, &[(0, 1), (2, 3)], 4, &[(0, 1), (2, 3)], MatchMode::Isomorphism, 2)]
#[case::edge_into_triangle(2, &[(0, 1)], 3, TRIANGLE, MatchMode::Subgraph, 3)]
#[case::edge_into_path(2, &[(0, 1)], 3, PATH3, MatchMode::Subgraph, 2)]
#[case::path_not_induced_in_triangle(3, PATH3, 3, TRIANGLE, MatchMode::Subgraph, 0)]
#[case::triangle_not_in_square(3, TRIANGLE, 4, SQUARE, MatchMode::Subgraph, 0)]
fn match_counts(
    #[case] n1: u16,
    #[case] e1: &[(u16, u16)],
    #[case] n2: u16,
    #[case] e2: &[(u16, u16)],
    #[case] mode: MatchMode,
    #[case] expected: usize,
) {
    let g1 = graph(n1, e1);
    let g2 = graph(n2, e2);
    let config = Config::new(mode);
    let found = Matcher::new(&g1, &g2, &config).enumerate_all();
    assert_eq!(
        found.len(),
        expected,
        "expected {expected} matchings, got {}",
        found.len()
    );
}

/// Every reported matching must be a genuine edge-preserving injection.
#[test]
fn matchings_preserve_structure() {
    let g1 = graph(4, SQUARE);
    let g2 = graph(4, SQUARE);
    let config = Config::isomorphism();
    let found = Matcher::new(&g1, &g2, &config).enumerate_all();
    for m in found.iter() {
        for &(u, v) in SQUARE {
            let mu = m.image_of(u).unwrap();
            let mv = m.image_of(v).unwrap();
            assert!(g2.has_edge(mu, mv));
        }
    }
}

fn labeled_path(labels: &[char]) -> Graph<char, ()> {
    let mut b = GraphBuilder::new();
    for &l in labels {
        b.insert_node(l).unwrap();
    }
    for u in 0..labels.len() as u16 - 1 {
        b.insert_edge(u, u + 1, ()).unwrap();
    }
    b.build().unwrap()
}

#[test]
fn node_attribute_mismatch_yields_no_matches() {
    let mut g1 = labeled_path(&['X', 'Y', 'Z']);
    let g2 = labeled_path(&['X', 'W', 'Z']);
    g1.set_node_comparator(FnComparator::<char>(|a, b| a == b));
    let config = Config::isomorphism();
    assert!(Matcher::new(&g1, &g2, &config).enumerate_all().is_empty());
}

#[test]
fn absent_comparator_ignores_attributes() {
    let g1 = labeled_path(&['X', 'Y', 'Z']);
    let g2 = labeled_path(&['X', 'W', 'Z']);
    let config = Config::isomorphism();
    assert_eq!(Matcher::new(&g1, &g2, &config).enumerate_all().len(), 1);
}

fn edge_labeled_triangle(labels: [u8; 3]) -> Graph<(), u8> {
    let mut b = GraphBuilder::new();
    for _ in 0..3 {
        b.insert_node(()).unwrap();
    }
    b.insert_edge(0, 1, labels[0]).unwrap();
    b.insert_edge(1, 2, labels[1]).unwrap();
    b.insert_edge(2, 0, labels[2]).unwrap();
    b.build().unwrap()
}

#[test]
fn edge_comparator_prunes_rotations() {
    let mut g1 = edge_labeled_triangle([1, 2, 3]);
    let g2 = edge_labeled_triangle([1, 2, 3]);
    let config = Config::isomorphism();
    assert_eq!(Matcher::new(&g1, &g2, &config).enumerate_all().len(), 3);

    g1.set_edge_comparator(FnComparator::<u8>(|a, b| a == b));
    // Only the rotation that aligns the labels survives.
    assert_eq!(Matcher::new(&g1, &g2, &config).enumerate_all().len(), 1);
}
