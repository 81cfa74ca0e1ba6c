//! Tests for NeighborGraph
//!
//! These tests validate node/edge bookkeeping, adjacency discovery by
//! probing, and the symmetry of the resulting graph.

use glam::Vec3;
use crate::error::Error;
use crate::spatial::{BoundingVolume, SpatialTree};
use super::*;

fn cell(x: f32, y: f32, z: f32) -> BoundingVolume {
    BoundingVolume::cube(Vec3::new(x, y, z) * 2.0, 2.0)
}

/// n×n×n block of touching 2-unit cells; id = x + n*y + n*n*z.
fn grid_graph(n: u32) -> NeighborGraph {
    let mut graph = NeighborGraph::new();
    for z in 0..n {
        for y in 0..n {
            for x in 0..n {
                let id = NodeId::new(x + n * y + n * n * z);
                graph.add_node(id, cell(x as f32, y as f32, z as f32));
            }
        }
    }
    graph.connect_neighbors();
    graph
}

fn degree(graph: &NeighborGraph, raw: u32) -> usize {
    graph.find_node(NodeId::new(raw)).unwrap().edges().len()
}

fn assert_symmetric(graph: &NeighborGraph) {
    for edge in graph.edges() {
        let a = graph.node(edge.start()).unwrap().tree_node();
        let b = graph.node(edge.end()).unwrap().tree_node();
        assert!(graph.find_edge(b, a).is_some(), "missing mirror of {} -> {}", a, b);
    }
}

// ============================================================================
// Tests: Nodes
// ============================================================================

#[test]
fn test_add_node_is_idempotent() {
    let mut graph = NeighborGraph::new();
    let first = graph.add_node(NodeId::new(7), cell(0.0, 0.0, 0.0));
    let second = graph.add_node(NodeId::new(7), cell(5.0, 0.0, 0.0));

    assert_eq!(first, second);
    assert_eq!(graph.node_count(), 1);
    // The first bounds are kept
    assert_eq!(graph.find_node(NodeId::new(7)).unwrap().center(), Vec3::ZERO);
}

#[test]
fn test_find_node_unknown_is_none() {
    let graph = grid_graph(2);
    assert!(graph.find_node(NodeId::new(99)).is_none());
    assert!(graph.node_index(NodeId::new(99)).is_none());
}

// ============================================================================
// Tests: Edges
// ============================================================================

#[test]
fn test_add_edge_creates_forward_and_mirror() {
    let mut graph = NeighborGraph::new();
    let a = NodeId::new(1);
    let b = NodeId::new(2);
    graph.add_node(a, cell(0.0, 0.0, 0.0));
    graph.add_node(b, cell(1.0, 0.0, 0.0));

    assert!(graph.add_edge(a, b));
    assert_eq!(graph.edge_count(), 2);

    let forward = graph.find_edge(a, b).unwrap();
    let mirror = graph.find_edge(b, a).unwrap();
    assert_eq!(forward.start(), mirror.end());
    assert_eq!(forward.end(), mirror.start());
    assert_eq!(degree(&graph, 1), 1);
    assert_eq!(degree(&graph, 2), 1);
}

#[test]
fn test_add_edge_twice_adds_nothing() {
    let mut graph = NeighborGraph::new();
    let a = NodeId::new(1);
    let b = NodeId::new(2);
    graph.add_node(a, cell(0.0, 0.0, 0.0));
    graph.add_node(b, cell(1.0, 0.0, 0.0));

    assert!(graph.add_edge(a, b));
    assert!(!graph.add_edge(a, b));
    assert_eq!(graph.edge_count(), 2);

    // The reverse direction already exists as the mirror
    assert!(!graph.add_edge(b, a));
    assert_eq!(graph.edge_count(), 2);
}

#[test]
fn test_add_edge_with_unknown_node_is_ignored() {
    let mut graph = NeighborGraph::new();
    graph.add_node(NodeId::new(1), cell(0.0, 0.0, 0.0));

    assert!(!graph.add_edge(NodeId::new(1), NodeId::new(2)));
    assert!(!graph.add_edge(NodeId::new(3), NodeId::new(1)));
    assert_eq!(graph.edge_count(), 0);
    assert!(graph.find_edge(NodeId::new(1), NodeId::new(2)).is_none());
}

#[test]
fn test_add_edge_rejects_self_loop() {
    let mut graph = NeighborGraph::new();
    graph.add_node(NodeId::new(1), cell(0.0, 0.0, 0.0));
    assert!(!graph.add_edge(NodeId::new(1), NodeId::new(1)));
    assert_eq!(graph.edge_count(), 0);
}

// ============================================================================
// Tests: Neighbor discovery
// ============================================================================

#[test]
fn test_two_by_two_grid_every_cell_has_three_neighbors() {
    let graph = grid_graph(2);
    assert_eq!(graph.node_count(), 8);
    for raw in 0..8 {
        assert_eq!(degree(&graph, raw), 3, "node {}", raw);
        assert_eq!(graph.find_node(NodeId::new(raw)).unwrap().faces().bits().count_ones(), 3);
    }
    assert_eq!(graph.edge_count(), 24);
    assert_symmetric(&graph);
}

#[test]
fn test_two_by_two_grid_faces_point_inward() {
    let graph = grid_graph(2);
    // Node 0 sits at the low corner: neighbors are on its +X, +Y, +Z faces
    assert_eq!(
        graph.find_node(NodeId::new(0)).unwrap().faces(),
        FaceFlags::POS_X | FaceFlags::POS_Y | FaceFlags::POS_Z,
    );
    // Node 7 sits at the high corner
    assert_eq!(
        graph.find_node(NodeId::new(7)).unwrap().faces(),
        FaceFlags::NEG_X | FaceFlags::NEG_Y | FaceFlags::NEG_Z,
    );
}

#[test]
fn test_three_by_three_grid_degrees() {
    let graph = grid_graph(3);
    assert_eq!(degree(&graph, 0), 3); // corner
    assert_eq!(degree(&graph, 1), 4); // edge
    assert_eq!(degree(&graph, 4), 5); // face center
    assert_eq!(degree(&graph, 13), 6); // interior
    assert_eq!(graph.find_node(NodeId::new(13)).unwrap().faces(), FaceFlags::all());
    assert_symmetric(&graph);
}

#[test]
fn test_only_immediate_neighbors_connect() {
    let mut graph = NeighborGraph::new();
    let (a, b, c) = (NodeId::new(0), NodeId::new(1), NodeId::new(2));
    graph.add_node(a, cell(0.0, 0.0, 0.0));
    graph.add_node(b, cell(1.0, 0.0, 0.0));
    graph.add_node(c, cell(2.0, 0.0, 0.0));

    assert_eq!(graph.connect_neighbors(), 4);
    assert!(graph.find_edge(a, b).is_some());
    assert!(graph.find_edge(b, c).is_some());
    assert!(graph.find_edge(a, c).is_none());
    assert!(graph.find_edge(c, a).is_none());
}

#[test]
fn test_connect_neighbors_twice_is_stable() {
    let mut graph = grid_graph(2);
    assert_eq!(graph.connect_neighbors(), 0);
    assert_eq!(graph.edge_count(), 24);
}

#[test]
fn test_adjacency_epsilon_bridges_small_gaps() {
    let a = BoundingVolume::cube(Vec3::ZERO, 2.0);
    let b = BoundingVolume::cube(Vec3::new(2.005, 0.0, 0.0), 2.0);

    let mut loose = NeighborGraph::new();
    loose.add_node(NodeId::new(0), a);
    loose.add_node(NodeId::new(1), b);
    loose.connect_neighbors();
    assert_eq!(loose.edge_count(), 2);

    let mut strict = NeighborGraph::with_config(GraphConfig { adjacency_epsilon: 0.0 }).unwrap();
    strict.add_node(NodeId::new(0), a);
    strict.add_node(NodeId::new(1), b);
    strict.connect_neighbors();
    assert_eq!(strict.edge_count(), 0);
}

#[test]
fn test_with_config_rejects_bad_epsilon() {
    for epsilon in [-0.5, f32::NAN] {
        let result = NeighborGraph::with_config(GraphConfig { adjacency_epsilon: epsilon });
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }
}

// ============================================================================
// Tests: Built from a spatial tree
// ============================================================================

#[test]
fn test_from_leaves_of_filled_tree() {
    let mut tree = SpatialTree::new(BoundingVolume::cube(Vec3::ZERO, 4.0), 2.0).unwrap();
    tree.insert(BoundingVolume::cube(Vec3::ZERO, 4.0), ());

    let graph = NeighborGraph::from_leaves(tree.leaves());
    assert_eq!(graph.node_count(), 8);
    assert_eq!(graph.edge_count(), 24);
    for leaf in tree.leaves() {
        assert_eq!(graph.find_node(leaf.id()).unwrap().edges().len(), 3);
    }
}

#[test]
fn test_from_leaves_with_config_uses_config() {
    let mut tree = SpatialTree::new(BoundingVolume::cube(Vec3::ZERO, 4.0), 2.0).unwrap();
    tree.insert(BoundingVolume::cube(Vec3::ZERO, 4.0), ());

    let config = GraphConfig { adjacency_epsilon: 0.1 };
    let graph = NeighborGraph::from_leaves_with_config(tree.leaves(), config).unwrap();
    assert_eq!(graph.config().adjacency_epsilon, 0.1);
    assert_eq!(graph.edge_count(), 24);
}

#[test]
fn test_neighbors_and_segments() {
    let graph = grid_graph(2);
    let origin = graph.node_index(NodeId::new(0)).unwrap();

    let mut neighbor_ids: Vec<u32> = graph
        .neighbors(origin)
        .map(|n| graph.node(n).unwrap().tree_node().raw())
        .collect();
    neighbor_ids.sort_unstable();
    assert_eq!(neighbor_ids, vec![1, 2, 4]);

    let segments = graph.edge_segments();
    assert_eq!(segments.len(), graph.edge_count());
    for (start, end) in segments {
        assert!((start.distance(end) - 2.0).abs() < 1e-5);
    }
}
