/// PathFinder: best-first search over a NeighborGraph.
///
/// Costs are squared Euclidean distances between node centers: each edge
/// costs the squared distance between its endpoints, and the heuristic is
/// the squared distance to the goal. This is cheap but not admissible, so
/// the returned path is not guaranteed to be the cheapest one.
///
/// All per-search bookkeeping (g, h, predecessor, open/closed) lives in a
/// side table owned by the call. The graph is only read, so one graph can
/// serve any number of concurrent searches.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use glam::Vec3;
use crate::spatial::NodeId;
use crate::{nav_debug, nav_warn};
use super::neighbor_graph::{NeighborGraph, NodeIndex};

const SOURCE: &str = "galaxy3d::PathFinder";

/// How the next node is taken from the open collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenSelection {
    /// Lowest total cost `f = g + h`; ties go to the earliest queued entry
    #[default]
    LowestCost,
    /// Oldest open node first, ignoring costs
    Fifo,
}

/// Search configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchConfig {
    /// Open-node selection strategy
    pub selection: OpenSelection,
}

/// Ordered node sequence from start to goal, both included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    nodes: Vec<NodeId>,
}

impl Path {
    /// Node identifiers from start to goal
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Number of nodes (at least 1)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a found path holds at least the start node
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First node
    pub fn start(&self) -> NodeId {
        self.nodes[0]
    }

    /// Last node
    pub fn goal(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }

    /// World-space centers along the path.
    ///
    /// Nodes missing from `graph` are skipped.
    pub fn waypoints(&self, graph: &NeighborGraph) -> Vec<Vec3> {
        self.nodes
            .iter()
            .filter_map(|&id| graph.find_node(id))
            .map(|node| node.center())
            .collect()
    }

    /// Take the identifiers out
    pub fn into_nodes(self) -> Vec<NodeId> {
        self.nodes
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unseen,
    Open,
    Closed,
}

/// Scratch cost record for one node during one search.
#[derive(Debug, Clone, Copy)]
struct NodeCost {
    g: f32,
    h: f32,
    predecessor: Option<NodeIndex>,
    visit: Visit,
}

impl NodeCost {
    const UNSEEN: NodeCost = NodeCost {
        g: 0.0,
        h: 0.0,
        predecessor: None,
        visit: Visit::Unseen,
    };

    fn f(&self) -> f32 {
        self.g + self.h
    }
}

/// Heap entry; entries whose `f` no longer matches the node's cost are stale.
#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    f: f32,
    sequence: u64,
    node: NodeIndex,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap: lowest f first, then earliest sequence
        other.f.total_cmp(&self.f)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// The open collection, in either selection mode.
enum OpenSet {
    Heap {
        heap: BinaryHeap<OpenEntry>,
        next_sequence: u64,
    },
    Fifo(VecDeque<NodeIndex>),
}

impl OpenSet {
    fn new(selection: OpenSelection) -> Self {
        match selection {
            OpenSelection::LowestCost => OpenSet::Heap {
                heap: BinaryHeap::new(),
                next_sequence: 0,
            },
            OpenSelection::Fifo => OpenSet::Fifo(VecDeque::new()),
        }
    }

    /// Queue a node that just entered the open collection.
    fn push(&mut self, node: NodeIndex, f: f32) {
        match self {
            OpenSet::Heap { heap, next_sequence } => {
                heap.push(OpenEntry { f, sequence: *next_sequence, node });
                *next_sequence += 1;
            }
            OpenSet::Fifo(queue) => queue.push_back(node),
        }
    }

    /// Record a new cost for a node that is already open.
    fn reprioritize(&mut self, node: NodeIndex, f: f32) {
        // A FIFO entry keeps its queue position
        if matches!(self, OpenSet::Heap { .. }) {
            self.push(node, f);
        }
    }

    fn pop(&mut self, costs: &[NodeCost]) -> Option<NodeIndex> {
        match self {
            OpenSet::Heap { heap, .. } => {
                while let Some(entry) = heap.pop() {
                    let cost = &costs[entry.node.index()];
                    if cost.visit == Visit::Open && cost.f().to_bits() == entry.f.to_bits() {
                        return Some(entry.node);
                    }
                }
                None
            }
            OpenSet::Fifo(queue) => queue.pop_front(),
        }
    }
}

/// Best-first path search over a NeighborGraph.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathFinder {
    config: SearchConfig,
}

impl PathFinder {
    /// Create a path finder with lowest-cost selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a path finder with a custom configuration.
    pub fn with_config(config: SearchConfig) -> Self {
        Self { config }
    }

    /// Search configuration
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Find a path between two tree-node identifiers.
    ///
    /// Returns `None` when either identifier is not in the graph or when the
    /// goal cannot be reached. When `start == goal` the path is `[start]`.
    pub fn find_path(&self, graph: &NeighborGraph, start: NodeId, goal: NodeId) -> Option<Path> {
        let (start_index, goal_index) = match (graph.node_index(start), graph.node_index(goal)) {
            (Some(s), Some(g)) => (s, g),
            _ => {
                nav_warn!(SOURCE, "Unknown endpoint in path request {} -> {}", start, goal);
                return None;
            }
        };

        if start_index == goal_index {
            return Some(Path { nodes: vec![start] });
        }

        let nodes = graph.nodes();
        let edges = graph.edges();
        let goal_center = nodes[goal_index.index()].center();

        let mut costs = vec![NodeCost::UNSEEN; nodes.len()];
        let mut open = OpenSet::new(self.config.selection);

        costs[start_index.index()] = NodeCost {
            g: 0.0,
            h: nodes[start_index.index()].center().distance_squared(goal_center),
            predecessor: None,
            visit: Visit::Open,
        };
        open.push(start_index, costs[start_index.index()].f());

        let mut expanded = 0usize;
        while let Some(current) = open.pop(&costs) {
            if current == goal_index {
                let path = Self::reconstruct(graph, &costs, start_index, goal_index);
                nav_debug!(SOURCE,
                    "Path {} -> {} found: {} nodes, {} expanded",
                    start, goal, path.len(), expanded);
                return Some(path);
            }

            costs[current.index()].visit = Visit::Closed;
            expanded += 1;

            let current_node = &nodes[current.index()];
            let current_g = costs[current.index()].g;

            for edge in current_node.edges() {
                let next = edges[edge.index()].end();
                let next_center = nodes[next.index()].center();
                let tentative = current_g + current_node.center().distance_squared(next_center);

                let previous = costs[next.index()];
                let accept = match previous.visit {
                    Visit::Closed => false,
                    Visit::Unseen => true,
                    Visit::Open => tentative <= previous.g,
                };
                if !accept {
                    continue;
                }

                let cost = NodeCost {
                    g: tentative,
                    h: next_center.distance_squared(goal_center),
                    predecessor: Some(current),
                    visit: Visit::Open,
                };
                costs[next.index()] = cost;

                if previous.visit == Visit::Unseen {
                    open.push(next, cost.f());
                } else {
                    open.reprioritize(next, cost.f());
                }
            }
        }

        nav_debug!(SOURCE, "No path {} -> {} ({} nodes expanded)", start, goal, expanded);
        None
    }

    /// Walk predecessors back from the goal.
    fn reconstruct(
        graph: &NeighborGraph,
        costs: &[NodeCost],
        start: NodeIndex,
        goal: NodeIndex,
    ) -> Path {
        let id_of = |index: NodeIndex| graph.nodes()[index.index()].tree_node();

        let mut nodes = vec![id_of(goal)];
        let mut current = costs[goal.index()].predecessor;
        while let Some(index) = current {
            if index == start {
                break;
            }
            nodes.push(id_of(index));
            current = costs[index.index()].predecessor;
        }
        nodes.push(id_of(start));
        nodes.reverse();

        Path { nodes }
    }
}

#[cfg(test)]
#[path = "path_finder_tests.rs"]
mod tests;
