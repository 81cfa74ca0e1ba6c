/// NeighborGraph: connectivity between tree leaves.
///
/// Each graph node wraps one tree node (by identifier, with a copy of its
/// bounds). Adjacency is discovered by probing: from every node center a ray
/// is cast along the six axis directions, and any other node hit within half
/// an edge length (plus a small epsilon) becomes a neighbor. The probe reach
/// comes from the probing node's own size, so only face-touching cells of
/// equal size are connected reliably.
///
/// Every adjacency is stored as two directed edges (A→B and B→A).
/// The graph is not modified by searches.

use bitflags::bitflags;
use glam::Vec3;
use rustc_hash::FxHashMap;
use crate::error::{Error, Result};
use crate::spatial::{BoundingVolume, NodeId, Ray, TreeNode};
use crate::{nav_bail, nav_info};

const SOURCE: &str = "galaxy3d::NeighborGraph";

bitflags! {
    /// Faces of a cell on which a neighbor was discovered.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FaceFlags: u8 {
        /// +X face
        const POS_X = 1 << 0;
        /// -X face
        const NEG_X = 1 << 1;
        /// +Y face
        const POS_Y = 1 << 2;
        /// -Y face
        const NEG_Y = 1 << 3;
        /// +Z face
        const POS_Z = 1 << 4;
        /// -Z face
        const NEG_Z = 1 << 5;
    }
}

/// The six probe directions and the face each one leaves through.
const PROBE_DIRECTIONS: [(Vec3, FaceFlags); 6] = [
    (Vec3::X, FaceFlags::POS_X),
    (Vec3::NEG_X, FaceFlags::NEG_X),
    (Vec3::Y, FaceFlags::POS_Y),
    (Vec3::NEG_Y, FaceFlags::NEG_Y),
    (Vec3::Z, FaceFlags::POS_Z),
    (Vec3::NEG_Z, FaceFlags::NEG_Z),
];

/// Position of a node in the graph's node list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(usize);

impl NodeIndex {
    /// Position in `NeighborGraph::nodes()`
    pub fn index(self) -> usize {
        self.0
    }
}

/// Position of an edge in the graph's edge list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeIndex(usize);

impl EdgeIndex {
    /// Position in `NeighborGraph::edges()`
    pub fn index(self) -> usize {
        self.0
    }
}

/// Graph configuration
#[derive(Debug, Clone, Copy)]
pub struct GraphConfig {
    /// Slack added to the half edge length when probing for neighbors
    pub adjacency_epsilon: f32,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            adjacency_epsilon: 0.01,
        }
    }
}

/// A graph node wrapping one tree node.
#[derive(Debug, Clone)]
pub struct GraphNode {
    tree_node: NodeId,
    bounds: BoundingVolume,
    /// Outgoing edges
    edges: Vec<EdgeIndex>,
    /// Faces on which probing found a neighbor
    faces: FaceFlags,
}

impl GraphNode {
    /// Identifier of the wrapped tree node
    pub fn tree_node(&self) -> NodeId {
        self.tree_node
    }

    /// Bounds of the wrapped tree node
    pub fn bounds(&self) -> &BoundingVolume {
        &self.bounds
    }

    /// Center of the wrapped tree node
    pub fn center(&self) -> Vec3 {
        self.bounds.center
    }

    /// Outgoing edges, in creation order
    pub fn edges(&self) -> &[EdgeIndex] {
        &self.edges
    }

    /// Faces on which a neighbor was discovered
    pub fn faces(&self) -> FaceFlags {
        self.faces
    }
}

/// A directed edge between two graph nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphEdge {
    start: NodeIndex,
    end: NodeIndex,
}

impl GraphEdge {
    /// Source node
    pub fn start(&self) -> NodeIndex {
        self.start
    }

    /// Destination node
    pub fn end(&self) -> NodeIndex {
        self.end
    }
}

/// Adjacency graph over tree leaves.
#[derive(Debug, Clone, Default)]
pub struct NeighborGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    /// Tree node id → graph node
    node_lookup: FxHashMap<NodeId, NodeIndex>,
    /// (start, end) → directed edge
    edge_lookup: FxHashMap<(NodeIndex, NodeIndex), EdgeIndex>,
    config: GraphConfig,
}

impl NeighborGraph {
    /// Create an empty graph with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty graph.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `adjacency_epsilon` is negative or not finite.
    pub fn with_config(config: GraphConfig) -> Result<Self> {
        let epsilon = config.adjacency_epsilon;
        if !epsilon.is_finite() || epsilon < 0.0 {
            nav_bail!(Error::InvalidConfig, SOURCE,
                "adjacency_epsilon must be a finite value >= 0 (got {})", epsilon);
        }
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    /// Wrap every leaf as a node, then discover adjacency.
    pub fn from_leaves<'a, I>(leaves: I) -> Self
    where
        I: IntoIterator<Item = &'a TreeNode>,
    {
        let mut graph = Self::new();
        graph.extend_and_connect(leaves);
        graph
    }

    /// Same as [`NeighborGraph::from_leaves`] with a custom configuration.
    ///
    /// # Errors
    ///
    /// See [`NeighborGraph::with_config`].
    pub fn from_leaves_with_config<'a, I>(leaves: I, config: GraphConfig) -> Result<Self>
    where
        I: IntoIterator<Item = &'a TreeNode>,
    {
        let mut graph = Self::with_config(config)?;
        graph.extend_and_connect(leaves);
        Ok(graph)
    }

    fn extend_and_connect<'a, I>(&mut self, leaves: I)
    where
        I: IntoIterator<Item = &'a TreeNode>,
    {
        for leaf in leaves {
            self.add_tree_node(leaf);
        }
        self.connect_neighbors();
    }

    /// Add a node for a tree node. Idempotent per identifier.
    pub fn add_tree_node(&mut self, tree_node: &TreeNode) -> NodeIndex {
        self.add_node(tree_node.id(), *tree_node.bounds())
    }

    /// Add a node for a tree-node identifier and its bounds.
    ///
    /// If a node already wraps `id`, it is returned unchanged.
    pub fn add_node(&mut self, id: NodeId, bounds: BoundingVolume) -> NodeIndex {
        if let Some(&index) = self.node_lookup.get(&id) {
            return index;
        }

        let index = NodeIndex(self.nodes.len());
        self.nodes.push(GraphNode {
            tree_node: id,
            bounds,
            edges: Vec::new(),
            faces: FaceFlags::empty(),
        });
        self.node_lookup.insert(id, index);
        index
    }

    /// Connect two nodes with a forward edge and its mirror.
    ///
    /// Only the forward direction is checked: if `from → to` already exists
    /// nothing is added. Returns whether edges were created; unknown ids and
    /// self-loops create nothing.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> bool {
        match (self.node_index(from), self.node_index(to)) {
            (Some(from), Some(to)) => self.link(from, to),
            _ => false,
        }
    }

    fn link(&mut self, from: NodeIndex, to: NodeIndex) -> bool {
        if from == to || self.edge_lookup.contains_key(&(from, to)) {
            return false;
        }

        let forward = EdgeIndex(self.edges.len());
        self.edges.push(GraphEdge { start: from, end: to });
        self.nodes[from.0].edges.push(forward);
        self.edge_lookup.insert((from, to), forward);

        let mirror = EdgeIndex(self.edges.len());
        self.edges.push(GraphEdge { start: to, end: from });
        self.nodes[to.0].edges.push(mirror);
        self.edge_lookup.insert((to, from), mirror);

        true
    }

    /// Discover face adjacency between every ordered pair of nodes.
    ///
    /// Runs in O(n² · 6). Returns the number of directed edges created.
    pub fn connect_neighbors(&mut self) -> usize {
        let before = self.edges.len();
        let epsilon = self.config.adjacency_epsilon;

        for i in 0..self.nodes.len() {
            let origin = self.nodes[i].bounds.center;
            let reach = self.nodes[i].bounds.edge_length() * 0.5 + epsilon;

            for j in 0..self.nodes.len() {
                if i == j {
                    continue;
                }
                let target = self.nodes[j].bounds;

                for (direction, face) in PROBE_DIRECTIONS {
                    let hit = target.intersect_ray(&Ray::new(origin, direction));
                    if matches!(hit, Some(distance) if distance <= reach) {
                        self.nodes[i].faces |= face;
                        self.link(NodeIndex(i), NodeIndex(j));
                    }
                }
            }
        }

        let created = self.edges.len() - before;
        nav_info!(SOURCE,
            "Connected {} nodes: {} new directed edges ({} total)",
            self.nodes.len(), created, self.edges.len());
        created
    }

    // ===== LOOKUPS =====

    /// Graph node wrapping a tree-node identifier
    pub fn find_node(&self, id: NodeId) -> Option<&GraphNode> {
        self.node_index(id).map(|index| &self.nodes[index.0])
    }

    /// Index of the graph node wrapping a tree-node identifier
    pub fn node_index(&self, id: NodeId) -> Option<NodeIndex> {
        self.node_lookup.get(&id).copied()
    }

    /// Directed edge from one tree-node identifier to another
    pub fn find_edge(&self, from: NodeId, to: NodeId) -> Option<&GraphEdge> {
        let key = (self.node_index(from)?, self.node_index(to)?);
        self.edge_lookup.get(&key).map(|edge| &self.edges[edge.0])
    }

    /// Node by index
    pub fn node(&self, index: NodeIndex) -> Option<&GraphNode> {
        self.nodes.get(index.0)
    }

    /// Edge by index
    pub fn edge(&self, index: EdgeIndex) -> Option<&GraphEdge> {
        self.edges.get(index.0)
    }

    /// All nodes, in insertion order
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// All directed edges, in creation order
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of directed edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Configuration used for neighbor probing
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Destinations of a node's outgoing edges.
    pub fn neighbors(&self, index: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.nodes
            .get(index.0)
            .into_iter()
            .flat_map(|node| node.edges.iter())
            .map(move |edge| self.edges[edge.0].end)
    }

    /// Center-to-center segment of every directed edge, for external debug drawing.
    pub fn edge_segments(&self) -> Vec<(Vec3, Vec3)> {
        self.edges
            .iter()
            .map(|edge| (self.nodes[edge.start.0].center(), self.nodes[edge.end.0].center()))
            .collect()
    }
}

#[cfg(test)]
#[path = "neighbor_graph_tests.rs"]
mod tests;
