//! Navigation graph module
//!
//! Provides the adjacency graph built from spatial tree leaves and the
//! best-first path search that runs over it.

mod neighbor_graph;
mod path_finder;

pub use neighbor_graph::{
    EdgeIndex, FaceFlags, GraphConfig, GraphEdge, GraphNode, NeighborGraph, NodeIndex,
};
pub use path_finder::{OpenSelection, Path, PathFinder, SearchConfig};
