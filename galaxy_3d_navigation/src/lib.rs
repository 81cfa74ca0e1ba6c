/*!
# Galaxy 3D Navigation

Scene navigation core for the Galaxy 3D engine.

Static blocking geometry is bucketed into an octree, the octree leaves are
turned into an adjacency graph, and a best-first search finds routes
through that graph.

## Architecture

- **SpatialTree**: octree over a cubic region, refined by object insertion
- **NeighborGraph**: leaves as nodes, face adjacency discovered by ray probing
- **PathFinder**: best-first search with squared-distance costs
- **Engine**: pluggable logger shared by all of the above

## Data flow

```no_run
use galaxy_3d_navigation::galaxy3d::spatial::{BoundingVolume, SpatialTree};
use galaxy_3d_navigation::galaxy3d::graph::{NeighborGraph, PathFinder};
use galaxy_3d_navigation::glam::Vec3;

let mut tree = SpatialTree::new(BoundingVolume::cube(Vec3::ZERO, 8.0), 2.0)?;
tree.insert(
    BoundingVolume::from_min_max(Vec3::new(-0.5, -4.0, -4.0), Vec3::new(0.5, 1.5, 4.0)),
    "wall",
);

// Free minimum-size cells become graph nodes
let graph = NeighborGraph::from_leaves(tree.navigable_leaves());
let start = tree.leaf_at(Vec3::new(-3.0, -3.0, -3.0)).unwrap().id();
let goal = tree.leaf_at(Vec3::new(3.0, -3.0, -3.0)).unwrap().id();
let path = PathFinder::new().find_path(&graph, start, goal);
# Ok::<(), galaxy_3d_navigation::galaxy3d::Error>(())
```
*/

// Internal modules
mod error;
mod engine;
mod utils;
pub mod log;
pub mod spatial;
pub mod graph;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Logger access
    pub use crate::engine::Engine;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Spatial partitioning sub-module
    pub mod spatial {
        pub use crate::spatial::*;
    }

    // Graph and search sub-module
    pub mod graph {
        pub use crate::graph::*;
    }
}

// Re-export math library at crate root
pub use glam;
