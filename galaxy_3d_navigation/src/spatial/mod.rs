//! Spatial partitioning module
//!
//! Provides the bounding volume math and the octree that buckets blocking
//! objects into leaf cells.

mod bounds;
mod spatial_tree;

pub use bounds::{BoundingVolume, Ray};
pub use spatial_tree::{
    DebugCell, NodeId, ObjectKey, SceneObject, SpatialTree, TreeConfig, TreeNode, TreeNodeKey,
};
