/// SpatialTree: octree that buckets blocking objects into leaf cells.
///
/// The tree starts as a single cubic root cell and is refined lazily while
/// objects are inserted: every cell larger than `min_cell_size` that an
/// object touches is split into 8 octants, down to the minimum size. An
/// object is stored in *every* terminal cell it intersects, so no cell that
/// touches a blocking surface is ever reported as free.
///
/// Nodes live in a slot map arena. Parents own their children through the
/// arena keys; children keep a non-owning key back to their parent.
/// Node identifiers come from a sequence owned by the tree.

use std::fmt;
use glam::Vec3;
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use crate::error::{Error, Result};
use crate::utils::NodeIdSequence;
use crate::{nav_bail, nav_debug, nav_warn};
use super::bounds::BoundingVolume;

const SOURCE: &str = "galaxy3d::SpatialTree";

new_key_type! {
    /// Arena key of a node inside one SpatialTree.
    pub struct TreeNodeKey;

    /// Stable key for an object inserted into a SpatialTree.
    pub struct ObjectKey;
}

/// Identifier of a tree node, unique within the tree that created it.
///
/// Graph nodes refer to tree nodes through this identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Wrap a raw identifier value.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw identifier value
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for NodeId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Spatial tree configuration
#[derive(Debug, Clone, Copy)]
pub struct TreeConfig {
    /// Cells whose edge length is at or below this size are never split
    pub min_cell_size: f32,
    /// Upper bound on the subdivision depth implied by region / min_cell_size
    pub max_depth: u32,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            min_cell_size: 1.0,
            max_depth: 16,
        }
    }
}

/// A blocking object stored in the tree.
#[derive(Debug, Clone)]
pub struct SceneObject<T> {
    /// World-space bounds of the object
    pub bounds: BoundingVolume,
    /// Caller data attached to the object (entity handle, name, ...)
    pub payload: T,
}

impl<T> SceneObject<T> {
    /// Create an object from its bounds and payload.
    pub fn new(bounds: BoundingVolume, payload: T) -> Self {
        Self { bounds, payload }
    }
}

/// A single cell of the tree.
#[derive(Debug, Clone)]
pub struct TreeNode {
    id: NodeId,
    bounds: BoundingVolume,
    min_cell_size: f32,
    depth: u32,
    /// Non-owning back-reference (None for the root)
    parent: Option<TreeNodeKey>,
    /// All 8 children, or None for a leaf
    children: Option<[TreeNodeKey; 8]>,
    /// Pre-computed octant volumes, indexed like `children`
    child_bounds: [BoundingVolume; 8],
    /// Set once any insertion descended into a child; never cleared
    has_contributing_children: bool,
    /// Objects touching this cell (leaves only)
    objects: Vec<ObjectKey>,
}

impl TreeNode {
    fn new(
        id: NodeId,
        bounds: BoundingVolume,
        min_cell_size: f32,
        depth: u32,
        parent: Option<TreeNodeKey>,
    ) -> Self {
        Self {
            id,
            bounds,
            min_cell_size,
            depth,
            parent,
            children: None,
            child_bounds: bounds.octants(),
            has_contributing_children: false,
            objects: Vec::new(),
        }
    }

    /// Identifier of this node
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// World-space bounds of this cell
    pub fn bounds(&self) -> &BoundingVolume {
        &self.bounds
    }

    /// Minimum cell size this node was built with
    pub fn min_cell_size(&self) -> f32 {
        self.min_cell_size
    }

    /// Depth in the tree (root = 0)
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Parent node key (None for the root)
    pub fn parent(&self) -> Option<TreeNodeKey> {
        self.parent
    }

    /// Child node keys in octant order, or None for a leaf
    pub fn children(&self) -> Option<&[TreeNodeKey; 8]> {
        self.children.as_ref()
    }

    /// The 8 octant volumes this cell would split into
    pub fn child_bounds(&self) -> &[BoundingVolume; 8] {
        &self.child_bounds
    }

    /// Whether this node has no children
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Whether this cell is at or below the minimum cell size
    pub fn is_terminal(&self) -> bool {
        self.bounds.edge_length() <= self.min_cell_size
    }

    /// Objects stored in this cell
    pub fn objects(&self) -> &[ObjectKey] {
        &self.objects
    }

    /// Whether any blocking object touches this cell
    pub fn is_occupied(&self) -> bool {
        !self.objects.is_empty()
    }
}

/// Read-only view of one cell, for external debug drawing.
#[derive(Debug, Clone, Copy)]
pub struct DebugCell {
    /// Node identifier
    pub id: NodeId,
    /// Cell bounds
    pub bounds: BoundingVolume,
    /// Depth in the tree (root = 0)
    pub depth: u32,
    /// Whether the cell is a leaf
    pub is_leaf: bool,
    /// Whether the cell holds blocking objects
    pub occupied: bool,
}

/// Octree over a cubic region, refined by object insertion.
pub struct SpatialTree<T = ()> {
    /// Node arena (parents own children through keys)
    nodes: SlotMap<TreeNodeKey, TreeNode>,
    /// Inserted objects
    objects: SlotMap<ObjectKey, SceneObject<T>>,
    /// Identifier → arena key, for O(1) lookup by id
    by_id: FxHashMap<NodeId, TreeNodeKey>,
    /// Per-tree identifier source
    ids: NodeIdSequence,
    root: TreeNodeKey,
    config: TreeConfig,
}

impl<T> SpatialTree<T> {
    /// Create a tree over `region` with the default depth limit.
    ///
    /// # Errors
    ///
    /// See [`SpatialTree::with_config`].
    pub fn new(region: BoundingVolume, min_cell_size: f32) -> Result<Self> {
        Self::with_config(region, TreeConfig { min_cell_size, ..TreeConfig::default() })
    }

    /// Create a tree over `region`.
    ///
    /// A `min_cell_size` at or above the region edge is accepted: the tree
    /// is then a single leaf that collects every overlapping object.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `min_cell_size` is not a finite value > 0
    /// - `region` is not a finite cube with a positive edge
    /// - reaching `min_cell_size` would take more than `config.max_depth` splits
    pub fn with_config(region: BoundingVolume, config: TreeConfig) -> Result<Self> {
        let depth = Self::validate(&region, &config)?;

        if depth == 0 {
            nav_warn!(SOURCE,
                "min_cell_size {} >= region edge {}: tree is a single leaf",
                config.min_cell_size, region.edge_length());
        }

        let mut ids = NodeIdSequence::new();
        let mut nodes = SlotMap::with_key();
        let root_id = NodeId(ids.next_id());
        let root = nodes.insert(TreeNode::new(root_id, region, config.min_cell_size, 0, None));
        let mut by_id = FxHashMap::default();
        by_id.insert(root_id, root);

        nav_debug!(SOURCE,
            "Created tree: edge {}, min cell {}, subdivision depth {}",
            region.edge_length(), config.min_cell_size, depth);

        Ok(Self {
            nodes,
            objects: SlotMap::with_key(),
            by_id,
            ids,
            root,
            config,
        })
    }

    /// Build a tree whose cubic region encloses every object, then insert them all.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRegion` when `objects` is empty or only contains
    /// degenerate (zero-size) volumes, plus every error of [`SpatialTree::with_config`].
    pub fn from_objects<I>(objects: I, config: TreeConfig) -> Result<Self>
    where
        I: IntoIterator<Item = SceneObject<T>>,
    {
        let objects: Vec<SceneObject<T>> = objects.into_iter().collect();
        let region = match BoundingVolume::enclosing(objects.iter().map(|o| o.bounds)) {
            Some(bounds) => bounds.to_cube(),
            None => nav_bail!(Error::InvalidRegion, SOURCE,
                "cannot derive a region from an empty object set"),
        };

        let mut tree = Self::with_config(region, config)?;
        for object in objects {
            tree.insert(object.bounds, object.payload);
        }
        Ok(tree)
    }

    /// Check the construction contract; returns the implied subdivision depth.
    fn validate(region: &BoundingVolume, config: &TreeConfig) -> Result<u32> {
        let min_cell_size = config.min_cell_size;
        if !min_cell_size.is_finite() || min_cell_size <= 0.0 {
            nav_bail!(Error::InvalidCellSize, SOURCE,
                "min_cell_size must be a finite value > 0 (got {})", min_cell_size);
        }
        if !region.is_finite() || region.half_extents.min_element() <= 0.0 {
            nav_bail!(Error::InvalidRegion, SOURCE,
                "region must be finite with a positive size (half extents {:?})",
                region.half_extents);
        }
        if !region.is_cubic() {
            nav_bail!(Error::InvalidRegion, SOURCE,
                "region must be cubic (half extents {:?})", region.half_extents);
        }

        let mut depth = 0;
        let mut edge = region.edge_length();
        while edge > min_cell_size && depth <= config.max_depth {
            edge *= 0.5;
            depth += 1;
        }
        if depth > config.max_depth {
            nav_bail!(Error::InvalidConfig, SOURCE,
                "region edge {} / min_cell_size {} needs more than max_depth {} subdivisions",
                region.edge_length(), min_cell_size, config.max_depth);
        }
        Ok(depth)
    }

    /// Insert a blocking object.
    ///
    /// The object is added to every terminal cell its bounds intersect.
    /// An object entirely outside the region is kept (its key stays valid)
    /// but lands in no cell.
    pub fn insert(&mut self, bounds: BoundingVolume, payload: T) -> ObjectKey {
        let key = self.objects.insert(SceneObject::new(bounds, payload));
        if !self.insert_recursive(self.root, key, &bounds) {
            nav_warn!(SOURCE,
                "Object at {:?} lies outside the tree region and was not placed", bounds.center);
        }
        key
    }

    /// Place `object` below `node_key`. Returns whether any cell received it.
    fn insert_recursive(
        &mut self,
        node_key: TreeNodeKey,
        object: ObjectKey,
        bounds: &BoundingVolume,
    ) -> bool {
        let node = &self.nodes[node_key];
        if node.is_terminal() {
            // Only the root reaches this point without a prior overlap test
            if !node.bounds.intersects(bounds) {
                return false;
            }
            self.nodes[node_key].objects.push(object);
            return true;
        }

        let existing = node.children;
        let children = match existing {
            Some(children) => children,
            None => self.create_children(node_key),
        };

        let mut placed = false;
        for child_key in children {
            if self.nodes[child_key].bounds.intersects(bounds) {
                self.nodes[node_key].has_contributing_children = true;
                placed |= self.insert_recursive(child_key, object, bounds);
            }
        }

        if !self.nodes[node_key].has_contributing_children {
            self.prune_children(node_key);
        }
        placed
    }

    /// Instantiate the 8 children of a node from its cached octant volumes.
    fn create_children(&mut self, parent: TreeNodeKey) -> [TreeNodeKey; 8] {
        let (child_bounds, depth, min_cell_size) = {
            let node = &self.nodes[parent];
            (node.child_bounds, node.depth, node.min_cell_size)
        };

        let mut children = [TreeNodeKey::default(); 8];
        for (slot, bounds) in children.iter_mut().zip(child_bounds) {
            let id = NodeId(self.ids.next_id());
            *slot = self.nodes.insert(
                TreeNode::new(id, bounds, min_cell_size, depth + 1, Some(parent)),
            );
            self.by_id.insert(id, *slot);
        }

        self.nodes[parent].children = Some(children);
        children
    }

    /// Revert a node to an empty leaf, discarding its whole subtree.
    fn prune_children(&mut self, node_key: TreeNodeKey) {
        if let Some(children) = self.nodes[node_key].children.take() {
            for child in children {
                self.remove_subtree(child);
            }
        }
    }

    fn remove_subtree(&mut self, key: TreeNodeKey) {
        if let Some(node) = self.nodes.remove(key) {
            self.by_id.remove(&node.id);
            if let Some(children) = node.children {
                for child in children {
                    self.remove_subtree(child);
                }
            }
        }
    }

    // ===== ACCESSORS =====

    /// Key of the root node
    pub fn root_key(&self) -> TreeNodeKey {
        self.root
    }

    /// The root node
    pub fn root(&self) -> &TreeNode {
        &self.nodes[self.root]
    }

    /// Configuration the tree was built with
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Node by arena key
    pub fn node(&self, key: TreeNodeKey) -> Option<&TreeNode> {
        self.nodes.get(key)
    }

    /// Node by identifier
    pub fn find_node(&self, id: NodeId) -> Option<&TreeNode> {
        self.by_id.get(&id).and_then(|&key| self.nodes.get(key))
    }

    /// Parent of a node (None for the root or an unknown key)
    pub fn parent_of(&self, key: TreeNodeKey) -> Option<&TreeNode> {
        self.nodes.get(key)?.parent.and_then(|p| self.nodes.get(p))
    }

    /// Inserted object by key
    pub fn object(&self, key: ObjectKey) -> Option<&SceneObject<T>> {
        self.objects.get(key)
    }

    /// Number of live nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of inserted objects
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Number of identifiers issued, including those of pruned nodes
    pub fn issued_ids(&self) -> u32 {
        self.ids.issued()
    }

    // ===== LEAF QUERIES =====

    /// Leaf cells at the minimum size or holding objects, depth-first in octant order.
    ///
    /// Large empty octants that were created but never refined are left out,
    /// so every returned cell has the same edge length.
    pub fn leaves(&self) -> Vec<&TreeNode> {
        self.childless_nodes()
            .into_iter()
            .filter(|node| node.is_occupied() || node.is_terminal())
            .collect()
    }

    /// Every node without children, including coarse unrefined octants.
    pub fn childless_nodes(&self) -> Vec<&TreeNode> {
        let mut nodes = Vec::new();
        self.collect_leaves(self.root, &mut nodes);
        nodes
    }

    fn collect_leaves<'a>(&'a self, key: TreeNodeKey, out: &mut Vec<&'a TreeNode>) {
        let node = &self.nodes[key];
        match node.children {
            None => out.push(node),
            Some(children) => {
                for child in children {
                    self.collect_leaves(child, out);
                }
            }
        }
    }

    /// Leaves that no blocking object touches (free space).
    pub fn navigable_leaves(&self) -> Vec<&TreeNode> {
        self.leaves().into_iter().filter(|leaf| !leaf.is_occupied()).collect()
    }

    /// Leaves that hold at least one blocking object.
    pub fn blocked_leaves(&self) -> Vec<&TreeNode> {
        self.leaves().into_iter().filter(|leaf| leaf.is_occupied()).collect()
    }

    /// Leaves that hold the given object.
    pub fn leaves_containing(&self, object: ObjectKey) -> Vec<&TreeNode> {
        self.leaves()
            .into_iter()
            .filter(|leaf| leaf.objects.contains(&object))
            .collect()
    }

    /// The leaf containing a world-space point.
    ///
    /// Points on a shared boundary resolve to the first child in octant
    /// order. Returns None for points outside the region.
    pub fn leaf_at(&self, point: Vec3) -> Option<&TreeNode> {
        let mut node = &self.nodes[self.root];
        if !node.bounds.contains_point(point) {
            return None;
        }

        while let Some(children) = node.children {
            node = children
                .iter()
                .map(|&child| &self.nodes[child])
                .find(|child| child.bounds.contains_point(point))?;
        }
        Some(node)
    }

    /// Snapshot of every cell for external debug drawing.
    pub fn debug_cells(&self) -> Vec<DebugCell> {
        self.nodes
            .values()
            .map(|node| DebugCell {
                id: node.id,
                bounds: node.bounds,
                depth: node.depth,
                is_leaf: node.is_leaf(),
                occupied: node.is_occupied(),
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "spatial_tree_tests.rs"]
mod tests;
