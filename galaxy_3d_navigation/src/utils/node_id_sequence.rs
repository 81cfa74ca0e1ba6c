/// Hands out monotonically increasing `u32` identifiers.
///
/// One sequence is owned by each SpatialTree, so identifiers are unique
/// within a tree and two trees built from the same input get the same ids.
/// Identifiers are never recycled, even when the node they named is pruned.
///
/// # Example
///
/// ```ignore
/// let mut ids = NodeIdSequence::new();
/// let a = ids.next_id();  // 0
/// let b = ids.next_id();  // 1
/// ```
#[derive(Debug, Clone)]
pub(crate) struct NodeIdSequence {
    next_id: u32,
}

impl NodeIdSequence {
    /// Create a sequence starting at 0
    pub(crate) fn new() -> Self {
        Self { next_id: 0 }
    }

    /// Take the next identifier
    pub(crate) fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Number of identifiers handed out so far
    pub(crate) fn issued(&self) -> u32 {
        self.next_id
    }
}

impl Default for NodeIdSequence {
    fn default() -> Self {
        Self::new()
    }
}
