use std::fmt;

/// Identifier of a node in a [`MappingGraph`](super::MappingGraph).
///
/// Nodes live in an arena; the id is the node's slot. The root is always slot 0.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// The root node of every graph.
    pub const ROOT: NodeId = NodeId(0);

    /// Only the graph hands out ids.
    pub(crate) fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw slot index.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
