use super::id::NodeId;
use crate::error::{MapperError, Result};
use crate::reflect::TypeDesc;
use crate::transform::Transform;

/// One destination nesting level.
#[derive(Debug, Default)]
pub struct MappingNode {
    /// Deeper destination levels, at most one per destination field.
    pub children: Vec<ChildEdge>,
    /// Field copies that write directly into this level.
    pub leaves: Vec<Leaf>,
}

/// Link from a node to the node of one of its destination fields.
#[derive(Debug)]
pub struct ChildEdge {
    /// Destination field name at this level.
    pub field: &'static str,
    /// Destination field index at this level.
    pub dst_index: usize,
    /// Declared type of the destination field: a record or an optional record.
    pub dst_ty: TypeDesc,
    /// The nested node.
    pub node: NodeId,
}

/// A single source field → destination field copy.
#[derive(Debug)]
pub struct Leaf {
    /// Source field name.
    pub src_field: &'static str,
    /// Source field index.
    pub src_index: usize,
    /// Declared type of the source field.
    pub src_ty: TypeDesc,
    /// Destination field name at the leaf's level.
    pub dst_field: &'static str,
    /// Destination field index at the leaf's level.
    pub dst_index: usize,
    /// Declared type of the destination field.
    pub dst_ty: TypeDesc,
    /// Full destination path, as written in the annotation.
    pub path: Vec<String>,
    /// Transform applied to the dereferenced source value.
    pub transform: Option<Transform>,
}

/// Arena holding the nodes of one mapping tree. Slot 0 is the root.
#[derive(Debug)]
pub struct MappingGraph {
    nodes: Vec<MappingNode>,
}

impl MappingGraph {
    /// Creates a graph containing only an empty root.
    pub fn new() -> Self {
        Self {
            nodes: vec![MappingNode::default()],
        }
    }

    /// The root node id.
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Looks a node up.
    pub fn node(&self, id: NodeId) -> Result<&MappingNode> {
        self.nodes
            .get(id.index())
            .ok_or_else(|| MapperError::Internal(format!("node {id} is not in the graph")))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut MappingNode> {
        self.nodes
            .get_mut(id.index())
            .ok_or_else(|| MapperError::Internal(format!("node {id} is not in the graph")))
    }

    /// Creates a new node and links it under `parent` through destination field `dst_index`.
    ///
    /// Deduplication is the caller's job: linking the same field twice creates two nodes.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        field: &'static str,
        dst_index: usize,
        dst_ty: TypeDesc,
    ) -> Result<NodeId> {
        let id = NodeId::new(u32::try_from(self.nodes.len()).map_err(|_| {
            MapperError::Internal("mapping graph exceeds u32::MAX nodes".to_string())
        })?);
        self.node_mut(parent)?.children.push(ChildEdge {
            field,
            dst_index,
            dst_ty,
            node: id,
        });
        self.nodes.push(MappingNode::default());
        Ok(id)
    }

    /// Attaches a leaf to `parent`.
    pub fn add_leaf(&mut self, parent: NodeId, leaf: Leaf) -> Result<()> {
        self.node_mut(parent)?.leaves.push(leaf);
        Ok(())
    }

    /// Returns true if `id` or any node below it holds a leaf.
    pub fn has_leaves(&self, id: NodeId) -> bool {
        match self.nodes.get(id.index()) {
            Some(node) => {
                !node.leaves.is_empty() || node.children.iter().any(|c| self.has_leaves(c.node))
            }
            None => false,
        }
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root exists from construction.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total number of leaves in the graph.
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().map(|n| n.leaves.len()).sum()
    }
}

impl Default for MappingGraph {
    fn default() -> Self {
        Self::new()
    }
}
