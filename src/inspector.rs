//! Tools for inspecting the mapping tree of a decoder.
//! Useful for checking which source fields land where.

use crate::builder::DecoderTree;
use crate::graph::{MappingGraph, NodeId};
use serde::Serialize;

/// A structural report of one decoder.
#[derive(Debug, Serialize)]
pub struct DebugReport {
    /// Source record name.
    pub source_type: String,
    /// Destination record name.
    pub destination_type: String,
    /// Mapping nodes across all trees, roots included.
    pub node_count: usize,
    /// Field copies across all trees.
    pub leaf_count: usize,
    /// The tree of the top-level source record.
    pub tree: SourceInfo,
}

/// The tree built for one source record.
#[derive(Debug, Serialize)]
pub struct SourceInfo {
    /// Field holding this record in its parent source record; `None` at the top.
    pub source_field: Option<String>,
    /// Source record name.
    pub record: String,
    /// Root of the destination-shaped tree.
    pub root: NodeInfo,
    /// Trees of nested source records.
    pub sub_sources: Vec<SourceInfo>,
}

/// One destination nesting level.
#[derive(Debug, Serialize)]
pub struct NodeInfo {
    /// Destination field this level lives in; `None` for the root.
    pub destination_field: Option<String>,
    /// Copies writing into this level.
    pub leaves: Vec<LeafInfo>,
    /// Deeper levels.
    pub children: Vec<NodeInfo>,
}

/// One field copy.
#[derive(Debug, Serialize)]
pub struct LeafInfo {
    /// Source field name.
    pub source_field: String,
    /// Destination field name at this level.
    pub destination_field: String,
    /// Full destination path.
    pub path: Vec<String>,
    /// Transform name, if any.
    pub transform: Option<String>,
}

impl DebugReport {
    pub(crate) fn from_tree(tree: &DecoderTree, destination: &str) -> Self {
        Self {
            source_type: tree.source.to_string(),
            destination_type: destination.to_string(),
            node_count: tree.node_count(),
            leaf_count: tree.leaf_count(),
            tree: SourceInfo::from_tree(tree, None),
        }
    }
}

impl SourceInfo {
    fn from_tree(tree: &DecoderTree, source_field: Option<String>) -> Self {
        Self {
            source_field,
            record: tree.source.to_string(),
            root: NodeInfo::from_graph(&tree.graph, tree.graph.root(), None),
            sub_sources: tree
                .children
                .iter()
                .map(|c| Self::from_tree(&c.tree, Some(c.field.to_string())))
                .collect(),
        }
    }

    fn fmt_recursive(&self, f: &mut std::fmt::Formatter<'_>, prefix: &str) -> std::fmt::Result {
        let label = match &self.source_field {
            Some(field) => format!("{} ({})", field, self.record),
            None => self.record.clone(),
        };
        writeln!(f, "{}source {}", prefix, label)?;
        self.root.fmt_recursive(f, prefix, true)?;
        let nested = format!("{}    ", prefix);
        for sub in &self.sub_sources {
            sub.fmt_recursive(f, &nested)?;
        }
        Ok(())
    }
}

impl NodeInfo {
    fn from_graph(graph: &MappingGraph, id: NodeId, destination_field: Option<String>) -> Self {
        let Ok(node) = graph.node(id) else {
            return Self {
                destination_field,
                leaves: Vec::new(),
                children: Vec::new(),
            };
        };
        Self {
            destination_field,
            leaves: node
                .leaves
                .iter()
                .map(|l| LeafInfo {
                    source_field: l.src_field.to_string(),
                    destination_field: l.dst_field.to_string(),
                    path: l.path.clone(),
                    transform: l.transform.as_ref().map(|t| t.name().to_string()),
                })
                .collect(),
            children: node
                .children
                .iter()
                .map(|c| Self::from_graph(graph, c.node, Some(c.field.to_string())))
                .collect(),
        }
    }

    fn fmt_recursive(
        &self,
        f: &mut std::fmt::Formatter<'_>,
        prefix: &str,
        is_last: bool,
    ) -> std::fmt::Result {
        let connector = if is_last { "└── " } else { "├── " };
        let child_prefix = if is_last { "    " } else { "│   " };
        let name = self.destination_field.as_deref().unwrap_or("<root>");
        writeln!(f, "{}{}{}", prefix, connector, name)?;

        let inner = format!("{}{}", prefix, child_prefix);
        for leaf in &self.leaves {
            let transform = leaf
                .transform
                .as_deref()
                .map(|t| format!(" via {}", t))
                .unwrap_or_default();
            writeln!(
                f,
                "{}• {} -> {}{}",
                inner, leaf.source_field, leaf.destination_field, transform
            )?;
        }
        for (i, child) in self.children.iter().enumerate() {
            child.fmt_recursive(f, &inner, i + 1 == self.children.len())?;
        }
        Ok(())
    }
}

impl std::fmt::Display for DebugReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== FIELDMAP DECODER REPORT ===")?;
        writeln!(
            f,
            "{} -> {} | Nodes: {} | Leaves: {}",
            self.source_type, self.destination_type, self.node_count, self.leaf_count
        )?;
        writeln!(f, "\n[MAPPING TREE]")?;
        self.tree.fmt_recursive(f, "")
    }
}
