//! The tree-driven copier.
//!
//! Walks a built [`DecoderTree`] against one live source record and one live
//! destination record. Destination optional records are allocated on first
//! write; unset optional source fields are skipped. Sub-trees of nested source
//! records write into the same top-level destination as their parent.
//!
//! The only memory touched is the two records and the read-only tree, so one
//! tree can drive any number of concurrent decodes.

use crate::builder::DecoderTree;
use crate::error::{MapperError, Result};
use crate::graph::{MappingGraph, NodeId};
use crate::reflect::Record;

/// Copies every mapped field of `src` into `dst`.
pub(crate) fn execute_tree(tree: &DecoderTree, src: &dyn Record, dst: &mut dyn Record) -> Result<()> {
    write_node(&tree.graph, tree.graph.root(), src, dst)?;

    for child in &tree.children {
        let field = src.field_ref(child.src_index).ok_or_else(|| {
            broken(format!("source field {} is out of range", child.field))
        })?;
        let value = child
            .src_ty
            .deref(field)
            .ok_or_else(|| broken(format!("source field {} has the wrong type", child.field)))?;
        // Nothing below an unset source record can be copied.
        let Some(value) = value else {
            continue;
        };
        let record = child
            .src_ty
            .target()
            .as_record(value)
            .ok_or_else(|| broken(format!("source field {} is not a record", child.field)))?;
        execute_tree(&child.tree, record, dst)?;
    }
    Ok(())
}

fn write_node(
    graph: &MappingGraph,
    id: NodeId,
    src: &dyn Record,
    dst: &mut dyn Record,
) -> Result<()> {
    let node = graph.node(id)?;

    for child in &node.children {
        let slot = dst.field_mut(child.dst_index).ok_or_else(|| {
            broken(format!("destination field {} is out of range", child.field))
        })?;
        let slot = child
            .dst_ty
            .deref_or_alloc(slot)
            .ok_or_else(|| broken(format!("destination field {} has the wrong type", child.field)))?;
        let record = child
            .dst_ty
            .target()
            .as_record_mut(slot)
            .ok_or_else(|| broken(format!("destination field {} is not a record", child.field)))?;
        write_node(graph, child.node, src, record)?;
    }

    for leaf in &node.leaves {
        let field = src.field_ref(leaf.src_index).ok_or_else(|| {
            broken(format!("source field {} is out of range", leaf.src_field))
        })?;
        let value = leaf
            .src_ty
            .deref(field)
            .ok_or_else(|| broken(format!("source field {} has the wrong type", leaf.src_field)))?;
        let Some(value) = value else {
            continue;
        };

        let slot = dst.field_mut(leaf.dst_index).ok_or_else(|| {
            broken(format!("destination field {} is out of range", leaf.dst_field))
        })?;
        let slot = leaf.dst_ty.deref_or_alloc(slot).ok_or_else(|| {
            broken(format!("destination field {} has the wrong type", leaf.dst_field))
        })?;

        let written = match &leaf.transform {
            Some(t) => t.apply(value, slot),
            None => leaf.src_ty.target().clone_value(value, slot),
        };
        if !written {
            return Err(broken(format!(
                "could not write {} into {}",
                leaf.src_field, leaf.dst_field
            )));
        }
    }
    Ok(())
}

fn broken(msg: String) -> MapperError {
    MapperError::Internal(msg)
}
