//! Decoder construction: destination path resolution and mapping tree assembly.
//!
//! [`build_tree`] walks the fields of a source record. Every field whose type is a
//! record (or an optional record) gets its own sub-tree, built against the same
//! destination, so several source sub-records can feed one destination. Every
//! annotated field becomes a leaf at the end of its resolved destination path;
//! the internal nodes along that path are shared between all leaves with the
//! same path prefix.

use crate::annotation::{Annotation, parse_annotation};
use crate::error::{MapperError, Result};
use crate::graph::{Leaf, MappingGraph, NodeId};
use crate::reflect::{FieldDesc, Shape, TypeDesc};
use crate::transform::TransformRegistry;
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::trace;

/// One step of a resolved destination path.
#[derive(Debug, Clone, Copy)]
pub struct PathStep {
    /// Field name at this level.
    pub field: &'static str,
    /// Field index at this level.
    pub index: usize,
    /// Declared type of the field.
    pub ty: TypeDesc,
}

/// A destination path resolved to field indices.
#[derive(Debug, Clone)]
pub struct ResolvedPath {
    /// Steps, outermost first. Never empty.
    pub steps: Vec<PathStep>,
}

impl ResolvedPath {
    /// Field indices along the path.
    pub fn indices(&self) -> Vec<usize> {
        self.steps.iter().map(|s| s.index).collect()
    }

    /// The declared type of the final field, not dereferenced.
    pub fn leaf_type(&self) -> Option<TypeDesc> {
        self.steps.last().map(|s| s.ty)
    }
}

/// Resolves `path` against the destination record `root`.
///
/// Each segment is looked up by name in the current record; optional records are
/// dereferenced before the lookup.
///
/// # Errors
/// [`MapperError::FieldNotFound`] naming the missing segment and the searched type,
/// also when a segment tries to descend into a non-record field.
pub fn resolve_path(root: &Shape, path: &[String]) -> Result<ResolvedPath> {
    let mut shape = Cow::Borrowed(root);
    let mut steps: Vec<PathStep> = Vec::with_capacity(path.len());

    for segment in path {
        if let Some(prev) = steps.last() {
            let target = prev.ty.target();
            shape = match target.record_shape() {
                Some(s) => Cow::Owned(s),
                None => {
                    return Err(MapperError::FieldNotFound {
                        field: segment.clone(),
                        type_name: target.name(),
                    });
                }
            };
        }

        let field = shape
            .field(segment)
            .ok_or_else(|| MapperError::FieldNotFound {
                field: segment.clone(),
                type_name: shape.name().to_string(),
            })?;
        steps.push(PathStep {
            field: field.name,
            index: field.index,
            ty: field.ty,
        });
    }

    if steps.is_empty() {
        return Err(MapperError::Internal(format!(
            "empty destination path into {}",
            root.name()
        )));
    }
    Ok(ResolvedPath { steps })
}

/// The mapping tree for one source record, plus one sub-tree per source
/// sub-record that contributes at least one leaf.
#[derive(Debug)]
pub struct DecoderTree {
    /// Source record name.
    pub source: &'static str,
    /// Nodes mirroring the destination shape.
    pub graph: MappingGraph,
    /// Sub-trees for nested source records.
    pub children: Vec<SourceChild>,
}

/// A nested source record and the tree built for it.
#[derive(Debug)]
pub struct SourceChild {
    /// Field name of the sub-record in the parent source record.
    pub field: &'static str,
    /// Field index of the sub-record in the parent source record.
    pub src_index: usize,
    /// Declared type of that field: a record or an optional record.
    pub src_ty: TypeDesc,
    /// The sub-record's own tree.
    pub tree: DecoderTree,
}

impl DecoderTree {
    /// Returns true if this tree or any sub-tree holds a leaf.
    pub fn has_leaves(&self) -> bool {
        self.graph.has_leaves(self.graph.root()) || self.children.iter().any(|c| c.tree.has_leaves())
    }

    /// Number of mapping nodes across this tree and its sub-trees.
    pub fn node_count(&self) -> usize {
        self.graph.len()
            + self
                .children
                .iter()
                .map(|c| c.tree.node_count())
                .sum::<usize>()
    }

    /// Number of leaves across this tree and its sub-trees.
    pub fn leaf_count(&self) -> usize {
        self.graph.leaf_count()
            + self
                .children
                .iter()
                .map(|c| c.tree.leaf_count())
                .sum::<usize>()
    }
}

/// Builds the decoder tree copying `src` records into `dst` records.
///
/// Any error aborts the whole build; no partial tree is returned.
pub fn build_tree(src: &Shape, dst: &Shape, registry: &TransformRegistry) -> Result<DecoderTree> {
    let mut graph = MappingGraph::new();
    let mut prefixes: HashMap<Vec<usize>, NodeId> = HashMap::new();
    let mut children = Vec::new();

    for field in src.fields() {
        let in_field = |e: MapperError| e.in_field(src.name(), field.name);

        if let Some(nested) = field.ty.record_shape() {
            let tree = build_tree(&nested, dst, registry).map_err(in_field)?;
            if tree.has_leaves() {
                children.push(SourceChild {
                    field: field.name,
                    src_index: field.index,
                    src_ty: field.ty,
                    tree,
                });
            }
        }

        let raw = field.tag.unwrap_or("");
        let Some(annotation) = parse_annotation(raw, registry).map_err(in_field)? else {
            trace!(record = src.name(), field = field.name, "ignoring field");
            continue;
        };

        let resolved = resolve_path(dst, &annotation.path).map_err(in_field)?;
        check_leaf(field, &resolved, &annotation).map_err(in_field)?;
        insert_leaf(&mut graph, &mut prefixes, field, resolved, annotation)?;
    }

    Ok(DecoderTree {
        source: src.name(),
        graph,
        children,
    })
}

/// Checks that the source field can be copied into the resolved destination leaf.
///
/// Without a transform the destination type must equal the source type, or the
/// type behind the source's optional indirection. With a transform, its input must
/// be the dereferenced source type and its output the dereferenced destination type.
fn check_leaf(field: &FieldDesc, resolved: &ResolvedPath, annotation: &Annotation) -> Result<()> {
    let dst_ty = resolved
        .leaf_type()
        .ok_or_else(|| MapperError::Internal("resolved path has no leaf".to_string()))?;
    let src_target = field.ty.target();
    let dst_target = dst_ty.target();

    match &annotation.transform {
        None => {
            let matches = dst_ty == field.ty || (field.ty.is_optional() && dst_ty == src_target);
            if !matches || src_target != dst_target {
                return Err(MapperError::TypeMismatch {
                    field: field.name.to_string(),
                    source_type: field.ty.name(),
                    destination_type: dst_ty.name(),
                });
            }
        }
        Some(t) => {
            if t.input() != src_target || t.output() != dst_target {
                return Err(MapperError::TransformMismatch {
                    transform: t.name().to_string(),
                    input: t.input().name(),
                    output: t.output().name(),
                    field: field.name.to_string(),
                    source_type: src_target.name(),
                    destination_type: dst_target.name(),
                });
            }
        }
    }
    Ok(())
}

/// Places a leaf at the end of `resolved`, creating or reusing the internal nodes
/// for every prefix of the path.
fn insert_leaf(
    graph: &mut MappingGraph,
    prefixes: &mut HashMap<Vec<usize>, NodeId>,
    field: &FieldDesc,
    resolved: ResolvedPath,
    annotation: Annotation,
) -> Result<()> {
    let indices = resolved.indices();
    let Some((last, inner)) = resolved.steps.split_last() else {
        return Err(MapperError::Internal("resolved path has no leaf".to_string()));
    };

    let mut parent = graph.root();
    for (depth, step) in inner.iter().enumerate() {
        let prefix = &indices[..=depth];
        parent = match prefixes.get(prefix) {
            Some(id) => *id,
            None => {
                let id = graph.add_child(parent, step.field, step.index, step.ty)?;
                prefixes.insert(prefix.to_vec(), id);
                id
            }
        };
    }

    graph.add_leaf(
        parent,
        Leaf {
            src_field: field.name,
            src_index: field.index,
            src_ty: field.ty,
            dst_field: last.field,
            dst_index: last.index,
            dst_ty: last.ty,
            path: annotation.path,
            transform: annotation.transform,
        },
    )
}
