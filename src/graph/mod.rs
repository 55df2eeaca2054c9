//! The mapping tree that mirrors the nested shape of a destination record.
//!
//! Internal nodes stand for destination nesting levels, leaves for single
//! source → destination field copies.

/// Defines `MappingGraph`, `MappingNode`, `ChildEdge` and `Leaf`.
pub mod core;
/// Defines the `NodeId` type.
pub mod id;

pub use self::core::{ChildEdge, Leaf, MappingGraph, MappingNode};
pub use self::id::NodeId;
