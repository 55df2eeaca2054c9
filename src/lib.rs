//! # fieldmap
//!
//! Annotation-driven decoders that copy field values from one record type into
//! another, remapping between flat and nested shapes without hand-written copy
//! code for every type pair.
//!
//! ## Overview
//!
//! Each field of a source record may carry an annotation naming a destination
//! path (a sequence of nested field names) and, optionally, a registered
//! transform. From those annotations fieldmap builds, once per
//! (source type, destination type) pair, a *decoder*: an immutable tree that
//! mirrors the destination's nesting and lists which source field lands where.
//! Decoders are cached by the [`Mapper`] and can be reused concurrently for any
//! number of records.
//!
//! ### Key Features
//!
//! *   **Flat ⇄ nested remapping:** `path=a,b,c` writes into `dst.a.b.c`; several
//!     fields sharing a path prefix share one intermediate node.
//! *   **Nested sources:** fields of nested source records are collected too, and
//!     all of them write into the same destination record.
//! *   **Optional records:** `Option<T>` destination records are created on first
//!     write; unset `Option<T>` source fields are skipped.
//! *   **Transforms:** named, typed single-argument functions applied on copy.
//! *   **Build once, copy fast:** annotations, names and types are resolved when
//!     the decoder is built; decoding only follows field indices.
//!
//! ## Architecture
//!
//! ### Reflection
//!
//! `#[derive(Record)]` generates the static field layout ([`Shape`]) of a struct
//! and index-based accessors. Field types are described by [`TypeDesc`]s obtained
//! through the [`Reflect`] trait.
//!
//! ### Building
//!
//! The [`annotation`] module parses each field's annotation (tokenized by
//! [`tag`]), the [`builder`] resolves destination paths, checks leaf types and
//! assembles the mapping tree stored in a [`graph::MappingGraph`] arena.
//!
//! ### Copying
//!
//! The [`executor`] walks the tree against a live source and destination,
//! allocating optional destination records on demand.
//!
//! ## Usage
//!
//! ```rust
//! use fieldmap::{Mapper, Record};
//!
//! #[derive(Clone, Default, Record)]
//! struct Flat {
//!     #[map("path=inner,c")]
//!     a: u32,
//!     #[map("path=inner,b")]
//!     b: String,
//!     #[map("path=inner,a;negate")]
//!     c: bool,
//!     #[map("-")]
//!     ignored: u8,
//! }
//!
//! #[derive(Clone, Default, Debug, PartialEq, Record)]
//! struct Inner {
//!     a: bool,
//!     b: String,
//!     c: u32,
//! }
//!
//! #[derive(Clone, Default, Debug, PartialEq, Record)]
//! struct Nested {
//!     inner: Option<Inner>,
//! }
//!
//! let mapper = Mapper::builder().transform("negate", |b: &bool| !b).build();
//! let decoder = mapper.decoder::<Flat, Nested>()?;
//!
//! let src = Flat { a: 123, b: "text".into(), c: true, ignored: 7 };
//! let mut dst = Nested::default();
//! decoder.decode(&src, &mut dst)?;
//!
//! assert_eq!(dst.inner, Some(Inner { a: false, b: "text".into(), c: 123 }));
//! # Ok::<(), fieldmap::MapperError>(())
//! ```
//!
//! ### Safety and Error Handling
//!
//! * **No Unsafe:** field access goes through `Any` downcasts generated by the derive.
//! * **No Panics:** No `unwrap()` or `panic!()` calls in the library (enforced by clippy lints).
//! * **Comprehensive Errors:** All failures correspond to a [`MapperError`] type.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![warn(missing_docs)]

// --- PUBLIC API MODULES ---
pub mod annotation;
pub mod api;
pub mod builder;
pub mod error;
pub mod inspector;
pub mod reflect;
pub mod tag;
pub mod transform;

// --- INTERNAL IMPLEMENTATION MODULES (Hidden from Docs) ---
#[doc(hidden)]
pub mod executor;
#[doc(hidden)]
pub mod graph;

// Private modules
mod reflect_impls;

// --- MACRO SUPPORT MODULES ---

/// Runtime utilities used by the derived code.
#[doc(hidden)]
pub mod rt;

// --- RE-EXPORTS ---

pub use api::{Decoder, Mapper, MapperBuilder};
pub use error::{MapperError, Result};
pub use inspector::DebugReport;
pub use reflect::{FieldDesc, Reflect, Shape, TypeDesc, TypeKind};
pub use transform::{Transform, TransformRegistry};

// `fieldmap::Record` names both the trait and the derive macro, like `serde::Serialize`.
pub use fieldmap_derive::Record;
pub use reflect::Record;
