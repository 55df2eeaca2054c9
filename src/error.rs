//! Centralized error handling for fieldmap.
//!
//! Every failure a caller can observe is a [`MapperError`]. Almost all of them
//! surface while a decoder is being built: a bad annotation, a destination path
//! that does not exist, or a leaf whose types cannot be copied. Once a decoder
//! has been built, decoding conforming records cannot fail on account of the
//! data.
//!
//! ## Error Categories
//!
//! - **Annotation errors** ([`MapperError::Syntax`], [`MapperError::TooManyParameters`],
//!   [`MapperError::UnknownParameter`], [`MapperError::EmptyPath`],
//!   [`MapperError::UnexpectedValue`], [`MapperError::UnknownTransform`]): the tag text
//!   attached to a source field is malformed or references something unknown.
//! - **Resolution errors** ([`MapperError::FieldNotFound`]): a path segment names a field
//!   the destination does not have.
//! - **Type errors** ([`MapperError::TypeMismatch`], [`MapperError::TransformMismatch`]):
//!   a leaf cannot be copied without a conversion.
//! - **Caller errors** ([`MapperError::InvalidArgument`]): the erased decode entry point
//!   received records of the wrong type.
//! - **Internal errors** ([`MapperError::Internal`]): broken invariants; please report.
//!
//! Build errors are wrapped in [`MapperError::Field`] and [`MapperError::Decoder`] so the
//! message names the record, the field and the type pair. Use
//! [`MapperError::root_cause`] to match on the underlying category.
//!
//! ## Usage Patterns
//!
//! ```rust
//! use fieldmap::{Mapper, MapperError, Record};
//!
//! #[derive(Clone, Default, Record)]
//! struct Src {
//!     #[map("missing")]
//!     a: u32,
//! }
//!
//! #[derive(Clone, Default, Record)]
//! struct Dst {
//!     a: u32,
//! }
//!
//! let mapper = Mapper::new();
//! let err = mapper.decoder::<Src, Dst>().unwrap_err();
//! assert!(matches!(err.root_cause(), MapperError::FieldNotFound { .. }));
//! ```

use thiserror::Error;

/// A specialized `Result` type for fieldmap operations.
pub type Result<T> = std::result::Result<T, MapperError>;

/// The master error enum covering every failure domain in fieldmap.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapperError {
    /// The annotation text could not be tokenized.
    #[error("malformed tag \"{tag}\": {reason}")]
    Syntax {
        /// The raw annotation text.
        tag: String,
        /// What the tokenizer tripped on.
        reason: String,
    },

    /// More than a path and a transform were given.
    #[error("tag \"{tag}\" has {count} parameters, at most 2 are allowed")]
    TooManyParameters {
        /// The raw annotation text.
        tag: String,
        /// Number of parameters found.
        count: usize,
    },

    /// The first parameter carries values under a key other than `path` or `-`.
    #[error("unknown parameter \"{key}\" in tag \"{tag}\"")]
    UnknownParameter {
        /// The raw annotation text.
        tag: String,
        /// The unrecognised key.
        key: String,
    },

    /// `path=` was given without any segment.
    #[error("path parameter of tag \"{tag}\" should not be empty")]
    EmptyPath {
        /// The raw annotation text.
        tag: String,
    },

    /// The transform parameter carries values.
    #[error("transform parameter \"{key}\" of tag \"{tag}\" should not have values")]
    UnexpectedValue {
        /// The raw annotation text.
        tag: String,
        /// The transform key that carried values.
        key: String,
    },

    /// The transform parameter names a transform that was never registered.
    #[error("transform \"{name}\" referenced by tag \"{tag}\" does not exist")]
    UnknownTransform {
        /// The raw annotation text.
        tag: String,
        /// The unknown transform name.
        name: String,
    },

    /// A destination path segment names a field the searched type does not have.
    #[error("field {field} doesn't exist in type {type_name}")]
    FieldNotFound {
        /// The missing path segment.
        field: String,
        /// The type that was searched.
        type_name: String,
    },

    /// An untransformed leaf would copy between two different types.
    #[error("cannot copy field {field} of type {source_type} into destination of type {destination_type}")]
    TypeMismatch {
        /// The source field name.
        field: String,
        /// The source field type.
        source_type: String,
        /// The resolved destination leaf type.
        destination_type: String,
    },

    /// A transform's signature does not fit the leaf it is attached to.
    #[error(
        "transform {transform} ({input} -> {output}) cannot map field {field} of type {source_type} into {destination_type}"
    )]
    TransformMismatch {
        /// The transform name.
        transform: String,
        /// The transform input type.
        input: String,
        /// The transform output type.
        output: String,
        /// The source field name.
        field: String,
        /// The dereferenced source field type.
        source_type: String,
        /// The dereferenced destination leaf type.
        destination_type: String,
    },

    /// The erased decode entry point received records of the wrong type.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A broken invariant inside the library.
    #[error("internal logic error: {0}")]
    Internal(String),

    /// A build error raised while processing one field of a source record.
    #[error("field {field} of {record}: {source}")]
    Field {
        /// The source record name.
        record: String,
        /// The source field name.
        field: String,
        /// The underlying error.
        #[source]
        source: Box<MapperError>,
    },

    /// A build error for a whole type pair.
    #[error("creating decoder {source_type} -> {destination_type}: {source}")]
    Decoder {
        /// The source record name.
        source_type: String,
        /// The destination record name.
        destination_type: String,
        /// The underlying error.
        #[source]
        source: Box<MapperError>,
    },
}

impl MapperError {
    /// Returns the innermost error, skipping the `Field` and `Decoder` context layers.
    pub fn root_cause(&self) -> &MapperError {
        match self {
            Self::Field { source, .. } | Self::Decoder { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub(crate) fn in_field(self, record: &str, field: &str) -> Self {
        Self::Field {
            record: record.to_string(),
            field: field.to_string(),
            source: Box::new(self),
        }
    }
}
