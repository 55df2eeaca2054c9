//! Runtime utilities for generated code (Macros).
//! Do not use directly.

use crate::reflect::{FieldDesc, Reflect, Record, Shape, TypeDesc};

/// Describes field number `index` of a record, of type `T`.
///
/// A field type that does not implement `Reflect` fails here, pointing the
/// compiler error at the offending field.
pub fn field<T: Reflect>(name: &'static str, index: usize, tag: Option<&'static str>) -> FieldDesc {
    FieldDesc {
        name,
        index,
        ty: T::type_desc(),
        tag,
    }
}

/// Describes a derived record type.
pub fn record<T: Record + Clone>(name: &'static str) -> TypeDesc {
    TypeDesc::record::<T>(name)
}

/// Assembles the shape of a derived record.
pub fn shape(name: &'static str, fields: Vec<FieldDesc>) -> Shape {
    Shape::new(name, fields)
}
