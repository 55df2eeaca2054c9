//! Static type metadata for records and their fields.
//!
//! Rust has no runtime reflection, so the shape of every record is generated at
//! compile time by `#[derive(Record)]`. A [`Shape`] lists the fields of a record in
//! declaration order, each with its name, its index, its annotation text and a
//! [`TypeDesc`] describing the field's type.
//!
//! A [`TypeDesc`] is plain data: a `TypeId`, a display name, a [`TypeKind`] and a
//! handful of type-erased function pointers. The decoder builder inspects
//! descriptors once; afterwards copying only needs field indices and those
//! function pointers.

use std::any::{Any, TypeId};
use std::fmt;

/// Types that may appear as a field of a record.
///
/// Implemented for the primitive leaf types, `String`, `Duration`, `Option<T>` and
/// every type deriving [`Record`](trait@Record). Further leaf types can be added with
/// [`impl_reflect_scalar!`](crate::impl_reflect_scalar).
pub trait Reflect: Any + Send + Sync {
    /// Describes this type.
    fn type_desc() -> TypeDesc
    where
        Self: Sized;
}

/// A structured record whose fields can be enumerated and accessed by index.
///
/// Do not implement this by hand; use `#[derive(Record)]`.
pub trait Record: Any + Send + Sync {
    /// The field layout of this record.
    fn shape() -> Shape
    where
        Self: Sized;

    /// Shared access to the field at `index`.
    fn field_ref(&self, index: usize) -> Option<&dyn Any>;

    /// Exclusive access to the field at `index`.
    fn field_mut(&mut self, index: usize) -> Option<&mut dyn Any>;
}

/// The field layout of a record type.
#[derive(Debug, Clone)]
pub struct Shape {
    name: &'static str,
    fields: Vec<FieldDesc>,
}

impl Shape {
    /// Creates a shape from the record name and its fields in declaration order.
    pub fn new(name: &'static str, fields: Vec<FieldDesc>) -> Self {
        Self { name, fields }
    }

    /// The record type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// All fields, in declaration order.
    pub fn fields(&self) -> &[FieldDesc] {
        &self.fields
    }

    /// Looks a field up by name.
    pub fn field(&self, name: &str) -> Option<&FieldDesc> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// One field of a record.
#[derive(Debug, Clone, Copy)]
pub struct FieldDesc {
    /// Field identifier.
    pub name: &'static str,
    /// Position of the field, used as its offset by `Record::field_ref`.
    pub index: usize,
    /// The declared type of the field.
    pub ty: TypeDesc,
    /// The raw `#[map("...")]` annotation, if any.
    pub tag: Option<&'static str>,
}

/// Type-erased description of a field type.
#[derive(Clone, Copy)]
pub struct TypeDesc {
    id: TypeId,
    label: &'static str,
    kind: TypeKind,
    clone_into: fn(&dyn Any, &mut dyn Any) -> bool,
}

/// What kind of value a [`TypeDesc`] describes.
#[derive(Clone, Copy)]
pub enum TypeKind {
    /// A leaf value copied as a whole.
    Scalar,
    /// A nested record.
    Record(RecordOps),
    /// One level of optional indirection (`Option<T>`).
    Optional(OptionalOps),
}

/// Operations available on a record-typed value.
#[derive(Clone, Copy)]
pub struct RecordOps {
    shape: fn() -> Shape,
    as_ref: fn(&dyn Any) -> Option<&dyn Record>,
    as_mut: fn(&mut dyn Any) -> Option<&mut dyn Record>,
}

/// Operations available on an optional value.
#[derive(Clone, Copy)]
pub struct OptionalOps {
    inner: fn() -> TypeDesc,
    get: fn(&dyn Any) -> Option<Option<&dyn Any>>,
    get_or_default: fn(&mut dyn Any) -> Option<&mut dyn Any>,
}

impl TypeDesc {
    /// Describes a leaf type that is copied by cloning.
    pub fn scalar<T: Any + Clone + Send + Sync>(label: &'static str) -> Self {
        Self {
            id: TypeId::of::<T>(),
            label,
            kind: TypeKind::Scalar,
            clone_into: clone_into::<T>,
        }
    }

    /// Describes a record type.
    pub fn record<T: Record + Clone>(label: &'static str) -> Self {
        Self {
            id: TypeId::of::<T>(),
            label,
            kind: TypeKind::Record(RecordOps {
                shape: T::shape,
                as_ref: record_ref::<T>,
                as_mut: record_mut::<T>,
            }),
            clone_into: clone_into::<T>,
        }
    }

    /// Describes `Option<T>`.
    pub fn optional<T: Reflect + Clone + Default>() -> Self {
        Self {
            id: TypeId::of::<Option<T>>(),
            label: "Option",
            kind: TypeKind::Optional(OptionalOps {
                inner: T::type_desc,
                get: option_get::<T>,
                get_or_default: option_get_or_default::<T>,
            }),
            clone_into: clone_into::<Option<T>>,
        }
    }

    /// The `TypeId` of the described type.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The kind of the described type.
    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    /// A human readable type name, e.g. `Option<Inner>`.
    pub fn name(&self) -> String {
        match &self.kind {
            TypeKind::Optional(ops) => format!("{}<{}>", self.label, (ops.inner)().name()),
            _ => self.label.to_string(),
        }
    }

    /// Returns true for `Option<T>`.
    pub fn is_optional(&self) -> bool {
        matches!(self.kind, TypeKind::Optional(_))
    }

    /// The type behind one level of optional indirection, or `self`.
    pub fn target(&self) -> TypeDesc {
        match &self.kind {
            TypeKind::Optional(ops) => (ops.inner)(),
            _ => *self,
        }
    }

    /// The shape of a record or optional record, `None` for anything else.
    pub fn record_shape(&self) -> Option<Shape> {
        match self.target().kind {
            TypeKind::Record(ops) => Some((ops.shape)()),
            _ => None,
        }
    }

    /// Dereferences an optional value. `Some(None)` means the value is unset, `None`
    /// that `value` is not of this type.
    pub(crate) fn deref<'v>(&self, value: &'v dyn Any) -> Option<Option<&'v dyn Any>> {
        match &self.kind {
            TypeKind::Optional(ops) => (ops.get)(value),
            _ => Some(Some(value)),
        }
    }

    /// Dereferences an optional slot, storing a default instance first if it is unset.
    pub(crate) fn deref_or_alloc<'v>(&self, slot: &'v mut dyn Any) -> Option<&'v mut dyn Any> {
        match &self.kind {
            TypeKind::Optional(ops) => (ops.get_or_default)(slot),
            _ => Some(slot),
        }
    }

    /// Views a value of this (non-optional) record type as a record.
    pub(crate) fn as_record<'v>(&self, value: &'v dyn Any) -> Option<&'v dyn Record> {
        match &self.kind {
            TypeKind::Record(ops) => (ops.as_ref)(value),
            _ => None,
        }
    }

    /// Views a slot of this (non-optional) record type as a record.
    pub(crate) fn as_record_mut<'v>(&self, slot: &'v mut dyn Any) -> Option<&'v mut dyn Record> {
        match &self.kind {
            TypeKind::Record(ops) => (ops.as_mut)(slot),
            _ => None,
        }
    }

    /// Clones `src` into `dst`. Returns false if either is not of this type.
    pub(crate) fn clone_value(&self, src: &dyn Any, dst: &mut dyn Any) -> bool {
        (self.clone_into)(src, dst)
    }
}

impl PartialEq for TypeDesc {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDesc {}

impl fmt::Debug for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            TypeKind::Scalar => "scalar",
            TypeKind::Record(_) => "record",
            TypeKind::Optional(_) => "optional",
        };
        write!(f, "TypeDesc({} {})", kind, self.name())
    }
}

impl fmt::Debug for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar => f.write_str("Scalar"),
            Self::Record(_) => f.write_str("Record"),
            Self::Optional(_) => f.write_str("Optional"),
        }
    }
}

// --- Erased operations, monomorphised per described type ---

fn clone_into<T: Any + Clone>(src: &dyn Any, dst: &mut dyn Any) -> bool {
    match (src.downcast_ref::<T>(), dst.downcast_mut::<T>()) {
        (Some(s), Some(d)) => {
            d.clone_from(s);
            true
        }
        _ => false,
    }
}

fn record_ref<T: Record>(value: &dyn Any) -> Option<&dyn Record> {
    value.downcast_ref::<T>().map(|r| r as &dyn Record)
}

fn record_mut<T: Record>(value: &mut dyn Any) -> Option<&mut dyn Record> {
    value.downcast_mut::<T>().map(|r| r as &mut dyn Record)
}

fn option_get<T: Any>(value: &dyn Any) -> Option<Option<&dyn Any>> {
    value
        .downcast_ref::<Option<T>>()
        .map(|o| o.as_ref().map(|v| v as &dyn Any))
}

fn option_get_or_default<T: Any + Default>(slot: &mut dyn Any) -> Option<&mut dyn Any> {
    slot.downcast_mut::<Option<T>>()
        .map(|o| o.get_or_insert_with(T::default) as &mut dyn Any)
}
