//! Named single-argument transforms applied to leaf values during decoding.
//!
//! A [`Transform`] wraps a typed function `Fn(&I) -> O`. It remembers both types so
//! the builder can reject a transform whose signature does not fit the leaf it
//! is attached to, which keeps decoding infallible once a decoder exists.

use crate::reflect::{Reflect, TypeDesc};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type ApplyFn = dyn Fn(&dyn Any, &mut dyn Any) -> bool + Send + Sync;

/// A named, typed value conversion.
#[derive(Clone)]
pub struct Transform {
    name: Arc<str>,
    input: TypeDesc,
    output: TypeDesc,
    apply: Arc<ApplyFn>,
}

impl Transform {
    /// Wraps `f` as a transform called `name`.
    pub fn new<I, O, F>(name: impl Into<String>, f: F) -> Self
    where
        I: Reflect,
        O: Reflect,
        F: Fn(&I) -> O + Send + Sync + 'static,
    {
        let apply = move |src: &dyn Any, dst: &mut dyn Any| {
            match (src.downcast_ref::<I>(), dst.downcast_mut::<O>()) {
                (Some(input), Some(slot)) => {
                    *slot = f(input);
                    true
                }
                _ => false,
            }
        };
        Self {
            name: Arc::from(name.into()),
            input: I::type_desc(),
            output: O::type_desc(),
            apply: Arc::new(apply),
        }
    }

    /// The registered name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The type the transform reads.
    pub fn input(&self) -> TypeDesc {
        self.input
    }

    /// The type the transform produces.
    pub fn output(&self) -> TypeDesc {
        self.output
    }

    /// Applies the transform to `src` and stores the result in `dst`.
    /// Returns false if either value has the wrong type.
    pub(crate) fn apply(&self, src: &dyn Any, dst: &mut dyn Any) -> bool {
        (self.apply)(src, dst)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transform({}: {} -> {})",
            self.name,
            self.input.name(),
            self.output.name()
        )
    }
}

// --- REGISTRY ---

/// Table of transforms available to decoder builds, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct TransformRegistry {
    transforms: HashMap<String, Transform>,
}

impl TransformRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a transform under its own name.
    ///
    /// If a transform with the same name is already registered, it is overwritten.
    /// Decoders that were built with the previous transform keep using it.
    pub fn register(&mut self, transform: Transform) {
        self.transforms
            .insert(transform.name().to_string(), transform);
    }

    /// Retrieves a transform by name.
    pub fn get(&self, name: &str) -> Option<&Transform> {
        self.transforms.get(name)
    }

    /// Number of registered transforms.
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Returns true when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}
