use crate::builder::{DecoderTree, build_tree};
use crate::error::{MapperError, Result};
use crate::executor::execute_tree;
use crate::inspector::DebugReport;
use crate::reflect::{Reflect, Record};
use crate::transform::{Transform, TransformRegistry};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, trace};

type PairKey = (TypeId, TypeId);

/// Builds and caches decoders, one per (source type, destination type) pair.
///
/// A mapper owns its transform table and its decoder cache, so independently
/// configured mappers can coexist. Cached decoders are kept for the lifetime of
/// the mapper.
pub struct Mapper {
    decoders: DashMap<PairKey, Arc<DecoderTree>>,
    transforms: RwLock<TransformRegistry>,
}

impl Mapper {
    /// Creates a mapper with no transforms.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Returns a builder for configuring a mapper.
    pub fn builder() -> MapperBuilder {
        MapperBuilder::default()
    }

    /// Registers `f` as the transform `name`, replacing any transform of that name.
    ///
    /// Only decoders built afterwards see the new transform.
    pub fn register_transform<I, O, F>(&self, name: impl Into<String>, f: F)
    where
        I: Reflect,
        O: Reflect,
        F: Fn(&I) -> O + Send + Sync + 'static,
    {
        self.transforms.write().register(Transform::new(name, f));
    }

    /// Returns the decoder for `S` → `D`, building and caching it on first use.
    ///
    /// Concurrent first requests for the same pair may each build a tree; the
    /// first one published is kept and returned to everyone.
    ///
    /// # Errors
    /// Any annotation, path or type error found while building. Nothing is cached
    /// on failure.
    pub fn decoder<S: Record, D: Record>(&self) -> Result<Decoder<S, D>> {
        let key = (TypeId::of::<S>(), TypeId::of::<D>());
        if let Some(tree) = self.decoders.get(&key) {
            trace!(source = type_name::<S>(), destination = type_name::<D>(), "decoder cache hit");
            return Ok(Decoder::new(Arc::clone(tree.value())));
        }

        let (src, dst) = (S::shape(), D::shape());
        let built = {
            let transforms = self.transforms.read();
            build_tree(&src, &dst, &transforms)
        };
        let tree = match built {
            Ok(tree) => Arc::new(tree),
            Err(e) => {
                debug!(source = src.name(), destination = dst.name(), error = %e, "decoder build failed");
                return Err(MapperError::Decoder {
                    source_type: src.name().to_string(),
                    destination_type: dst.name().to_string(),
                    source: Box::new(e),
                });
            }
        };

        let published = Arc::clone(self.decoders.entry(key).or_insert(tree).value());
        debug!(
            source = src.name(),
            destination = dst.name(),
            nodes = published.node_count(),
            leaves = published.leaf_count(),
            "decoder built"
        );
        Ok(Decoder::new(published))
    }

    /// Like [`Mapper::decoder`], deriving the type pair from sample instances.
    pub fn get_decoder<S: Record, D: Record>(&self, _src: &S, _dst: &D) -> Result<Decoder<S, D>> {
        self.decoder::<S, D>()
    }

    /// Decodes `src` into a fresh `D::default()`.
    pub fn map<S: Record, D: Record + Default>(&self, src: &S) -> Result<D> {
        let mut dst = D::default();
        self.decoder::<S, D>()?.decode(src, &mut dst)?;
        Ok(dst)
    }

    /// Returns true if the `S` → `D` decoder is cached.
    pub fn is_cached<S: Record, D: Record>(&self) -> bool {
        self.decoders
            .contains_key(&(TypeId::of::<S>(), TypeId::of::<D>()))
    }

    /// Number of cached type pairs.
    pub fn cached_decoders(&self) -> usize {
        self.decoders.len()
    }
}

impl Default for Mapper {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Mapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapper")
            .field("decoders", &self.decoders.len())
            .field("transforms", &self.transforms.read().len())
            .finish()
    }
}

/// Configures a [`Mapper`] before use.
///
/// ```rust
/// use fieldmap::Mapper;
///
/// let mapper = Mapper::builder()
///     .transform("negate", |b: &bool| !b)
///     .transform("cents", |v: &f64| (v * 100.0).round() as i64)
///     .capacity(16)
///     .build();
/// # let _ = mapper;
/// ```
#[derive(Debug, Default)]
pub struct MapperBuilder {
    transforms: TransformRegistry,
    capacity: usize,
}

impl MapperBuilder {
    /// Registers a transform available to every decoder of the mapper.
    pub fn transform<I, O, F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        I: Reflect,
        O: Reflect,
        F: Fn(&I) -> O + Send + Sync + 'static,
    {
        self.transforms.register(Transform::new(name, f));
        self
    }

    /// Pre-sizes the decoder cache for `capacity` type pairs.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Creates the mapper.
    pub fn build(self) -> Mapper {
        Mapper {
            decoders: DashMap::with_capacity(self.capacity),
            transforms: RwLock::new(self.transforms),
        }
    }
}

/// An immutable, reusable copier from `S` records into `D` records.
///
/// Cloning is cheap; all clones share the cached tree.
pub struct Decoder<S, D> {
    tree: Arc<DecoderTree>,
    _marker: PhantomData<fn(&S, &mut D)>,
}

impl<S: Record, D: Record> Decoder<S, D> {
    fn new(tree: Arc<DecoderTree>) -> Self {
        Self {
            tree,
            _marker: PhantomData,
        }
    }

    /// Copies every mapped field of `src` into `dst`.
    ///
    /// Fields of `dst` that no annotation targets are left untouched.
    pub fn decode(&self, src: &S, dst: &mut D) -> Result<()> {
        execute_tree(&self.tree, src, dst)
    }

    /// Type-erased variant of [`Decoder::decode`].
    ///
    /// # Errors
    /// [`MapperError::InvalidArgument`] if `src` is not an `S` or `dst` is not a `D`.
    pub fn decode_any(&self, src: &dyn Any, dst: &mut dyn Any) -> Result<()> {
        let src = src.downcast_ref::<S>().ok_or_else(|| {
            MapperError::InvalidArgument(format!("source must be a {}", type_name::<S>()))
        })?;
        let dst = dst.downcast_mut::<D>().ok_or_else(|| {
            MapperError::InvalidArgument(format!("destination must be a {}", type_name::<D>()))
        })?;
        self.decode(src, dst)
    }

    /// Describes the mapping tree.
    pub fn inspect(&self) -> DebugReport {
        DebugReport::from_tree(&self.tree, D::shape().name())
    }
}

impl<S, D> Clone for Decoder<S, D> {
    fn clone(&self) -> Self {
        Self {
            tree: Arc::clone(&self.tree),
            _marker: PhantomData,
        }
    }
}

impl<S, D> fmt::Debug for Decoder<S, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decoder")
            .field("source", &self.tree.source)
            .field("nodes", &self.tree.node_count())
            .field("leaves", &self.tree.leaf_count())
            .finish()
    }
}
