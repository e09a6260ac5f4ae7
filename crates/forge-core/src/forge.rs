//! Engine object
//!
//! [`Forge`] ties a shared [`TypeRegistry`] to the synthesis cache, the
//! options and the counters. One engine is created at start-up and shared by
//! every caller thread; all operations take `&self`.

use std::sync::Arc;

use forge_types::{ObjectRef, ResolvedType, TypeDescriptor, TypeError, TypeRegistry, Value};

use crate::cache::SynthesisCache;
use crate::options::ForgeOptions;
use crate::stats::{ForgeStats, StatsSnapshot};
use crate::synthesizer::Synthesizer;
use crate::{dispatch, field, ForgeError, ForgeResult};

/// Instance fabrication engine
#[derive(Debug)]
pub struct Forge {
    pub(crate) registry: Arc<TypeRegistry>,
    pub(crate) cache: SynthesisCache,
    pub(crate) options: ForgeOptions,
    pub(crate) stats: ForgeStats,
}

impl Forge {
    /// Create an engine with default options
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self {
            registry,
            cache: SynthesisCache::new(),
            options: ForgeOptions::default(),
            stats: ForgeStats::new(),
        }
    }

    /// Create an engine with the given options
    pub fn with_options(registry: Arc<TypeRegistry>, options: ForgeOptions) -> ForgeResult<Self> {
        options.validate()?;
        Ok(Self {
            options,
            ..Self::new(registry)
        })
    }

    /// Type registry the engine resolves against
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// Active options
    pub fn options(&self) -> &ForgeOptions {
        &self.options
    }

    /// Synthesis cache
    pub fn cache(&self) -> &SynthesisCache {
        &self.cache
    }

    /// Current counters
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Synthesizer bound to this engine's registry, cache and naming
    pub fn synthesizer(&self) -> Synthesizer<'_> {
        Synthesizer::new(&self.registry, &self.cache, &self.options.synthesis, &self.stats)
    }

    /// Resolve a primitive, array or registered type name
    pub fn resolve_type_by_name(&self, name: &str) -> ForgeResult<ResolvedType> {
        forge_types::resolve_type_by_name(&self.registry, name).map_err(|e| match e {
            TypeError::UndefinedType { name } => ForgeError::TypeNotFound { name },
            _ => ForgeError::TypeNotFound {
                name: name.to_string(),
            },
        })
    }

    /// Concrete implementation of an interface or abstract class
    pub fn synthesize(&self, original: &Arc<TypeDescriptor>) -> ForgeResult<Arc<TypeDescriptor>> {
        self.synthesizer().synthesize(original)
    }

    /// Read a field, ignoring visibility
    pub fn get_field(&self, instance: &ObjectRef, field_name: &str) -> ForgeResult<Value> {
        field::get_field(instance, field_name)
    }

    /// Write a field, ignoring visibility and `final`
    pub fn set_field(&self, instance: &ObjectRef, field_name: &str, value: Value) -> ForgeResult<()> {
        field::set_field(instance, field_name, value)
    }

    /// Invoke a method on an instance, ignoring visibility
    pub fn invoke(&self, instance: &ObjectRef, method: &str, args: &[Value]) -> ForgeResult<Value> {
        dispatch::invoke(instance, method, args)
    }

    /// Forget every synthesized type and zero the counters
    ///
    /// For test isolation only; must not run while another thread synthesizes.
    pub fn reset(&self) {
        self.cache.clear();
        let removed = self.registry.remove_synthetic();
        self.stats.reset();
        tracing::debug!(target: "forge", removed, "engine reset");
    }
}
