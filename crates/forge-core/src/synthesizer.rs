//! Implementation Synthesizer
//!
//! Produces a concrete, public subtype of an interface or abstract class.
//! The subtype carries a trivial public override for every abstract
//! operation still lacking a body; each override does nothing and returns
//! the default value of its return type. Concrete operations are inherited
//! unchanged.
//!
//! Synthetic types are named `namespace + short name + suffix`, registered
//! in the [`TypeRegistry`] and memoized in the [`SynthesisCache`]. A name is
//! realized at most once no matter how many threads ask for it.

use std::sync::Arc;

use forge_types::{
    ConstructorDefinition, MethodDefinition, TypeBuilder, TypeDescriptor, TypeError, TypeRegistry,
};
use tracing::debug;

use crate::cache::SynthesisCache;
use crate::options::SynthesisOptions;
use crate::stats::ForgeStats;
use crate::{ForgeError, ForgeResult};

/// Synthesis over a registry, cache and naming scheme
pub struct Synthesizer<'a> {
    registry: &'a TypeRegistry,
    cache: &'a SynthesisCache,
    options: &'a SynthesisOptions,
    stats: &'a ForgeStats,
}

impl<'a> Synthesizer<'a> {
    /// Create a synthesizer
    pub fn new(
        registry: &'a TypeRegistry,
        cache: &'a SynthesisCache,
        options: &'a SynthesisOptions,
        stats: &'a ForgeStats,
    ) -> Self {
        Self {
            registry,
            cache,
            options,
            stats,
        }
    }

    /// Name of the synthetic implementation of `original`
    pub fn synthetic_name(&self, original: &TypeDescriptor) -> String {
        format!(
            "{}{}{}",
            self.options.namespace,
            original.short_name(),
            self.options.suffix
        )
    }

    /// Get the concrete implementation of `original`, realizing it on first use
    pub fn synthesize(&self, original: &Arc<TypeDescriptor>) -> ForgeResult<Arc<TypeDescriptor>> {
        if !original.is_abstract() {
            return Err(ForgeError::SynthesisFailure {
                name: original.name().to_string(),
                reason: "type is concrete".to_string(),
            });
        }

        let name = self.synthetic_name(original);
        let (synthetic, realized_here) = self
            .cache
            .get_or_try_insert_with(&name, || self.realize(original, &name))?;

        if realized_here {
            self.stats.record_synthesis();
            return Ok(synthetic);
        }

        if !derives_from(&synthetic, original) {
            return Err(ForgeError::SynthesisFailure {
                name,
                reason: format!(
                    "name already realized for a different type than {}",
                    original.name()
                ),
            });
        }

        debug!(target: "forge", synthetic = %name, "synthesis cache hit");
        self.stats.record_cache_hit();
        Ok(synthetic)
    }

    fn realize(&self, original: &Arc<TypeDescriptor>, name: &str) -> ForgeResult<Arc<TypeDescriptor>> {
        let failure = |reason: String| ForgeError::SynthesisFailure {
            name: name.to_string(),
            reason,
        };

        let mut builder = TypeBuilder::class(name).public().synthetic();
        builder = if original.is_interface() {
            builder.implements(original)
        } else {
            builder.extends(original)
        };

        if !has_usable_default_constructor(original) {
            builder = builder.constructor(ConstructorDefinition::new().public());
        }

        let stubs = original.unimplemented_methods();
        for method in &stubs {
            let default = method.return_type.default_value();
            let mut stub = MethodDefinition::new(method.name.clone())
                .returns(method.return_type.clone())
                .public()
                .body(move |_, _| Ok(default.clone()));
            stub.params = method.params.clone();
            builder = builder.method(stub);
        }

        let descriptor = builder.build().map_err(|e| failure(e.to_string()))?;
        if descriptor.is_abstract() {
            return Err(failure("generated type is still abstract".to_string()));
        }

        let synthetic = self.registry.define(descriptor).map_err(|e| match e {
            TypeError::DuplicateType { .. } => {
                failure("a type with this name is already registered".to_string())
            }
            other => failure(other.to_string()),
        })?;

        debug!(
            target: "forge",
            original = %original.name(),
            synthetic = %name,
            stubs = stubs.len(),
            "synthesized implementation"
        );
        Ok(synthetic)
    }
}

/// Public, non-abstract zero-argument constructor that actually does something
fn has_usable_default_constructor(original: &TypeDescriptor) -> bool {
    original
        .zero_arg_constructor()
        .is_some_and(|c| c.modifiers.is_public() && !c.is_empty())
}

fn derives_from(synthetic: &TypeDescriptor, original: &TypeDescriptor) -> bool {
    synthetic.superclass().is_some_and(|s| s.id() == original.id())
        || synthetic.interfaces().iter().any(|i| i.id() == original.id())
}
