//! Instance Forcer
//!
//! Turns a type name or descriptor into a live instance:
//!
//! ```text
//! Resolve -> Classify -> [Synthesize] -> Construct -> Done
//!                                            |
//!                                            +-> BypassAllocate -> Done
//! ```
//!
//! Abstract types and interfaces are first replaced by their synthetic
//! implementation, and construction continues on that type directly. A
//! failed constructor is not an error for the caller: the forcer logs it and
//! allocates the instance without running any constructor instead.

use std::sync::Arc;

use forge_types::{ObjectRef, ResolvedType, TypeDescriptor, Value};
use tracing::{debug, warn};

use crate::allocation::{self, ConstructError};
use crate::forge::Forge;
use crate::{ForgeError, ForgeResult};

impl Forge {
    /// Produce a value of the named type
    ///
    /// Primitive names yield the primitive's default value. Array types
    /// cannot be forced.
    pub fn force_instance(&self, type_name: &str) -> ForgeResult<Value> {
        match self.resolve_type_by_name(type_name)? {
            ResolvedType::Primitive(primitive) => Ok(primitive.default_value()),
            ResolvedType::Array(ty) => Err(ForgeError::InstantiationImpossible {
                name: ty.to_string(),
                reason: "array types have no constructor".to_string(),
            }),
            ResolvedType::Reference(descriptor) => self.force_instance_of(&descriptor).map(Value::Object),
        }
    }

    /// Produce an instance of `ty`, or of its synthetic implementation when
    /// `ty` is abstract
    pub fn force_instance_of(&self, ty: &Arc<TypeDescriptor>) -> ForgeResult<ObjectRef> {
        let concrete = if ty.is_abstract() {
            self.synthesize(ty)?
        } else {
            Arc::clone(ty)
        };
        self.construct_or_bypass(&concrete)
    }

    fn construct_or_bypass(&self, concrete: &Arc<TypeDescriptor>) -> ForgeResult<ObjectRef> {
        match concrete.zero_arg_constructor() {
            Some(ctor) => {
                match allocation::construct(concrete, ctor, self.options.constructor_timeout()) {
                    Ok(instance) => {
                        self.stats.record_constructed();
                        return Ok(instance);
                    }
                    Err(e) => self.report_fallback(concrete, &e),
                }
            }
            None => {
                debug!(target: "forge", type_name = %concrete.name(), "no zero-argument constructor");
            }
        }

        let instance = allocation::allocate_bypassing(concrete)?;
        self.stats.record_bypassed();
        Ok(instance)
    }

    fn report_fallback(&self, concrete: &TypeDescriptor, error: &ConstructError) {
        self.stats.record_construction_failure();
        if matches!(error, ConstructError::TimedOut { .. }) {
            self.stats.record_abandoned_constructor();
        }
        if self.options.construction.warn_on_fallback {
            warn!(
                target: "forge",
                type_name = %concrete.name(),
                error = %error,
                "construction failed, allocating without constructor"
            );
        } else {
            debug!(
                target: "forge",
                type_name = %concrete.name(),
                error = %error,
                "construction failed, allocating without constructor"
            );
        }
    }
}
