//! Instance allocation
//!
//! Two ways to obtain an instance of a concrete type:
//! - [`construct`] runs the zero-argument constructor chain: superclass
//!   constructor first, then the class's field initializers, then the body.
//! - [`allocate_bypassing`] produces a default-valued slot table without
//!   running any constructor or initializer.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use crossbeam::channel;
use forge_types::{ConstructorInfo, Instance, ObjectRef, TypeDescriptor};

use crate::{ForgeError, ForgeResult};

/// Why a constructor chain did not produce an instance
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstructError {
    /// A superclass declares constructors, none of them zero-argument
    #[error("{type_name} has no zero-argument constructor to chain to")]
    NoSuperConstructor {
        /// Superclass lacking the constructor
        type_name: String,
    },

    /// A constructor body returned an error
    #[error("constructor of {type_name} failed: {message}")]
    Failed {
        /// Type whose constructor failed
        type_name: String,
        /// Error message
        message: String,
    },

    /// A constructor body panicked
    #[error("constructor of {type_name} panicked: {message}")]
    Panicked {
        /// Type whose constructor panicked
        type_name: String,
        /// Panic payload, when it is a string
        message: String,
    },

    /// The chain did not finish in time
    #[error("constructor of {type_name} did not finish within {timeout:?}")]
    TimedOut {
        /// Type being constructed
        type_name: String,
        /// Configured bound
        timeout: Duration,
    },
}

/// Allocate an instance without running any constructor
///
/// Every slot holds the default value of its field type. Fails for
/// interfaces, abstract classes and types flagged as not allocatable.
pub fn allocate_bypassing(class: &Arc<TypeDescriptor>) -> ForgeResult<ObjectRef> {
    let reason = if class.is_interface() {
        Some("interfaces have no instance layout")
    } else if class.is_abstract() {
        Some("type is abstract")
    } else if !class.is_allocatable() {
        Some("type does not permit allocation without a constructor")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ForgeError::InstantiationImpossible {
            name: class.name().to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(Arc::new(Instance::zeroed(Arc::clone(class)))),
    }
}

/// Run `ctor` (and the implicit superclass chain) on a fresh instance
///
/// With a `timeout` the chain runs on a helper thread; if it does not
/// report back in time the helper is abandoned and `TimedOut` is returned.
///
/// An abandoned helper is never joined or cancelled and keeps running until
/// the constructor body returns, if ever. Forcing a type whose constructor
/// hangs therefore leaks one thread per attempt, without bound; the forcer
/// counts these in [`StatsSnapshot::abandoned_constructors`].
///
/// [`StatsSnapshot::abandoned_constructors`]: crate::StatsSnapshot::abandoned_constructors
pub fn construct(
    class: &Arc<TypeDescriptor>,
    ctor: &ConstructorInfo,
    timeout: Option<Duration>,
) -> Result<ObjectRef, ConstructError> {
    let instance: ObjectRef = Arc::new(Instance::zeroed(Arc::clone(class)));

    let Some(timeout) = timeout else {
        run_chain(class, ctor, &instance)?;
        return Ok(instance);
    };

    let (tx, rx) = channel::bounded(1);
    let worker_class = Arc::clone(class);
    let worker_ctor = ctor.clone();
    let worker_instance = Arc::clone(&instance);
    std::thread::Builder::new()
        .name(format!("forge-ctor-{}", class.short_name()))
        .spawn(move || {
            // Receiver may be gone after a timeout
            let _ = tx.send(run_chain(&worker_class, &worker_ctor, &worker_instance));
        })
        .map_err(|e| ConstructError::Failed {
            type_name: class.name().to_string(),
            message: format!("cannot spawn constructor thread: {}", e),
        })?;

    match rx.recv_timeout(timeout) {
        Ok(result) => result.map(|()| instance),
        Err(_) => Err(ConstructError::TimedOut {
            type_name: class.name().to_string(),
            timeout,
        }),
    }
}

fn run_chain(class: &TypeDescriptor, ctor: &ConstructorInfo, instance: &ObjectRef) -> Result<(), ConstructError> {
    if let Some(parent) = class.superclass() {
        let parent_ctor = parent
            .zero_arg_constructor()
            .ok_or_else(|| ConstructError::NoSuperConstructor {
                type_name: parent.name().to_string(),
            })?;
        run_chain(parent, parent_ctor, instance)?;
    }

    for field in class.declared_fields() {
        if let Some(value) = &field.initializer {
            instance.store(field.slot, value.clone());
        }
    }

    let Some(body) = &ctor.body else {
        return Ok(());
    };
    match panic::catch_unwind(AssertUnwindSafe(|| body(instance, &[]))) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(ConstructError::Failed {
            type_name: class.name().to_string(),
            message: e.message,
        }),
        Err(payload) => Err(ConstructError::Panicked {
            type_name: class.name().to_string(),
            message: panic_message(payload.as_ref()),
        }),
    }
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
