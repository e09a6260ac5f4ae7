//! Forge Engine
//!
//! Fabricates instances of arbitrary types for generated test cases and
//! forces them into arbitrary field states:
//! - Field access that walks the ancestry and ignores visibility and `final`
//! - Stub implementation synthesis for interfaces and abstract classes
//! - A process-lifetime synthesis cache with one realization per name
//! - Instance forcing: construct, synthesize-then-construct, or allocate
//!   without running any constructor
//!
//! ```
//! use std::sync::Arc;
//! use forge_core::Forge;
//! use forge_types::{MethodDefinition, TypeBuilder, TypeRef, TypeRegistry, Value};
//!
//! let registry = Arc::new(TypeRegistry::new());
//! registry
//!     .define(
//!         TypeBuilder::interface("geo.Shape")
//!             .method(MethodDefinition::new("area").returns(TypeRef::DOUBLE))
//!             .build()
//!             .unwrap(),
//!     )
//!     .unwrap();
//!
//! let forge = Forge::new(registry);
//! let shape = forge.force_instance("geo.Shape").unwrap();
//! let shape = shape.as_object().unwrap();
//! assert_eq!(forge.invoke(shape, "area", &[]).unwrap(), Value::Double(0.0));
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod allocation;
pub mod cache;
pub mod dispatch;
pub mod field;
pub mod forcer;
pub mod forge;
pub mod options;
pub mod stats;
pub mod synthesizer;

pub use cache::SynthesisCache;
pub use field::{get_field, set_field};
pub use forge::Forge;
pub use options::{ConstructionOptions, ForgeOptions, SynthesisOptions};
pub use stats::{ForgeStats, StatsSnapshot};
pub use synthesizer::Synthesizer;

use forge_types::InvokeError;

/// Engine errors
#[derive(Debug, thiserror::Error)]
pub enum ForgeError {
    /// The requested type name does not resolve
    #[error("Type not found: {name}")]
    TypeNotFound {
        /// Name that failed to resolve
        name: String,
    },

    /// No field of that name in the type or any ancestor
    #[error("Field '{field}' not found in {type_name} or its ancestors")]
    FieldNotFound {
        /// Runtime type of the instance
        type_name: String,
        /// Requested field
        field: String,
    },

    /// The value does not fit the declared type
    #[error("Type mismatch for '{field}': expected {expected}, got {actual}")]
    TypeMismatch {
        /// Field or parameter receiving the value
        field: String,
        /// Declared type
        expected: String,
        /// Type of the value
        actual: String,
    },

    /// A stub implementation could not be realized
    #[error("Synthesis of {name} failed: {reason}")]
    SynthesisFailure {
        /// Synthetic type name (or the requested type, for precondition failures)
        name: String,
        /// What went wrong
        reason: String,
    },

    /// Neither construction nor bypass allocation could produce an instance
    #[error("Cannot instantiate {name}: {reason}")]
    InstantiationImpossible {
        /// Requested type
        name: String,
        /// What went wrong
        reason: String,
    },

    /// No method with that name and arity
    #[error("Method {type_name}.{method}/{arity} not found")]
    MethodNotFound {
        /// Runtime type of the receiver
        type_name: String,
        /// Method name
        method: String,
        /// Number of arguments supplied
        arity: usize,
    },

    /// The resolved method has no body
    #[error("Method {type_name}.{method} is abstract")]
    AbstractMethod {
        /// Runtime type of the receiver
        type_name: String,
        /// Method name
        method: String,
    },

    /// A method or constructor body failed
    #[error("Invocation of {target} failed: {source}")]
    Invocation {
        /// What was being invoked
        target: String,
        /// Failure raised by the body
        #[source]
        source: InvokeError,
    },

    /// Options could not be read or are invalid
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Engine result
pub type ForgeResult<T> = Result<T, ForgeError>;
