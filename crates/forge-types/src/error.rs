//! Type model errors

use thiserror::Error;

/// Errors raised while defining, registering or checking types
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TypeError {
    /// No type is registered under the requested name
    #[error("Undefined type: {name}")]
    UndefinedType {
        /// Type name that was not found
        name: String,
    },

    /// A type with this name is already registered
    #[error("Duplicate type definition: {name}")]
    DuplicateType {
        /// Name that is already taken
        name: String,
    },

    /// The definition handed to the builder is malformed
    #[error("Invalid definition of {name}: {reason}")]
    InvalidDefinition {
        /// Name of the type being defined
        name: String,
        /// What is wrong with it
        reason: String,
    },

    /// A value does not fit the declared type
    #[error("Type mismatch: expected {expected}, got {actual}")]
    Mismatch {
        /// Declared type
        expected: String,
        /// Type of the offending value
        actual: String,
    },
}

impl TypeError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        TypeError::InvalidDefinition {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Failure raised by a method or constructor body
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct InvokeError {
    /// Description of the failure
    pub message: String,
}

impl InvokeError {
    /// Create an invocation error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
