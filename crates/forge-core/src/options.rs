//! Engine options
//!
//! Options can be built in code or read from a `forge.toml`:
//!
//! ```toml
//! [synthesis]
//! namespace = "forge.synthetic."
//! suffix = "_implementation"
//!
//! [construction]
//! timeout_ms = 250
//! warn_on_fallback = true
//! ```
//!
//! Every key is optional; missing keys keep their defaults.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::{ForgeError, ForgeResult};

/// Default namespace prefix of synthetic type names
pub const DEFAULT_SYNTHETIC_NAMESPACE: &str = "forge.synthetic.";

/// Default suffix of synthetic type names
pub const DEFAULT_SYNTHETIC_SUFFIX: &str = "_implementation";

/// Naming of synthesized implementation types
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SynthesisOptions {
    /// Prepended to the short name of the abstract type
    pub namespace: String,
    /// Appended to the short name of the abstract type
    pub suffix: String,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_SYNTHETIC_NAMESPACE.to_string(),
            suffix: DEFAULT_SYNTHETIC_SUFFIX.to_string(),
        }
    }
}

/// Behaviour of the construction step
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConstructionOptions {
    /// Upper bound for running a constructor chain (None = unbounded, run inline)
    pub timeout_ms: Option<u64>,
    /// Log constructor failures that fall back to bypass allocation at `warn` instead of `debug`
    pub warn_on_fallback: bool,
}

impl Default for ConstructionOptions {
    fn default() -> Self {
        Self {
            timeout_ms: None,
            warn_on_fallback: true,
        }
    }
}

/// Engine options
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForgeOptions {
    /// Synthetic type naming
    pub synthesis: SynthesisOptions,
    /// Construction behaviour
    pub construction: ConstructionOptions,
}

impl ForgeOptions {
    /// Parse options from TOML text
    pub fn from_toml_str(text: &str) -> ForgeResult<Self> {
        let options: ForgeOptions =
            toml::from_str(text).map_err(|e| ForgeError::Config(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Read options from a TOML file
    pub fn load(path: impl AsRef<Path>) -> ForgeResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ForgeError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// Set the construction timeout
    ///
    /// The timeout is kept in whole milliseconds: partial milliseconds round
    /// up, a zero duration becomes 1 ms and durations past `u64::MAX` ms
    /// saturate.
    pub fn with_constructor_timeout(mut self, timeout: Duration) -> Self {
        let mut millis = timeout.as_millis();
        if timeout.subsec_nanos() % 1_000_000 != 0 {
            millis += 1;
        }
        let millis = u64::try_from(millis).unwrap_or(u64::MAX).max(1);
        self.construction.timeout_ms = Some(millis);
        self
    }

    /// Set the synthetic namespace prefix
    pub fn with_synthetic_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.synthesis.namespace = namespace.into();
        self
    }

    /// Construction timeout, if bounded
    pub fn constructor_timeout(&self) -> Option<Duration> {
        self.construction.timeout_ms.map(Duration::from_millis)
    }

    /// Check the options for consistency
    pub fn validate(&self) -> ForgeResult<()> {
        let synthesis = &self.synthesis;
        if synthesis.suffix.is_empty() {
            return Err(ForgeError::Config(
                "synthesis.suffix must not be empty".to_string(),
            ));
        }
        if !synthesis.namespace.is_empty() && !synthesis.namespace.ends_with('.') {
            return Err(ForgeError::Config(format!(
                "synthesis.namespace '{}' must end with '.'",
                synthesis.namespace
            )));
        }
        if self.construction.timeout_ms == Some(0) {
            return Err(ForgeError::Config(
                "construction.timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
