//! Provider configuration.

use crate::error::{ProviderError, Result};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderOptions {
    /// Upgrade shallow contexts for initializer-typed stub targets in
    /// `reference_type`. When off, such targets stay untyped under a
    /// shallow context.
    pub deepen_references: bool,
    /// Fully qualified decorator names treated like `typing.overload`,
    /// e.g. `"mylib.compat.overload"`.
    pub overload_decorators: Vec<String>,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            deepen_references: true,
            overload_decorators: Vec::new(),
        }
    }
}

impl ProviderOptions {
    /// Parse options from JSON. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|err| ProviderError::InvalidOptions(err.to_string()))
    }
}

#[cfg(test)]
#[path = "../tests/options_tests.rs"]
mod tests;
