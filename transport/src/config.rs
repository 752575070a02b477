//! Transport settings.

use serde::{Deserialize, Serialize};

pub const TIMEOUT_ENV_VAR: &str = "SEARCH_API_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Whole-request timeout. Ignored on wasm, where the browser owns timeouts.
    pub timeout_secs: Option<u64>,
}

impl TransportConfig {
    /// Read `SEARCH_API_TIMEOUT_SECS`, leaving the timeout unset when missing or invalid.
    pub fn from_env() -> Self {
        Self::from_timeout_var(std::env::var(TIMEOUT_ENV_VAR).ok().as_deref())
    }

    fn from_timeout_var(value: Option<&str>) -> Self {
        let timeout_secs = value.and_then(|v| v.trim().parse().ok());
        Self { timeout_secs }
    }
}
