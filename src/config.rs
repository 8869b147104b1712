//! Per-context settings.
//!
//! DESIGN
//! ======
//! `create_context()` always uses `ContextConfig::default()`; nothing here is
//! read implicitly. Hosts that want environment overrides call
//! [`ContextConfig::from_env`] themselves. Unparsable overrides fall back to
//! the default with a warning, the same way the rate limiter settings do.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::error::HelixiumError;

const DEFAULT_LABEL: &str = "genes";

pub const LABEL_VAR: &str = "HELIXIUM_CONTEXT_LABEL";
pub const LOG_VALUES_VAR: &str = "HELIXIUM_LOG_VALUES";

/// Settings for one [`crate::GeneContext`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Human-readable name attached to the context's log events.
    pub label: String,
    /// Include slot values in trace events. Values are user input, so this
    /// is off unless asked for.
    pub log_values: bool,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self { label: DEFAULT_LABEL.to_owned(), log_values: false }
    }
}

impl ContextConfig {
    /// Build a config from `HELIXIUM_CONTEXT_LABEL` and `HELIXIUM_LOG_VALUES`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let label = lookup(LABEL_VAR).filter(|v| !v.trim().is_empty()).unwrap_or(defaults.label);
        let log_values = match lookup(LOG_VALUES_VAR) {
            Some(raw) => parse_flag(LOG_VALUES_VAR, &raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "ignoring config override");
                defaults.log_values
            }),
            None => defaults.log_values,
        };
        Self { label, log_values }
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, HelixiumError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(HelixiumError::InvalidConfig { key: key.to_owned(), value: raw.to_owned() }),
    }
}
