//! Configuration structures.
//!
//! Configuration is loaded from a JSON file and/or `AIDIS_*` environment
//! variables, layered over the defaults below.

use crate::types::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Global dispatch-core configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Routing and timing configuration.
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Audit event configuration.
    #[serde(default)]
    pub audit: AuditConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from a JSON file. Missing sections take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Defaults overlaid with `AIDIS_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Overlay values from an environment lookup onto this config.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("AIDIS_LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Some(format) = lookup("AIDIS_LOG_FORMAT") {
            self.observability.json_logs = format.eq_ignore_ascii_case("json");
        }
        if let Some(actor) = lookup("AIDIS_AUDIT_ACTOR") {
            self.audit.actor = actor;
        }
        if let Some(enabled) = lookup("AIDIS_AUDIT_ENABLED") {
            self.audit.enabled = match enabled.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => {
                    return Err(Error::internal(format!(
                        "AIDIS_AUDIT_ENABLED must be a boolean, got '{}'",
                        other
                    )))
                }
            };
        }
        if let Some(threshold) = lookup("AIDIS_SLOW_CALL_THRESHOLD") {
            self.dispatch.slow_call_threshold = humantime_serde::re::humantime::parse_duration(
                &threshold,
            )
            .map_err(|e| {
                Error::internal(format!("AIDIS_SLOW_CALL_THRESHOLD is invalid: {}", e))
            })?;
        }
        Ok(())
    }
}

/// Routing and timing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Discovery tool that not-found messages point callers to.
    pub help_tool: String,

    /// Calls slower than this are logged at warn level. Never enforced as a timeout.
    #[serde(with = "humantime_serde")]
    pub slow_call_threshold: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            help_tool: "aidis_help".to_string(),
            slow_call_threshold: Duration::from_secs(5),
        }
    }
}

/// Audit event configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Emit one audit record per call.
    pub enabled: bool,

    /// Actor recorded on every audit event.
    pub actor: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            actor: "ai".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Tracing log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
