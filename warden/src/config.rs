//! File-backed configuration for a complete steward/router deployment.
//!
//! ```rust
//! use warden::WardenConfig;
//!
//! let config = WardenConfig::from_json_str(
//!     r#"{"router": {"allowlist": ["web.search"], "max_calls_per_run": 3}}"#,
//! )
//! .expect("config should load");
//!
//! assert_eq!(config.router.max_calls_per_run, 3);
//! assert_eq!(config.router.max_raw_chars, 2_000);
//! assert_eq!(config.steward.model_timeout_ms, Some(60_000));
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{CachePolicy, RouterConfig, RouterError};

pub const DEFAULT_MODEL_TIMEOUT_MS: u64 = 60_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    Io,
    Parse,
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub kind: ConfigErrorKind,
    pub message: String,
}

impl ConfigError {
    pub fn new(kind: ConfigErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::Io, message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::Parse, message)
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::Invalid, message)
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ConfigError {}

impl From<RouterError> for ConfigError {
    fn from(error: RouterError) -> Self {
        Self::invalid(error.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StewardSettings {
    /// Upper bound on a single decision request. `None` waits indefinitely.
    pub model_timeout_ms: Option<u64>,
}

impl Default for StewardSettings {
    fn default() -> Self {
        Self {
            model_timeout_ms: Some(DEFAULT_MODEL_TIMEOUT_MS),
        }
    }
}

impl StewardSettings {
    pub fn model_timeout(&self) -> Option<Duration> {
        self.model_timeout_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WardenConfig {
    pub router: RouterConfig,
    pub cache: CachePolicy,
    pub steward: StewardSettings,
}

impl WardenConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|err| ConfigError::parse(format!("invalid warden config: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|err| {
            ConfigError::io(format!("failed to read '{}': {err}", path.display()))
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.router.validate()?;
        self.cache.validate()?;
        if self.steward.model_timeout_ms == Some(0) {
            return Err(ConfigError::invalid(
                "steward.model_timeout_ms must be positive when set",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = WardenConfig::from_json_str("{}").expect("defaults load");
        assert_eq!(config, WardenConfig::default());
        assert_eq!(
            config.steward.model_timeout(),
            Some(Duration::from_millis(DEFAULT_MODEL_TIMEOUT_MS))
        );
    }

    #[test]
    fn cache_rules_and_rate_limits_are_read() {
        let config = WardenConfig::from_json_str(
            r#"{
                "router": {"rate_limits": {"web.fetch": 10}, "call_timeout_ms": 5000},
                "cache": {"default_ttl_secs": 120, "rules": [{"pattern": "quote", "ttl_secs": 30}]}
            }"#,
        )
        .expect("config loads");

        assert_eq!(config.router.rate_limits.get("web.fetch"), Some(&10));
        assert_eq!(config.router.call_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.cache.ttl_for("finance.quote"), Duration::from_secs(30));
        assert_eq!(config.cache.ttl_for("web.search"), Duration::from_secs(120));
    }

    #[test]
    fn malformed_and_invalid_documents_are_distinguished() {
        let parse = WardenConfig::from_json_str("{not json").expect_err("parse error");
        assert_eq!(parse.kind, ConfigErrorKind::Parse);

        let invalid = WardenConfig::from_json_str(r#"{"router": {"max_calls_per_run": 0}}"#)
            .expect_err("invalid config");
        assert_eq!(invalid.kind, ConfigErrorKind::Invalid);

        let timeout = WardenConfig::from_json_str(r#"{"steward": {"model_timeout_ms": 0}}"#)
            .expect_err("invalid timeout");
        assert_eq!(timeout.kind, ConfigErrorKind::Invalid);
    }

    #[test]
    fn missing_files_report_io_errors() {
        let error = WardenConfig::from_path("/nonexistent/warden.json").expect_err("io error");
        assert_eq!(error.kind, ConfigErrorKind::Io);
        assert!(error.message.contains("/nonexistent/warden.json"));
    }
}
