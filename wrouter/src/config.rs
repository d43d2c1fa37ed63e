//! Router admission settings.
//!
//! ```rust
//! use std::time::Duration;
//! use wrouter::RouterConfig;
//!
//! let config = RouterConfig::default()
//!     .with_allowlist(["web.search", "web.fetch"])
//!     .with_max_calls_per_run(3)
//!     .with_call_timeout(Duration::from_secs(10))
//!     .with_rate_limit("web.search", 5);
//!
//! assert!(config.validate().is_ok());
//! assert!(config.is_allowed("web.fetch"));
//! assert!(!config.is_allowed("shell.exec"));
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::RouterError;

pub const DEFAULT_MAX_CALLS_PER_RUN: usize = 5;
pub const DEFAULT_MAX_EVIDENCE_CHARS: usize = 10_000;
pub const DEFAULT_MAX_RAW_CHARS: usize = 2_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Permitted tool names. Empty permits every catalog tool.
    pub allowlist: BTreeSet<String>,
    pub max_calls_per_run: usize,
    pub max_evidence_chars: usize,
    /// Ceiling on the raw payload kept per usage record.
    pub max_raw_chars: usize,
    pub call_timeout_ms: Option<u64>,
    /// Calls per minute per tool name, shared across runs.
    pub rate_limits: BTreeMap<String, u32>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            allowlist: BTreeSet::new(),
            max_calls_per_run: DEFAULT_MAX_CALLS_PER_RUN,
            max_evidence_chars: DEFAULT_MAX_EVIDENCE_CHARS,
            max_raw_chars: DEFAULT_MAX_RAW_CHARS,
            call_timeout_ms: None,
            rate_limits: BTreeMap::new(),
        }
    }
}

impl RouterConfig {
    pub fn with_allowlist(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.allowlist = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_calls_per_run(mut self, max_calls_per_run: usize) -> Self {
        self.max_calls_per_run = max_calls_per_run;
        self
    }

    pub fn with_max_evidence_chars(mut self, max_evidence_chars: usize) -> Self {
        self.max_evidence_chars = max_evidence_chars;
        self
    }

    pub fn with_max_raw_chars(mut self, max_raw_chars: usize) -> Self {
        self.max_raw_chars = max_raw_chars;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn with_rate_limit(mut self, tool_name: impl Into<String>, per_minute: u32) -> Self {
        self.rate_limits.insert(tool_name.into(), per_minute);
        self
    }

    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout_ms.map(Duration::from_millis)
    }

    pub fn is_allowed(&self, tool_name: &str) -> bool {
        self.allowlist.is_empty() || self.allowlist.contains(tool_name)
    }

    pub fn validate(&self) -> Result<(), RouterError> {
        if self.max_calls_per_run == 0 {
            return Err(RouterError::invalid_config(
                "max_calls_per_run must be at least 1",
            ));
        }
        if self.max_evidence_chars == 0 {
            return Err(RouterError::invalid_config(
                "max_evidence_chars must be at least 1",
            ));
        }
        if self.max_raw_chars == 0 {
            return Err(RouterError::invalid_config("max_raw_chars must be at least 1"));
        }
        if self.call_timeout_ms == Some(0) {
            return Err(RouterError::invalid_config(
                "call_timeout_ms must be positive when set",
            ));
        }
        if let Some((tool_name, _)) = self.rate_limits.iter().find(|(_, limit)| **limit == 0) {
            return Err(RouterError::invalid_config(format!(
                "rate limit for '{tool_name}' must be at least 1 call per minute"
            )));
        }
        Ok(())
    }
}
