//! Shared, time-expiring memo of successful tool outcomes.
//!
//! Entries are keyed by tool name plus a canonical rendering of the argument
//! map, so argument order never affects hits.
//!
//! ```rust
//! use std::time::Duration;
//! use serde_json::json;
//! use wrouter::{CacheKey, CachePolicy};
//!
//! let a = CacheKey::new("web.search", json!({"q": "rust", "num": 3}).as_object().unwrap());
//! let b = CacheKey::new("web.search", json!({"num": 3, "q": "rust"}).as_object().unwrap());
//! assert_eq!(a, b);
//!
//! let policy = CachePolicy::default();
//! assert_eq!(policy.ttl_for("web.search"), Duration::from_secs(600));
//! assert_eq!(policy.ttl_for("web.fetch"), Duration::from_secs(300));
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use wcommon::{Clock, SystemClock};
use wtooling::ToolOutcome;

use crate::RouterError;

pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
pub const SEARCH_CACHE_TTL_SECS: u64 = 600;
/// Upper bound accepted by [`CachePolicy::validate`]: 30 days.
pub const MAX_CACHE_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// TTL override for tools whose name contains `pattern`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TtlRule {
    pub pattern: String,
    pub ttl_secs: u64,
}

impl TtlRule {
    pub fn new(pattern: impl Into<String>, ttl: Duration) -> Self {
        Self {
            pattern: pattern.into(),
            ttl_secs: ttl.as_secs(),
        }
    }

    pub fn matches(&self, tool_name: &str) -> bool {
        tool_name.contains(self.pattern.as_str())
    }
}

/// Per-tool-category TTL policy. The first matching rule wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CachePolicy {
    pub default_ttl_secs: u64,
    pub rules: Vec<TtlRule>,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            default_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            rules: vec![TtlRule::new(
                "search",
                Duration::from_secs(SEARCH_CACHE_TTL_SECS),
            )],
        }
    }
}

impl CachePolicy {
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl_secs = ttl.as_secs();
        self
    }

    pub fn with_rule(mut self, pattern: impl Into<String>, ttl: Duration) -> Self {
        self.rules.push(TtlRule::new(pattern, ttl));
        self
    }

    pub fn without_rules(mut self) -> Self {
        self.rules.clear();
        self
    }

    pub fn ttl_for(&self, tool_name: &str) -> Duration {
        let secs = self
            .rules
            .iter()
            .find(|rule| rule.matches(tool_name))
            .map_or(self.default_ttl_secs, |rule| rule.ttl_secs);
        Duration::from_secs(secs)
    }

    pub fn validate(&self) -> Result<(), RouterError> {
        if self.default_ttl_secs == 0 || self.default_ttl_secs > MAX_CACHE_TTL_SECS {
            return Err(RouterError::invalid_config(format!(
                "default cache TTL must be between 1 and {MAX_CACHE_TTL_SECS} seconds"
            )));
        }
        if let Some(rule) = self.rules.iter().find(|rule| {
            rule.ttl_secs == 0 || rule.ttl_secs > MAX_CACHE_TTL_SECS || rule.pattern.is_empty()
        }) {
            return Err(RouterError::invalid_config(format!(
                "cache rule '{}' needs a non-empty pattern and a TTL between 1 and {MAX_CACHE_TTL_SECS} seconds",
                rule.pattern
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    tool_name: String,
    arguments: String,
}

impl CacheKey {
    pub fn new(tool_name: impl Into<String>, arguments: &Map<String, Value>) -> Self {
        let mut canonical = String::new();
        write_canonical(&mut canonical, &Value::Object(arguments.clone()));
        Self {
            tool_name: tool_name.into(),
            arguments: canonical,
        }
    }

    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }
}

fn write_canonical(out: &mut String, value: &Value) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|left, right| left.0.cmp(right.0));
            out.push('{');
            for (index, (key, value)) in entries.into_iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(out, value);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                write_canonical(out, item);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

struct CacheEntry {
    outcome: ToolOutcome,
    /// `None` when the TTL reaches past what `Instant` can represent.
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|expires_at| now < expires_at)
    }
}

/// Process-wide result cache, safe to share between concurrent runs.
pub struct ResultCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultCache {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Returns a live entry, evicting it instead when it has expired.
    pub fn get(&self, key: &CacheKey) -> Option<ToolOutcome> {
        let now = self.clock.now();
        let mut entries = self.entries();
        match entries.get(key) {
            Some(entry) if entry.is_live(now) => Some(entry.outcome.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: CacheKey, outcome: ToolOutcome, ttl: Duration) {
        let expires_at = self.clock.now().checked_add(ttl);
        self.entries()
            .insert(key, CacheEntry { outcome, expires_at });
    }

    /// Drops every expired entry and reports how many were removed.
    pub fn prune_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    // A panic while holding the lock cannot leave a half-written entry behind.
    fn entries(&self) -> MutexGuard<'_, HashMap<CacheKey, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
