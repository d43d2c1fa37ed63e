//! Evidence package contracts handed from the router to the deliberation stage.
//!
//! ```rust
//! use wrouter::{ConfidenceBasis, EvidencePack, KeyFact};
//!
//! let mut pack = EvidencePack::empty("run-1", "What changed in Rust 1.80?");
//! pack.key_facts.push(KeyFact::new("LazyLock was stabilized", "s1", 1.4, ConfidenceBasis::Model));
//!
//! assert!(!pack.has_executed_records());
//! assert_eq!(pack.key_facts[0].confidence_score, 1.0);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use wcommon::{CallId, MetadataMap, RunId};

pub const EVIDENCE_SCHEMA_VERSION: &str = "1.0";
pub const PENDING_QUERY: &str = "[Pending]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Executed,
    Rejected,
    Failed,
}

impl RecordStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Executed => "executed",
            Self::Rejected => "rejected",
            Self::Failed => "failed",
        }
    }
}

/// Why the router refused to run a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    AccessDenied,
    BudgetExceeded,
    #[serde(rename = "max_evidence_size")]
    EvidenceBudgetExhausted,
    ToolNotFound,
    RateLimited,
}

impl RejectionReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AccessDenied => "access_denied",
            Self::BudgetExceeded => "budget_exceeded",
            Self::EvidenceBudgetExhausted => "max_evidence_size",
            Self::ToolNotFound => "tool_not_found",
            Self::RateLimited => "rate_limited",
        }
    }
}

/// Run-level limits that can trip during admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UsageLimit {
    MaxCallsPerRun,
    MaxEvidenceSize,
    RateLimit,
}

impl UsageLimit {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MaxCallsPerRun => "max_calls_per_run",
            Self::MaxEvidenceSize => "max_evidence_size",
            Self::RateLimit => "rate_limit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceSource {
    pub source_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

impl EvidenceSource {
    /// Characters of tool-provided text this source carries.
    pub fn text_chars(&self) -> usize {
        self.source_id.chars().count()
            + optional_chars(&self.title)
            + optional_chars(&self.url)
            + optional_chars(&self.snippet)
    }
}

fn optional_chars(field: &Option<String>) -> usize {
    field.as_deref().map_or(0, |text| text.chars().count())
}

/// Ledger entry for one requested call, whatever happened to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub call_id: CallId,
    pub tool_name: String,
    pub arguments: Map<String, Value>,
    pub status: RecordStatus,
    /// Prompt-ready summary with `[sN]` citation markers.
    pub output_summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_truncated: Option<String>,
    #[serde(default)]
    pub sources: Vec<EvidenceSource>,
    #[serde(default)]
    pub meta: MetadataMap,
}

impl UsageRecord {
    pub fn rejection_reason(&self) -> Option<&str> {
        self.meta.get("rejection_reason").and_then(Value::as_str)
    }

    pub fn is_cached(&self) -> bool {
        self.meta
            .get("cached")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn raw_chars(&self) -> usize {
        self.raw_truncated
            .as_deref()
            .map_or(0, |raw| raw.chars().count())
    }

    pub fn source_chars(&self) -> usize {
        self.sources.iter().map(EvidenceSource::text_chars).sum()
    }

    /// Raw payload plus source text: what this record adds to the run's evidence budget.
    pub fn evidence_chars(&self) -> usize {
        self.raw_chars() + self.source_chars()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageLimits {
    pub max_calls: usize,
    pub calls_used: usize,
    pub limits_triggered: Vec<String>,
}

impl UsageLimits {
    pub fn is_triggered(&self, limit: UsageLimit) -> bool {
        self.limits_triggered
            .iter()
            .any(|name| name == limit.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBasis {
    #[default]
    Heuristic,
    Model,
    Hybrid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyFact {
    pub fact: String,
    pub source_id: String,
    pub confidence_score: f32,
    #[serde(default)]
    pub confidence_basis: ConfidenceBasis,
}

impl KeyFact {
    /// Scores outside `[0, 1]` are clamped; NaN becomes 0.
    pub fn new(
        fact: impl Into<String>,
        source_id: impl Into<String>,
        confidence_score: f32,
        confidence_basis: ConfidenceBasis,
    ) -> Self {
        let confidence_score = if confidence_score.is_nan() {
            0.0
        } else {
            confidence_score.clamp(0.0, 1.0)
        };

        Self {
            fact: fact.into(),
            source_id: source_id.into(),
            confidence_score,
            confidence_basis,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidencePack {
    pub run_id: RunId,
    pub query: String,
    pub generated_at: DateTime<Utc>,
    pub schema_version: String,
    pub tools_used: Vec<UsageRecord>,
    #[serde(default)]
    pub key_facts: Vec<KeyFact>,
    pub limits: UsageLimits,
    #[serde(default)]
    pub open_questions: Vec<String>,
}

impl EvidencePack {
    /// Pack for a run that gathered no evidence. Downstream stages proceed without tools.
    pub fn empty(run_id: impl Into<RunId>, query: impl Into<String>) -> Self {
        Self::new(run_id.into(), query.into(), Vec::new(), UsageLimits::default())
    }

    pub(crate) fn new(
        run_id: RunId,
        query: String,
        tools_used: Vec<UsageRecord>,
        limits: UsageLimits,
    ) -> Self {
        Self {
            run_id,
            query,
            generated_at: Utc::now(),
            schema_version: EVIDENCE_SCHEMA_VERSION.to_string(),
            tools_used,
            key_facts: Vec::new(),
            limits,
            open_questions: Vec::new(),
        }
    }

    pub fn records_with_status(&self, status: RecordStatus) -> impl Iterator<Item = &UsageRecord> {
        self.tools_used
            .iter()
            .filter(move |record| record.status == status)
    }

    pub fn record_for(&self, call_id: &CallId) -> Option<&UsageRecord> {
        self.tools_used
            .iter()
            .find(|record| &record.call_id == call_id)
    }

    pub fn has_executed_records(&self) -> bool {
        self.records_with_status(RecordStatus::Executed)
            .next()
            .is_some()
    }

    pub fn total_raw_chars(&self) -> usize {
        self.tools_used.iter().map(UsageRecord::raw_chars).sum()
    }

    pub fn total_evidence_chars(&self) -> usize {
        self.tools_used.iter().map(UsageRecord::evidence_chars).sum()
    }
}
