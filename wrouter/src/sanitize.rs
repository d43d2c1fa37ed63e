//! Conversion of raw outcomes into bounded, prompt-safe usage records.
//!
//! ```rust
//! use wrouter::{neutralize_markup, truncate_chars};
//!
//! assert_eq!(neutralize_markup("a<script>b</script>"), "a[SCRIPT REMOVED]b[SCRIPT REMOVED]");
//!
//! let (text, truncated) = truncate_chars("abcdef", 3);
//! assert_eq!(text, "abc... [TRUNCATED]");
//! assert!(truncated);
//! ```

use std::borrow::Cow;
use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use serde_json::Value;
use wcommon::MetadataMap;
use wtooling::{ToolCallRequest, ToolOutcome};

use crate::{
    EvidenceSource, RecordStatus, RejectionReason, SummarizerTable, SummaryInput, UsageRecord,
};

pub const TRUNCATION_MARKER: &str = "... [TRUNCATED]";
pub const SCRIPT_PLACEHOLDER: &str = "[SCRIPT REMOVED]";
pub const MAX_SOURCES_PER_RECORD: usize = 10;

const SOURCE_ID_CHARS: usize = 16;
const SOURCE_FIELD_CHARS: usize = 300;
const SUMMARY_CHARS: usize = 1_000;

static SCRIPT_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<\s*/?\s*script\b[^>]*>").expect("script tag pattern is valid")
});

/// Replaces `<script>` open and close tags with an inert placeholder.
pub fn neutralize_markup(text: &str) -> Cow<'_, str> {
    SCRIPT_TAG.replace_all(text, SCRIPT_PLACEHOLDER)
}

/// Cuts `text` to at most `max_chars` characters, appending the truncation marker when cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> (String, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => (format!("{}{TRUNCATION_MARKER}", &text[..byte_index]), true),
        None => (text.to_string(), false),
    }
}

fn clean_field(text: &str, max_chars: usize) -> String {
    truncate_chars(&neutralize_markup(text), max_chars).0
}

fn clean_source(source: EvidenceSource) -> EvidenceSource {
    let clean_optional = |field: Option<String>| {
        field.map(|text| clean_field(&text, SOURCE_FIELD_CHARS))
    };
    EvidenceSource {
        source_id: clean_field(&source.source_id, SOURCE_ID_CHARS),
        title: clean_optional(source.title),
        url: clean_optional(source.url),
        snippet: clean_optional(source.snippet),
        fetched_at: source.fetched_at,
    }
}

fn render_raw(data: Option<&Value>) -> String {
    match data {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// Builds usage records from outcomes: status mapping, raw payload bounds, summaries.
#[derive(Clone)]
pub struct OutcomeSanitizer {
    max_raw_chars: usize,
    summarizers: SummarizerTable,
}

impl OutcomeSanitizer {
    pub fn new(max_raw_chars: usize, summarizers: SummarizerTable) -> Self {
        Self {
            max_raw_chars,
            summarizers,
        }
    }

    /// Record for an outcome the handler (or cache) produced.
    pub fn record(&self, request: &ToolCallRequest, outcome: &ToolOutcome) -> UsageRecord {
        let mut meta = outcome.meta.clone();

        if !outcome.ok {
            let (summary, error_kind, retryable) = match &outcome.error {
                Some(error) => (
                    format!("Error: {}", error.message),
                    Some(error.kind.as_str()),
                    error.retryable,
                ),
                None => ("Error: Unknown error".to_string(), None, false),
            };
            if let Some(kind) = error_kind {
                meta.insert("error_kind".to_string(), kind.into());
            }
            meta.insert("retryable".to_string(), retryable.into());

            return UsageRecord {
                call_id: request.id.clone(),
                tool_name: request.name.clone(),
                arguments: request.arguments.clone(),
                status: RecordStatus::Failed,
                output_summary: clean_field(&summary, SUMMARY_CHARS),
                raw_truncated: None,
                sources: Vec::new(),
                meta,
            };
        }

        let data = outcome.data.clone().unwrap_or(Value::Null);
        let raw = render_raw(Some(&data));
        let raw = neutralize_markup(&raw);
        let (raw_truncated, truncated) = truncate_chars(&raw, self.max_raw_chars);
        let raw_chars = raw_truncated.chars().count();
        if truncated {
            meta.insert("truncated".to_string(), true.into());
        }

        let summary = self.summarizers.summarize(&SummaryInput {
            request,
            data: &data,
            raw_chars,
            fetched_at: Utc::now(),
        });

        let offered = summary.sources.len();
        let sources = self.bound_sources(summary.sources);
        if sources.len() < offered {
            meta.insert(
                "sources_dropped".to_string(),
                (offered - sources.len()).into(),
            );
        }

        UsageRecord {
            call_id: request.id.clone(),
            tool_name: request.name.clone(),
            arguments: request.arguments.clone(),
            status: RecordStatus::Executed,
            output_summary: clean_field(&summary.text, SUMMARY_CHARS),
            raw_truncated: Some(raw_truncated),
            sources,
            meta,
        }
    }

    /// Cleans each source and keeps them in order while their combined text
    /// fits the raw payload ceiling, up to [`MAX_SOURCES_PER_RECORD`].
    fn bound_sources(&self, sources: Vec<EvidenceSource>) -> Vec<EvidenceSource> {
        let mut kept = Vec::new();
        let mut used = 0;
        for source in sources.into_iter().take(MAX_SOURCES_PER_RECORD) {
            let source = clean_source(source);
            let chars = source.text_chars();
            if used + chars > self.max_raw_chars {
                break;
            }
            used += chars;
            kept.push(source);
        }
        kept
    }

    /// Record for a call the router refused to run.
    pub fn rejected(
        &self,
        request: &ToolCallRequest,
        reason: RejectionReason,
        outcome: &ToolOutcome,
    ) -> UsageRecord {
        let mut meta = MetadataMap::new();
        meta.insert("rejection_reason".to_string(), reason.as_str().into());
        if let Some(error) = &outcome.error {
            meta.insert("error_kind".to_string(), error.kind.as_str().into());
            meta.insert("retryable".to_string(), error.retryable.into());
        }

        UsageRecord {
            call_id: request.id.clone(),
            tool_name: request.name.clone(),
            arguments: request.arguments.clone(),
            status: RecordStatus::Rejected,
            output_summary: format!("Call rejected: {}", reason.as_str()),
            raw_truncated: None,
            sources: Vec::new(),
            meta,
        }
    }
}
