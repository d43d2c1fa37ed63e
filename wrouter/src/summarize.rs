//! Prompt-facing summaries of successful tool results.
//!
//! Summarizers are looked up by exact tool name first, then by the request's
//! intent category, falling back to a generic size-only summary.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use wtooling::{ToolCallRequest, ToolIntent};

use crate::EvidenceSource;

const SEARCH_TITLES_LISTED: usize = 3;
const FETCH_PREVIEW_CHARS: usize = 160;

pub struct SummaryInput<'a> {
    pub request: &'a ToolCallRequest,
    pub data: &'a Value,
    /// Length of the stored raw payload, after truncation.
    pub raw_chars: usize,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub text: String,
    pub sources: Vec<EvidenceSource>,
}

impl Summary {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sources: Vec::new(),
        }
    }
}

pub trait Summarizer: Send + Sync {
    fn summarize(&self, input: &SummaryInput<'_>) -> Summary;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct GenericSummarizer;

impl Summarizer for GenericSummarizer {
    fn summarize(&self, input: &SummaryInput<'_>) -> Summary {
        Summary::text(format!(
            "Executed {}. Result size: {} chars.",
            input.request.name, input.raw_chars
        ))
    }
}

/// Lists the first few result titles with `[sN]` markers and keeps every result as a source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SearchResultsSummarizer;

impl Summarizer for SearchResultsSummarizer {
    fn summarize(&self, input: &SummaryInput<'_>) -> Summary {
        let Some(results) = input.data.get("results").and_then(Value::as_array) else {
            return GenericSummarizer.summarize(input);
        };

        let sources: Vec<EvidenceSource> = results
            .iter()
            .enumerate()
            .map(|(index, result)| EvidenceSource {
                source_id: citation_id(result.get("source_id"), index),
                title: string_field(result, "title"),
                url: string_field(result, "url"),
                snippet: string_field(result, "snippet"),
                fetched_at: input.fetched_at,
            })
            .collect();

        if sources.is_empty() {
            return Summary::text(format!("{} returned no results.", input.request.name));
        }

        let listed = sources
            .iter()
            .take(SEARCH_TITLES_LISTED)
            .map(|source| {
                format!(
                    "{} [{}]",
                    source.title.as_deref().unwrap_or("Unknown"),
                    source.source_id
                )
            })
            .collect::<Vec<_>>()
            .join(", ");
        let more = if sources.len() > SEARCH_TITLES_LISTED {
            ", ..."
        } else {
            ""
        };

        Summary {
            text: format!("Found {} results: {listed}{more}", sources.len()),
            sources,
        }
    }
}

/// Names the fetched URL and previews the start of the page content.
#[derive(Debug, Default, Clone, Copy)]
pub struct FetchedPageSummarizer;

impl Summarizer for FetchedPageSummarizer {
    fn summarize(&self, input: &SummaryInput<'_>) -> Summary {
        let Some(content) = input.data.get("content").and_then(Value::as_str) else {
            return GenericSummarizer.summarize(input);
        };
        let url = input
            .data
            .get("url")
            .and_then(Value::as_str)
            .unwrap_or("the requested page");

        let total = content.chars().count();
        let mut preview: String = content.chars().take(FETCH_PREVIEW_CHARS).collect();
        if total > FETCH_PREVIEW_CHARS {
            preview.push_str("...");
        }

        Summary::text(format!(
            "Fetched {url} ({total} chars of content). Preview: {}",
            preview.trim()
        ))
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(ToString::to_string)
}

// Normalizes "s3", "3" and 3 to "s3"; falls back to the 1-based position.
fn citation_id(raw: Option<&Value>, index: usize) -> String {
    let raw = match raw {
        Some(Value::String(id)) => id.trim().trim_start_matches(['s', 'S']).to_string(),
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    };
    if raw.is_empty() {
        format!("s{}", index + 1)
    } else {
        format!("s{raw}")
    }
}

#[derive(Clone)]
pub struct SummarizerTable {
    by_name: HashMap<String, Arc<dyn Summarizer>>,
    by_intent: HashMap<ToolIntent, Arc<dyn Summarizer>>,
    fallback: Arc<dyn Summarizer>,
}

impl Default for SummarizerTable {
    fn default() -> Self {
        Self::generic_only()
            .with_tool("web.search", SearchResultsSummarizer)
            .with_tool("web.fetch", FetchedPageSummarizer)
            .with_intent(ToolIntent::Search, SearchResultsSummarizer)
            .with_intent(ToolIntent::Fetch, FetchedPageSummarizer)
    }
}

impl SummarizerTable {
    pub fn generic_only() -> Self {
        Self {
            by_name: HashMap::new(),
            by_intent: HashMap::new(),
            fallback: Arc::new(GenericSummarizer),
        }
    }

    pub fn with_tool<S>(mut self, tool_name: impl Into<String>, summarizer: S) -> Self
    where
        S: Summarizer + 'static,
    {
        self.by_name.insert(tool_name.into(), Arc::new(summarizer));
        self
    }

    pub fn with_intent<S>(mut self, intent: ToolIntent, summarizer: S) -> Self
    where
        S: Summarizer + 'static,
    {
        self.by_intent.insert(intent, Arc::new(summarizer));
        self
    }

    pub fn with_fallback<S>(mut self, summarizer: S) -> Self
    where
        S: Summarizer + 'static,
    {
        self.fallback = Arc::new(summarizer);
        self
    }

    pub fn resolve(&self, request: &ToolCallRequest) -> &dyn Summarizer {
        let summarizer = self
            .by_name
            .get(&request.name)
            .or_else(|| self.by_intent.get(&request.intent))
            .unwrap_or(&self.fallback);
        &**summarizer
    }

    pub fn summarize(&self, input: &SummaryInput<'_>) -> Summary {
        self.resolve(input.request).summarize(input)
    }
}
