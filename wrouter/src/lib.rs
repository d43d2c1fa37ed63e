//! Execution control plane: admission, budgets, caching, and evidence assembly.
//!
//! The router takes the tool calls a steward decided on, orders them by
//! priority, and admits each one against the allowlist, the per-run call and
//! evidence budgets, the catalog, the result cache, and per-tool rate limits.
//! Every requested call leaves exactly one [`UsageRecord`] in the resulting
//! [`EvidencePack`], whether it ran, failed, or was rejected.

mod cache;
mod config;
mod error;
mod evidence;
mod hooks;
mod rate_limit;
mod router;
mod sanitize;
mod summarize;

pub mod prelude {
    pub use crate::{
        CachePolicy, EvidencePack, RecordStatus, RejectionReason, ResultCache, RouterConfig,
        RouterError, RouterHooks, ToolRouter, ToolRouterBuilder, UsageLimit, UsageRecord,
    };
}

pub use cache::{
    CacheKey, CachePolicy, DEFAULT_CACHE_TTL_SECS, MAX_CACHE_TTL_SECS, ResultCache,
    SEARCH_CACHE_TTL_SECS, TtlRule,
};
pub use config::{
    DEFAULT_MAX_CALLS_PER_RUN, DEFAULT_MAX_EVIDENCE_CHARS, DEFAULT_MAX_RAW_CHARS, RouterConfig,
};
pub use error::{RouterError, RouterErrorKind};
pub use evidence::{
    ConfidenceBasis, EVIDENCE_SCHEMA_VERSION, EvidencePack, EvidenceSource, KeyFact,
    PENDING_QUERY, RecordStatus, RejectionReason, UsageLimit, UsageLimits, UsageRecord,
};
pub use hooks::{NoopRouterHooks, RouterHooks};
pub use rate_limit::RateLimiter;
pub use router::{ToolRouter, ToolRouterBuilder};
pub use sanitize::{
    MAX_SOURCES_PER_RECORD, OutcomeSanitizer, SCRIPT_PLACEHOLDER, TRUNCATION_MARKER,
    neutralize_markup, truncate_chars,
};
pub use summarize::{
    FetchedPageSummarizer, GenericSummarizer, SearchResultsSummarizer, Summarizer,
    SummarizerTable, Summary, SummaryInput,
};
