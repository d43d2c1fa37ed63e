//! Unified facade over the warden workspace crates.
//!
//! This crate is designed to be the single dependency for most applications.
//! It re-exports the capability, routing, and steward crates and adds
//! configuration loading, runtime wiring, simulated web tools, and macros
//! for building tool call requests.
//!
//! ```rust
//! use warden::{RecordStatus, ToolRouter, WardenConfig, build_router, warden_calls, web_catalog};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let router: ToolRouter = build_router(web_catalog(), &WardenConfig::default()).expect("router builds");
//! let calls = warden_calls!("run-1";
//!     "web.search" => {"q": "rust async", "num": 2};
//!     "web.fetch" => {"url": "https://tokio.rs"};
//! );
//!
//! let pack = router.execute(calls, "run-1").await;
//! assert_eq!(pack.records_with_status(RecordStatus::Executed).count(), 2);
//! # }
//! ```

mod config;
mod macros;

pub mod prelude;
pub mod runtime;
pub mod web;

pub use serde_json;
pub use wcommon;
pub use wrouter;
pub use wsteward;
pub use wtooling;

pub use config::{
    ConfigError, ConfigErrorKind, DEFAULT_MODEL_TIMEOUT_MS, StewardSettings, WardenConfig,
};
pub use wcommon::{BoxFuture, CallId, Clock, ManualClock, MetadataMap, RunId, SystemClock};
pub use wrouter::{
    CacheKey, CachePolicy, ConfidenceBasis, EvidencePack, EvidenceSource, KeyFact,
    NoopRouterHooks, OutcomeSanitizer, RateLimiter, RecordStatus, RejectionReason, ResultCache,
    RouterConfig, RouterError, RouterErrorKind, RouterHooks, SCRIPT_PLACEHOLDER, Summarizer,
    SummarizerTable, TRUNCATION_MARKER, ToolRouter, ToolRouterBuilder, UsageLimit, UsageLimits,
    UsageRecord, neutralize_markup, truncate_chars,
};
pub use wsteward::{
    Decision, NoopStewardHooks, SkippedCall, StewardAction, StewardError, StewardErrorKind,
    StewardFuture, StewardHooks, StewardModel, StewardPhase, StewardReport,
    parse_steward_output, render_deliberation_prompt, render_evidence_section,
    render_steward_prompt,
};
pub use wtooling::{
    CapabilityCatalog, CatalogBuilder, FunctionTool, GuardedToolRuntime, Tool, ToolCallRequest,
    ToolDefinition, ToolError, ToolErrorKind, ToolExecutionContext, ToolFuture, ToolIntent,
    ToolOutcome, ToolPriority, ToolRuntime, optional_u64, parse_json_object, parse_json_value,
    required_string,
};

pub use runtime::{
    RuntimeBundle, build_router, build_router_with_hooks, build_runtime, build_runtime_with,
    steward_phase, web_catalog,
};
pub use web::{
    WEB_FETCH, WEB_SEARCH, register_web_tools, web_fetch_definition, web_fetch_tool,
    web_search_definition, web_search_tool,
};

#[cfg(test)]
mod tests {
    use crate::{ToolIntent, ToolPriority};

    #[test]
    fn warden_call_macro_builds_request() {
        let call = crate::warden_call!("run-1", "web.fetch", {"url": "https://example.com"});
        assert_eq!(call.run_id.as_str(), "run-1");
        assert_eq!(call.arguments["url"], "https://example.com");
        assert_eq!(call.priority, ToolPriority::Normal);
        assert_eq!(call.intent, ToolIntent::Other);
    }

    #[test]
    fn warden_calls_macro_supports_priorities_and_empty_lists() {
        let calls = crate::warden_calls!("run-1";
            "web.search" => {"q": "a"}, low;
            "web.search" => {"q": "b"}, high;
        );
        assert_eq!(calls[0].priority, ToolPriority::Low);
        assert_eq!(calls[1].priority, ToolPriority::High);
        assert_ne!(calls[0].id, calls[1].id);

        let empty = crate::warden_calls!("run-1");
        assert!(empty.is_empty());
    }
}
