//! Admission control and sequential execution of requested tool calls.
//!
//! ```rust
//! use std::sync::Arc;
//! use serde_json::json;
//! use wrouter::{RouterConfig, ToolRouter};
//! use wtooling::{CapabilityCatalog, ToolCallRequest, ToolDefinition, ToolOutcome};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let catalog = CapabilityCatalog::builder()
//!     .register_sync_fn(
//!         ToolDefinition::new("calc.add", "Adds one", json!({"type": "object"})),
//!         |args, ctx| {
//!             let a = args.get("a").and_then(|v| v.as_i64()).unwrap_or(0);
//!             Ok(ToolOutcome::success(&ctx, json!(a + 1)))
//!         },
//!     )
//!     .build();
//! let router = ToolRouter::new(Arc::new(catalog), RouterConfig::default()).expect("valid config");
//!
//! let request = ToolCallRequest::new("run-1", "calc.add", json!({"a": 1}));
//! let pack = router.execute(vec![request], "run-1").await;
//! assert_eq!(pack.tools_used.len(), 1);
//! assert_eq!(pack.limits.calls_used, 1);
//! # }
//! ```

use std::sync::Arc;
use std::time::Instant;

use wcommon::{Clock, RunId, SystemClock};
use wtooling::{
    CapabilityCatalog, GuardedToolRuntime, ToolCallRequest, ToolError, ToolExecutionContext,
    ToolOutcome, ToolRuntime,
};

use crate::{
    CacheKey, CachePolicy, EvidencePack, NoopRouterHooks, OutcomeSanitizer, PENDING_QUERY,
    RateLimiter, RejectionReason, ResultCache, RouterConfig, RouterError, RouterHooks,
    SummarizerTable, UsageLimit, UsageLimits, UsageRecord,
};

pub struct ToolRouterBuilder {
    catalog: Option<Arc<CapabilityCatalog>>,
    cache: Option<Arc<ResultCache>>,
    rate_limiter: Option<Arc<RateLimiter>>,
    runtime: Option<Arc<dyn ToolRuntime>>,
    config: RouterConfig,
    cache_policy: CachePolicy,
    summarizers: SummarizerTable,
    hooks: Arc<dyn RouterHooks>,
    clock: Arc<dyn Clock>,
}

impl Default for ToolRouterBuilder {
    fn default() -> Self {
        Self {
            catalog: None,
            cache: None,
            rate_limiter: None,
            runtime: None,
            config: RouterConfig::default(),
            cache_policy: CachePolicy::default(),
            summarizers: SummarizerTable::default(),
            hooks: Arc::new(NoopRouterHooks),
            clock: Arc::new(SystemClock),
        }
    }
}

impl ToolRouterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalog(mut self, catalog: Arc<CapabilityCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Shares an existing cache, e.g. one cache across several routers.
    pub fn cache(mut self, cache: Arc<ResultCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn rate_limiter(mut self, rate_limiter: Arc<RateLimiter>) -> Self {
        self.rate_limiter = Some(rate_limiter);
        self
    }

    pub fn runtime(mut self, runtime: Arc<dyn ToolRuntime>) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn config(mut self, config: RouterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn cache_policy(mut self, cache_policy: CachePolicy) -> Self {
        self.cache_policy = cache_policy;
        self
    }

    pub fn summarizers(mut self, summarizers: SummarizerTable) -> Self {
        self.summarizers = summarizers;
        self
    }

    pub fn hooks(mut self, hooks: Arc<dyn RouterHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Time source for the default cache and rate limiter.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn build(self) -> Result<ToolRouter, RouterError> {
        self.config.validate()?;
        self.cache_policy.validate()?;
        let catalog = self.catalog.ok_or_else(|| {
            RouterError::missing_catalog("a capability catalog is required to build a router")
        })?;

        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(ResultCache::with_clock(Arc::clone(&self.clock))));
        let rate_limiter = self.rate_limiter.unwrap_or_else(|| {
            Arc::new(RateLimiter::with_clock(
                self.config.rate_limits.clone(),
                Arc::clone(&self.clock),
            ))
        });
        let runtime = self.runtime.unwrap_or_else(|| {
            let runtime = match self.config.call_timeout() {
                Some(timeout) => GuardedToolRuntime::new().with_timeout(timeout),
                None => GuardedToolRuntime::new(),
            };
            Arc::new(runtime)
        });

        Ok(ToolRouter {
            catalog,
            cache,
            rate_limiter,
            runtime,
            sanitizer: OutcomeSanitizer::new(self.config.max_raw_chars, self.summarizers),
            config: self.config,
            cache_policy: self.cache_policy,
            hooks: self.hooks,
        })
    }
}

/// Single entry point for running a steward decision's tool calls.
///
/// Calls within one run are admitted and executed strictly one at a time in
/// priority order; the router itself can be shared across concurrent runs.
pub struct ToolRouter {
    catalog: Arc<CapabilityCatalog>,
    cache: Arc<ResultCache>,
    rate_limiter: Arc<RateLimiter>,
    runtime: Arc<dyn ToolRuntime>,
    sanitizer: OutcomeSanitizer,
    config: RouterConfig,
    cache_policy: CachePolicy,
    hooks: Arc<dyn RouterHooks>,
}

impl ToolRouter {
    pub fn builder() -> ToolRouterBuilder {
        ToolRouterBuilder::new()
    }

    pub fn new(catalog: Arc<CapabilityCatalog>, config: RouterConfig) -> Result<Self, RouterError> {
        Self::builder().catalog(catalog).config(config).build()
    }

    pub fn catalog(&self) -> Arc<CapabilityCatalog> {
        Arc::clone(&self.catalog)
    }

    pub fn cache(&self) -> Arc<ResultCache> {
        Arc::clone(&self.cache)
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub async fn execute(
        &self,
        calls: Vec<ToolCallRequest>,
        run_id: impl Into<RunId>,
    ) -> EvidencePack {
        self.execute_for_query(calls, run_id, PENDING_QUERY).await
    }

    /// Runs every call through admission and returns one record per call.
    pub async fn execute_for_query(
        &self,
        mut calls: Vec<ToolCallRequest>,
        run_id: impl Into<RunId>,
        query: impl Into<String>,
    ) -> EvidencePack {
        let run_id = run_id.into();
        let started = Instant::now();
        self.hooks.on_run_start(&run_id, calls.len());

        // Stable: equal priorities keep the order the model proposed them in.
        calls.sort_by_key(|call| call.priority);

        let mut ledger = RunLedger::default();
        for request in &calls {
            self.admit(&run_id, request, &mut ledger).await;
        }

        let pack = ledger.finish(run_id, query.into(), self.config.max_calls_per_run);
        self.hooks.on_run_complete(&pack, started.elapsed());
        pack
    }

    async fn admit(&self, run_id: &RunId, request: &ToolCallRequest, ledger: &mut RunLedger) {
        if !self.config.is_allowed(&request.name) {
            return self.reject(run_id, request, RejectionReason::AccessDenied, ledger);
        }
        if ledger.evidence_exhausted {
            return self.reject(
                run_id,
                request,
                RejectionReason::EvidenceBudgetExhausted,
                ledger,
            );
        }
        if ledger.executed >= self.config.max_calls_per_run {
            self.trigger(run_id, UsageLimit::MaxCallsPerRun, ledger);
            return self.reject(run_id, request, RejectionReason::BudgetExceeded, ledger);
        }
        let Some(tool) = self.catalog.lookup(&request.name) else {
            return self.reject(run_id, request, RejectionReason::ToolNotFound, ledger);
        };

        let context = ToolExecutionContext::new(run_id.clone(), request.id.clone())
            .with_requested_by(request.requested_by.clone());
        let key = CacheKey::new(request.name.clone(), &request.arguments);

        let outcome = match self.cache.get(&key) {
            Some(hit) => {
                self.hooks.on_cache_hit(request);
                hit.reassigned(&context).with_meta("cached", true)
            }
            None => {
                if !self.rate_limiter.try_acquire(&request.name) {
                    self.trigger(run_id, UsageLimit::RateLimit, ledger);
                    return self.reject(run_id, request, RejectionReason::RateLimited, ledger);
                }

                self.hooks.on_execution_start(request);
                let started = Instant::now();
                let outcome = self
                    .runtime
                    .invoke(tool.as_ref(), &request.arguments, &context)
                    .await
                    .with_meta("cached", false);
                let elapsed = started.elapsed();

                match (&outcome.error, outcome.ok) {
                    (_, true) => {
                        self.hooks.on_execution_success(request, &outcome, elapsed);
                        self.cache.insert(
                            key,
                            outcome.clone(),
                            self.cache_policy.ttl_for(&request.name),
                        );
                    }
                    (Some(error), false) => {
                        self.hooks.on_execution_failure(request, error, elapsed);
                    }
                    (None, false) => {
                        let error = ToolError::tool("handler reported failure without an error");
                        self.hooks.on_execution_failure(request, &error, elapsed);
                    }
                }
                outcome
            }
        };

        let record = self.sanitizer.record(request, &outcome);
        ledger.push(record, outcome.ok);

        if !ledger.evidence_exhausted && ledger.evidence_chars >= self.config.max_evidence_chars {
            ledger.evidence_exhausted = true;
            self.trigger(run_id, UsageLimit::MaxEvidenceSize, ledger);
        }
    }

    fn reject(
        &self,
        run_id: &RunId,
        request: &ToolCallRequest,
        reason: RejectionReason,
        ledger: &mut RunLedger,
    ) {
        let error = match reason {
            RejectionReason::AccessDenied => ToolError::access_denied(format!(
                "tool '{}' is not in the allowlist",
                request.name
            )),
            RejectionReason::BudgetExceeded => ToolError::budget_exceeded(format!(
                "run reached max_calls_per_run ({})",
                self.config.max_calls_per_run
            )),
            RejectionReason::EvidenceBudgetExhausted => ToolError::budget_exceeded(format!(
                "run reached max_evidence_chars ({})",
                self.config.max_evidence_chars
            )),
            RejectionReason::ToolNotFound => {
                ToolError::validation(format!("tool '{}' is not registered", request.name))
            }
            RejectionReason::RateLimited => ToolError::rate_limited(format!(
                "tool '{}' exceeded its per-minute call limit",
                request.name
            )),
        };
        let context = ToolExecutionContext::new(run_id.clone(), request.id.clone());
        let outcome = ToolOutcome::failure(&context, error.with_tool_name(request.name.clone()));

        self.hooks.on_call_rejected(request, reason);
        let record = self.sanitizer.rejected(request, reason, &outcome);
        ledger.push(record, false);
    }

    fn trigger(&self, run_id: &RunId, limit: UsageLimit, ledger: &mut RunLedger) {
        if ledger.trigger(limit) {
            self.hooks.on_limit_triggered(run_id, limit);
        }
    }
}

/// Append-only per-run state folded between calls.
#[derive(Default)]
struct RunLedger {
    records: Vec<UsageRecord>,
    limits: Vec<UsageLimit>,
    executed: usize,
    evidence_chars: usize,
    evidence_exhausted: bool,
}

impl RunLedger {
    fn push(&mut self, record: UsageRecord, executed: bool) {
        if executed {
            self.executed += 1;
            self.evidence_chars += record.evidence_chars();
        }
        self.records.push(record);
    }

    fn trigger(&mut self, limit: UsageLimit) -> bool {
        if self.limits.contains(&limit) {
            return false;
        }
        self.limits.push(limit);
        true
    }

    fn finish(self, run_id: RunId, query: String, max_calls: usize) -> EvidencePack {
        let limits = UsageLimits {
            max_calls,
            calls_used: self.executed,
            limits_triggered: self
                .limits
                .iter()
                .map(|limit| limit.as_str().to_string())
                .collect(),
        };
        EvidencePack::new(run_id, query, self.records, limits)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wtooling::{ToolDefinition, ToolPriority};

    use super::*;
    use crate::{RecordStatus, RouterErrorKind};

    fn echo_catalog() -> Arc<CapabilityCatalog> {
        let catalog = CapabilityCatalog::builder()
            .register_sync_fn(
                ToolDefinition::new("echo", "Echoes its arguments", json!({"type": "object"})),
                |args, ctx| Ok(ToolOutcome::success(&ctx, serde_json::Value::Object(args))),
            )
            .build();
        Arc::new(catalog)
    }

    #[test]
    fn build_requires_a_catalog() {
        let error = match ToolRouter::builder().build() {
            Ok(_) => panic!("router without catalog should not build"),
            Err(error) => error,
        };
        assert_eq!(error.kind, RouterErrorKind::MissingCatalog);
    }

    #[test]
    fn build_validates_config() {
        let result = ToolRouter::new(
            echo_catalog(),
            RouterConfig::default().with_max_raw_chars(0),
        );
        assert!(matches!(
            result,
            Err(RouterError {
                kind: RouterErrorKind::InvalidConfig,
                ..
            })
        ));
    }

    #[test]
    fn build_rejects_unbounded_cache_ttls() {
        let policy: CachePolicy =
            serde_json::from_str(r#"{"default_ttl_secs": 18446744073709551615, "rules": []}"#)
                .expect("policy deserializes");
        let error = match ToolRouter::builder()
            .catalog(echo_catalog())
            .cache_policy(policy)
            .build()
        {
            Ok(_) => panic!("unbounded TTL should not build"),
            Err(error) => error,
        };
        assert_eq!(error.kind, RouterErrorKind::InvalidConfig);
    }

    #[tokio::test]
    async fn longest_cache_ttl_still_executes_and_caches() {
        let router = ToolRouter::builder()
            .catalog(echo_catalog())
            .cache_policy(
                CachePolicy::default()
                    .with_default_ttl(std::time::Duration::from_secs(crate::MAX_CACHE_TTL_SECS)),
            )
            .build()
            .expect("router builds");

        let first = router
            .execute(vec![ToolCallRequest::new("run-1", "echo", json!({"n": 1}))], "run-1")
            .await;
        let second = router
            .execute(vec![ToolCallRequest::new("run-2", "echo", json!({"n": 1}))], "run-2")
            .await;

        assert_eq!(first.tools_used[0].status, RecordStatus::Executed);
        assert!(second.tools_used[0].is_cached());
    }

    #[test]
    fn ledger_deduplicates_limits_in_trigger_order() {
        let mut ledger = RunLedger::default();
        assert!(ledger.trigger(UsageLimit::MaxEvidenceSize));
        assert!(ledger.trigger(UsageLimit::MaxCallsPerRun));
        assert!(!ledger.trigger(UsageLimit::MaxEvidenceSize));

        let pack = ledger.finish(RunId::from("run-1"), PENDING_QUERY.to_string(), 3);
        assert_eq!(
            pack.limits.limits_triggered,
            vec!["max_evidence_size", "max_calls_per_run"]
        );
        assert_eq!(pack.limits.max_calls, 3);
        assert_eq!(pack.query, PENDING_QUERY);
    }

    #[tokio::test]
    async fn allowlist_rejection_applies_before_budget() {
        let router = ToolRouter::new(
            echo_catalog(),
            RouterConfig::default()
                .with_allowlist(["echo"])
                .with_max_calls_per_run(1),
        )
        .expect("router builds");

        let calls = vec![
            ToolCallRequest::new("run-1", "echo", json!({"n": 1})).with_id("a"),
            ToolCallRequest::new("run-1", "shell.exec", json!({})).with_id("b"),
            ToolCallRequest::new("run-1", "echo", json!({"n": 2})).with_id("c"),
        ];
        let pack = router.execute(calls, "run-1").await;

        let reasons: Vec<_> = pack
            .tools_used
            .iter()
            .map(|record| record.rejection_reason())
            .collect();
        assert_eq!(reasons, vec![None, Some("access_denied"), Some("budget_exceeded")]);
        assert_eq!(pack.limits.calls_used, 1);
        assert_eq!(pack.limits.limits_triggered, vec!["max_calls_per_run"]);
    }

    #[tokio::test]
    async fn unknown_tools_are_rejected_without_consuming_budget() {
        let router = ToolRouter::new(echo_catalog(), RouterConfig::default().with_max_calls_per_run(1))
            .expect("router builds");

        let calls = vec![
            ToolCallRequest::new("run-1", "missing.tool", json!({}))
                .with_priority(ToolPriority::High)
                .with_id("missing"),
            ToolCallRequest::new("run-1", "echo", json!({})).with_id("echo"),
        ];
        let pack = router.execute(calls, "run-1").await;

        let missing = pack
            .record_for(&"missing".into())
            .expect("missing tool has a record");
        assert_eq!(missing.status, RecordStatus::Rejected);
        assert_eq!(missing.rejection_reason(), Some("tool_not_found"));
        assert_eq!(missing.meta["error_kind"], "validation_error");

        let echo = pack.record_for(&"echo".into()).expect("echo has a record");
        assert_eq!(echo.status, RecordStatus::Executed);
        assert!(pack.limits.limits_triggered.is_empty());
    }
}
