//! Tracing-based observability hooks for router admission and the steward phase.
//!
//! ```rust
//! use wobserve::TracingObservabilityHooks;
//! use wrouter::RouterHooks;
//!
//! fn accepts_router_hooks(_hooks: &dyn RouterHooks) {}
//!
//! let hooks = TracingObservabilityHooks;
//! accepts_router_hooks(&hooks);
//! ```

use std::time::Duration;

use wcommon::RunId;
use wrouter::{EvidencePack, RejectionReason, RouterHooks, UsageLimit};
use wsteward::{Decision, SkippedCall, StewardError, StewardHooks};
use wtooling::{ToolCallRequest, ToolError, ToolOutcome};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObservabilityHooks;

impl RouterHooks for TracingObservabilityHooks {
    fn on_run_start(&self, run_id: &RunId, call_count: usize) {
        tracing::info!(
            phase = "router",
            event = "run_start",
            run_id = %run_id,
            call_count
        );
    }

    fn on_call_rejected(&self, request: &ToolCallRequest, reason: RejectionReason) {
        tracing::warn!(
            phase = "router",
            event = "call_rejected",
            run_id = %request.run_id,
            call_id = %request.id,
            tool_name = request.name,
            priority = request.priority.as_str(),
            reason = reason.as_str()
        );
    }

    fn on_cache_hit(&self, request: &ToolCallRequest) {
        tracing::debug!(
            phase = "router",
            event = "cache_hit",
            run_id = %request.run_id,
            call_id = %request.id,
            tool_name = request.name
        );
    }

    fn on_execution_start(&self, request: &ToolCallRequest) {
        tracing::info!(
            phase = "tool",
            event = "execution_start",
            run_id = %request.run_id,
            call_id = %request.id,
            tool_name = request.name,
            intent = request.intent.as_str(),
            purpose = request.purpose
        );
    }

    fn on_execution_success(
        &self,
        request: &ToolCallRequest,
        _outcome: &ToolOutcome,
        elapsed: Duration,
    ) {
        tracing::info!(
            phase = "tool",
            event = "execution_success",
            run_id = %request.run_id,
            call_id = %request.id,
            tool_name = request.name,
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_execution_failure(&self, request: &ToolCallRequest, error: &ToolError, elapsed: Duration) {
        tracing::error!(
            phase = "tool",
            event = "execution_failure",
            run_id = %request.run_id,
            call_id = %request.id,
            tool_name = request.name,
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = error.kind.as_str(),
            retryable = error.retryable,
            error = %error
        );
    }

    fn on_limit_triggered(&self, run_id: &RunId, limit: UsageLimit) {
        tracing::warn!(
            phase = "router",
            event = "limit_triggered",
            run_id = %run_id,
            limit = limit.as_str()
        );
    }

    fn on_run_complete(&self, pack: &EvidencePack, elapsed: Duration) {
        tracing::info!(
            phase = "router",
            event = "run_complete",
            run_id = %pack.run_id,
            records = pack.tools_used.len(),
            calls_used = pack.limits.calls_used,
            max_calls = pack.limits.max_calls,
            limits_triggered = ?pack.limits.limits_triggered,
            elapsed_ms = elapsed.as_millis() as u64
        );
    }
}

impl StewardHooks for TracingObservabilityHooks {
    fn on_phase_start(&self, run_id: &RunId, query: &str) {
        tracing::info!(
            phase = "steward",
            event = "phase_start",
            run_id = %run_id,
            query_chars = query.chars().count()
        );
    }

    fn on_model_failure(&self, run_id: &RunId, error: &StewardError) {
        tracing::error!(
            phase = "steward",
            event = "model_failure",
            run_id = %run_id,
            error_kind = error.kind.as_str(),
            retryable = error.retryable,
            error = %error
        );
    }

    fn on_decision(&self, run_id: &RunId, decision: &Decision) {
        tracing::info!(
            phase = "steward",
            event = "decision",
            run_id = %run_id,
            action = decision.action.as_str(),
            reason = decision.reason.as_deref(),
            calls = decision.calls.len()
        );
    }

    fn on_call_skipped(&self, run_id: &RunId, skipped: &SkippedCall) {
        tracing::warn!(
            phase = "steward",
            event = "call_skipped",
            run_id = %run_id,
            index = skipped.index,
            reason = skipped.reason
        );
    }

    fn on_phase_complete(&self, run_id: &RunId, pack: &EvidencePack, elapsed: Duration) {
        tracing::info!(
            phase = "steward",
            event = "phase_complete",
            run_id = %run_id,
            records = pack.tools_used.len(),
            calls_used = pack.limits.calls_used,
            elapsed_ms = elapsed.as_millis() as u64
        );
    }
}
