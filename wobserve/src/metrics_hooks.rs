//! Metrics-based observability hooks for router admission and the steward phase.
//!
//! ```rust
//! use wobserve::MetricsObservabilityHooks;
//! use wsteward::StewardHooks;
//!
//! fn accepts_steward_hooks(_hooks: &dyn StewardHooks) {}
//!
//! let hooks = MetricsObservabilityHooks;
//! accepts_steward_hooks(&hooks);
//! ```

use std::time::Duration;

use wcommon::RunId;
use wrouter::{EvidencePack, RecordStatus, RejectionReason, RouterHooks, UsageLimit};
use wsteward::{Decision, SkippedCall, StewardError, StewardHooks};
use wtooling::{ToolCallRequest, ToolError, ToolOutcome};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObservabilityHooks;

impl RouterHooks for MetricsObservabilityHooks {
    fn on_run_start(&self, _run_id: &RunId, call_count: usize) {
        metrics::counter!("warden_router_run_start_total").increment(1);
        metrics::histogram!("warden_router_requested_calls").record(call_count as f64);
    }

    fn on_call_rejected(&self, request: &ToolCallRequest, reason: RejectionReason) {
        metrics::counter!(
            "warden_router_call_rejected_total",
            "tool_name" => request.name.clone(),
            "reason" => reason.as_str()
        )
        .increment(1);
    }

    fn on_cache_hit(&self, request: &ToolCallRequest) {
        metrics::counter!(
            "warden_router_cache_hit_total",
            "tool_name" => request.name.clone()
        )
        .increment(1);
    }

    fn on_execution_start(&self, request: &ToolCallRequest) {
        metrics::counter!(
            "warden_tool_execution_start_total",
            "tool_name" => request.name.clone()
        )
        .increment(1);
    }

    fn on_execution_success(
        &self,
        request: &ToolCallRequest,
        _outcome: &ToolOutcome,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "warden_tool_execution_success_total",
            "tool_name" => request.name.clone()
        )
        .increment(1);
        metrics::histogram!(
            "warden_tool_execution_duration_seconds",
            "tool_name" => request.name.clone(),
            "status" => "success"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_execution_failure(&self, request: &ToolCallRequest, error: &ToolError, elapsed: Duration) {
        metrics::counter!(
            "warden_tool_execution_failure_total",
            "tool_name" => request.name.clone(),
            "error_kind" => error.kind.as_str()
        )
        .increment(1);
        metrics::histogram!(
            "warden_tool_execution_duration_seconds",
            "tool_name" => request.name.clone(),
            "status" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_limit_triggered(&self, _run_id: &RunId, limit: UsageLimit) {
        metrics::counter!(
            "warden_router_limit_triggered_total",
            "limit" => limit.as_str()
        )
        .increment(1);
    }

    fn on_run_complete(&self, pack: &EvidencePack, elapsed: Duration) {
        metrics::counter!("warden_router_run_complete_total").increment(1);
        metrics::histogram!("warden_router_run_duration_seconds").record(elapsed.as_secs_f64());
        metrics::histogram!("warden_router_calls_used").record(pack.limits.calls_used as f64);
        metrics::histogram!("warden_router_evidence_chars").record(pack.total_evidence_chars() as f64);
        metrics::histogram!("warden_router_cached_records").record(
            pack.records_with_status(RecordStatus::Executed)
                .filter(|record| record.is_cached())
                .count() as f64,
        );
    }
}

impl StewardHooks for MetricsObservabilityHooks {
    fn on_phase_start(&self, _run_id: &RunId, _query: &str) {
        metrics::counter!("warden_steward_phase_start_total").increment(1);
    }

    fn on_model_failure(&self, _run_id: &RunId, error: &StewardError) {
        metrics::counter!(
            "warden_steward_model_failure_total",
            "error_kind" => error.kind.as_str()
        )
        .increment(1);
    }

    fn on_decision(&self, _run_id: &RunId, decision: &Decision) {
        metrics::counter!(
            "warden_steward_decision_total",
            "action" => decision.action.as_str()
        )
        .increment(1);
    }

    fn on_call_skipped(&self, _run_id: &RunId, _skipped: &SkippedCall) {
        metrics::counter!("warden_steward_call_skipped_total").increment(1);
    }

    fn on_phase_complete(&self, _run_id: &RunId, _pack: &EvidencePack, elapsed: Duration) {
        metrics::histogram!("warden_steward_phase_duration_seconds").record(elapsed.as_secs_f64());
    }
}
