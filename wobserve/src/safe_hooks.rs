use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use wcommon::RunId;
use wrouter::{EvidencePack, RejectionReason, RouterHooks, UsageLimit};
use wsteward::{Decision, SkippedCall, StewardError, StewardHooks};
use wtooling::{ToolCallRequest, ToolError, ToolOutcome};

pub struct SafeRouterHooks<H> {
    inner: H,
}

impl<H> SafeRouterHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> RouterHooks for SafeRouterHooks<H>
where
    H: RouterHooks,
{
    fn on_run_start(&self, run_id: &RunId, call_count: usize) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_run_start(run_id, call_count)
        }));
    }

    fn on_call_rejected(&self, request: &ToolCallRequest, reason: RejectionReason) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_call_rejected(request, reason)
        }));
    }

    fn on_cache_hit(&self, request: &ToolCallRequest) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_cache_hit(request)));
    }

    fn on_execution_start(&self, request: &ToolCallRequest) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_execution_start(request)));
    }

    fn on_execution_success(
        &self,
        request: &ToolCallRequest,
        outcome: &ToolOutcome,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_execution_success(request, outcome, elapsed)
        }));
    }

    fn on_execution_failure(&self, request: &ToolCallRequest, error: &ToolError, elapsed: Duration) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_execution_failure(request, error, elapsed)
        }));
    }

    fn on_limit_triggered(&self, run_id: &RunId, limit: UsageLimit) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_limit_triggered(run_id, limit)
        }));
    }

    fn on_run_complete(&self, pack: &EvidencePack, elapsed: Duration) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_run_complete(pack, elapsed)
        }));
    }
}

pub struct SafeStewardHooks<H> {
    inner: H,
}

impl<H> SafeStewardHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> StewardHooks for SafeStewardHooks<H>
where
    H: StewardHooks,
{
    fn on_phase_start(&self, run_id: &RunId, query: &str) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_phase_start(run_id, query)));
    }

    fn on_model_failure(&self, run_id: &RunId, error: &StewardError) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_model_failure(run_id, error)
        }));
    }

    fn on_decision(&self, run_id: &RunId, decision: &Decision) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_decision(run_id, decision)));
    }

    fn on_call_skipped(&self, run_id: &RunId, skipped: &SkippedCall) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_call_skipped(run_id, skipped)
        }));
    }

    fn on_phase_complete(&self, run_id: &RunId, pack: &EvidencePack, elapsed: Duration) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_phase_complete(run_id, pack, elapsed)
        }));
    }
}
