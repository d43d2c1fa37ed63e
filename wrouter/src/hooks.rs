//! Lifecycle hooks for router admission and execution events.
//!
//! ```rust
//! use wrouter::{NoopRouterHooks, RouterHooks};
//!
//! fn assert_hooks_trait(_hooks: &dyn RouterHooks) {}
//!
//! let hooks = NoopRouterHooks;
//! assert_hooks_trait(&hooks);
//! ```

use std::time::Duration;

use wcommon::RunId;
use wtooling::{ToolCallRequest, ToolError, ToolOutcome};

use crate::{EvidencePack, RejectionReason, UsageLimit};

pub trait RouterHooks: Send + Sync {
    fn on_run_start(&self, _run_id: &RunId, _call_count: usize) {}

    fn on_call_rejected(&self, _request: &ToolCallRequest, _reason: RejectionReason) {}

    fn on_cache_hit(&self, _request: &ToolCallRequest) {}

    fn on_execution_start(&self, _request: &ToolCallRequest) {}

    fn on_execution_success(
        &self,
        _request: &ToolCallRequest,
        _outcome: &ToolOutcome,
        _elapsed: Duration,
    ) {
    }

    fn on_execution_failure(
        &self,
        _request: &ToolCallRequest,
        _error: &ToolError,
        _elapsed: Duration,
    ) {
    }

    fn on_limit_triggered(&self, _run_id: &RunId, _limit: UsageLimit) {}

    fn on_run_complete(&self, _pack: &EvidencePack, _elapsed: Duration) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRouterHooks;

impl RouterHooks for NoopRouterHooks {}
