//! Lifecycle hooks for the steward phase.

use std::time::Duration;

use wcommon::RunId;
use wrouter::EvidencePack;

use crate::{Decision, SkippedCall, StewardError};

pub trait StewardHooks: Send + Sync {
    fn on_phase_start(&self, _run_id: &RunId, _query: &str) {}

    fn on_model_failure(&self, _run_id: &RunId, _error: &StewardError) {}

    fn on_decision(&self, _run_id: &RunId, _decision: &Decision) {}

    fn on_call_skipped(&self, _run_id: &RunId, _skipped: &SkippedCall) {}

    fn on_phase_complete(&self, _run_id: &RunId, _pack: &EvidencePack, _elapsed: Duration) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopStewardHooks;

impl StewardHooks for NoopStewardHooks {}
