//! The steward phase: ask the model, parse its decision, run the calls.
//!
//! ```rust
//! use std::sync::Arc;
//! use serde_json::json;
//! use wrouter::{RouterConfig, ToolRouter};
//! use wsteward::{StewardError, StewardFuture, StewardModel, StewardPhase};
//! use wtooling::{CapabilityCatalog, ToolDefinition, ToolOutcome};
//!
//! struct ScriptedModel;
//!
//! impl StewardModel for ScriptedModel {
//!     fn name(&self) -> &str {
//!         "scripted"
//!     }
//!
//!     fn decide<'a>(&'a self, _prompt: &'a str) -> StewardFuture<'a, Result<String, StewardError>> {
//!         Box::pin(async { Ok(r#"{"action": "use_tools", "calls": [{"name": "clock.now"}]}"#.to_string()) })
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let catalog = CapabilityCatalog::builder()
//!     .register_sync_fn(
//!         ToolDefinition::new("clock.now", "Current time", json!({})),
//!         |_args, ctx| Ok(ToolOutcome::success(&ctx, json!("12:00"))),
//!     )
//!     .build();
//! let router = ToolRouter::new(Arc::new(catalog), RouterConfig::default()).expect("valid config");
//! let phase = StewardPhase::new(Arc::new(ScriptedModel), Arc::new(router));
//!
//! let report = phase.run("What time is it?", "run-1").await;
//! assert_eq!(report.pack.limits.calls_used, 1);
//! assert_eq!(report.pack.query, "What time is it?");
//! # }
//! ```

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_timer::Delay;
use futures_util::FutureExt;
use futures_util::future::{Either, select};
use wcommon::{BoxFuture, RunId};
use wrouter::{EvidencePack, ToolRouter};

use crate::{
    Decision, MODEL_UNAVAILABLE, NoopStewardHooks, SkippedCall, StewardError, StewardHooks,
    parse_steward_output, render_steward_prompt,
};

pub type StewardFuture<'a, T> = BoxFuture<'a, T>;

/// The language model that makes the tool-use decision.
pub trait StewardModel: Send + Sync {
    /// Recorded as `requested_by` on every request the model proposes.
    fn name(&self) -> &str;

    fn decide<'a>(&'a self, prompt: &'a str) -> StewardFuture<'a, Result<String, StewardError>>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct StewardReport {
    pub decision: Decision,
    pub skipped_calls: Vec<SkippedCall>,
    pub pack: EvidencePack,
}

pub struct StewardPhase {
    model: Arc<dyn StewardModel>,
    router: Arc<ToolRouter>,
    hooks: Arc<dyn StewardHooks>,
    model_timeout: Option<Duration>,
}

impl StewardPhase {
    pub fn new(model: Arc<dyn StewardModel>, router: Arc<ToolRouter>) -> Self {
        Self {
            model,
            router,
            hooks: Arc::new(NoopStewardHooks),
            model_timeout: None,
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn StewardHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_model_timeout(mut self, timeout: Duration) -> Self {
        self.model_timeout = Some(timeout);
        self
    }

    pub fn router(&self) -> Arc<ToolRouter> {
        Arc::clone(&self.router)
    }

    /// Runs the phase for one query. Model failures and `no_tools`
    /// decisions produce an empty pack rather than an error.
    pub async fn run(&self, query: &str, run_id: impl Into<RunId>) -> StewardReport {
        let run_id = run_id.into();
        let started = Instant::now();
        self.hooks.on_phase_start(&run_id, query);

        let prompt = render_steward_prompt(query, &self.router.catalog());
        let decision = match self.ask_model(&prompt).await {
            Ok(text) => parse_steward_output(&text),
            Err(error) => {
                self.hooks.on_model_failure(&run_id, &error);
                Decision::no_tools(MODEL_UNAVAILABLE)
            }
        };
        self.hooks.on_decision(&run_id, &decision);

        let (requests, skipped_calls) = if decision.wants_tools() {
            decision
                .clone()
                .into_requests(run_id.clone(), self.model.name())
        } else {
            (Vec::new(), Vec::new())
        };
        for skipped in &skipped_calls {
            self.hooks.on_call_skipped(&run_id, skipped);
        }

        let pack = if requests.is_empty() {
            EvidencePack::empty(run_id.clone(), query)
        } else {
            self.router
                .execute_for_query(requests, run_id.clone(), query)
                .await
        };

        self.hooks
            .on_phase_complete(&run_id, &pack, started.elapsed());
        StewardReport {
            decision,
            skipped_calls,
            pack,
        }
    }

    async fn ask_model(&self, prompt: &str) -> Result<String, StewardError> {
        let guarded = AssertUnwindSafe(self.model.decide(prompt)).catch_unwind();
        let result = match self.model_timeout {
            Some(limit) => match select(guarded, Delay::new(limit)).await {
                Either::Left((result, _)) => result,
                Either::Right(_) => {
                    return Err(StewardError::timeout(format!(
                        "model '{}' did not decide within {}ms",
                        self.model.name(),
                        limit.as_millis()
                    )));
                }
            },
            None => guarded.await,
        };

        result.unwrap_or_else(|_| {
            Err(StewardError::other(format!(
                "model '{}' panicked while deciding",
                self.model.name()
            )))
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wrouter::RouterConfig;
    use wtooling::{CapabilityCatalog, ToolDefinition, ToolOutcome};

    use super::*;
    use crate::StewardAction;

    struct FixedModel(Result<&'static str, StewardError>);

    impl StewardModel for FixedModel {
        fn name(&self) -> &str {
            "fixed"
        }

        fn decide<'a>(
            &'a self,
            _prompt: &'a str,
        ) -> StewardFuture<'a, Result<String, StewardError>> {
            let result = self.0.clone().map(ToString::to_string);
            Box::pin(async move { result })
        }
    }

    struct SlowModel;

    impl StewardModel for SlowModel {
        fn name(&self) -> &str {
            "slow"
        }

        fn decide<'a>(
            &'a self,
            _prompt: &'a str,
        ) -> StewardFuture<'a, Result<String, StewardError>> {
            Box::pin(async {
                Delay::new(Duration::from_secs(5)).await;
                Ok("{\"action\": \"no_tools\"}".to_string())
            })
        }
    }

    fn router() -> Arc<ToolRouter> {
        let catalog = CapabilityCatalog::builder()
            .register_sync_fn(
                ToolDefinition::new("echo", "Echo", json!({"type": "object"})),
                |args, ctx| Ok(ToolOutcome::success(&ctx, serde_json::Value::Object(args))),
            )
            .build();
        Arc::new(ToolRouter::new(Arc::new(catalog), RouterConfig::default()).expect("router builds"))
    }

    #[tokio::test]
    async fn model_failure_yields_empty_pack_with_query() {
        let phase = StewardPhase::new(
            Arc::new(FixedModel(Err(StewardError::unavailable("503")))),
            router(),
        );

        let report = phase.run("hello?", "run-1").await;
        assert_eq!(report.decision.reason.as_deref(), Some(MODEL_UNAVAILABLE));
        assert!(report.pack.tools_used.is_empty());
        assert_eq!(report.pack.query, "hello?");
    }

    #[tokio::test]
    async fn slow_models_time_out() {
        let phase = StewardPhase::new(Arc::new(SlowModel), router())
            .with_model_timeout(Duration::from_millis(10));

        let report = phase.run("hello?", "run-1").await;
        assert_eq!(report.decision.action, StewardAction::NoTools);
        assert_eq!(report.decision.reason.as_deref(), Some(MODEL_UNAVAILABLE));
    }

    #[tokio::test]
    async fn requests_carry_model_name_and_skips_are_reported() {
        let phase = StewardPhase::new(
            Arc::new(FixedModel(Ok(
                r#"{"action": "use_tools", "calls": [{"name": "echo", "arguments": {"x": 1}}, {"purpose": "nameless"}]}"#,
            ))),
            router(),
        );

        let report = phase.run("echo this", "run-1").await;
        assert_eq!(report.pack.tools_used.len(), 1);
        assert_eq!(report.pack.limits.calls_used, 1);
        assert_eq!(report.skipped_calls.len(), 1);
        assert_eq!(report.skipped_calls[0].index, 1);
        assert_eq!(report.pack.query, "echo this");
    }
}
