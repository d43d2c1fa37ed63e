//! Guarded tool invocation: every call resolves to a [`ToolOutcome`].
//!
//! Handler errors, panics, and (optionally) overruns are folded into failed
//! outcomes so callers never have to unwind or branch on the calling convention.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};

use futures_timer::Delay;
use futures_util::FutureExt;
use futures_util::future::{Either, select};
use serde_json::{Map, Value};

use crate::{Tool, ToolError, ToolExecutionContext, ToolFuture, ToolOutcome};

pub trait ToolRuntime: Send + Sync {
    fn invoke<'a>(
        &'a self,
        tool: &'a dyn Tool,
        arguments: &'a Map<String, Value>,
        context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, ToolOutcome>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GuardedToolRuntime {
    timeout: Option<Duration>,
}

impl GuardedToolRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl ToolRuntime for GuardedToolRuntime {
    fn invoke<'a>(
        &'a self,
        tool: &'a dyn Tool,
        arguments: &'a Map<String, Value>,
        context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, ToolOutcome> {
        Box::pin(async move {
            let tool_name = tool.definition().name.as_str();
            let started = Instant::now();
            // Sync handlers run inside `invoke` itself, so the call must happen under the guard.
            let guarded =
                AssertUnwindSafe(async move { tool.invoke(arguments, context).await }).catch_unwind();

            let result = match self.timeout {
                Some(limit) => match select(Box::pin(guarded), Delay::new(limit)).await {
                    Either::Left((result, _)) => result,
                    Either::Right(_) => {
                        let error = ToolError::timeout(format!(
                            "tool '{tool_name}' did not finish within {}ms",
                            limit.as_millis()
                        ));
                        return failed(tool_name, context, error, started);
                    }
                },
                None => guarded.await,
            };

            match result {
                Ok(Ok(outcome)) => {
                    let mut outcome = outcome.reassigned(context);
                    outcome
                        .meta
                        .entry("latency_ms")
                        .or_insert_with(|| elapsed_ms(started).into());
                    outcome
                }
                Ok(Err(error)) => failed(tool_name, context, error, started),
                Err(payload) => {
                    let error = ToolError::tool(format!(
                        "tool '{tool_name}' panicked: {}",
                        panic_message(payload.as_ref())
                    ))
                    .with_retryable(true);
                    failed(tool_name, context, error, started)
                }
            }
        })
    }
}

fn failed(
    tool_name: &str,
    context: &ToolExecutionContext,
    error: ToolError,
    started: Instant,
) -> ToolOutcome {
    let error = error
        .with_tool_name(tool_name)
        .with_tool_call_id(context.call_id.as_str());
    ToolOutcome::failure(context, error).with_meta("latency_ms", elapsed_ms(started))
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
