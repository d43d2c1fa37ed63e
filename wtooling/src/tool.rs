//! Tool trait contract for catalog-managed capabilities.
//!
//! ```rust
//! use serde_json::json;
//! use wtooling::{FunctionTool, Tool, ToolDefinition, ToolOutcome};
//!
//! let tool = FunctionTool::new(
//!     ToolDefinition::new("echo", "Echoes input", json!({"type": "object"})),
//!     |args, ctx| async move { Ok(ToolOutcome::success(&ctx, args.into())) },
//! );
//!
//! assert_eq!(tool.definition().name, "echo");
//! ```

use std::future::Future;
use std::sync::Arc;

use serde_json::{Map, Value};
use wcommon::BoxFuture;

use crate::{ToolDefinition, ToolError, ToolExecutionContext, ToolOutcome};

pub type ToolFuture<'a, T> = BoxFuture<'a, T>;

/// Handler contract. Implementations must tolerate repeated calls with identical
/// arguments since results may be served from cache.
pub trait Tool: Send + Sync {
    fn definition(&self) -> &ToolDefinition;

    fn invoke<'a>(
        &'a self,
        arguments: &'a Map<String, Value>,
        context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, Result<ToolOutcome, ToolError>>;
}

type ToolHandler = dyn Fn(
        Map<String, Value>,
        ToolExecutionContext,
    ) -> ToolFuture<'static, Result<ToolOutcome, ToolError>>
    + Send
    + Sync;

pub struct FunctionTool {
    definition: ToolDefinition,
    handler: Arc<ToolHandler>,
}

impl FunctionTool {
    pub fn new<F, Fut>(definition: ToolDefinition, handler: F) -> Self
    where
        F: Fn(Map<String, Value>, ToolExecutionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ToolOutcome, ToolError>> + Send + 'static,
    {
        let handler: Arc<ToolHandler> =
            Arc::new(move |arguments, context| Box::pin(handler(arguments, context)));

        Self {
            definition,
            handler,
        }
    }

    /// Adapts a blocking handler to the uniform future-returning contract.
    pub fn from_sync<F>(definition: ToolDefinition, handler: F) -> Self
    where
        F: Fn(Map<String, Value>, ToolExecutionContext) -> Result<ToolOutcome, ToolError>
            + Send
            + Sync
            + 'static,
    {
        Self::new(definition, move |arguments, context| {
            let outcome = handler(arguments, context);
            async move { outcome }
        })
    }
}

impl Tool for FunctionTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    fn invoke<'a>(
        &'a self,
        arguments: &'a Map<String, Value>,
        context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, Result<ToolOutcome, ToolError>> {
        (self.handler)(arguments.clone(), context.clone())
    }
}
