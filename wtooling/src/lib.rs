//! Capability layer: tool contracts, the catalog, and guarded invocation.

mod args;
mod catalog;
mod error;
mod request;
mod runtime;
mod tool;
mod types;

pub mod prelude {
    pub use crate::{
        CapabilityCatalog, CatalogBuilder, GuardedToolRuntime, Tool, ToolCallRequest,
        ToolDefinition, ToolError, ToolErrorKind, ToolExecutionContext, ToolFuture, ToolIntent,
        ToolOutcome, ToolPriority, ToolRuntime,
    };
}

pub use args::{optional_u64, parse_json_object, parse_json_value, required_string};
pub use catalog::{CapabilityCatalog, CatalogBuilder};
pub use error::{ToolError, ToolErrorKind};
pub use request::{ToolCallRequest, ToolIntent, ToolPriority};
pub use runtime::{GuardedToolRuntime, ToolRuntime};
pub use tool::{FunctionTool, Tool, ToolFuture};
pub use types::{OUTCOME_SCHEMA_VERSION, ToolDefinition, ToolExecutionContext, ToolOutcome};
