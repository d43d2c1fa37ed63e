//! Common imports for most warden applications.

pub use crate::{
    build_router, build_router_with_hooks, build_runtime, build_runtime_with, register_web_tools,
    steward_phase, web_catalog,
};
pub use crate::{warden_call, warden_calls};
pub use crate::{
    CachePolicy, CapabilityCatalog, CatalogBuilder, ConfigError, Decision, EvidencePack,
    RecordStatus, RouterConfig, RouterHooks, RunId, RuntimeBundle, StewardAction, StewardError,
    StewardFuture, StewardHooks, StewardModel, StewardPhase, Tool, ToolCallRequest,
    ToolDefinition, ToolError, ToolExecutionContext, ToolOutcome, ToolPriority, ToolRouter,
    UsageRecord, WardenConfig, parse_steward_output, render_evidence_section,
};
