//! Production-friendly observability hooks for router admission and the steward phase.
//!
//! ```rust
//! use std::sync::Arc;
//! use wobserve::{MetricsObservabilityHooks, SafeRouterHooks, TracingObservabilityHooks};
//! use wrouter::RouterHooks;
//!
//! let _router_hooks: Arc<dyn RouterHooks> = Arc::new(SafeRouterHooks::new(TracingObservabilityHooks));
//! let _metrics = MetricsObservabilityHooks;
//! ```

mod metrics_hooks;
mod safe_hooks;
mod tracing_hooks;

pub use metrics_hooks::MetricsObservabilityHooks;
pub use safe_hooks::{SafeRouterHooks, SafeStewardHooks};
pub use tracing_hooks::TracingObservabilityHooks;

pub mod prelude {
    pub use crate::{
        MetricsObservabilityHooks, SafeRouterHooks, SafeStewardHooks, TracingObservabilityHooks,
    };
}
