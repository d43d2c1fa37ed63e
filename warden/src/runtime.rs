//! Runtime wiring helpers for router and steward usage.

use std::sync::Arc;

use crate::{
    CapabilityCatalog, ConfigError, NoopRouterHooks, NoopStewardHooks, RouterHooks,
    StewardHooks, StewardModel, StewardPhase, ToolRouter, WardenConfig, register_web_tools,
};

#[derive(Clone)]
pub struct RuntimeBundle {
    pub catalog: Arc<CapabilityCatalog>,
    pub router: Arc<ToolRouter>,
    pub steward: Arc<StewardPhase>,
}

/// Catalog holding the simulated `web.search` and `web.fetch` tools.
pub fn web_catalog() -> Arc<CapabilityCatalog> {
    Arc::new(register_web_tools(CapabilityCatalog::builder()).build())
}

pub fn build_router(
    catalog: Arc<CapabilityCatalog>,
    config: &WardenConfig,
) -> Result<ToolRouter, ConfigError> {
    build_router_with_hooks(catalog, config, Arc::new(NoopRouterHooks))
}

pub fn build_router_with_hooks(
    catalog: Arc<CapabilityCatalog>,
    config: &WardenConfig,
    hooks: Arc<dyn RouterHooks>,
) -> Result<ToolRouter, ConfigError> {
    config.validate()?;
    let router = ToolRouter::builder()
        .catalog(catalog)
        .config(config.router.clone())
        .cache_policy(config.cache.clone())
        .hooks(hooks)
        .build()?;
    Ok(router)
}

pub fn steward_phase(
    model: Arc<dyn StewardModel>,
    router: Arc<ToolRouter>,
    config: &WardenConfig,
) -> StewardPhase {
    let phase = StewardPhase::new(model, router);
    match config.steward.model_timeout() {
        Some(timeout) => phase.with_model_timeout(timeout),
        None => phase,
    }
}

pub fn build_runtime(
    model: Arc<dyn StewardModel>,
    config: &WardenConfig,
) -> Result<RuntimeBundle, ConfigError> {
    build_runtime_with(
        model,
        web_catalog(),
        config,
        Arc::new(NoopRouterHooks),
        Arc::new(NoopStewardHooks),
    )
}

pub fn build_runtime_with(
    model: Arc<dyn StewardModel>,
    catalog: Arc<CapabilityCatalog>,
    config: &WardenConfig,
    router_hooks: Arc<dyn RouterHooks>,
    steward_hooks: Arc<dyn StewardHooks>,
) -> Result<RuntimeBundle, ConfigError> {
    let router = Arc::new(build_router_with_hooks(
        Arc::clone(&catalog),
        config,
        router_hooks,
    )?);
    let steward = steward_phase(model, Arc::clone(&router), config).with_hooks(steward_hooks);

    Ok(RuntimeBundle {
        catalog,
        router,
        steward: Arc::new(steward),
    })
}
