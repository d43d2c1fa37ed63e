//! Capability catalog: the set of tools a run may call, keyed by name.
//!
//! Tools are registered once through [`CatalogBuilder`]; the resulting
//! [`CapabilityCatalog`] is immutable and meant to be shared behind an `Arc`.
//!
//! ```rust
//! use serde_json::json;
//! use wtooling::{CapabilityCatalog, ToolDefinition, ToolOutcome};
//!
//! let catalog = CapabilityCatalog::builder()
//!     .register_sync_fn(
//!         ToolDefinition::new("clock.now", "Current time", json!({"type": "object"})),
//!         |_args, ctx| Ok(ToolOutcome::success(&ctx, json!("12:00"))),
//!     )
//!     .build();
//!
//! assert!(catalog.contains("clock.now"));
//! assert!(catalog.render_prompt().contains("- clock.now: Current time"));
//! ```

use std::future::Future;
use std::sync::Arc;

use serde_json::{Map, Value};
use wcommon::Registry;

use crate::{FunctionTool, Tool, ToolDefinition, ToolError, ToolExecutionContext, ToolOutcome};

const EMPTY_CATALOG_PROMPT: &str = "No tools available.";

#[derive(Default)]
pub struct CatalogBuilder {
    tools: Registry<String, Arc<dyn Tool>>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tool under its definition name. A later registration of the same name wins.
    pub fn register<T>(mut self, tool: T) -> Self
    where
        T: Tool + 'static,
    {
        self.insert(Arc::new(tool));
        self
    }

    pub fn register_arc(mut self, tool: Arc<dyn Tool>) -> Self {
        self.insert(tool);
        self
    }

    pub fn register_fn<F, Fut>(self, definition: ToolDefinition, handler: F) -> Self
    where
        F: Fn(Map<String, Value>, ToolExecutionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ToolOutcome, ToolError>> + Send + 'static,
    {
        self.register(FunctionTool::new(definition, handler))
    }

    pub fn register_sync_fn<F>(self, definition: ToolDefinition, handler: F) -> Self
    where
        F: Fn(Map<String, Value>, ToolExecutionContext) -> Result<ToolOutcome, ToolError>
            + Send
            + Sync
            + 'static,
    {
        self.register(FunctionTool::from_sync(definition, handler))
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn build(self) -> CapabilityCatalog {
        CapabilityCatalog { tools: self.tools }
    }

    fn insert(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.definition().name.clone();
        self.tools.insert(name, tool);
    }
}

/// Immutable snapshot of registered tools.
#[derive(Default)]
pub struct CapabilityCatalog {
    tools: Registry<String, Arc<dyn Tool>>,
}

impl CapabilityCatalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn describe(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name).map(|tool| tool.definition())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .values()
            .map(|tool| tool.definition().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Listing of every tool, sorted by name, for inclusion in the steward prompt.
    pub fn render_prompt(&self) -> String {
        if self.tools.is_empty() {
            return EMPTY_CATALOG_PROMPT.to_string();
        }

        let mut lines = vec!["Available Tools:".to_string()];
        for tool in self.tools.values() {
            let definition = tool.definition();
            lines.push(format!("- {}: {}", definition.name, definition.description));
            lines.push(format!("  Arguments: {}", definition.args_schema));
            if !definition.examples.is_empty() {
                lines.push(format!(
                    "  Example intents: {}",
                    definition.examples.join(", ")
                ));
            }
            lines.push(String::new());
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn definition(name: &str, description: &str) -> ToolDefinition {
        ToolDefinition::new(
            name,
            description,
            json!({"type": "object", "properties": {"q": {"type": "string"}}}),
        )
    }

    fn constant(name: &str, description: &str, value: Value) -> FunctionTool {
        FunctionTool::from_sync(definition(name, description), move |_args, context| {
            Ok(ToolOutcome::success(&context, value.clone()))
        })
    }

    #[test]
    fn catalog_tracks_registered_tools() {
        let builder = CapabilityCatalog::builder();
        assert!(builder.is_empty());

        let catalog = builder
            .register(constant("web.search", "Search the web", json!([])))
            .register(constant("web.fetch", "Fetch a page", json!("")))
            .build();

        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains("web.fetch"));
        assert!(catalog.lookup("web.search").is_some());
        assert!(catalog.lookup("finance.quote").is_none());
        assert_eq!(
            catalog.describe("web.search").map(|d| d.description.as_str()),
            Some("Search the web")
        );
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["web.fetch", "web.search"]);
    }

    #[tokio::test]
    async fn re_registration_overwrites_previous_entry() {
        let catalog = CapabilityCatalog::builder()
            .register(constant("calc", "first", json!(1)))
            .register(constant("calc", "second", json!(2)))
            .build();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.describe("calc").map(|d| d.description.as_str()), Some("second"));

        let tool = catalog.lookup("calc").expect("calc registered");
        let outcome = tool
            .invoke(&Map::new(), &ToolExecutionContext::new("run-1", "call-1"))
            .await
            .expect("constant tool succeeds");
        assert_eq!(outcome.data, Some(json!(2)));
    }

    #[test]
    fn rendered_prompt_is_deterministic_and_complete() {
        let catalog = CapabilityCatalog::builder()
            .register_fn(
                definition("web.search", "Search the web for current information.")
                    .with_examples(["Find AAPL stock price", "Latest AI news"]),
                |_args, context| async move { Ok(ToolOutcome::success(&context, json!([]))) },
            )
            .register(constant("calc.eval", "Evaluate arithmetic", json!(0)))
            .build();

        let prompt = catalog.render_prompt();
        assert_eq!(prompt, catalog.render_prompt());
        assert!(prompt.starts_with("Available Tools:\n- calc.eval: Evaluate arithmetic"));
        assert!(prompt.contains("- web.search: Search the web for current information."));
        assert!(prompt.contains("  Arguments: {\"properties\":{\"q\":{\"type\":\"string\"}},\"type\":\"object\"}"));
        assert!(prompt.contains("  Example intents: Find AAPL stock price, Latest AI news"));

        let calc_at = prompt.find("calc.eval").unwrap_or(usize::MAX);
        let search_at = prompt.find("web.search").unwrap_or(0);
        assert!(calc_at < search_at);
    }

    #[test]
    fn empty_catalog_renders_placeholder() {
        assert_eq!(CapabilityCatalog::empty().render_prompt(), "No tools available.");
    }
}
