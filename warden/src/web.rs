//! Simulated web tools. No network access; results are deterministic.
//!
//! ```rust
//! use warden::{CapabilityCatalog, register_web_tools};
//!
//! let catalog = register_web_tools(CapabilityCatalog::builder()).build();
//! assert!(catalog.contains("web.search"));
//! assert!(catalog.contains("web.fetch"));
//! ```

use serde_json::{Map, Value, json};

use crate::{
    CatalogBuilder, FunctionTool, ToolDefinition, ToolError, ToolExecutionContext, ToolOutcome,
    neutralize_markup, optional_u64, required_string,
};

pub const WEB_SEARCH: &str = "web.search";
pub const WEB_FETCH: &str = "web.fetch";

const DEFAULT_RESULTS: u64 = 5;
const MAX_RESULTS: u64 = 10;
const FETCH_REPEAT: usize = 50;

pub fn web_search_definition() -> ToolDefinition {
    ToolDefinition::new(
        WEB_SEARCH,
        "Search the web for current information. Returns candidate pages (title, URL, snippet).",
        json!({
            "type": "object",
            "properties": {
                "q": {"type": "string", "description": "The search query"},
                "num": {"type": "integer", "default": DEFAULT_RESULTS, "maximum": MAX_RESULTS}
            },
            "required": ["q"]
        }),
    )
    .with_examples(["Find AAPL stock price", "Latest AI news"])
}

pub fn web_fetch_definition() -> ToolDefinition {
    ToolDefinition::new(
        WEB_FETCH,
        "Fetch the full content of a specific URL. Use this to read a search result in detail.",
        json!({
            "type": "object",
            "properties": {
                "url": {"type": "string", "format": "uri"}
            },
            "required": ["url"]
        }),
    )
    .with_examples(["Read the usage policy from openai.com"])
}

pub fn web_search_tool() -> FunctionTool {
    FunctionTool::from_sync(web_search_definition(), web_search)
}

pub fn web_fetch_tool() -> FunctionTool {
    FunctionTool::from_sync(web_fetch_definition(), web_fetch)
}

pub fn register_web_tools(builder: CatalogBuilder) -> CatalogBuilder {
    builder.register(web_search_tool()).register(web_fetch_tool())
}

fn web_search(
    arguments: Map<String, Value>,
    context: ToolExecutionContext,
) -> Result<ToolOutcome, ToolError> {
    let query = required_string(&arguments, "q")?;
    let count = optional_u64(&arguments, "num")?
        .unwrap_or(DEFAULT_RESULTS)
        .min(MAX_RESULTS);

    let results: Vec<Value> = (1..=count)
        .map(|rank| {
            json!({
                "source_id": format!("s{rank}"),
                "title": format!("Result {rank} for {query}"),
                "url": format!("https://example.com/result{rank}"),
                "snippet": format!("Simulated snippet for result {rank} about {query}..."),
            })
        })
        .collect();

    Ok(ToolOutcome::success(&context, json!({ "results": results })))
}

fn web_fetch(
    arguments: Map<String, Value>,
    context: ToolExecutionContext,
) -> Result<ToolOutcome, ToolError> {
    let url = required_string(&arguments, "url")?;
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ToolError::validation("URL must start with http:// or https://")
            .with_detail(url));
    }

    let content = format!("Simulated content for {url}. ").repeat(FETCH_REPEAT);
    let content = neutralize_markup(&content).into_owned();
    let size_bytes = content.len();

    Ok(
        ToolOutcome::success(&context, json!({ "content": content, "url": url }))
            .with_meta("size_bytes", size_bytes),
    )
}

#[cfg(test)]
mod tests {
    use crate::{GuardedToolRuntime, SCRIPT_PLACEHOLDER, Tool, ToolErrorKind, ToolRuntime};

    use super::*;

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    fn context() -> ToolExecutionContext {
        ToolExecutionContext::new("run-1", "call-1")
    }

    #[tokio::test]
    async fn search_returns_numbered_citable_results() {
        let outcome = web_search_tool()
            .invoke(&args(json!({"q": "rust", "num": 3})), &context())
            .await
            .expect("search succeeds");

        let results = outcome.data.as_ref().and_then(|data| data["results"].as_array()).cloned();
        let results = results.unwrap_or_default();
        assert_eq!(results.len(), 3);
        assert_eq!(results[2]["source_id"], "s3");
        assert_eq!(results[0]["title"], "Result 1 for rust");
    }

    #[tokio::test]
    async fn search_clamps_result_count_and_requires_query() {
        let outcome = web_search_tool()
            .invoke(&args(json!({"q": "rust", "num": 50})), &context())
            .await
            .expect("search succeeds");
        assert_eq!(
            outcome.data.as_ref().map(|data| data["results"].as_array().map(Vec::len)),
            Some(Some(10))
        );

        let error = match web_search_tool().invoke(&Map::new(), &context()).await {
            Ok(_) => panic!("search without query should fail"),
            Err(error) => error,
        };
        assert_eq!(error.kind, ToolErrorKind::Validation);
    }

    #[tokio::test]
    async fn fetch_rejects_non_http_schemes() {
        let tool = web_fetch_tool();
        let outcome = GuardedToolRuntime::new()
            .invoke(&tool, &args(json!({"url": "ftp://example.com"})), &context())
            .await;

        assert!(!outcome.ok);
        let error = outcome.error.expect("failure carries an error");
        assert_eq!(error.kind, ToolErrorKind::Validation);
        assert_eq!(error.kind.as_str(), "validation_error");
    }

    #[tokio::test]
    async fn fetch_neutralizes_script_markup() {
        let tool = web_fetch_tool();
        let outcome = GuardedToolRuntime::new()
            .invoke(
                &tool,
                &args(json!({"url": "http://example.com/<script>alert(1)</script>"})),
                &context(),
            )
            .await;

        assert!(outcome.ok);
        let content = outcome
            .data
            .as_ref()
            .and_then(|data| data["content"].as_str())
            .unwrap_or_default()
            .to_string();
        assert!(!content.contains("<script>"));
        assert!(content.contains(SCRIPT_PLACEHOLDER));
        assert!(content.chars().count() > 1_000);
        assert!(outcome.meta.contains_key("size_bytes"));
    }
}
