//! Tool definitions, execution context, and normalized outcome types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use wcommon::{CallId, MetadataMap, RunId};

use crate::ToolError;

pub const OUTCOME_SCHEMA_VERSION: &str = "1.0";

/// Static catalog entry describing one tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub args_schema: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_schema: Option<Value>,
    #[serde(default)]
    pub examples: Vec<String>,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        args_schema: Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            args_schema,
            result_schema: None,
            examples: Vec::new(),
        }
    }

    pub fn with_result_schema(mut self, result_schema: Value) -> Self {
        self.result_schema = Some(result_schema);
        self
    }

    pub fn with_examples(mut self, examples: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.examples = examples.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolExecutionContext {
    pub run_id: RunId,
    pub call_id: CallId,
    pub requested_by: Option<String>,
}

impl ToolExecutionContext {
    pub fn new(run_id: impl Into<RunId>, call_id: impl Into<CallId>) -> Self {
        Self {
            run_id: run_id.into(),
            call_id: call_id.into(),
            requested_by: None,
        }
    }

    pub fn with_requested_by(mut self, requested_by: impl Into<String>) -> Self {
        self.requested_by = Some(requested_by.into());
        self
    }
}

/// Normalized result of one tool invocation.
///
/// Exactly one of `data` / `error` is populated, matching `ok`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutcome {
    pub id: CallId,
    pub run_id: RunId,
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
    pub schema_version: String,
    #[serde(default)]
    pub meta: MetadataMap,
}

impl ToolOutcome {
    pub fn success(context: &ToolExecutionContext, data: Value) -> Self {
        Self {
            id: context.call_id.clone(),
            run_id: context.run_id.clone(),
            ok: true,
            data: Some(data),
            error: None,
            schema_version: OUTCOME_SCHEMA_VERSION.to_string(),
            meta: MetadataMap::new(),
        }
    }

    pub fn failure(context: &ToolExecutionContext, error: ToolError) -> Self {
        Self {
            id: context.call_id.clone(),
            run_id: context.run_id.clone(),
            ok: false,
            data: None,
            error: Some(error),
            schema_version: OUTCOME_SCHEMA_VERSION.to_string(),
            meta: MetadataMap::new(),
        }
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// Re-addresses a stored outcome to a different call, as done for cache hits.
    pub fn reassigned(mut self, context: &ToolExecutionContext) -> Self {
        self.id = context.call_id.clone();
        self.run_id = context.run_id.clone();
        self
    }

    pub fn is_cached(&self) -> bool {
        self.meta
            .get("cached")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}
