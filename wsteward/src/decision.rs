//! The steward's tool-use decision and its conversion into router requests.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use wcommon::RunId;
use wtooling::{ToolCallRequest, parse_json_object};

pub const OUTPUT_PARSING_FAILED: &str = "output_parsing_failed";
pub const JSON_DECODE_ERROR: &str = "json_decode_error";
pub const MISSING_ACTION_FIELD: &str = "missing_action_field";
pub const PARSER_UNEXPECTED_ERROR: &str = "parser_unexpected_error";
pub const MODEL_UNAVAILABLE: &str = "model_unavailable";

const DEFAULT_PURPOSE: &str = "Unknown";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StewardAction {
    UseTools,
    #[default]
    NoTools,
}

impl StewardAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UseTools => "use_tools",
            Self::NoTools => "no_tools",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub action: StewardAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Raw call objects as the model wrote them.
    #[serde(default)]
    pub calls: Vec<Value>,
}

/// A raw call entry that could not become a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedCall {
    pub index: usize,
    pub reason: String,
}

impl Decision {
    pub fn no_tools(reason: impl Into<String>) -> Self {
        Self {
            action: StewardAction::NoTools,
            reason: Some(reason.into()),
            calls: Vec::new(),
        }
    }

    pub fn use_tools(calls: Vec<Value>) -> Self {
        Self {
            action: StewardAction::UseTools,
            reason: None,
            calls,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn wants_tools(&self) -> bool {
        self.action == StewardAction::UseTools && !self.calls.is_empty()
    }

    /// Converts raw call objects into requests for `run_id`.
    ///
    /// Entries without a usable tool name or with malformed arguments are
    /// skipped and reported; everything else falls back to defaults
    /// (empty arguments, `Unknown` purpose, normal priority, other intent).
    pub fn into_requests(
        self,
        run_id: impl Into<RunId>,
        requested_by: impl Into<String>,
    ) -> (Vec<ToolCallRequest>, Vec<SkippedCall>) {
        let run_id = run_id.into();
        let requested_by = requested_by.into();
        let mut requests = Vec::with_capacity(self.calls.len());
        let mut skipped = Vec::new();

        for (index, call) in self.calls.into_iter().enumerate() {
            match request_from_value(&run_id, &requested_by, call) {
                Ok(request) => requests.push(request),
                Err(reason) => skipped.push(SkippedCall { index, reason }),
            }
        }

        (requests, skipped)
    }
}

fn request_from_value(
    run_id: &RunId,
    requested_by: &str,
    call: Value,
) -> Result<ToolCallRequest, String> {
    let Value::Object(call) = call else {
        return Err("call entry is not an object".to_string());
    };

    let name = call
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| "call entry has no tool name".to_string())?;

    let arguments = match call.get("arguments") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(arguments)) => arguments.clone(),
        // Some models double-encode arguments as a JSON string.
        Some(Value::String(encoded)) => {
            parse_json_object(encoded).map_err(|error| error.message)?
        }
        Some(_) => return Err(format!("arguments for '{name}' must be an object")),
    };

    let mut request = ToolCallRequest::new(run_id.clone(), name, Value::Object(arguments))
        .with_purpose(string_field(&call, "purpose").unwrap_or(DEFAULT_PURPOSE))
        .with_priority(
            string_field(&call, "priority")
                .and_then(|priority| priority.parse().ok())
                .unwrap_or_default(),
        )
        .with_intent(
            string_field(&call, "intent")
                .and_then(|intent| intent.parse().ok())
                .unwrap_or_default(),
        )
        .with_requested_by(requested_by);

    if let Some(id) = string_field(&call, "id").filter(|id| !id.trim().is_empty()) {
        request = request.with_id(id);
    }

    Ok(request)
}

fn string_field<'a>(call: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    call.get(key).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wtooling::{ToolIntent, ToolPriority};

    use super::*;

    #[test]
    fn requests_fill_defaults() {
        let decision = Decision::use_tools(vec![json!({"name": "web.search"})]);
        let (requests, skipped) = decision.into_requests("run-1", "chairman");

        assert!(skipped.is_empty());
        let request = &requests[0];
        assert_eq!(request.name, "web.search");
        assert!(request.arguments.is_empty());
        assert_eq!(request.purpose, "Unknown");
        assert_eq!(request.priority, ToolPriority::Normal);
        assert_eq!(request.intent, ToolIntent::Other);
        assert_eq!(request.requested_by, "chairman");
        assert_eq!(request.run_id.as_str(), "run-1");
    }

    #[test]
    fn requests_honor_explicit_fields() {
        let decision = Decision::use_tools(vec![json!({
            "id": "call-7",
            "name": " web.fetch ",
            "arguments": "{\"url\": \"https://example.com\"}",
            "purpose": "Read the article",
            "priority": "HIGH",
            "intent": "fetch"
        })]);
        let (requests, _) = decision.into_requests("run-1", "chairman");

        let request = &requests[0];
        assert_eq!(request.id.as_str(), "call-7");
        assert_eq!(request.name, "web.fetch");
        assert_eq!(request.arguments["url"], "https://example.com");
        assert_eq!(request.priority, ToolPriority::High);
        assert_eq!(request.intent, ToolIntent::Fetch);
    }

    #[test]
    fn unusable_entries_are_reported_not_dropped_silently() {
        let decision = Decision::use_tools(vec![
            json!("web.search"),
            json!({"arguments": {}}),
            json!({"name": "web.search", "arguments": "not json"}),
            json!({"name": "web.search", "arguments": [1, 2]}),
            json!({"name": "web.search", "priority": "urgent"}),
        ]);
        let (requests, skipped) = decision.into_requests("run-1", "chairman");

        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].priority, ToolPriority::Normal);
        let indices: Vec<_> = skipped.iter().map(|skip| skip.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn decision_serializes_wire_action_names() {
        let value = serde_json::to_value(Decision::no_tools(MISSING_ACTION_FIELD))
            .expect("decision serializes");
        assert_eq!(value, json!({"action": "no_tools", "reason": "missing_action_field", "calls": []}));
        assert!(!Decision::use_tools(Vec::new()).wants_tools());
    }
}
