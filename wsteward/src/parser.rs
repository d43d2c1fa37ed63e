//! Tolerant extraction of the steward's decision from free-form model text.
//!
//! The parser never fails: anything it cannot make sense of becomes a
//! `no_tools` decision carrying a reason code.
//!
//! ```rust
//! use wsteward::{StewardAction, parse_steward_output};
//!
//! let decision = parse_steward_output(
//!     "Sure! ```json\n{\"calls\": [{\"name\": \"web.search\"}]}\n``` Hope that helps.",
//! );
//! assert_eq!(decision.action, StewardAction::UseTools);
//! assert_eq!(decision.calls.len(), 1);
//!
//! let fallback = parse_steward_output("I don't think tools are needed.");
//! assert_eq!(fallback.action, StewardAction::NoTools);
//! assert_eq!(fallback.reason.as_deref(), Some("output_parsing_failed"));
//! ```

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::{
    Decision, JSON_DECODE_ERROR, MISSING_ACTION_FIELD, OUTPUT_PARSING_FAILED,
    PARSER_UNEXPECTED_ERROR, StewardAction,
};

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)```(?:json)?\s*(.*?)\s*```").expect("code fence pattern is valid")
});

pub fn parse_steward_output(text: &str) -> Decision {
    catch_unwind(AssertUnwindSafe(|| parse(text)))
        .unwrap_or_else(|_| Decision::no_tools(PARSER_UNEXPECTED_ERROR))
}

fn parse(text: &str) -> Decision {
    let cleaned = strip_code_fence(text);
    let Some(candidate) = extract_object(cleaned) else {
        return Decision::no_tools(OUTPUT_PARSING_FAILED);
    };

    let object = match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(object)) => object,
        Ok(_) => return Decision::no_tools(PARSER_UNEXPECTED_ERROR),
        Err(_) => return Decision::no_tools(JSON_DECODE_ERROR),
    };

    decision_from_object(object).unwrap_or_else(|| Decision::no_tools(PARSER_UNEXPECTED_ERROR))
}

fn strip_code_fence(text: &str) -> &str {
    CODE_FENCE
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map_or(text, |body| body.as_str())
}

fn extract_object(text: &str) -> Option<&str> {
    let text = text.trim();
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

// `None` means the object had a shape no decision can be built from.
fn decision_from_object(mut object: Map<String, Value>) -> Option<Decision> {
    let reason = object
        .get("reason")
        .and_then(Value::as_str)
        .map(ToString::to_string);
    let calls = object.remove("calls");

    let action = match object.get("action") {
        None | Some(Value::Null) => {
            return Some(match calls {
                Some(Value::Array(calls)) if !calls.is_empty() => Decision {
                    action: StewardAction::UseTools,
                    reason,
                    calls,
                },
                _ => Decision::no_tools(MISSING_ACTION_FIELD),
            });
        }
        Some(Value::String(action)) => match action.trim().to_ascii_lowercase().as_str() {
            "use_tools" => StewardAction::UseTools,
            "no_tools" => StewardAction::NoTools,
            _ => return None,
        },
        Some(_) => return None,
    };

    let calls = match calls {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(calls)) => calls,
        Some(_) => return None,
    };

    Some(Decision {
        action,
        reason,
        calls,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn clean_json_is_parsed_verbatim() {
        let decision = parse_steward_output(
            r#"{"action": "use_tools", "reason": "needs fresh data", "calls": [{"name": "web.search", "arguments": {"query": "rust"}}]}"#,
        );
        assert_eq!(decision.action, StewardAction::UseTools);
        assert_eq!(decision.reason.as_deref(), Some("needs fresh data"));
        assert_eq!(decision.calls[0]["arguments"], json!({"query": "rust"}));
    }

    #[test]
    fn fenced_output_with_language_tag_is_unwrapped() {
        let decision = parse_steward_output("```JSON\n{\"action\": \"no_tools\", \"reason\": \"chit-chat\"}\n```");
        assert_eq!(decision.action, StewardAction::NoTools);
        assert_eq!(decision.reason.as_deref(), Some("chit-chat"));
    }

    #[test]
    fn surrounding_prose_is_ignored() {
        let decision = parse_steward_output(
            "Here is my decision: {\"action\": \"use_tools\", \"calls\": [{\"name\": \"web.fetch\"}]} Let me know.",
        );
        assert_eq!(decision.action, StewardAction::UseTools);
        assert_eq!(decision.calls.len(), 1);
    }

    #[test]
    fn text_without_an_object_fails_softly() {
        for text in ["", "no braces here", "} backwards {"] {
            let decision = parse_steward_output(text);
            assert_eq!(decision.action, StewardAction::NoTools);
            assert_eq!(decision.reason.as_deref(), Some(OUTPUT_PARSING_FAILED));
        }
    }

    #[test]
    fn truncated_json_reports_decode_error() {
        let decision = parse_steward_output("{\"action\": \"use_tools\", \"calls\": [{\"name\": }");
        assert_eq!(decision.reason.as_deref(), Some(JSON_DECODE_ERROR));
        assert!(decision.calls.is_empty());
    }

    #[test]
    fn missing_action_is_inferred_from_calls() {
        let inferred = parse_steward_output("{\"calls\": [{\"name\": \"web.search\"}]}");
        assert_eq!(inferred.action, StewardAction::UseTools);

        for text in [
            "{\"calls\": []}",
            "{\"reason\": \"nothing\"}",
            "{\"calls\": \"web.search\"}",
            "{\"calls\": {\"name\": \"web.search\"}}",
        ] {
            let decision = parse_steward_output(text);
            assert_eq!(decision.action, StewardAction::NoTools);
            assert_eq!(decision.reason.as_deref(), Some(MISSING_ACTION_FIELD));
        }
    }

    #[test]
    fn unexpected_shapes_are_contained() {
        for text in [
            "{\"action\": 7}",
            "{\"action\": \"maybe\"}",
            "{\"action\": \"use_tools\", \"calls\": \"web.search\"}",
        ] {
            let decision = parse_steward_output(text);
            assert_eq!(decision.action, StewardAction::NoTools, "{text}");
            assert_eq!(decision.reason.as_deref(), Some(PARSER_UNEXPECTED_ERROR));
        }
    }
}
