//! Argument extraction helpers for function and trait-based tools.
//!
//! ```rust
//! use wtooling::{optional_u64, parse_json_object, required_string};
//!
//! let args = parse_json_object(r#"{"q":"rust","num":3}"#).expect("object should parse");
//! assert_eq!(required_string(&args, "q").expect("q present"), "rust");
//! assert_eq!(optional_u64(&args, "num").expect("num valid"), Some(3));
//! ```

use serde_json::{Map, Value};

use crate::ToolError;

pub fn parse_json_value(args_json: &str) -> Result<Value, ToolError> {
    serde_json::from_str(args_json)
        .map_err(|err| ToolError::parse(format!("invalid JSON arguments: {err}")))
}

pub fn parse_json_object(args_json: &str) -> Result<Map<String, Value>, ToolError> {
    match parse_json_value(args_json)? {
        Value::Object(map) => Ok(map),
        _ => Err(ToolError::validation("expected JSON object arguments")),
    }
}

pub fn required_string(args: &Map<String, Value>, key: &str) -> Result<String, ToolError> {
    args.get(key)
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| ToolError::validation(format!("missing required string: '{key}'")))
}

pub fn optional_u64(args: &Map<String, Value>, key: &str) -> Result<Option<u64>, ToolError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_u64()
            .map(Some)
            .ok_or_else(|| ToolError::validation(format!("'{key}' must be a non-negative integer"))),
    }
}
