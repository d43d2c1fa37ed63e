//! Requested tool invocations as proposed by the steward model.
//!
//! ```rust
//! use serde_json::json;
//! use wtooling::{ToolCallRequest, ToolIntent, ToolPriority};
//!
//! let request = ToolCallRequest::new("run-1", "web.search", json!({"q": "rust"}))
//!     .with_priority(ToolPriority::High)
//!     .with_intent(ToolIntent::Search)
//!     .with_purpose("find release notes")
//!     .with_requested_by("steward-model");
//!
//! assert_eq!(request.priority.rank(), 0);
//! assert_eq!(request.arguments["q"], "rust");
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use wcommon::{CallId, RunId};

/// Admission priority. Ordering is `High < Normal < Low`, i.e. served first to last.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ToolPriority {
    High,
    #[default]
    Normal,
    Low,
}

impl ToolPriority {
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Normal => 1,
            Self::Low => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Normal => "normal",
            Self::Low => "low",
        }
    }
}

impl FromStr for ToolPriority {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "normal" | "medium" => Ok(Self::Normal),
            "low" => Ok(Self::Low),
            other => Err(format!("unknown priority '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolIntent {
    Search,
    Fetch,
    Calculate,
    Verify,
    #[default]
    Other,
}

impl ToolIntent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Fetch => "fetch",
            Self::Calculate => "calculate",
            Self::Verify => "verify",
            Self::Other => "other",
        }
    }
}

impl FromStr for ToolIntent {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "search" => Ok(Self::Search),
            "fetch" => Ok(Self::Fetch),
            "calculate" => Ok(Self::Calculate),
            "verify" => Ok(Self::Verify),
            "other" => Ok(Self::Other),
            other => Err(format!("unknown intent '{other}'")),
        }
    }
}

/// One proposed invocation. Consumed once by the router and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub id: CallId,
    pub run_id: RunId,
    pub name: String,
    pub arguments: Map<String, Value>,
    #[serde(default)]
    pub intent: ToolIntent,
    pub purpose: String,
    #[serde(default)]
    pub priority: ToolPriority,
    pub requested_by: String,
}

impl ToolCallRequest {
    /// Builds a request with a generated call id. Non-object `arguments` become `{}`.
    pub fn new(run_id: impl Into<RunId>, name: impl Into<String>, arguments: Value) -> Self {
        let arguments = match arguments {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        Self {
            id: CallId::generate(),
            run_id: run_id.into(),
            name: name.into(),
            arguments,
            intent: ToolIntent::default(),
            purpose: String::new(),
            priority: ToolPriority::default(),
            requested_by: String::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<CallId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_intent(mut self, intent: ToolIntent) -> Self {
        self.intent = intent;
        self
    }

    pub fn with_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = purpose.into();
        self
    }

    pub fn with_priority(mut self, priority: ToolPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_requested_by(mut self, requested_by: impl Into<String>) -> Self {
        self.requested_by = requested_by.into();
        self
    }
}
