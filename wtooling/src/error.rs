//! Tool execution errors and classifications.

use std::error::Error;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Fixed failure taxonomy carried by outcomes and usage records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolErrorKind {
    #[serde(rename = "validation_error")]
    Validation,
    #[serde(rename = "rate_limited")]
    RateLimited,
    #[serde(rename = "budget_exceeded")]
    BudgetExceeded,
    #[serde(rename = "tool_error")]
    Tool,
    #[serde(rename = "timeout")]
    Timeout,
    #[serde(rename = "access_denied")]
    AccessDenied,
    #[serde(rename = "parse_error")]
    Parse,
}

impl ToolErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation_error",
            Self::RateLimited => "rate_limited",
            Self::BudgetExceeded => "budget_exceeded",
            Self::Tool => "tool_error",
            Self::Timeout => "timeout",
            Self::AccessDenied => "access_denied",
            Self::Parse => "parse_error",
        }
    }
}

impl Display for ToolErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolError {
    #[serde(rename = "type")]
    pub kind: ToolErrorKind,
    pub message: String,
    pub retryable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable,
            detail: None,
            tool_name: None,
            tool_call_id: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Validation, message, false)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::RateLimited, message, true)
    }

    pub fn budget_exceeded(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::BudgetExceeded, message, false)
    }

    pub fn tool(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Tool, message, false)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Timeout, message, true)
    }

    pub fn access_denied(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::AccessDenied, message, false)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Parse, message, false)
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    pub fn with_tool_name(mut self, tool_name: impl Into<String>) -> Self {
        self.tool_name = Some(tool_name.into());
        self
    }

    pub fn with_tool_call_id(mut self, tool_call_id: impl Into<String>) -> Self {
        self.tool_call_id = Some(tool_call_id.into());
        self
    }

    pub fn is_retryable(&self) -> bool {
        self.retryable
    }

    /// Errors caused by the request itself rather than the tool or the run budget.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self.kind,
            ToolErrorKind::Validation | ToolErrorKind::AccessDenied | ToolErrorKind::Parse
        )
    }
}

impl Display for ToolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (&self.tool_name, &self.tool_call_id) {
            (Some(tool_name), Some(tool_call_id)) => write!(
                f,
                "{} [tool={}, call_id={}]: {}",
                self.kind, tool_name, tool_call_id, self.message
            ),
            (Some(tool_name), None) => {
                write!(f, "{} [tool={}]: {}", self.kind, tool_name, self.message)
            }
            _ => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

impl Error for ToolError {}
