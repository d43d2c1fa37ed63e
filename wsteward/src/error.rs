//! Errors surfaced by the steward's model collaborator.
//!
//! ```rust
//! use wsteward::StewardError;
//!
//! let timeout = StewardError::timeout("no decision within 60s");
//! assert!(timeout.retryable);
//! assert!(!StewardError::invalid_response("empty body").retryable);
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StewardErrorKind {
    Timeout,
    Unavailable,
    InvalidResponse,
    Other,
}

impl StewardErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Unavailable => "unavailable",
            Self::InvalidResponse => "invalid_response",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StewardError {
    pub kind: StewardErrorKind,
    pub message: String,
    pub retryable: bool,
}

impl StewardError {
    pub fn new(kind: StewardErrorKind, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(StewardErrorKind::Timeout, message, true)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StewardErrorKind::Unavailable, message, true)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(StewardErrorKind::InvalidResponse, message, false)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(StewardErrorKind::Other, message, false)
    }
}

impl Display for StewardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for StewardError {}
