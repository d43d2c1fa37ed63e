//! Router construction and configuration errors.
//!
//! Execution itself never fails; these only surface while wiring a router.

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterErrorKind {
    InvalidConfig,
    MissingCatalog,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterError {
    pub kind: RouterErrorKind,
    pub message: String,
}

impl RouterError {
    pub fn new(kind: RouterErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::new(RouterErrorKind::InvalidConfig, message)
    }

    pub fn missing_catalog(message: impl Into<String>) -> Self {
        Self::new(RouterErrorKind::MissingCatalog, message)
    }
}

impl Display for RouterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for RouterError {}
