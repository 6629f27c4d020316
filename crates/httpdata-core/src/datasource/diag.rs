//! User-facing diagnostics rendered from decode and fetch failures.

use serde::Serialize;
use std::fmt;

use crate::error::FetchError;

/// One error diagnostic, optionally scoped to a configuration attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub summary: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            detail: detail.into(),
            attribute: None,
        }
    }

    pub fn at(mut self, attribute: &str) -> Self {
        self.attribute = Some(attribute.to_string());
        self
    }
}

impl From<&FetchError> for Diagnostic {
    fn from(e: &FetchError) -> Self {
        match e {
            FetchError::RequestConstruction(inner) => {
                Diagnostic::error(format!("Error creating http request: {}", inner), "")
            }
            FetchError::Transport(inner) => {
                Diagnostic::error(format!("Error performing http request: {}", inner), "")
            }
            FetchError::StatusMismatch { .. } => Diagnostic::error(e.to_string(), ""),
            FetchError::BodyRead(inner) => Diagnostic::error(inner.to_string(), ""),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error: {}", self.summary)?;
        if let Some(attr) = &self.attribute {
            write!(f, "\n\n  with attribute {:?}", attr)?;
        }
        if !self.detail.is_empty() {
            write!(f, "\n\n{}", self.detail)?;
        }
        Ok(())
    }
}
