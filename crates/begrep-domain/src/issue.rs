//! Diagnostics attached to field extraction

use serde::{Deserialize, Serialize};

/// Severity of an extraction issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IssueSeverity {
    /// The value was dropped but the concept can still be created
    Warning,
    /// The field could not be populated
    Error,
}

/// A warning or error produced while extracting a field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Issue {
    /// How severe the issue is
    pub severity: IssueSeverity,
    /// Human-readable description
    pub message: String,
}

impl Issue {
    /// Create an error issue
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Error,
            message: message.into(),
        }
    }

    /// Create a warning issue
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Warning,
            message: message.into(),
        }
    }

    /// Whether this issue is an error
    pub fn is_error(&self) -> bool {
        self.severity == IssueSeverity::Error
    }
}
