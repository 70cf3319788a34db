//! Editorial status of a concept version

use serde::{Deserialize, Serialize};

/// Status in the concept workflow
///
/// Concepts normally move `Draft -> {Approved, Hearing} -> Published`, but any
/// status may be set directly by a patch. Only the `published` flag and its
/// timestamp are reserved for the publish operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConceptStatus {
    /// Being written
    #[default]
    Draft,

    /// Accepted by the owning organization
    Approved,

    /// Sent out for public hearing
    Hearing,

    /// Published to harvesters
    Published,
}

impl ConceptStatus {
    /// Get the status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ConceptStatus::Draft => "draft",
            ConceptStatus::Approved => "approved",
            ConceptStatus::Hearing => "hearing",
            ConceptStatus::Published => "published",
        }
    }

    /// Parse a status from a string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(ConceptStatus::Draft),
            "approved" => Some(ConceptStatus::Approved),
            "hearing" => Some(ConceptStatus::Hearing),
            "published" => Some(ConceptStatus::Published),
            _ => None,
        }
    }
}

impl std::str::FromStr for ConceptStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid concept status: {}", s))
    }
}

impl std::fmt::Display for ConceptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
