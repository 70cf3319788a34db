//! Change requests: reviewable patches against a concept

use crate::{ChangeRequestId, ConceptId, JsonPatchOperation};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Review status of a change request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeRequestStatus {
    /// Awaiting review
    Open,
    /// Applied to the concept
    Accepted,
    /// Discarded
    Rejected,
}

/// A proposed set of operations against an existing concept, or a new one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRequest {
    /// Change request id
    pub id: ChangeRequestId,
    /// Catalog (organization id)
    pub catalog_id: String,
    /// Concept version the request targets; `None` proposes a new concept
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concept_id: Option<ConceptId>,
    /// Review status
    pub status: ChangeRequestStatus,
    /// Short description
    #[serde(default)]
    pub title: String,
    /// Proposed operations
    pub operations: Vec<JsonPatchOperation>,
    /// Principal proposing the change
    pub proposer: String,
    /// When the request was made
    pub proposed_at: DateTime<Utc>,
}

impl ChangeRequest {
    /// Create an open change request
    pub fn open(
        catalog_id: impl Into<String>,
        concept_id: Option<ConceptId>,
        title: impl Into<String>,
        operations: Vec<JsonPatchOperation>,
        proposer: impl Into<String>,
    ) -> Self {
        Self {
            id: ChangeRequestId::new(),
            catalog_id: catalog_id.into(),
            concept_id,
            status: ChangeRequestStatus::Open,
            title: title.into(),
            operations,
            proposer: proposer.into(),
            proposed_at: Utc::now(),
        }
    }

    /// Whether the request is still awaiting review
    pub fn is_open(&self) -> bool {
        self.status == ChangeRequestStatus::Open
    }
}
