//! Import job read models: extraction records and import results

use crate::{ConceptId, ImportId, Issue, JsonPatchOperation};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Operations and diagnostics extracted from one RDF resource
///
/// Both lists behave as sets: pushing a value already present is a no-op.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExtractResult {
    /// Patch operations to apply to a default concept
    pub operations: Vec<JsonPatchOperation>,
    /// Warnings and errors
    pub issues: Vec<Issue>,
}

impl ExtractResult {
    /// Add an operation unless it is already present
    pub fn push_operation(&mut self, operation: JsonPatchOperation) {
        if !self.operations.contains(&operation) {
            self.operations.push(operation);
        }
    }

    /// Add an issue unless it is already present
    pub fn push_issue(&mut self, issue: Issue) {
        if !self.issues.contains(&issue) {
            self.issues.push(issue);
        }
    }

    /// Union another result into this one
    pub fn merge(&mut self, other: ExtractResult) {
        for operation in other.operations {
            self.push_operation(operation);
        }
        for issue in other.issues {
            self.push_issue(issue);
        }
    }

    /// Whether any issue is an error
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(Issue::is_error)
    }
}

/// Extraction outcome for one source resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionRecord {
    /// URI of the source resource
    pub external_id: String,
    /// Concept the record was saved as, once known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_id: Option<ConceptId>,
    /// Operations and issues
    pub extract_result: ExtractResult,
}

impl ExtractionRecord {
    /// Create a record not yet bound to a concept
    pub fn new(external_id: impl Into<String>, extract_result: ExtractResult) -> Self {
        Self {
            external_id: external_id.into(),
            internal_id: None,
            extract_result,
        }
    }

    /// Copy of this record bound to a concept
    pub fn with_internal_id(&self, internal_id: ConceptId) -> Self {
        Self {
            internal_id: Some(internal_id),
            ..self.clone()
        }
    }

    /// Whether the record carries an error issue
    pub fn has_errors(&self) -> bool {
        self.extract_result.has_errors()
    }
}

/// Status of an import job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportStatus {
    /// Created, waiting for the graph to be processed
    InProgress,
    /// Extraction succeeded; waiting for a human to confirm
    PendingConfirmation,
    /// Confirmed; concepts are being written
    Saving,
    /// Every record was saved
    Completed,
    /// Some records were saved
    PartiallyCompleted,
    /// Extraction failed, or no record could be saved
    Failed,
    /// Cancelled by a user
    Cancelled,
}

impl ImportStatus {
    /// Whether no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ImportStatus::Completed
                | ImportStatus::PartiallyCompleted
                | ImportStatus::Failed
                | ImportStatus::Cancelled
        )
    }

    /// Whether concepts from this job were (at least partly) saved
    pub fn has_saved_concepts(&self) -> bool {
        matches!(self, ImportStatus::Completed | ImportStatus::PartiallyCompleted)
    }
}

/// A record that could not be saved during confirmation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveFailure {
    /// URI of the source resource
    pub external_id: String,
    /// Why saving failed
    pub reason: String,
}

/// Counters for an import job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportCounts {
    /// Resources extracted from the graph
    pub extracted: usize,
    /// Records saved as concepts
    pub saved: usize,
    /// Records that failed to save
    pub failed: usize,
}

/// One import attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    /// Job id
    pub id: ImportId,
    /// Catalog (organization id) the job imports into
    pub catalog_id: String,
    /// Current status
    pub status: ImportStatus,
    /// Principal who started the job
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// When the job was created
    pub created: DateTime<Utc>,
    /// One record per extracted resource
    #[serde(default)]
    pub extraction_records: Vec<ExtractionRecord>,
    /// Records that failed to save
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub save_failures: Vec<SaveFailure>,
    /// Counters
    #[serde(default)]
    pub counts: ImportCounts,
}

impl ImportResult {
    /// Allocate a new job in `InProgress`
    pub fn new(catalog_id: impl Into<String>, created_by: Option<String>) -> Self {
        Self {
            id: ImportId::new(),
            catalog_id: catalog_id.into(),
            status: ImportStatus::InProgress,
            created_by,
            created: Utc::now(),
            extraction_records: Vec::new(),
            save_failures: Vec::new(),
            counts: ImportCounts::default(),
        }
    }

    /// Record for the given external id, if any
    pub fn record(&self, external_id: &str) -> Option<&ExtractionRecord> {
        self.extraction_records
            .iter()
            .find(|r| r.external_id == external_id)
    }
}
