//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Persistence lives in begrep-store; authorization is supplied by the host.

use crate::{
    ChangeRequest, ChangeRequestId, Concept, ConceptId, ConceptStatus, ExtractionRecord,
    ImportId, ImportResult,
};

/// Trait for storing and retrieving concept versions
///
/// Implemented by the infrastructure layer (begrep-store)
pub trait ConceptStore {
    /// Error type for store operations
    type Error;

    /// Insert or overwrite a concept version, keyed by its version id
    fn save_concept(&mut self, concept: &Concept) -> Result<(), Self::Error>;

    /// Get a concept version by id
    fn get_concept(&self, id: ConceptId) -> Result<Option<Concept>, Self::Error>;

    /// Delete a concept version; returns whether it existed
    fn delete_concept(&mut self, id: ConceptId) -> Result<bool, Self::Error>;

    /// Query concept versions matching criteria
    fn query_concepts(&self, query: &ConceptQuery) -> Result<Vec<Concept>, Self::Error>;

    /// All versions of one lineage
    fn lineage(&self, original_id: ConceptId) -> Result<Vec<Concept>, Self::Error> {
        self.query_concepts(&ConceptQuery {
            original_id: Some(original_id),
            ..Default::default()
        })
    }
}

/// Query criteria for retrieving concept versions
#[derive(Debug, Clone, Default)]
pub struct ConceptQuery {
    /// Filter by owning organization
    pub organization_id: Option<String>,

    /// Filter by lineage
    pub original_id: Option<ConceptId>,

    /// Filter by status
    pub status: Option<ConceptStatus>,

    /// Filter by published flag
    pub published: Option<bool>,

    /// Maximum results to return
    pub limit: Option<usize>,
}

/// Trait for storing import jobs
pub trait ImportResultStore {
    /// Error type for store operations
    type Error;

    /// Insert or overwrite an import job
    fn save_import_result(&mut self, result: &ImportResult) -> Result<(), Self::Error>;

    /// Get an import job by id
    fn get_import_result(&self, id: ImportId) -> Result<Option<ImportResult>, Self::Error>;

    /// All import jobs of a catalog, newest first
    fn list_import_results(&self, catalog_id: &str) -> Result<Vec<ImportResult>, Self::Error>;

    /// A successfully saved record for `external_id` from an earlier finished job
    ///
    /// Only records carrying an internal id count: the importer sets it
    /// exactly when the record was saved as a concept. The default scans
    /// every job of the catalog; indexed stores override it.
    fn find_completed_record(
        &self,
        catalog_id: &str,
        external_id: &str,
    ) -> Result<Option<ExtractionRecord>, Self::Error> {
        let found = self
            .list_import_results(catalog_id)?
            .into_iter()
            .filter(|job| job.status.has_saved_concepts())
            .flat_map(|job| job.extraction_records)
            .find(|record| record.external_id == external_id && record.internal_id.is_some());
        Ok(found)
    }
}

/// Trait for storing change requests
pub trait ChangeRequestStore {
    /// Error type for store operations
    type Error;

    /// Insert or overwrite a change request
    fn save_change_request(&mut self, request: &ChangeRequest) -> Result<(), Self::Error>;

    /// Get a change request by id
    fn get_change_request(
        &self,
        id: ChangeRequestId,
    ) -> Result<Option<ChangeRequest>, Self::Error>;

    /// All change requests of a catalog
    fn list_change_requests(&self, catalog_id: &str) -> Result<Vec<ChangeRequest>, Self::Error>;
}

/// Capability checks by organization role
///
/// Supplied by the host application; the services call it before any work.
pub trait Authorizer {
    /// May read the organization's catalog
    fn can_read(&self, principal: &str, organization_id: &str) -> bool;

    /// May edit the organization's catalog
    fn can_write(&self, principal: &str, organization_id: &str) -> bool;

    /// May publish and administrate the organization's catalog
    fn can_admin(&self, principal: &str, organization_id: &str) -> bool;
}
