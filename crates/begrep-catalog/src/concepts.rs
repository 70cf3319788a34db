//! Concept service: authoring, publishing and revising concept versions

use crate::error::store_error;
use crate::versioning;
use crate::CatalogError;
use begrep_domain::traits::{Authorizer, ConceptQuery, ConceptStore};
use begrep_domain::{
    ChangeElement, Concept, ConceptId, ConceptStatus, ExtractionRecord, JsonPatchOperation,
};
use begrep_extractor::{Graph, ResourceExtractor, Term};
use begrep_gatekeeper::Gatekeeper;
use begrep_patch::{apply, PathPolicy};
use chrono::Utc;
use std::fmt::Display;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

/// Authorization check shared by the services
pub(crate) fn authorize(allowed: bool, principal: &str, action: &str, org: &str) -> Result<(), CatalogError> {
    if allowed {
        Ok(())
    } else {
        Err(CatalogError::Forbidden(format!(
            "{} may not {} in catalog {}",
            principal, action, org
        )))
    }
}

/// Apply operations to a concept and record them in its history
pub(crate) fn apply_with_history(
    concept: &Concept,
    operations: &[JsonPatchOperation],
    policy: &PathPolicy,
    principal: &str,
) -> Result<Concept, CatalogError> {
    let mut patched = apply(concept, operations, policy)?;
    if !operations.is_empty() {
        patched.history.change_element.push(ChangeElement {
            at: Utc::now(),
            by: principal.to_string(),
            operations: operations.to_vec(),
        });
    }
    Ok(patched)
}

/// Service for concept versions
///
/// Every call checks the [`Authorizer`] before touching the store: reads
/// need `can_read`, edits `can_write` and publishing `can_admin`.
pub struct ConceptService<S, A>
where
    S: ConceptStore,
    A: Authorizer,
{
    store: Arc<Mutex<S>>,
    authorizer: Arc<A>,
    gatekeeper: Gatekeeper,
    extractor: ResourceExtractor,
}

impl<S, A> ConceptService<S, A>
where
    S: ConceptStore,
    S::Error: Display,
    A: Authorizer,
{
    /// Create a new service over a shared store
    pub fn new(
        store: Arc<Mutex<S>>,
        authorizer: Arc<A>,
        gatekeeper: Gatekeeper,
        extractor: ResourceExtractor,
    ) -> Self {
        Self {
            store,
            authorizer,
            gatekeeper,
            extractor,
        }
    }

    fn store(&self) -> Result<MutexGuard<'_, S>, CatalogError> {
        self.store
            .lock()
            .map_err(|e| CatalogError::Store(format!("Store lock error: {}", e)))
    }

    fn load(store: &S, id: ConceptId) -> Result<Concept, CatalogError> {
        store
            .get_concept(id)
            .map_err(store_error)?
            .ok_or_else(|| CatalogError::NotFound(format!("Concept {}", id)))
    }

    /// Create the first version of a new lineage from optional initial operations
    pub fn create(
        &self,
        principal: &str,
        catalog_id: &str,
        operations: &[JsonPatchOperation],
    ) -> Result<Concept, CatalogError> {
        authorize(
            self.authorizer.can_write(principal, catalog_id),
            principal,
            "create concepts",
            catalog_id,
        )?;

        let mut concept = Concept::new_lineage(catalog_id);
        concept.history.created_at = Some(Utc::now());
        concept.history.created_by = Some(principal.to_string());
        let concept = apply(&concept, operations, &PathPolicy::import())?;

        self.store()?.save_concept(&concept).map_err(store_error)?;
        info!("Created concept {} in catalog {}", concept.id, catalog_id);
        Ok(concept)
    }

    /// Get one concept version
    pub fn get(&self, principal: &str, id: ConceptId) -> Result<Concept, CatalogError> {
        let concept = Self::load(&*self.store()?, id)?;
        authorize(
            self.authorizer.can_read(principal, concept.organization_id()),
            principal,
            "read",
            concept.organization_id(),
        )?;
        Ok(concept)
    }

    /// All concept versions of a catalog, optionally filtered by status
    pub fn list(
        &self,
        principal: &str,
        catalog_id: &str,
        status: Option<ConceptStatus>,
    ) -> Result<Vec<Concept>, CatalogError> {
        authorize(
            self.authorizer.can_read(principal, catalog_id),
            principal,
            "read",
            catalog_id,
        )?;

        let query = ConceptQuery {
            organization_id: Some(catalog_id.to_string()),
            status,
            ..Default::default()
        };
        self.store()?.query_concepts(&query).map_err(store_error)
    }

    /// All versions of the lineage `id` belongs to, by ascending version
    pub fn lineage(&self, principal: &str, id: ConceptId) -> Result<Vec<Concept>, CatalogError> {
        let concept = self.get(principal, id)?;
        let versions = self
            .store()?
            .lineage(concept.original_id)
            .map_err(store_error)?;
        Ok(versioning::sorted(versions))
    }

    /// The version with the greatest SemVer in the lineage of `id`
    pub fn latest(&self, principal: &str, id: ConceptId) -> Result<Concept, CatalogError> {
        let versions = self.lineage(principal, id)?;
        versioning::latest(&versions)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("Lineage of {}", id)))
    }

    /// Apply a client patch to an unpublished version
    pub fn patch(
        &self,
        principal: &str,
        id: ConceptId,
        operations: &[JsonPatchOperation],
    ) -> Result<Concept, CatalogError> {
        let mut store = self.store()?;
        let concept = Self::load(&store, id)?;
        authorize(
            self.authorizer.can_write(principal, concept.organization_id()),
            principal,
            "edit",
            concept.organization_id(),
        )?;

        if concept.published {
            return Err(CatalogError::BadRequest(format!(
                "Concept {} is published; create a revision to change it",
                id
            )));
        }

        let patched =
            apply_with_history(&concept, operations, &PathPolicy::concept_patch(), principal)?;
        store.save_concept(&patched).map_err(store_error)?;
        debug!("Patched concept {} with {} operations", id, operations.len());
        Ok(patched)
    }

    /// Publish a version after publish validation
    pub fn publish(&self, principal: &str, id: ConceptId) -> Result<Concept, CatalogError> {
        let mut store = self.store()?;
        let mut concept = Self::load(&store, id)?;
        authorize(
            self.authorizer.can_admin(principal, concept.organization_id()),
            principal,
            "publish",
            concept.organization_id(),
        )?;

        let validation = self
            .gatekeeper
            .validate_in_lineage(&concept, &*store)
            .map_err(|e| CatalogError::Store(e.to_string()))?;
        if !validation.is_accepted() {
            let reasons: Vec<String> = validation.reasons.iter().map(ToString::to_string).collect();
            return Err(CatalogError::Validation(reasons.join("; ")));
        }

        concept.published = true;
        concept.published_at = Some(Utc::now());
        concept.status = ConceptStatus::Published;
        store.save_concept(&concept).map_err(store_error)?;
        info!("Published concept {} ({:?})", id, concept.sem_ver);
        Ok(concept)
    }

    /// Create the next unpublished revision of the lineage `id` belongs to
    pub fn create_revision(&self, principal: &str, id: ConceptId) -> Result<Concept, CatalogError> {
        let mut store = self.store()?;
        let concept = Self::load(&store, id)?;
        authorize(
            self.authorizer.can_write(principal, concept.organization_id()),
            principal,
            "revise",
            concept.organization_id(),
        )?;

        let versions = store.lineage(concept.original_id).map_err(store_error)?;
        let revision = versioning::revise_lineage(&versions, principal)?;
        store.save_concept(&revision).map_err(store_error)?;
        info!(
            "Created revision {} of lineage {} ({:?})",
            revision.id, revision.original_id, revision.sem_ver
        );
        Ok(revision)
    }

    /// Delete an unpublished version
    pub fn delete(&self, principal: &str, id: ConceptId) -> Result<(), CatalogError> {
        let mut store = self.store()?;
        let concept = Self::load(&store, id)?;
        authorize(
            self.authorizer.can_write(principal, concept.organization_id()),
            principal,
            "delete",
            concept.organization_id(),
        )?;

        if concept.published {
            return Err(CatalogError::BadRequest(format!(
                "Concept {} is published and cannot be deleted",
                id
            )));
        }

        store.delete_concept(id).map_err(store_error)?;
        info!("Deleted concept {}", id);
        Ok(())
    }

    /// Re-extract `resource_iri` from `graph` against the stored version `id`
    ///
    /// Returns the record for review; nothing is written.
    pub fn re_extract(
        &self,
        principal: &str,
        id: ConceptId,
        graph: &Graph,
        resource_iri: &str,
    ) -> Result<ExtractionRecord, CatalogError> {
        let concept = self.get(principal, id)?;
        let node = Term::iri(resource_iri);
        let resource = graph.resource(&node);
        if !resource.has_type(&self.extractor.config().concept_type) {
            return Err(CatalogError::BadRequest(format!(
                "Graph has no concept {}",
                resource_iri
            )));
        }

        Ok(self.extractor.extract_replacement(&resource, &concept)?)
    }

    /// Apply a reviewed re-extraction record to its concept
    pub fn apply_extraction(
        &self,
        principal: &str,
        record: &ExtractionRecord,
    ) -> Result<Concept, CatalogError> {
        if record.has_errors() {
            return Err(CatalogError::BadRequest(format!(
                "Extraction of {} has errors",
                record.external_id
            )));
        }
        let id = record.internal_id.ok_or_else(|| {
            CatalogError::BadRequest(format!("Extraction of {} has no concept", record.external_id))
        })?;

        self.patch(principal, id, &record.extract_result.operations)
    }
}
