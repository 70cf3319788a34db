//! Change request review
//!
//! A change request carries operations proposed against an existing concept
//! (or a new one). Accepting it writes two documents, the request and the
//! concept, which the store cannot do atomically. The request is saved first;
//! if the concept write then fails the request is reopened and any version
//! created for it is deleted again.

use crate::concepts::{apply_with_history, authorize};
use crate::error::store_error;
use crate::versioning;
use crate::CatalogError;
use begrep_domain::traits::{Authorizer, ChangeRequestStore, ConceptStore};
use begrep_domain::{
    ChangeRequest, ChangeRequestId, ChangeRequestStatus, Concept, ConceptId, JsonPatchOperation,
};
use begrep_patch::{apply, PathPolicy};
use chrono::Utc;
use std::fmt::Display;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{error, info, warn};

/// Service for change requests
pub struct ChangeRequestService<S, A>
where
    S: ConceptStore + ChangeRequestStore,
    A: Authorizer,
{
    store: Arc<Mutex<S>>,
    authorizer: Arc<A>,
}

impl<S, A> ChangeRequestService<S, A>
where
    S: ConceptStore + ChangeRequestStore,
    <S as ConceptStore>::Error: Display,
    <S as ChangeRequestStore>::Error: Display,
    A: Authorizer,
{
    /// Create a new service over a shared store
    pub fn new(store: Arc<Mutex<S>>, authorizer: Arc<A>) -> Self {
        Self { store, authorizer }
    }

    fn store(&self) -> Result<MutexGuard<'_, S>, CatalogError> {
        self.store
            .lock()
            .map_err(|e| CatalogError::Store(format!("Store lock error: {}", e)))
    }

    fn load_request(store: &S, id: ChangeRequestId) -> Result<ChangeRequest, CatalogError> {
        store
            .get_change_request(id)
            .map_err(store_error)?
            .ok_or_else(|| CatalogError::NotFound(format!("Change request {}", id)))
    }

    fn load_concept(store: &S, id: ConceptId, catalog_id: &str) -> Result<Concept, CatalogError> {
        let concept = store
            .get_concept(id)
            .map_err(store_error)?
            .ok_or_else(|| CatalogError::NotFound(format!("Concept {}", id)))?;
        if concept.organization_id() != catalog_id {
            return Err(CatalogError::BadRequest(format!(
                "Concept {} does not belong to catalog {}",
                id, catalog_id
            )));
        }
        Ok(concept)
    }

    /// Reject operations that could never be accepted against the target
    fn check_operations(
        store: &S,
        catalog_id: &str,
        concept_id: Option<ConceptId>,
        operations: &[JsonPatchOperation],
    ) -> Result<(), CatalogError> {
        let target = match concept_id {
            Some(id) => Self::load_concept(store, id, catalog_id)?,
            None => Concept::new_lineage(catalog_id),
        };
        apply(&target, operations, &PathPolicy::change_request())?;
        Ok(())
    }

    /// Open a change request for an existing concept, or a new one when `concept_id` is `None`
    pub fn create(
        &self,
        principal: &str,
        catalog_id: &str,
        concept_id: Option<ConceptId>,
        title: &str,
        operations: Vec<JsonPatchOperation>,
    ) -> Result<ChangeRequest, CatalogError> {
        authorize(
            self.authorizer.can_write(principal, catalog_id),
            principal,
            "propose changes",
            catalog_id,
        )?;

        let mut store = self.store()?;
        Self::check_operations(&store, catalog_id, concept_id, &operations)?;

        let request = ChangeRequest::open(catalog_id, concept_id, title, operations, principal);
        store.save_change_request(&request).map_err(store_error)?;
        info!("Opened change request {} in catalog {}", request.id, catalog_id);
        Ok(request)
    }

    /// Replace the operations of an open change request
    pub fn update(
        &self,
        principal: &str,
        id: ChangeRequestId,
        operations: Vec<JsonPatchOperation>,
    ) -> Result<ChangeRequest, CatalogError> {
        let mut store = self.store()?;
        let mut request = Self::load_request(&store, id)?;
        authorize(
            self.authorizer.can_write(principal, &request.catalog_id),
            principal,
            "edit change requests",
            &request.catalog_id,
        )?;
        if !request.is_open() {
            return Err(CatalogError::Conflict(format!(
                "Change request {} is {:?}",
                id, request.status
            )));
        }

        Self::check_operations(&store, &request.catalog_id, request.concept_id, &operations)?;
        request.operations = operations;
        store.save_change_request(&request).map_err(store_error)?;
        Ok(request)
    }

    /// Get one change request
    pub fn get(&self, principal: &str, id: ChangeRequestId) -> Result<ChangeRequest, CatalogError> {
        let request = Self::load_request(&*self.store()?, id)?;
        authorize(
            self.authorizer.can_read(principal, &request.catalog_id),
            principal,
            "read",
            &request.catalog_id,
        )?;
        Ok(request)
    }

    /// All change requests of a catalog
    pub fn list(&self, principal: &str, catalog_id: &str) -> Result<Vec<ChangeRequest>, CatalogError> {
        authorize(
            self.authorizer.can_read(principal, catalog_id),
            principal,
            "read",
            catalog_id,
        )?;
        self.store()?
            .list_change_requests(catalog_id)
            .map_err(store_error)
    }

    /// Discard an open change request
    pub fn reject(&self, principal: &str, id: ChangeRequestId) -> Result<ChangeRequest, CatalogError> {
        let mut store = self.store()?;
        let mut request = Self::load_request(&store, id)?;
        authorize(
            self.authorizer.can_write(principal, &request.catalog_id),
            principal,
            "review change requests",
            &request.catalog_id,
        )?;
        if !request.is_open() {
            return Err(CatalogError::Conflict(format!(
                "Change request {} is {:?}",
                id, request.status
            )));
        }

        request.status = ChangeRequestStatus::Rejected;
        store.save_change_request(&request).map_err(store_error)?;
        info!("Rejected change request {}", id);
        Ok(request)
    }

    /// Accept an open change request and write the resulting concept version
    ///
    /// An unpublished target is patched in place. A published target gets a
    /// new revision, which fails if its lineage already has one. A request
    /// without a target creates a new lineage.
    pub fn accept(&self, principal: &str, id: ChangeRequestId) -> Result<Concept, CatalogError> {
        let mut store = self.store()?;
        let mut request = Self::load_request(&store, id)?;
        authorize(
            self.authorizer.can_write(principal, &request.catalog_id),
            principal,
            "review change requests",
            &request.catalog_id,
        )?;
        if !request.is_open() {
            return Err(CatalogError::Conflict(format!(
                "Change request {} is {:?}",
                id, request.status
            )));
        }

        let (target, created) = Self::target(&store, &request, principal)?;
        let updated = apply_with_history(
            &target,
            &request.operations,
            &PathPolicy::change_request(),
            principal,
        )?;

        request.status = ChangeRequestStatus::Accepted;
        store.save_change_request(&request).map_err(store_error)?;

        if let Err(e) = store.save_concept(&updated) {
            warn!(
                "Saving concept {} for change request {} failed, rolling back: {}",
                updated.id, id, e
            );
            Self::roll_back(&mut store, &mut request, created.then_some(updated.id));
            return Err(store_error(e));
        }

        info!(
            "Accepted change request {} into concept {} ({:?})",
            id, updated.id, updated.sem_ver
        );
        Ok(updated)
    }

    /// The version a request's operations apply to, and whether it is new
    fn target(
        store: &S,
        request: &ChangeRequest,
        principal: &str,
    ) -> Result<(Concept, bool), CatalogError> {
        let Some(concept_id) = request.concept_id else {
            let mut concept = Concept::new_lineage(&request.catalog_id);
            concept.history.created_at = Some(Utc::now());
            concept.history.created_by = Some(principal.to_string());
            return Ok((concept, true));
        };

        let concept = Self::load_concept(store, concept_id, &request.catalog_id)?;
        if !concept.published {
            return Ok((concept, false));
        }

        let versions = store.lineage(concept.original_id).map_err(store_error)?;
        let revision = versioning::revise_lineage(&versions, principal)?;
        Ok((revision, true))
    }

    /// Reopen the request and remove a version created for it
    fn roll_back(store: &mut S, request: &mut ChangeRequest, created: Option<ConceptId>) {
        request.status = ChangeRequestStatus::Open;
        if let Err(e) = store.save_change_request(request) {
            error!("Failed to reopen change request {}: {}", request.id, e);
        }

        if let Some(id) = created {
            if let Err(e) = store.delete_concept(id) {
                error!("Failed to delete concept {} during rollback: {}", id, e);
            }
        }
    }
}
