//! Import job state machine
//!
//! ```text
//! InProgress ──process──▶ PendingConfirmation ──confirm──▶ Saving ──▶ Completed
//!     │                          │                                ├─▶ PartiallyCompleted
//!     └──▶ Failed                └──cancel──▶ Cancelled           └─▶ Failed
//! ```

use crate::error::store_error;
use crate::{ImportConfig, ImportError};
use begrep_domain::traits::{Authorizer, ConceptStore, ImportResultStore};
use begrep_domain::{
    Concept, ConceptId, ExtractionRecord, ImportCounts, ImportId, ImportResult, ImportStatus,
    SaveFailure,
};
use begrep_extractor::{parse_turtle_str, Graph, ResourceExtractor};
use begrep_patch::{apply, PathPolicy};
use chrono::Utc;
use std::fmt::Display;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Runs import jobs against a shared store
pub struct ImportJobs<S, A>
where
    S: ConceptStore + ImportResultStore,
    A: Authorizer,
{
    store: Arc<Mutex<S>>,
    authorizer: Arc<A>,
    extractor: ResourceExtractor,
    config: ImportConfig,
}

impl<S, A> ImportJobs<S, A>
where
    S: ConceptStore + ImportResultStore,
    <S as ConceptStore>::Error: Display,
    <S as ImportResultStore>::Error: Display,
    A: Authorizer,
{
    /// Create a new job runner
    pub fn new(
        store: Arc<Mutex<S>>,
        authorizer: Arc<A>,
        extractor: ResourceExtractor,
        config: ImportConfig,
    ) -> Result<Self, ImportError> {
        config.validate().map_err(ImportError::Config)?;
        Ok(Self {
            store,
            authorizer,
            extractor,
            config,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    fn store(&self) -> Result<MutexGuard<'_, S>, ImportError> {
        self.store
            .lock()
            .map_err(|e| ImportError::Store(format!("Store lock error: {}", e)))
    }

    fn load(store: &S, id: ImportId) -> Result<ImportResult, ImportError> {
        store
            .get_import_result(id)
            .map_err(store_error)?
            .ok_or_else(|| ImportError::NotFound(id.to_string()))
    }

    fn authorize(&self, principal: &str, catalog_id: &str, write: bool) -> Result<(), ImportError> {
        let allowed = if write {
            self.authorizer.can_write(principal, catalog_id)
        } else {
            self.authorizer.can_read(principal, catalog_id)
        };
        if allowed {
            Ok(())
        } else {
            Err(ImportError::Forbidden(format!(
                "{} may not {} imports in catalog {}",
                principal,
                if write { "run" } else { "read" },
                catalog_id
            )))
        }
    }

    /// Allocate a new job in `InProgress`
    pub fn create(&self, principal: &str, catalog_id: &str) -> Result<ImportResult, ImportError> {
        self.authorize(principal, catalog_id, true)?;

        let job = ImportResult::new(catalog_id, Some(principal.to_string()));
        self.store()?.save_import_result(&job).map_err(store_error)?;
        info!("Created import job {} for catalog {}", job.id, catalog_id);
        Ok(job)
    }

    /// Get a job
    pub fn get(&self, principal: &str, id: ImportId) -> Result<ImportResult, ImportError> {
        let job = Self::load(&*self.store()?, id)?;
        self.authorize(principal, &job.catalog_id, false)?;
        Ok(job)
    }

    /// All jobs of a catalog, newest first
    pub fn list(&self, principal: &str, catalog_id: &str) -> Result<Vec<ImportResult>, ImportError> {
        self.authorize(principal, catalog_id, false)?;
        self.store()?
            .list_import_results(catalog_id)
            .map_err(store_error)
    }

    fn ensure_in_progress(job: &ImportResult) -> Result<(), ImportError> {
        if job.status != ImportStatus::InProgress {
            return Err(ImportError::Internal(format!(
                "Import job {} cannot be processed in state {:?}",
                job.id, job.status
            )));
        }
        Ok(())
    }

    /// Parse Turtle and process it into the job
    ///
    /// The job must be `InProgress`. A syntax error then fails the job and
    /// is returned as an upstream error.
    pub fn process_turtle(&self, id: ImportId, turtle: &str) -> Result<ImportResult, ImportError> {
        Self::ensure_in_progress(&Self::load(&*self.store()?, id)?)?;

        match parse_turtle_str(turtle) {
            Ok(graph) => self.process(id, &graph),
            Err(e) => {
                warn!("Import job {}: RDF could not be parsed: {}", id, e);
                let mut store = self.store()?;
                let mut job = Self::load(&store, id)?;
                if job.status == ImportStatus::InProgress {
                    job.status = ImportStatus::Failed;
                    store.save_import_result(&job).map_err(store_error)?;
                }
                Err(ImportError::Upstream(e))
            }
        }
    }

    /// Extract every concept resource of `graph` into the job
    ///
    /// The job fails when the graph holds no concept, too many concepts, or
    /// any record carries an error. Otherwise it waits for confirmation.
    pub fn process(&self, id: ImportId, graph: &Graph) -> Result<ImportResult, ImportError> {
        let mut job = Self::load(&*self.store()?, id)?;
        Self::ensure_in_progress(&job)?;

        // Extraction runs without holding the store
        let records = self.extractor.extract_all(graph);
        job.counts.extracted = records.len();

        job.status = if records.is_empty() {
            warn!("Import job {}: graph contains no concepts", id);
            ImportStatus::Failed
        } else if records.len() > self.config.max_resources_per_import {
            warn!(
                "Import job {}: {} concepts exceed the limit of {}",
                id,
                records.len(),
                self.config.max_resources_per_import
            );
            ImportStatus::Failed
        } else if records.iter().any(ExtractionRecord::has_errors) {
            ImportStatus::Failed
        } else {
            ImportStatus::PendingConfirmation
        };
        job.extraction_records = records;

        let mut store = self.store()?;
        // A cancel may have landed while extracting
        let current = Self::load(&store, id)?;
        if current.status != ImportStatus::InProgress {
            return Err(ImportError::Internal(format!(
                "Import job {} changed to {:?} while processing",
                id, current.status
            )));
        }
        store.save_import_result(&job).map_err(store_error)?;

        info!(
            "Import job {} processed: {} records, status {:?}",
            id,
            job.extraction_records.len(),
            job.status
        );
        Ok(job)
    }

    /// Write the extracted concepts of a job awaiting confirmation
    pub fn confirm(&self, principal: &str, id: ImportId) -> Result<ImportResult, ImportError> {
        let mut store = self.store()?;
        let mut job = Self::load(&store, id)?;
        self.authorize(principal, &job.catalog_id, true)?;
        if job.status != ImportStatus::PendingConfirmation {
            return Err(ImportError::InvalidState(format!(
                "Import job {} is {:?}, not awaiting confirmation",
                id, job.status
            )));
        }

        job.status = ImportStatus::Saving;
        store.save_import_result(&job).map_err(store_error)?;

        let mut saved = Vec::with_capacity(job.extraction_records.len());
        let mut failures = Vec::new();
        for record in &job.extraction_records {
            match Self::save_record(&mut store, &job.catalog_id, record, principal) {
                Ok(concept_id) => saved.push(record.with_internal_id(concept_id)),
                Err(reason) => {
                    debug!("Import job {}: {} not saved: {}", id, record.external_id, reason);
                    failures.push(SaveFailure {
                        external_id: record.external_id.clone(),
                        reason,
                    });
                    saved.push(record.clone());
                }
            }
        }

        let saved_count = job.extraction_records.len() - failures.len();
        job.status = if failures.is_empty() {
            ImportStatus::Completed
        } else if saved_count > 0 {
            ImportStatus::PartiallyCompleted
        } else {
            ImportStatus::Failed
        };
        job.counts = ImportCounts {
            extracted: job.counts.extracted,
            saved: saved_count,
            failed: failures.len(),
        };
        job.extraction_records = saved;
        job.save_failures = failures;
        store.save_import_result(&job).map_err(store_error)?;

        info!(
            "Import job {} confirmed: {} saved, {} failed, status {:?}",
            id, job.counts.saved, job.counts.failed, job.status
        );
        Ok(job)
    }

    /// Save one record as a concept; returns the concept id or why it failed
    fn save_record(
        store: &mut S,
        catalog_id: &str,
        record: &ExtractionRecord,
        principal: &str,
    ) -> Result<ConceptId, String> {
        let previous = store
            .find_completed_record(catalog_id, &record.external_id)
            .map_err(|e| format!("lookup failed: {}", e))?;

        let mut concept = match previous.and_then(|r| r.internal_id) {
            Some(existing) => {
                let versions = store
                    .lineage(existing)
                    .map_err(|e| format!("lookup failed: {}", e))?;
                if !versions.is_empty() {
                    return Err(format!("already imported as concept {}", existing));
                }
                // Lineage was deleted since: recreate it under the same id
                Concept::new_version(existing, existing, catalog_id)
            }
            None => Concept::new_lineage(catalog_id),
        };
        concept.history.created_at = Some(Utc::now());
        concept.history.created_by = Some(principal.to_string());

        let concept = apply(&concept, &record.extract_result.operations, &PathPolicy::import())
            .map_err(|e| e.to_string())?;
        store
            .save_concept(&concept)
            .map_err(|e| format!("save failed: {}", e))?;
        Ok(concept.id)
    }

    /// Cancel a job that has not started saving
    pub fn cancel(&self, principal: &str, id: ImportId) -> Result<ImportResult, ImportError> {
        let mut store = self.store()?;
        let mut job = Self::load(&store, id)?;
        self.authorize(principal, &job.catalog_id, true)?;
        if !matches!(
            job.status,
            ImportStatus::InProgress | ImportStatus::PendingConfirmation
        ) {
            return Err(ImportError::InvalidState(format!(
                "Import job {} is {:?} and cannot be cancelled",
                id, job.status
            )));
        }

        job.status = ImportStatus::Cancelled;
        store.save_import_result(&job).map_err(store_error)?;
        info!("Cancelled import job {}", id);
        Ok(job)
    }
}
