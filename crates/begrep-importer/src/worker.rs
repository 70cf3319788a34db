//! Bounded worker pool for import processing

use crate::{ImportError, ImportJobs};
use begrep_domain::traits::{Authorizer, ConceptStore, ImportResultStore};
use begrep_domain::ImportResult;
use std::fmt::Display;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Runs import processing off the caller's task
///
/// At most `max_concurrent_imports` jobs are processed at once; further
/// imports wait for a slot before their job is created. In synchronous
/// mode the job is processed inline and `start` returns its final state.
///
/// # Examples
///
/// ```no_run
/// use begrep_domain::{Role, RoleTable};
/// use begrep_extractor::{ExtractorConfig, ResourceExtractor};
/// use begrep_importer::{ImportConfig, ImportJobs, ImportWorker};
/// use begrep_store::SqliteStore;
/// use std::sync::{Arc, Mutex};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = Arc::new(Mutex::new(SqliteStore::new("begrep.db")?));
///     let roles = Arc::new(RoleTable::new().grant("alice", "910244132", Role::Write));
///     let jobs = ImportJobs::new(
///         store,
///         roles,
///         ResourceExtractor::new(ExtractorConfig::default())?,
///         ImportConfig::default(),
///     )?;
///     let worker = ImportWorker::new(Arc::new(jobs));
///
///     let turtle = std::fs::read_to_string("concepts.ttl")?;
///     let job = worker.start("alice", "910244132", turtle).await?;
///     worker.drain().await;
///     println!("{}", job.id);
///     Ok(())
/// }
/// ```
pub struct ImportWorker<S, A>
where
    S: ConceptStore + ImportResultStore,
    A: Authorizer,
{
    jobs: Arc<ImportJobs<S, A>>,
    slots: Arc<Semaphore>,
    size: u32,
}

impl<S, A> ImportWorker<S, A>
where
    S: ConceptStore + ImportResultStore + Send + 'static,
    <S as ConceptStore>::Error: Display,
    <S as ImportResultStore>::Error: Display,
    A: Authorizer + Send + Sync + 'static,
{
    /// Create a worker sized by the jobs' configuration
    pub fn new(jobs: Arc<ImportJobs<S, A>>) -> Self {
        let size = u32::try_from(jobs.config().max_concurrent_imports).unwrap_or(u32::MAX);
        Self {
            jobs,
            slots: Arc::new(Semaphore::new(size as usize)),
            size,
        }
    }

    /// The job runner behind this worker
    pub fn jobs(&self) -> &Arc<ImportJobs<S, A>> {
        &self.jobs
    }

    /// Create a job for `turtle` and process it
    ///
    /// Returns the job as created (`InProgress`) when processing runs in the
    /// background, or its processed state in synchronous mode.
    pub async fn start(
        &self,
        principal: &str,
        catalog_id: &str,
        turtle: String,
    ) -> Result<ImportResult, ImportError> {
        if self.jobs.config().synchronous {
            let job = self.jobs.create(principal, catalog_id)?;
            return self.jobs.process_turtle(job.id, &turtle);
        }

        let permit = self
            .slots
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| ImportError::Internal(format!("Worker pool closed: {}", e)))?;
        let job = self.jobs.create(principal, catalog_id)?;

        let jobs = Arc::clone(&self.jobs);
        let id = job.id;
        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            match jobs.process_turtle(id, &turtle) {
                Ok(job) => tracing::debug!("Background import {} finished: {:?}", id, job.status),
                Err(e) => tracing::error!("Background import {} failed: {}", id, e),
            }
        });

        Ok(job)
    }

    /// Wait until no import is being processed
    pub async fn drain(&self) {
        match self.slots.acquire_many(self.size).await {
            Ok(_all) => tracing::debug!("Import worker idle"),
            Err(e) => tracing::warn!("Worker pool closed while draining: {}", e),
        }
    }
}
