//! Integration tests for the import job state machine

use begrep_domain::traits::ConceptStore;
use begrep_domain::{ErrorCategory, ImportStatus, Role, RoleTable};
use begrep_extractor::{ExtractorConfig, ResourceExtractor};
use begrep_importer::{ImportConfig, ImportError, ImportJobs};
use begrep_store::SqliteStore;
use std::sync::{Arc, Mutex};

const ORG: &str = "910244132";

const TWO_CONCEPTS: &str = r#"
    @prefix skos: <http://www.w3.org/2004/02/skos/core#> .
    @prefix owl: <http://www.w3.org/2002/07/owl#> .
    <https://example.org/begrep/bil> a skos:Concept ;
        skos:prefLabel "bil"@nb, "car"@en ;
        owl:versionInfo "1.0.0" .
    <https://example.org/begrep/bat> a skos:Concept ;
        skos:prefLabel "båt"@nb .
"#;

struct Fixture {
    store: Arc<Mutex<SqliteStore>>,
    jobs: ImportJobs<SqliteStore, RoleTable>,
}

fn fixture_with(config: ImportConfig) -> Fixture {
    let store = Arc::new(Mutex::new(SqliteStore::in_memory().unwrap()));
    let roles = RoleTable::new()
        .grant("alice", ORG, Role::Write)
        .grant("reader", ORG, Role::Read);
    let jobs = ImportJobs::new(
        store.clone(),
        Arc::new(roles),
        ResourceExtractor::new(ExtractorConfig::default()).unwrap(),
        config,
    )
    .unwrap();
    Fixture { store, jobs }
}

fn fixture() -> Fixture {
    fixture_with(ImportConfig::synchronous())
}

impl Fixture {
    fn concept_count(&self) -> usize {
        self.store
            .lock()
            .unwrap()
            .query_concepts(&Default::default())
            .unwrap()
            .len()
    }

    fn import(&self, turtle: &str) -> begrep_domain::ImportResult {
        let job = self.jobs.create("alice", ORG).unwrap();
        let job = self.jobs.process_turtle(job.id, turtle).unwrap();
        assert_eq!(job.status, ImportStatus::PendingConfirmation);
        self.jobs.confirm("alice", job.id).unwrap()
    }
}

#[test]
fn test_create_starts_in_progress() {
    let f = fixture();
    let job = f.jobs.create("alice", ORG).unwrap();
    assert_eq!(job.status, ImportStatus::InProgress);
    assert_eq!(job.created_by.as_deref(), Some("alice"));
    assert_eq!(f.jobs.get("reader", job.id).unwrap(), job);
}

#[test]
fn test_process_records_without_internal_ids() {
    let f = fixture();
    let job = f.jobs.create("alice", ORG).unwrap();
    let job = f.jobs.process_turtle(job.id, TWO_CONCEPTS).unwrap();

    assert_eq!(job.status, ImportStatus::PendingConfirmation);
    assert_eq!(job.counts.extracted, 2);
    assert!(job.extraction_records.iter().all(|r| r.internal_id.is_none()));
    assert_eq!(f.concept_count(), 0, "Nothing is written before confirmation");
}

#[test]
fn test_confirm_saves_concepts() {
    let f = fixture();
    let job = f.import(TWO_CONCEPTS);

    assert_eq!(job.status, ImportStatus::Completed);
    assert_eq!(job.counts.saved, 2);
    assert_eq!(job.counts.failed, 0);
    assert_eq!(f.concept_count(), 2);

    let record = job.record("https://example.org/begrep/bil").unwrap();
    let concept_id = record.internal_id.unwrap();
    let concept = f.store.lock().unwrap().get_concept(concept_id).unwrap().unwrap();
    assert_eq!(concept.preferred_term["en"], "car");
    assert_eq!(concept.sem_ver, Some(begrep_domain::SemVer::new(1, 0, 0)));
    assert_eq!(concept.organization_id(), ORG);
    assert!(!concept.published);
    assert_eq!(concept.history.created_by.as_deref(), Some("alice"));
}

#[test]
fn test_extraction_error_fails_job() {
    let f = fixture();
    let ttl = r#"
        @prefix skos: <http://www.w3.org/2004/02/skos/core#> .
        <https://example.org/begrep/1> a skos:Concept ; skos:prefLabel "uten språk" .
    "#;
    let job = f.jobs.create("alice", ORG).unwrap();
    let job = f.jobs.process_turtle(job.id, ttl).unwrap();

    assert_eq!(job.status, ImportStatus::Failed);
    assert_eq!(job.extraction_records.len(), 1);
    assert!(job.extraction_records[0].has_errors());

    let err = f.jobs.confirm("alice", job.id).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Conflict);
}

#[test]
fn test_graph_without_concepts_fails_job() {
    let f = fixture();
    let job = f.jobs.create("alice", ORG).unwrap();
    let job = f
        .jobs
        .process_turtle(job.id, "<https://example.org/a> <https://example.org/p> \"x\" .")
        .unwrap();
    assert_eq!(job.status, ImportStatus::Failed);
    assert!(job.extraction_records.is_empty());
}

#[test]
fn test_resource_limit() {
    let f = fixture_with(ImportConfig {
        max_resources_per_import: 1,
        ..ImportConfig::synchronous()
    });
    let job = f.jobs.create("alice", ORG).unwrap();
    let job = f.jobs.process_turtle(job.id, TWO_CONCEPTS).unwrap();
    assert_eq!(job.status, ImportStatus::Failed);
}

#[test]
fn test_process_requires_in_progress() {
    let f = fixture();
    let job = f.jobs.create("alice", ORG).unwrap();
    f.jobs.cancel("alice", job.id).unwrap();

    let err = f.jobs.process_turtle(job.id, TWO_CONCEPTS).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Internal);

    let err = f
        .jobs
        .process_turtle(begrep_domain::ImportId::new(), TWO_CONCEPTS)
        .unwrap_err();
    assert!(matches!(err, ImportError::NotFound(_)));
}

#[test]
fn test_bad_turtle_on_finished_job_reports_state() {
    let f = fixture();
    let completed = f.import(TWO_CONCEPTS);

    let err = f
        .jobs
        .process_turtle(completed.id, "<https://example.org/a> <https://example.org/b> .")
        .unwrap_err();
    assert!(matches!(err, ImportError::Internal(_)));
    assert_eq!(err.category(), ErrorCategory::Internal);
    assert_eq!(
        f.jobs.get("alice", completed.id).unwrap().status,
        ImportStatus::Completed
    );
}

#[test]
fn test_cancel_rules() {
    let f = fixture();

    let pending = f.jobs.create("alice", ORG).unwrap();
    f.jobs.process_turtle(pending.id, TWO_CONCEPTS).unwrap();
    let cancelled = f.jobs.cancel("alice", pending.id).unwrap();
    assert_eq!(cancelled.status, ImportStatus::Cancelled);
    assert!(matches!(
        f.jobs.confirm("alice", pending.id),
        Err(ImportError::InvalidState(_))
    ));

    let completed = f.import(TWO_CONCEPTS);
    assert!(matches!(
        f.jobs.cancel("alice", completed.id),
        Err(ImportError::InvalidState(_))
    ));
}

#[test]
fn test_confirmation_replay_fails_record() {
    let f = fixture();
    let first = f.import(TWO_CONCEPTS);
    assert_eq!(first.status, ImportStatus::Completed);
    let first_bil = first
        .record("https://example.org/begrep/bil")
        .and_then(|r| r.internal_id)
        .unwrap();
    let before = f.store.lock().unwrap().get_concept(first_bil).unwrap().unwrap();

    let ttl = r#"
        @prefix skos: <http://www.w3.org/2004/02/skos/core#> .
        <https://example.org/begrep/bil> a skos:Concept ; skos:prefLabel "personbil"@nb .
        <https://example.org/begrep/sykkel> a skos:Concept ; skos:prefLabel "sykkel"@nb .
    "#;
    let second = f.import(ttl);

    assert_eq!(second.status, ImportStatus::PartiallyCompleted);
    assert_eq!(second.counts.saved, 1);
    assert_eq!(second.counts.failed, 1);
    assert_eq!(second.save_failures.len(), 1);
    assert_eq!(second.save_failures[0].external_id, "https://example.org/begrep/bil");
    assert!(second
        .record("https://example.org/begrep/bil")
        .unwrap()
        .internal_id
        .is_none());

    // Exactly one concept for the replayed resource, unchanged
    assert_eq!(f.concept_count(), 3);
    let after = f.store.lock().unwrap().get_concept(first_bil).unwrap().unwrap();
    assert_eq!(after, before);
}

#[test]
fn test_replay_of_only_record_fails_job() {
    let f = fixture();
    let ttl = r#"
        @prefix skos: <http://www.w3.org/2004/02/skos/core#> .
        <https://example.org/begrep/bil> a skos:Concept ; skos:prefLabel "bil"@nb .
    "#;
    f.import(ttl);
    let second = f.import(ttl);

    assert_eq!(second.status, ImportStatus::Failed);
    assert_eq!(second.counts.saved, 0);
    assert_eq!(f.concept_count(), 1);
}

#[test]
fn test_deleted_concept_is_recreated_under_same_id() {
    let f = fixture();
    let ttl = r#"
        @prefix skos: <http://www.w3.org/2004/02/skos/core#> .
        <https://example.org/begrep/bil> a skos:Concept ; skos:prefLabel "bil"@nb .
    "#;
    let first = f.import(ttl);
    let id = first.extraction_records[0].internal_id.unwrap();
    assert!(f.store.lock().unwrap().delete_concept(id).unwrap());

    let second = f.import(ttl);
    assert_eq!(second.status, ImportStatus::Completed);
    assert_eq!(second.extraction_records[0].internal_id, Some(id));

    let concept = f.store.lock().unwrap().get_concept(id).unwrap().unwrap();
    assert_eq!(concept.original_id, id);
    assert_eq!(concept.preferred_term["nb"], "bil");
}

#[test]
fn test_authorization() {
    let f = fixture();
    assert!(matches!(
        f.jobs.create("reader", ORG),
        Err(ImportError::Forbidden(_))
    ));

    let job = f.jobs.create("alice", ORG).unwrap();
    f.jobs.process_turtle(job.id, TWO_CONCEPTS).unwrap();
    assert!(matches!(
        f.jobs.confirm("reader", job.id),
        Err(ImportError::Forbidden(_))
    ));
    assert!(matches!(
        f.jobs.list("mallory", ORG),
        Err(ImportError::Forbidden(_))
    ));
    assert_eq!(f.jobs.list("reader", ORG).unwrap().len(), 1);
}
