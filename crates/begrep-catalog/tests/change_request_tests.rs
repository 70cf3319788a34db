//! Integration tests for change request review

use begrep_catalog::{CatalogError, ChangeRequestService};
use begrep_domain::traits::{ChangeRequestStore, ConceptQuery, ConceptStore};
use begrep_domain::{
    ChangeRequest, ChangeRequestId, ChangeRequestStatus, Concept, ConceptId, ConceptStatus,
    ErrorCategory, JsonPatchOperation, Role, RoleTable, SemVer,
};
use begrep_store::{SqliteStore, StoreError};
use serde_json::json;
use std::sync::{Arc, Mutex};

const ORG: &str = "910244132";

/// SQLite store whose concept writes can be made to fail
struct FlakyStore {
    inner: SqliteStore,
    fail_concept_saves: bool,
}

impl ConceptStore for FlakyStore {
    type Error = StoreError;

    fn save_concept(&mut self, concept: &Concept) -> Result<(), Self::Error> {
        if self.fail_concept_saves {
            return Err(StoreError::InvalidData("disk full".to_string()));
        }
        self.inner.save_concept(concept)
    }

    fn get_concept(&self, id: ConceptId) -> Result<Option<Concept>, Self::Error> {
        self.inner.get_concept(id)
    }

    fn delete_concept(&mut self, id: ConceptId) -> Result<bool, Self::Error> {
        self.inner.delete_concept(id)
    }

    fn query_concepts(&self, query: &ConceptQuery) -> Result<Vec<Concept>, Self::Error> {
        self.inner.query_concepts(query)
    }
}

impl ChangeRequestStore for FlakyStore {
    type Error = StoreError;

    fn save_change_request(&mut self, request: &ChangeRequest) -> Result<(), Self::Error> {
        self.inner.save_change_request(request)
    }

    fn get_change_request(
        &self,
        id: ChangeRequestId,
    ) -> Result<Option<ChangeRequest>, Self::Error> {
        self.inner.get_change_request(id)
    }

    fn list_change_requests(&self, catalog_id: &str) -> Result<Vec<ChangeRequest>, Self::Error> {
        self.inner.list_change_requests(catalog_id)
    }
}

struct Fixture {
    store: Arc<Mutex<FlakyStore>>,
    service: ChangeRequestService<FlakyStore, RoleTable>,
}

fn fixture() -> Fixture {
    let store = Arc::new(Mutex::new(FlakyStore {
        inner: SqliteStore::in_memory().unwrap(),
        fail_concept_saves: false,
    }));
    let roles = RoleTable::new()
        .grant("writer", ORG, Role::Write)
        .grant("reader", ORG, Role::Read);
    let service = ChangeRequestService::new(store.clone(), Arc::new(roles));
    Fixture { store, service }
}

impl Fixture {
    fn seed(&self, published: bool, version: SemVer) -> Concept {
        let mut concept = Concept::new_lineage(ORG);
        concept.preferred_term.insert("nb".into(), "bil".into());
        concept.sem_ver = Some(version);
        if published {
            concept.published = true;
            concept.status = ConceptStatus::Published;
        }
        self.store.lock().unwrap().save_concept(&concept).unwrap();
        concept
    }

    fn concepts(&self) -> Vec<Concept> {
        self.store
            .lock()
            .unwrap()
            .query_concepts(&ConceptQuery::default())
            .unwrap()
    }
}

fn add_english() -> Vec<JsonPatchOperation> {
    vec![JsonPatchOperation::add("/preferredTerm/en", json!("car"))]
}

#[test]
fn test_accept_patches_unpublished_in_place() {
    let f = fixture();
    let draft = f.seed(false, SemVer::initial());

    let request = f
        .service
        .create("writer", ORG, Some(draft.id), "engelsk term", add_english())
        .unwrap();
    assert_eq!(request.status, ChangeRequestStatus::Open);

    let updated = f.service.accept("writer", request.id).unwrap();
    assert_eq!(updated.id, draft.id);
    assert_eq!(updated.preferred_term["en"], "car");
    assert_eq!(updated.history.change_element.len(), 1);
    assert_eq!(f.concepts().len(), 1);

    let stored = f.service.get("reader", request.id).unwrap();
    assert_eq!(stored.status, ChangeRequestStatus::Accepted);
}

#[test]
fn test_accept_revises_published() {
    let f = fixture();
    let v1 = f.seed(true, SemVer::new(1, 0, 0));

    let request = f
        .service
        .create("writer", ORG, Some(v1.id), "engelsk term", add_english())
        .unwrap();
    let revision = f.service.accept("writer", request.id).unwrap();

    assert_ne!(revision.id, v1.id);
    assert_eq!(revision.previous_version_id, Some(v1.id));
    assert_eq!(revision.sem_ver, Some(SemVer::new(1, 0, 1)));
    assert_eq!(revision.status, ConceptStatus::Draft);
    assert!(!revision.published);
    assert_eq!(revision.preferred_term["en"], "car");

    // The published version is untouched
    let stored_v1 = f.store.lock().unwrap().get_concept(v1.id).unwrap().unwrap();
    assert!(!stored_v1.preferred_term.contains_key("en"));
}

#[test]
fn test_second_revision_through_change_request_rejected() {
    let f = fixture();
    let v1 = f.seed(true, SemVer::new(1, 0, 0));

    let first = f
        .service
        .create("writer", ORG, Some(v1.id), "første", add_english())
        .unwrap();
    let second = f
        .service
        .create("writer", ORG, Some(v1.id), "andre", add_english())
        .unwrap();

    f.service.accept("writer", first.id).unwrap();
    let err = f.service.accept("writer", second.id).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::BadRequest);

    // The rejected acceptance leaves the request open
    assert_eq!(
        f.service.get("reader", second.id).unwrap().status,
        ChangeRequestStatus::Open
    );
    assert_eq!(f.concepts().len(), 2);
}

#[test]
fn test_accept_without_target_creates_lineage() {
    let f = fixture();
    let request = f
        .service
        .create(
            "writer",
            ORG,
            None,
            "nytt begrep",
            vec![JsonPatchOperation::add("/preferredTerm", json!({"nb": "sykkel"}))],
        )
        .unwrap();

    let concept = f.service.accept("writer", request.id).unwrap();
    assert_eq!(concept.id, concept.original_id);
    assert_eq!(concept.organization_id(), ORG);
    assert_eq!(concept.preferred_term["nb"], "sykkel");
    assert_eq!(concept.history.created_by.as_deref(), Some("writer"));
}

#[test]
fn test_failed_concept_write_rolls_back() {
    let f = fixture();
    let v1 = f.seed(true, SemVer::new(1, 0, 0));
    let request = f
        .service
        .create("writer", ORG, Some(v1.id), "engelsk term", add_english())
        .unwrap();

    f.store.lock().unwrap().fail_concept_saves = true;
    let err = f.service.accept("writer", request.id).unwrap_err();
    assert!(matches!(err, CatalogError::Store(_)));

    assert_eq!(
        f.service.get("reader", request.id).unwrap().status,
        ChangeRequestStatus::Open
    );
    let concepts = f.concepts();
    assert_eq!(concepts.len(), 1, "No revision may survive the rollback");
    assert_eq!(concepts[0].id, v1.id);

    // Once the store recovers the request can be accepted
    f.store.lock().unwrap().fail_concept_saves = false;
    let revision = f.service.accept("writer", request.id).unwrap();
    assert_eq!(revision.sem_ver, Some(SemVer::new(1, 0, 1)));
}

#[test]
fn test_status_is_protected_in_change_requests() {
    let f = fixture();
    let draft = f.seed(false, SemVer::initial());

    let err = f
        .service
        .create(
            "writer",
            ORG,
            Some(draft.id),
            "publiser",
            vec![JsonPatchOperation::replace("/status", json!("published"))],
        )
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::BadRequest);

    let err = f
        .service
        .create("writer", ORG, Some(draft.id), "tom", Vec::new())
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::BadRequest);
}

#[test]
fn test_closed_requests_cannot_change() {
    let f = fixture();
    let draft = f.seed(false, SemVer::initial());
    let request = f
        .service
        .create("writer", ORG, Some(draft.id), "engelsk term", add_english())
        .unwrap();

    let rejected = f.service.reject("writer", request.id).unwrap();
    assert_eq!(rejected.status, ChangeRequestStatus::Rejected);

    assert_eq!(
        f.service.accept("writer", request.id).unwrap_err().category(),
        ErrorCategory::Conflict
    );
    assert_eq!(
        f.service.reject("writer", request.id).unwrap_err().category(),
        ErrorCategory::Conflict
    );
    assert_eq!(
        f.service
            .update("writer", request.id, add_english())
            .unwrap_err()
            .category(),
        ErrorCategory::Conflict
    );
}

#[test]
fn test_update_and_list() {
    let f = fixture();
    let draft = f.seed(false, SemVer::initial());
    let request = f
        .service
        .create("writer", ORG, Some(draft.id), "engelsk term", add_english())
        .unwrap();

    let ops = vec![JsonPatchOperation::add("/preferredTerm/nn", json!("bil"))];
    let updated = f.service.update("writer", request.id, ops.clone()).unwrap();
    assert_eq!(updated.operations, ops);

    let listed = f.service.list("reader", ORG).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].operations, ops);

    assert!(matches!(
        f.service.list("stranger", ORG),
        Err(CatalogError::Forbidden(_))
    ));
    assert!(matches!(
        f.service.accept("reader", request.id),
        Err(CatalogError::Forbidden(_))
    ));
}

#[test]
fn test_unknown_target_and_request() {
    let f = fixture();
    assert!(matches!(
        f.service
            .create("writer", ORG, Some(ConceptId::new()), "x", add_english()),
        Err(CatalogError::NotFound(_))
    ));
    assert!(matches!(
        f.service.accept("writer", ChangeRequestId::new()),
        Err(CatalogError::NotFound(_))
    ));
}
