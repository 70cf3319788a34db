//! Lineage rules: latest version, revision creation

use crate::CatalogError;
use begrep_domain::{Concept, ConceptId, ConceptStatus, History, SemVer};
use chrono::Utc;

/// The version with the greatest SemVer
///
/// Versions without a SemVer sort below every versioned one.
pub fn latest(versions: &[Concept]) -> Option<&Concept> {
    versions.iter().max_by_key(|c| c.sem_ver)
}

/// The unpublished version of a lineage, if any
pub fn unpublished(versions: &[Concept]) -> Option<&Concept> {
    versions.iter().find(|c| !c.published)
}

/// Versions sorted by ascending SemVer
pub fn sorted(mut versions: Vec<Concept>) -> Vec<Concept> {
    versions.sort_by_key(|c| c.sem_ver);
    versions
}

/// A new draft following `base`
///
/// The revision copies the content of `base`, points back at it and bumps
/// the patch version. History restarts with the revision's creation.
pub fn new_revision(base: &Concept, principal: &str) -> Result<Concept, CatalogError> {
    let sem_ver = match base.sem_ver {
        None => SemVer::initial(),
        Some(v) => v.next_patch().ok_or_else(|| {
            CatalogError::BadRequest(format!("Version {} has no patch successor", v))
        })?,
    };

    let mut revision = base.clone();
    revision.id = ConceptId::new();
    revision.previous_version_id = Some(base.id);
    revision.sem_ver = Some(sem_ver);
    revision.status = ConceptStatus::Draft;
    revision.published = false;
    revision.published_at = None;
    revision.history = History {
        created_at: Some(Utc::now()),
        created_by: Some(principal.to_string()),
        change_element: Vec::new(),
    };
    Ok(revision)
}

/// Revision of a lineage, enforcing one unpublished version per lineage
pub fn revise_lineage(versions: &[Concept], principal: &str) -> Result<Concept, CatalogError> {
    if let Some(draft) = unpublished(versions) {
        return Err(CatalogError::BadRequest(format!(
            "Lineage already has an unpublished revision: {}",
            draft.id
        )));
    }

    let base = latest(versions)
        .ok_or_else(|| CatalogError::NotFound("Lineage has no versions".to_string()))?;
    new_revision(base, principal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn published(version: SemVer) -> Concept {
        let mut concept = Concept::new_lineage("910244132");
        concept.sem_ver = Some(version);
        concept.status = ConceptStatus::Published;
        concept.published = true;
        concept.published_at = Some(Utc::now());
        concept
    }

    #[test]
    fn test_revision_of_published() {
        let v1 = published(SemVer::new(1, 0, 0));
        let revision = revise_lineage(std::slice::from_ref(&v1), "alice").unwrap();

        assert_ne!(revision.id, v1.id);
        assert_eq!(revision.original_id, v1.original_id);
        assert_eq!(revision.previous_version_id, Some(v1.id));
        assert_eq!(revision.sem_ver, Some(SemVer::new(1, 0, 1)));
        assert_eq!(revision.status, ConceptStatus::Draft);
        assert!(!revision.published);
        assert_eq!(revision.published_at, None);
        assert_eq!(revision.history.created_by.as_deref(), Some("alice"));
    }

    #[test]
    fn test_second_unpublished_revision_rejected() {
        let v1 = published(SemVer::new(1, 0, 0));
        let revision = new_revision(&v1, "alice").unwrap();

        let result = revise_lineage(&[v1, revision], "bob");
        assert!(matches!(result, Err(CatalogError::BadRequest(_))));
    }

    #[test]
    fn test_empty_lineage() {
        assert!(matches!(
            revise_lineage(&[], "alice"),
            Err(CatalogError::NotFound(_))
        ));
    }

    #[test]
    fn test_unversioned_revision_starts_at_initial() {
        let mut base = published(SemVer::new(0, 0, 0));
        base.sem_ver = None;
        assert_eq!(
            new_revision(&base, "alice").unwrap().sem_ver,
            Some(SemVer::initial())
        );
    }

    #[test]
    fn test_revision_of_exhausted_patch_rejected() {
        let last = published(SemVer::new(1, 0, u32::MAX));
        let result = revise_lineage(std::slice::from_ref(&last), "alice");
        match result {
            Err(e @ CatalogError::BadRequest(_)) => {
                assert_eq!(e.category(), begrep_domain::ErrorCategory::BadRequest)
            }
            other => panic!("expected bad request, got {:?}", other),
        }
    }

    proptest! {
        /// Property: latest picks the greatest version regardless of order
        #[test]
        fn test_latest_ignores_insertion_order(
            versions in prop::collection::vec((0u32..3, 0u32..3, 0u32..5), 1..8),
            seed in any::<u64>(),
        ) {
            let concepts: Vec<Concept> = versions
                .iter()
                .map(|&(a, b, c)| published(SemVer::new(a, b, c)))
                .collect();
            let expected = versions.iter().map(|&(a, b, c)| SemVer::new(a, b, c)).max();

            let mut shuffled = concepts.clone();
            let len = shuffled.len();
            shuffled.rotate_left((seed as usize) % len);
            shuffled.reverse();

            prop_assert_eq!(latest(&concepts).and_then(|c| c.sem_ver), expected);
            prop_assert_eq!(latest(&shuffled).and_then(|c| c.sem_ver), expected);
        }

        /// Property: SemVer order is lexicographic on (major, minor, patch)
        #[test]
        fn test_semver_lexicographic(a in any::<(u32, u32, u32)>(), b in any::<(u32, u32, u32)>()) {
            let x = SemVer::new(a.0, a.1, a.2);
            let y = SemVer::new(b.0, b.1, b.2);
            prop_assert_eq!(x.cmp(&y), a.cmp(&b));
        }

        /// Property: sorted versions ascend
        #[test]
        fn test_sorted_ascends(versions in prop::collection::vec((0u32..3, 0u32..3, 0u32..5), 0..8)) {
            let concepts = versions
                .iter()
                .map(|&(a, b, c)| published(SemVer::new(a, b, c)))
                .collect();
            let sorted = sorted(concepts);
            prop_assert!(sorted.windows(2).all(|w| w[0].sem_ver <= w[1].sem_ver));
        }
    }
}
