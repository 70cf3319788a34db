//! Publish validation logic

use crate::{GatekeeperError, ValidationConfig};
use begrep_domain::traits::ConceptStore;
use begrep_domain::{Concept, SemVer};
use regex::Regex;
use std::fmt;
use tracing::debug;

/// Result of publish validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether the concept may be published
    pub status: ValidationStatus,

    /// Rejection reasons (if any)
    pub reasons: Vec<RejectionReason>,
}

impl ValidationResult {
    /// Whether validation passed
    pub fn is_accepted(&self) -> bool {
        self.status == ValidationStatus::Accepted
    }
}

/// Validation status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStatus {
    /// Concept may be published
    Accepted,

    /// Concept must be fixed first
    Rejected,
}

/// Reasons for rejection
#[derive(Debug, Clone, PartialEq)]
pub enum RejectionReason {
    /// No preferred term in any language
    MissingPreferredTerm,

    /// Preferred term missing in a required language
    MissingLanguage(String),

    /// No definition text in any language
    MissingDefinition,

    /// Organization id absent or malformed
    InvalidOrganizationId(String),

    /// Validity period ends before it starts
    InvalidValidityPeriod {
        /// Start of the period
        from: String,
        /// End of the period
        to: String,
    },

    /// The version is not above the latest published version
    VersionNotIncreasing {
        /// Version being published
        version: String,
        /// Highest published version of the lineage
        published: String,
    },

    /// The version is already published
    AlreadyPublished,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::MissingPreferredTerm => write!(f, "preferred term is missing"),
            RejectionReason::MissingLanguage(lang) => {
                write!(f, "preferred term is missing in language '{}'", lang)
            }
            RejectionReason::MissingDefinition => write!(f, "definition is missing"),
            RejectionReason::InvalidOrganizationId(id) => {
                write!(f, "organization id '{}' is not valid", id)
            }
            RejectionReason::InvalidValidityPeriod { from, to } => {
                write!(f, "validity period ends ({}) before it starts ({})", to, from)
            }
            RejectionReason::VersionNotIncreasing { version, published } => write!(
                f,
                "version {} is not above published version {}",
                version, published
            ),
            RejectionReason::AlreadyPublished => write!(f, "version is already published"),
        }
    }
}

/// The Gatekeeper validates concept versions before publishing
#[derive(Debug, Clone)]
pub struct Gatekeeper {
    config: ValidationConfig,
    organization_id: Regex,
}

impl Gatekeeper {
    /// Create a new Gatekeeper with the given configuration
    pub fn new(config: ValidationConfig) -> Result<Self, GatekeeperError> {
        config.validate().map_err(GatekeeperError::Config)?;
        let organization_id = Regex::new(&config.organization_id_pattern)
            .map_err(|e| GatekeeperError::Config(e.to_string()))?;
        Ok(Self {
            config,
            organization_id,
        })
    }

    /// Create a Gatekeeper with default configuration
    pub fn default_config() -> Result<Self, GatekeeperError> {
        Self::new(ValidationConfig::default())
    }

    /// Validate a concept on its own
    pub fn validate(&self, concept: &Concept) -> ValidationResult {
        let mut reasons = Vec::new();

        // 1. Already published
        if concept.published {
            reasons.push(RejectionReason::AlreadyPublished);
        }

        // 2. Preferred term
        if self.config.require_preferred_term {
            let has_term = concept.preferred_term.values().any(|t| !t.trim().is_empty());
            if !has_term {
                reasons.push(RejectionReason::MissingPreferredTerm);
            }
        }
        for lang in &self.config.required_languages {
            let present = concept
                .preferred_term
                .get(lang)
                .is_some_and(|t| !t.trim().is_empty());
            if !present {
                reasons.push(RejectionReason::MissingLanguage(lang.clone()));
            }
        }

        // 3. Definition
        if self.config.require_definition && !has_definition(concept) {
            reasons.push(RejectionReason::MissingDefinition);
        }

        // 4. Organization
        if self.config.validate_organization_id
            && !self.organization_id.is_match(concept.organization_id())
        {
            reasons.push(RejectionReason::InvalidOrganizationId(
                concept.organization_id().to_string(),
            ));
        }

        // 5. Validity period
        if self.config.validate_validity_period {
            if let (Some(from), Some(to)) = (concept.valid_from, concept.valid_to) {
                if from > to {
                    reasons.push(RejectionReason::InvalidValidityPeriod {
                        from: from.to_string(),
                        to: to.to_string(),
                    });
                }
            }
        }

        let status = if reasons.is_empty() {
            ValidationStatus::Accepted
        } else {
            ValidationStatus::Rejected
        };
        debug!(
            "Publish validation of {}: {:?} ({} reasons)",
            concept.id,
            status,
            reasons.len()
        );

        ValidationResult { status, reasons }
    }

    /// Validate a concept including checks against its stored lineage
    pub fn validate_in_lineage<S: ConceptStore>(
        &self,
        concept: &Concept,
        store: &S,
    ) -> Result<ValidationResult, GatekeeperError>
    where
        S::Error: fmt::Display,
    {
        let mut result = self.validate(concept);

        if self.config.validate_version_order {
            if let Some(reason) = self.check_version_order(concept, store)? {
                result.reasons.push(reason);
                result.status = ValidationStatus::Rejected;
            }
        }

        Ok(result)
    }

    /// Check that the version is above every published version of the lineage
    fn check_version_order<S: ConceptStore>(
        &self,
        concept: &Concept,
        store: &S,
    ) -> Result<Option<RejectionReason>, GatekeeperError>
    where
        S::Error: fmt::Display,
    {
        let lineage = store
            .lineage(concept.original_id)
            .map_err(|e| GatekeeperError::Store(format!("Failed to load lineage: {}", e)))?;

        let published = lineage
            .iter()
            .filter(|v| v.published && v.id != concept.id)
            .filter_map(|v| v.sem_ver)
            .max();

        let version = concept.sem_ver.unwrap_or_else(SemVer::initial);
        match published {
            Some(published) if version <= published => Ok(Some(RejectionReason::VersionNotIncreasing {
                version: version.to_string(),
                published: published.to_string(),
            })),
            _ => Ok(None),
        }
    }
}

fn has_definition(concept: &Concept) -> bool {
    [
        &concept.definition,
        &concept.definition_for_public,
        &concept.definition_for_specialists,
    ]
    .into_iter()
    .flatten()
    .any(|d| d.text.values().any(|t| !t.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use begrep_domain::traits::ConceptQuery;
    use begrep_domain::{ConceptId, Definition};
    use chrono::NaiveDate;

    fn create_test_concept() -> Concept {
        let mut concept = Concept::new_lineage("910244132");
        concept.preferred_term.insert("nb".into(), "bil".into());
        concept.definition = Some(Definition {
            text: [("nb".to_string(), "kjøretøy med fire hjul".to_string())].into(),
            source_description: None,
        });
        concept
    }

    #[test]
    fn test_valid_concept() {
        let gatekeeper = Gatekeeper::default_config().unwrap();
        let result = gatekeeper.validate(&create_test_concept());

        assert_eq!(result.status, ValidationStatus::Accepted);
        assert!(result.reasons.is_empty());
    }

    #[test]
    fn test_missing_preferred_term_and_definition() {
        let gatekeeper = Gatekeeper::default_config().unwrap();
        let mut concept = create_test_concept();
        concept.preferred_term.insert("nb".into(), "  ".into());
        concept.definition = None;

        let result = gatekeeper.validate(&concept);
        assert_eq!(result.status, ValidationStatus::Rejected);
        assert_eq!(
            result.reasons,
            vec![
                RejectionReason::MissingPreferredTerm,
                RejectionReason::MissingDefinition
            ]
        );
    }

    #[test]
    fn test_audience_definition_counts() {
        let gatekeeper = Gatekeeper::default_config().unwrap();
        let mut concept = create_test_concept();
        concept.definition_for_public = concept.definition.take();

        assert!(gatekeeper.validate(&concept).is_accepted());
    }

    #[test]
    fn test_invalid_organization_id() {
        let gatekeeper = Gatekeeper::default_config().unwrap();
        let mut concept = create_test_concept();
        concept.organization.id = "12345".into();

        let result = gatekeeper.validate(&concept);
        match &result.reasons[..] {
            [RejectionReason::InvalidOrganizationId(id)] => assert_eq!(id, "12345"),
            other => panic!("Expected InvalidOrganizationId, got {:?}", other),
        }
    }

    #[test]
    fn test_validity_period() {
        let gatekeeper = Gatekeeper::default_config().unwrap();
        let mut concept = create_test_concept();
        concept.valid_from = NaiveDate::from_ymd_opt(2030, 1, 1);
        concept.valid_to = NaiveDate::from_ymd_opt(2020, 1, 1);
        assert!(!gatekeeper.validate(&concept).is_accepted());

        concept.valid_to = NaiveDate::from_ymd_opt(2030, 1, 1);
        assert!(gatekeeper.validate(&concept).is_accepted());
    }

    #[test]
    fn test_required_language() {
        let gatekeeper = Gatekeeper::new(ValidationConfig::strict()).unwrap();
        let mut concept = create_test_concept();
        concept.preferred_term.clear();
        concept.preferred_term.insert("en".into(), "car".into());

        let result = gatekeeper.validate(&concept);
        assert_eq!(result.reasons, vec![RejectionReason::MissingLanguage("nb".into())]);
    }

    #[test]
    fn test_already_published() {
        let gatekeeper = Gatekeeper::default_config().unwrap();
        let mut concept = create_test_concept();
        concept.published = true;
        assert_eq!(
            gatekeeper.validate(&concept).reasons,
            vec![RejectionReason::AlreadyPublished]
        );
    }

    #[test]
    fn test_permissive_config() {
        let gatekeeper = Gatekeeper::new(ValidationConfig::permissive()).unwrap();
        let mut concept = create_test_concept();
        concept.definition = None;
        concept.organization.id = "unknown".into();

        assert!(gatekeeper.validate(&concept).is_accepted());
    }

    #[test]
    fn test_version_must_increase() {
        let gatekeeper = Gatekeeper::default_config().unwrap();
        let mut published = create_test_concept();
        published.sem_ver = Some(SemVer::new(1, 0, 0));
        published.published = true;

        let mut draft = create_test_concept();
        draft.id = ConceptId::new();
        draft.original_id = published.original_id;
        draft.sem_ver = Some(SemVer::new(0, 9, 0));

        let store = MockStore(vec![published.clone()]);
        let result = gatekeeper.validate_in_lineage(&draft, &store).unwrap();
        assert_eq!(
            result.reasons,
            vec![RejectionReason::VersionNotIncreasing {
                version: "0.9.0".into(),
                published: "1.0.0".into()
            }]
        );

        draft.sem_ver = Some(SemVer::new(1, 0, 1));
        assert!(gatekeeper.validate_in_lineage(&draft, &store).unwrap().is_accepted());
    }

    #[test]
    fn test_reason_display() {
        assert_eq!(
            RejectionReason::InvalidOrganizationId("x".into()).to_string(),
            "organization id 'x' is not valid"
        );
    }

    // Mock store holding a fixed lineage
    struct MockStore(Vec<Concept>);

    impl ConceptStore for MockStore {
        type Error = String;

        fn save_concept(&mut self, _concept: &Concept) -> Result<(), Self::Error> {
            Ok(())
        }

        fn get_concept(&self, id: ConceptId) -> Result<Option<Concept>, Self::Error> {
            Ok(self.0.iter().find(|c| c.id == id).cloned())
        }

        fn delete_concept(&mut self, _id: ConceptId) -> Result<bool, Self::Error> {
            Ok(false)
        }

        fn query_concepts(&self, query: &ConceptQuery) -> Result<Vec<Concept>, Self::Error> {
            Ok(self
                .0
                .iter()
                .filter(|c| query.original_id.map_or(true, |id| c.original_id == id))
                .cloned()
                .collect())
        }
    }
}
