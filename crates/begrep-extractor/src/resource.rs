//! Resource extractor: field results shaped into extraction records
//!
//! The same field extractors feed two adapters:
//!
//! - [`ResourceExtractor::extract_operations`] emits one `add` per populated
//!   field, for bulk import into brand-new concepts
//! - [`ResourceExtractor::extract_replacement`] builds a full candidate from
//!   an existing concept and diffs it against the original

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::fields::{ContactRules, Extracted, ExtractedFields};
use crate::graph::{Graph, Resource};
use begrep_domain::{Concept, ExtractResult, ExtractionRecord, Issue, JsonPatchOperation};
use begrep_patch::ConceptField;
use serde::Serialize;
use tracing::{debug, info};

/// Error recorded when re-extraction changes nothing
pub const NO_CHANGES_DETECTED: &str = "no changes detected";

/// Turns RDF resources into extraction records
#[derive(Debug, Clone)]
pub struct ResourceExtractor {
    config: ExtractorConfig,
    rules: ContactRules,
}

impl ResourceExtractor {
    /// Create an extractor, compiling the configured patterns
    pub fn new(config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        let (email, telephone) = config.contact_patterns()?;
        Ok(Self {
            config,
            rules: ContactRules::new(email, telephone),
        })
    }

    /// Configuration in use
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Run every field extractor over `resource`
    pub fn fields(&self, resource: &Resource<'_>) -> ExtractedFields {
        ExtractedFields::extract(
            resource,
            &self.rules,
            self.config.untargeted_definition_is_general,
        )
    }

    /// Operation-emitting mode: one record per concept-typed resource
    pub fn extract_all(&self, graph: &Graph) -> Vec<ExtractionRecord> {
        let records: Vec<_> = graph
            .resources_of_type(&self.config.concept_type)
            .iter()
            .map(|resource| self.extract_operations(resource))
            .collect();
        info!(
            "Extracted {} resources from graph of {} triples",
            records.len(),
            graph.len()
        );
        records
    }

    /// Operation-emitting mode for a single resource
    ///
    /// Each populated field becomes an `add` at its fixed path. Fields that
    /// failed contribute only their issues.
    pub fn extract_operations(&self, resource: &Resource<'_>) -> ExtractionRecord {
        let fields = self.fields(resource);
        let mut result = ExtractResult::default();

        for issue in fields.issues() {
            result.push_issue(issue);
        }

        add(&mut result, ConceptField::PreferredTerm, &fields.preferred_term);
        add(&mut result, ConceptField::AlternativeTerms, &fields.alternative_terms);
        add(&mut result, ConceptField::HiddenTerms, &fields.hidden_terms);
        add(&mut result, ConceptField::Definition, &fields.definition);
        add(&mut result, ConceptField::DefinitionForPublic, &fields.definition_for_public);
        add(
            &mut result,
            ConceptField::DefinitionForSpecialists,
            &fields.definition_for_specialists,
        );
        add(&mut result, ConceptField::Notes, &fields.notes);
        add(&mut result, ConceptField::Examples, &fields.examples);
        add(&mut result, ConceptField::Subject, &fields.subject);
        add(&mut result, ConceptField::SubjectCodes, &fields.subject_codes);
        add(&mut result, ConceptField::ValueRange, &fields.value_range);
        add(&mut result, ConceptField::ContactPoint, &fields.contact_point);
        add(&mut result, ConceptField::ValidFrom, &fields.valid_from);
        add(&mut result, ConceptField::ValidTo, &fields.valid_to);
        add(&mut result, ConceptField::SeeAlso, &fields.see_also);
        add(&mut result, ConceptField::ReplacedBy, &fields.replaced_by);
        add(&mut result, ConceptField::AbbreviatedLabel, &fields.abbreviated_label);
        add(&mut result, ConceptField::Relations, &fields.relations);
        add(&mut result, ConceptField::SemVer, &fields.sem_ver);
        add(&mut result, ConceptField::Status, &fields.status);

        let external_id = resource.node().lexical().to_string();
        debug!(
            "Resource {}: {} operations, {} issues",
            external_id,
            result.operations.len(),
            result.issues.len()
        );
        ExtractionRecord::new(external_id, result)
    }

    /// Replacement mode: re-extract `resource` as a new state of `original`
    ///
    /// Fields the resource does not yield keep the original's value. An
    /// invalid version number rejects the whole resource, and so does a
    /// candidate identical to the original.
    pub fn extract_replacement(
        &self,
        resource: &Resource<'_>,
        original: &Concept,
    ) -> Result<ExtractionRecord, ExtractorError> {
        let fields = self.fields(resource);
        let mut result = ExtractResult::default();
        for issue in fields.issues() {
            result.push_issue(issue);
        }

        let external_id = resource.node().lexical().to_string();
        if fields.sem_ver.has_errors() {
            debug!("Resource {}: invalid version, nothing extracted", external_id);
            return Ok(ExtractionRecord::new(external_id, result).with_internal_id(original.id));
        }

        let candidate = fields.into_candidate(original);
        for operation in begrep_patch::diff(original, &candidate)? {
            result.push_operation(operation);
        }
        if result.operations.is_empty() {
            result.push_issue(Issue::error(NO_CHANGES_DETECTED));
        }

        Ok(ExtractionRecord::new(external_id, result).with_internal_id(original.id))
    }
}

fn add<T: Serialize>(result: &mut ExtractResult, field: ConceptField, extracted: &Extracted<T>) {
    let Some(value) = &extracted.value else {
        return;
    };
    match serde_json::to_value(value) {
        Ok(value) => result.push_operation(JsonPatchOperation::add(field.path(), value)),
        Err(e) => result.push_issue(Issue::error(format!(
            "{}: value could not be serialized: {}",
            field.key(),
            e
        ))),
    }
}

impl ExtractedFields {
    /// Overlay extracted values on a copy of `original`
    ///
    /// Every field, relations and see-also links included, falls back to the
    /// original when nothing usable was extracted.
    pub fn into_candidate(self, original: &Concept) -> Concept {
        let mut candidate = original.clone();
        if let Some(v) = self.preferred_term.value {
            candidate.preferred_term = v;
        }
        if let Some(v) = self.alternative_terms.value {
            candidate.alternative_terms = v;
        }
        if let Some(v) = self.hidden_terms.value {
            candidate.hidden_terms = v;
        }
        if let Some(v) = self.definition.value {
            candidate.definition = Some(v);
        }
        if let Some(v) = self.definition_for_public.value {
            candidate.definition_for_public = Some(v);
        }
        if let Some(v) = self.definition_for_specialists.value {
            candidate.definition_for_specialists = Some(v);
        }
        if let Some(v) = self.notes.value {
            candidate.notes = v;
        }
        if let Some(v) = self.examples.value {
            candidate.examples = v;
        }
        if let Some(v) = self.subject.value {
            candidate.subject = v;
        }
        if let Some(v) = self.subject_codes.value {
            candidate.subject_codes = v;
        }
        if let Some(v) = self.value_range.value {
            candidate.value_range = Some(v);
        }
        if let Some(v) = self.contact_point.value {
            candidate.contact_point = Some(v);
        }
        if let Some(v) = self.valid_from.value {
            candidate.valid_from = Some(v);
        }
        if let Some(v) = self.valid_to.value {
            candidate.valid_to = Some(v);
        }
        if let Some(v) = self.see_also.value {
            candidate.see_also = v;
        }
        if let Some(v) = self.replaced_by.value {
            candidate.replaced_by = v;
        }
        if let Some(v) = self.abbreviated_label.value {
            candidate.abbreviated_label = Some(v);
        }
        if let Some(v) = self.relations.value {
            candidate.relations = v;
        }
        if let Some(v) = self.sem_ver.value {
            candidate.sem_ver = Some(v);
        }
        if let Some(v) = self.status.value {
            candidate.status = v;
        }
        candidate
    }
}
