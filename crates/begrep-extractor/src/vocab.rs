//! Vocabulary terms and the lookup tables built from them
//!
//! IRIs are plain constants. Tables mapping controlled vocabulary terms to
//! domain enums are built once on first use and never mutated.

use begrep_domain::{ConceptStatus, RelationshipWithSource};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// `rdf:`
pub mod rdf {
    /// `rdf:type`
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    /// `rdf:value`
    pub const VALUE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#value";
}

/// `rdfs:`
pub mod rdfs {
    /// `rdfs:label`
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
    /// `rdfs:seeAlso`
    pub const SEE_ALSO: &str = "http://www.w3.org/2000/01/rdf-schema#seeAlso";
}

/// `skos:`
pub mod skos {
    /// `skos:Concept`
    pub const CONCEPT: &str = "http://www.w3.org/2004/02/skos/core#Concept";
    /// `skos:prefLabel`
    pub const PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
    /// `skos:altLabel`
    pub const ALT_LABEL: &str = "http://www.w3.org/2004/02/skos/core#altLabel";
    /// `skos:hiddenLabel`
    pub const HIDDEN_LABEL: &str = "http://www.w3.org/2004/02/skos/core#hiddenLabel";
    /// `skos:scopeNote`
    pub const SCOPE_NOTE: &str = "http://www.w3.org/2004/02/skos/core#scopeNote";
    /// `skos:example`
    pub const EXAMPLE: &str = "http://www.w3.org/2004/02/skos/core#example";
}

/// `skosno:` (SKOS-AP-NO)
pub mod skosno {
    /// `skosno:valueRange`
    pub const VALUE_RANGE: &str = "https://data.norge.no/vocabulary/skosno#valueRange";
    /// `skosno:abbreviatedLabel`
    pub const ABBREVIATED_LABEL: &str = "https://data.norge.no/vocabulary/skosno#abbreviatedLabel";
    /// `skosno:relationshipWithSource`
    pub const RELATIONSHIP_WITH_SOURCE: &str =
        "https://data.norge.no/vocabulary/skosno#relationshipWithSource";
    /// `skosno:isFromConceptIn`
    pub const IS_FROM_CONCEPT_IN: &str = "https://data.norge.no/vocabulary/skosno#isFromConceptIn";
    /// `skosno:AssociativeConceptRelation`
    pub const ASSOCIATIVE_RELATION: &str =
        "https://data.norge.no/vocabulary/skosno#AssociativeConceptRelation";
    /// `skosno:relationRole`
    pub const RELATION_ROLE: &str = "https://data.norge.no/vocabulary/skosno#relationRole";
    /// `skosno:hasToConcept`
    pub const HAS_TO_CONCEPT: &str = "https://data.norge.no/vocabulary/skosno#hasToConcept";
    /// `skosno:hasPartitiveConceptRelation`
    pub const HAS_PARTITIVE_RELATION: &str =
        "https://data.norge.no/vocabulary/skosno#hasPartitiveConceptRelation";
    /// `skosno:PartitiveConceptRelation`
    pub const PARTITIVE_RELATION: &str =
        "https://data.norge.no/vocabulary/skosno#PartitiveConceptRelation";
    /// `skosno:hasPartitiveConcept`
    pub const HAS_PARTITIVE_CONCEPT: &str =
        "https://data.norge.no/vocabulary/skosno#hasPartitiveConcept";
    /// `skosno:hasComprehensiveConcept`
    pub const HAS_COMPREHENSIVE_CONCEPT: &str =
        "https://data.norge.no/vocabulary/skosno#hasComprehensiveConcept";
    /// `skosno:hasGenericConceptRelation`
    pub const HAS_GENERIC_RELATION: &str =
        "https://data.norge.no/vocabulary/skosno#hasGenericConceptRelation";
    /// `skosno:GenericConceptRelation`
    pub const GENERIC_RELATION: &str =
        "https://data.norge.no/vocabulary/skosno#GenericConceptRelation";
    /// `skosno:hasGenericConcept`
    pub const HAS_GENERIC_CONCEPT: &str =
        "https://data.norge.no/vocabulary/skosno#hasGenericConcept";
    /// `skosno:hasSpecificConcept`
    pub const HAS_SPECIFIC_CONCEPT: &str =
        "https://data.norge.no/vocabulary/skosno#hasSpecificConcept";
    /// `skosno:characteristicOfDivision`
    pub const CHARACTERISTIC_OF_DIVISION: &str =
        "https://data.norge.no/vocabulary/skosno#characteristicOfDivision";
}

/// `euvoc:`
pub mod euvoc {
    /// `euvoc:xlDefinition`
    pub const XL_DEFINITION: &str = "http://publications.europa.eu/ontology/euvoc#xlDefinition";
    /// `euvoc:startDate`
    pub const START_DATE: &str = "http://publications.europa.eu/ontology/euvoc#startDate";
    /// `euvoc:endDate`
    pub const END_DATE: &str = "http://publications.europa.eu/ontology/euvoc#endDate";
    /// `euvoc:status`
    pub const STATUS: &str = "http://publications.europa.eu/ontology/euvoc#status";
}

/// `dct:`
pub mod dct {
    /// `dct:audience`
    pub const AUDIENCE: &str = "http://purl.org/dc/terms/audience";
    /// `dct:source`
    pub const SOURCE: &str = "http://purl.org/dc/terms/source";
    /// `dct:subject`
    pub const SUBJECT: &str = "http://purl.org/dc/terms/subject";
    /// `dct:isReplacedBy`
    pub const IS_REPLACED_BY: &str = "http://purl.org/dc/terms/isReplacedBy";
    /// `dct:description`
    pub const DESCRIPTION: &str = "http://purl.org/dc/terms/description";
}

/// `dcat:`
pub mod dcat {
    /// `dcat:contactPoint`
    pub const CONTACT_POINT: &str = "http://www.w3.org/ns/dcat#contactPoint";
}

/// `vcard:`
pub mod vcard {
    /// `vcard:hasEmail`
    pub const HAS_EMAIL: &str = "http://www.w3.org/2006/vcard/ns#hasEmail";
    /// `vcard:hasTelephone`
    pub const HAS_TELEPHONE: &str = "http://www.w3.org/2006/vcard/ns#hasTelephone";
}

/// `owl:`
pub mod owl {
    /// `owl:versionInfo`
    pub const VERSION_INFO: &str = "http://www.w3.org/2002/07/owl#versionInfo";
}

/// Audience of an extended definition
pub mod audience {
    /// General public
    pub const PUBLIC: &str = "https://data.norge.no/vocabulary/audience-type#public";
    /// Domain specialists
    pub const SPECIALIST: &str = "https://data.norge.no/vocabulary/audience-type#specialist";
}

/// Relationship-with-source vocabulary
pub mod relationship {
    /// Written by the organization
    pub const SELF_COMPOSED: &str =
        "https://data.norge.no/vocabulary/relationship-with-source-type#self-composed";
    /// Quoted from the source
    pub const DIRECT_FROM_SOURCE: &str =
        "https://data.norge.no/vocabulary/relationship-with-source-type#direct-from-source";
    /// Derived from the source
    pub const DERIVED_FROM_SOURCE: &str =
        "https://data.norge.no/vocabulary/relationship-with-source-type#derived-from-source";
}

/// EU concept-status authority table
pub mod concept_status {
    /// Draft
    pub const DRAFT: &str = "http://publications.europa.eu/resource/authority/concept-status/DRAFT";
    /// Candidate (in hearing)
    pub const CANDIDATE: &str =
        "http://publications.europa.eu/resource/authority/concept-status/CANDIDATE";
    /// Accepted
    pub const ACCEPTED: &str =
        "http://publications.europa.eu/resource/authority/concept-status/ACCEPTED";
    /// Current (published)
    pub const CURRENT: &str =
        "http://publications.europa.eu/resource/authority/concept-status/CURRENT";
}

/// Relationship-with-source term → enum
pub static RELATIONSHIPS_WITH_SOURCE: Lazy<HashMap<&'static str, RelationshipWithSource>> =
    Lazy::new(|| {
        [
            (relationship::SELF_COMPOSED, RelationshipWithSource::SelfComposed),
            (relationship::DIRECT_FROM_SOURCE, RelationshipWithSource::DirectFromSource),
            (relationship::DERIVED_FROM_SOURCE, RelationshipWithSource::DerivedFromSource),
        ]
        .into_iter()
        .collect()
    });

/// Concept-status term → enum
pub static CONCEPT_STATUSES: Lazy<HashMap<&'static str, ConceptStatus>> = Lazy::new(|| {
    [
        (concept_status::DRAFT, ConceptStatus::Draft),
        (concept_status::CANDIDATE, ConceptStatus::Hearing),
        (concept_status::ACCEPTED, ConceptStatus::Approved),
        (concept_status::CURRENT, ConceptStatus::Published),
    ]
    .into_iter()
    .collect()
});

/// Last segment of an IRI, after `#` or the final `/`
///
/// ```
/// use begrep_extractor::vocab::{local_name, owl};
///
/// assert_eq!(local_name(owl::VERSION_INFO), "versionInfo");
/// assert_eq!(local_name("http://purl.org/dc/terms/subject"), "subject");
/// ```
pub fn local_name(iri: &str) -> &str {
    iri.rsplit(['#', '/']).next().unwrap_or(iri)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables() {
        assert_eq!(
            RELATIONSHIPS_WITH_SOURCE.get(relationship::DERIVED_FROM_SOURCE),
            Some(&RelationshipWithSource::DerivedFromSource)
        );
        assert_eq!(
            CONCEPT_STATUSES.get(concept_status::CANDIDATE),
            Some(&ConceptStatus::Hearing)
        );
        assert_eq!(CONCEPT_STATUSES.len(), 4);
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(skos::PREF_LABEL), "prefLabel");
        assert_eq!(local_name(vcard::HAS_TELEPHONE), "hasTelephone");
        assert_eq!(local_name("plain"), "plain");
    }
}
