//! Turtle front-end
//!
//! Parses Turtle into the [`Graph`] model. Everything downstream works on the
//! parsed graph only.

use crate::error::ExtractorError;
use crate::graph::{Graph, Literal, Term};
use oxttl::{TurtleParseError, TurtleParser};
use std::io::Read;
use tracing::debug;

const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// Parse a Turtle document
///
/// Relative IRIs are resolved against `base_iri` when given.
///
/// # Examples
///
/// ```
/// use begrep_extractor::turtle::parse_turtle;
///
/// let ttl = r#"
///     @prefix skos: <http://www.w3.org/2004/02/skos/core#> .
///     <https://example.org/c/1> a skos:Concept ; skos:prefLabel "bil"@nb .
/// "#;
/// let graph = parse_turtle(ttl.as_bytes(), None).unwrap();
/// assert_eq!(graph.len(), 2);
/// ```
pub fn parse_turtle(input: impl Read, base_iri: Option<&str>) -> Result<Graph, ExtractorError> {
    let mut parser = TurtleParser::new();
    if let Some(base) = base_iri {
        parser = parser
            .with_base_iri(base)
            .map_err(|e| ExtractorError::BaseIri(e.to_string()))?;
    }

    let mut graph = Graph::new();
    for triple in parser.for_reader(input) {
        let triple = triple.map_err(|e| match e {
            TurtleParseError::Syntax(e) => ExtractorError::Syntax(e.to_string()),
            TurtleParseError::Io(e) => ExtractorError::Io(e),
        })?;

        let Some(subject) = convert_subject(triple.subject) else {
            continue;
        };
        let Some(object) = convert_term(triple.object) else {
            continue;
        };
        graph.insert(subject, triple.predicate.into_string(), object);
    }

    debug!("Parsed Turtle document into {} triples", graph.len());
    Ok(graph)
}

/// Parse a Turtle document held in memory
pub fn parse_turtle_str(input: &str) -> Result<Graph, ExtractorError> {
    parse_turtle(input.as_bytes(), None)
}

#[allow(unreachable_patterns)]
fn convert_subject(subject: oxrdf::Subject) -> Option<Term> {
    match subject {
        oxrdf::Subject::NamedNode(node) => Some(Term::Iri(node.into_string())),
        oxrdf::Subject::BlankNode(node) => Some(Term::Blank(node.as_str().to_string())),
        // Quoted triples carry no concept data.
        _ => None,
    }
}

#[allow(unreachable_patterns)]
fn convert_term(term: oxrdf::Term) -> Option<Term> {
    match term {
        oxrdf::Term::NamedNode(node) => Some(Term::Iri(node.into_string())),
        oxrdf::Term::BlankNode(node) => Some(Term::Blank(node.as_str().to_string())),
        oxrdf::Term::Literal(literal) => {
            let converted = match (literal.language(), literal.datatype().as_str()) {
                (Some(lang), _) => Literal::tagged(literal.value(), lang),
                (None, XSD_STRING) => Literal::plain(literal.value()),
                (None, datatype) => Literal::typed(literal.value(), datatype),
            };
            Some(Term::Literal(converted))
        }
        _ => None,
    }
}
