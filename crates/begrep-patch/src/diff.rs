//! Structural diff of two concept versions

use crate::fields::{ConceptField, FieldKind};
use crate::{JsonPointer, PatchError};
use begrep_domain::{Concept, JsonPatchOperation};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Operations turning `original` into `updated`
///
/// Keyed fields (language maps, nested objects) are compared key by key and
/// yield `add`/`remove`/`replace` at `/field/key`. Lists are compared
/// positionally but always replaced as a whole, never patched per index.
///
/// # Examples
///
/// ```
/// use begrep_domain::Concept;
/// use begrep_patch::diff;
///
/// let original = Concept::new_lineage("910244132");
/// let mut updated = original.clone();
/// updated.preferred_term.insert("nb".into(), "bil".into());
///
/// let ops = diff(&original, &updated).unwrap();
/// assert_eq!(ops.len(), 1);
/// assert_eq!(ops[0].path, "/preferredTerm");
/// assert!(diff(&original, &original).unwrap().is_empty());
/// ```
pub fn diff(original: &Concept, updated: &Concept) -> Result<Vec<JsonPatchOperation>, PatchError> {
    let a = serde_json::to_value(original).map_err(|e| PatchError::Serialization(e.to_string()))?;
    let b = serde_json::to_value(updated).map_err(|e| PatchError::Serialization(e.to_string()))?;
    Ok(diff_documents(&a, &b))
}

/// Diff two serialized concept documents
pub fn diff_documents(original: &Value, updated: &Value) -> Vec<JsonPatchOperation> {
    let mut ops = Vec::new();
    match (original.as_object(), updated.as_object()) {
        (Some(a), Some(b)) => {
            for key in union_keys(a, b) {
                let kind = ConceptField::from_key(key)
                    .map(|field| field.kind())
                    .unwrap_or(FieldKind::Scalar);
                let pointer = JsonPointer::from_tokens([key.as_str()]);
                diff_member(&pointer, a.get(key), b.get(key), kind, &mut ops);
            }
        }
        _ if original != updated => {
            ops.push(JsonPatchOperation::replace("", updated.clone()));
        }
        _ => {}
    }
    ops
}

fn diff_member(
    pointer: &JsonPointer,
    a: Option<&Value>,
    b: Option<&Value>,
    kind: FieldKind,
    ops: &mut Vec<JsonPatchOperation>,
) {
    match (a, b) {
        (None, None) => {}
        (None, Some(value)) => ops.push(JsonPatchOperation::add(pointer.to_string(), value.clone())),
        (Some(_), None) => ops.push(JsonPatchOperation::remove(pointer.to_string())),
        (Some(x), Some(y)) if x == y => {}
        (Some(Value::Object(x)), Some(Value::Object(y))) if kind == FieldKind::Keyed => {
            diff_keyed(pointer, x, y, ops);
        }
        (Some(_), Some(value)) => {
            ops.push(JsonPatchOperation::replace(pointer.to_string(), value.clone()))
        }
    }
}

fn diff_keyed(
    pointer: &JsonPointer,
    a: &Map<String, Value>,
    b: &Map<String, Value>,
    ops: &mut Vec<JsonPatchOperation>,
) {
    for key in union_keys(a, b) {
        diff_member(
            &pointer.child(key.as_str()),
            a.get(key),
            b.get(key),
            FieldKind::Keyed,
            ops,
        );
    }
}

fn union_keys<'a>(a: &'a Map<String, Value>, b: &'a Map<String, Value>) -> BTreeSet<&'a String> {
    a.keys().chain(b.keys()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use begrep_domain::{ConceptStatus, Definition, OpKind};
    use serde_json::json;

    fn base() -> Concept {
        let mut concept = Concept::new_lineage("910244132");
        concept.preferred_term.insert("nb".into(), "bil".into());
        concept.preferred_term.insert("en".into(), "car".into());
        concept
    }

    #[test]
    fn test_identical_documents_yield_no_operations() {
        let concept = base();
        assert!(diff(&concept, &concept.clone()).unwrap().is_empty());
    }

    #[test]
    fn test_language_keys_are_diffed_individually() {
        let original = base();
        let mut updated = original.clone();
        updated.preferred_term.remove("en");
        updated.preferred_term.insert("nb".into(), "personbil".into());
        updated.preferred_term.insert("nn".into(), "bil".into());

        let ops = diff(&original, &updated).unwrap();
        assert_eq!(
            ops,
            vec![
                JsonPatchOperation::remove("/preferredTerm/en"),
                JsonPatchOperation::replace("/preferredTerm/nb", json!("personbil")),
                JsonPatchOperation::add("/preferredTerm/nn", json!("bil")),
            ]
        );
    }

    #[test]
    fn test_lists_are_replaced_whole() {
        let mut original = base();
        original.see_also = vec!["https://a".into(), "https://b".into()];
        let mut updated = original.clone();
        updated.see_also = vec!["https://b".into(), "https://a".into()];

        let ops = diff(&original, &updated).unwrap();
        assert_eq!(
            ops,
            vec![JsonPatchOperation::replace("/seeAlso", json!(["https://b", "https://a"]))]
        );
    }

    #[test]
    fn test_lists_inside_language_maps_are_replaced_whole() {
        let mut original = base();
        original
            .alternative_terms
            .insert("nb".into(), vec!["doning".into()]);
        let mut updated = original.clone();
        updated
            .alternative_terms
            .get_mut("nb")
            .unwrap()
            .push("kjerre".into());

        let ops = diff(&original, &updated).unwrap();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].op, OpKind::Replace);
        assert_eq!(ops[0].path, "/alternativeTerms/nb");
    }

    #[test]
    fn test_nested_objects_recurse() {
        let mut original = base();
        original.definition = Some(Definition {
            text: [("nb".to_string(), "kjøretøy".to_string())].into(),
            source_description: None,
        });
        let mut updated = original.clone();
        if let Some(def) = updated.definition.as_mut() {
            def.text.insert("en".into(), "vehicle".into());
        }

        let ops = diff(&original, &updated).unwrap();
        assert_eq!(
            ops,
            vec![JsonPatchOperation::add("/definition/text/en", json!("vehicle"))]
        );
    }

    #[test]
    fn test_scalar_fields_replace_and_optional_fields_add_remove() {
        let original = base();
        let mut updated = original.clone();
        updated.status = ConceptStatus::Hearing;
        updated.abbreviated_label = Some("b.".into());

        let ops = diff(&original, &updated).unwrap();
        assert!(ops.contains(&JsonPatchOperation::replace("/status", json!("hearing"))));
        assert!(ops.contains(&JsonPatchOperation::add("/abbreviatedLabel", json!("b."))));

        let back = diff(&updated, &original).unwrap();
        assert!(back.contains(&JsonPatchOperation::remove("/abbreviatedLabel")));
    }

    #[test]
    fn test_keys_needing_escape() {
        let mut original = base();
        original.internal_fields.insert("a/b".into(), "1".into());
        let mut updated = original.clone();
        updated.internal_fields.insert("a/b".into(), "2".into());

        let ops = diff(&original, &updated).unwrap();
        assert_eq!(ops[0].path, "/internalFields/a~1b");
    }
}
