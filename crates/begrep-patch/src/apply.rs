//! Atomic application of operation lists

use crate::{JsonPointer, PatchError, PathPolicy};
use begrep_domain::{Concept, JsonPatchOperation, OpKind};
use serde_json::Value;
use tracing::debug;

/// Apply `operations` to a copy of `concept`
///
/// The whole list is checked against `policy` first. Operations then run in
/// order on a copy of the serialized document; the first failure discards
/// the copy, so the caller's concept is never partially modified.
///
/// # Examples
///
/// ```
/// use begrep_domain::{Concept, JsonPatchOperation};
/// use begrep_patch::{apply, PathPolicy};
/// use serde_json::json;
///
/// let concept = Concept::new_lineage("910244132");
/// let ops = vec![JsonPatchOperation::add("/preferredTerm", json!({"nb": "bil"}))];
/// let patched = apply(&concept, &ops, &PathPolicy::concept_patch()).unwrap();
/// assert_eq!(patched.preferred_term["nb"], "bil");
///
/// let forbidden = vec![JsonPatchOperation::replace("/published", json!(true))];
/// assert!(apply(&concept, &forbidden, &PathPolicy::concept_patch()).is_err());
/// ```
pub fn apply(
    concept: &Concept,
    operations: &[JsonPatchOperation],
    policy: &PathPolicy,
) -> Result<Concept, PatchError> {
    if let Err(e) = policy.check(operations) {
        debug!("Rejected patch for concept {}: {}", concept.id, e);
        return Err(e);
    }

    let document =
        serde_json::to_value(concept).map_err(|e| PatchError::Serialization(e.to_string()))?;
    let patched = apply_to_value(&document, operations)?;

    serde_json::from_value(patched).map_err(|e| PatchError::Schema(e.to_string()))
}

/// Apply operations to a raw JSON document without any path policy
pub fn apply_to_value(document: &Value, operations: &[JsonPatchOperation]) -> Result<Value, PatchError> {
    let mut working = document.clone();
    for operation in operations {
        apply_operation(&mut working, operation)?;
    }
    Ok(working)
}

fn apply_operation(doc: &mut Value, operation: &JsonPatchOperation) -> Result<(), PatchError> {
    let path = JsonPointer::parse(&operation.path)?;
    let value = || operation.value.clone().unwrap_or(Value::Null);

    match operation.op {
        OpKind::Add => add(doc, &path, value()),
        OpKind::Remove => remove(doc, &path).map(|_| ()),
        OpKind::Replace => {
            let target = resolve_mut(doc, &path)
                .ok_or_else(|| PatchError::PathNotFound(operation.path.clone()))?;
            *target = value();
            Ok(())
        }
        OpKind::Move => {
            let from = from_pointer(operation)?;
            if from == path {
                return resolve(doc, &from)
                    .map(|_| ())
                    .ok_or_else(|| PatchError::FromNotFound(from.to_string()));
            }
            if path.starts_with(&from) {
                return Err(PatchError::MoveIntoChild {
                    from: from.to_string(),
                    path: path.to_string(),
                });
            }
            let moved = remove(doc, &from).map_err(|e| match e {
                PatchError::PathNotFound(p) => PatchError::FromNotFound(p),
                other => other,
            })?;
            add(doc, &path, moved)
        }
        OpKind::Copy => {
            let from = from_pointer(operation)?;
            let copied = resolve(doc, &from)
                .cloned()
                .ok_or_else(|| PatchError::FromNotFound(from.to_string()))?;
            add(doc, &path, copied)
        }
        OpKind::Test => {
            let actual = resolve(doc, &path)
                .ok_or_else(|| PatchError::PathNotFound(operation.path.clone()))?;
            if *actual == value() {
                Ok(())
            } else {
                Err(PatchError::TestFailed(operation.path.clone()))
            }
        }
    }
}

fn from_pointer(operation: &JsonPatchOperation) -> Result<JsonPointer, PatchError> {
    let from = operation
        .from
        .as_deref()
        .ok_or_else(|| PatchError::MissingFrom(operation.path.clone()))?;
    JsonPointer::parse(from)
}

fn resolve<'a>(doc: &'a Value, pointer: &JsonPointer) -> Option<&'a Value> {
    pointer
        .tokens()
        .iter()
        .try_fold(doc, |current, token| match current {
            Value::Object(map) => map.get(token),
            Value::Array(items) => array_index(token, items.len()).and_then(|i| items.get(i)),
            _ => None,
        })
}

fn resolve_mut<'a>(doc: &'a mut Value, pointer: &JsonPointer) -> Option<&'a mut Value> {
    pointer
        .tokens()
        .iter()
        .try_fold(doc, |current, token| match current {
            Value::Object(map) => map.get_mut(token),
            Value::Array(items) => {
                let len = items.len();
                array_index(token, len).and_then(move |i| items.get_mut(i))
            }
            _ => None,
        })
}

/// Parse an array index token: decimal digits without leading zeros
fn array_index(token: &str, len: usize) -> Option<usize> {
    if token.is_empty()
        || !token.chars().all(|c| c.is_ascii_digit())
        || (token.len() > 1 && token.starts_with('0'))
    {
        return None;
    }
    token.parse::<usize>().ok().filter(|i| *i < len)
}

fn add(doc: &mut Value, pointer: &JsonPointer, value: Value) -> Result<(), PatchError> {
    let Some((parent, last)) = pointer.split_last() else {
        *doc = value;
        return Ok(());
    };

    let target = resolve_mut(doc, &parent)
        .ok_or_else(|| PatchError::PathNotFound(pointer.to_string()))?;

    match target {
        Value::Object(map) => {
            map.insert(last.to_string(), value);
            Ok(())
        }
        Value::Array(items) => {
            if last == "-" {
                items.push(value);
                return Ok(());
            }
            // Inserting at `len` appends.
            let index = array_index(last, items.len() + 1)
                .ok_or_else(|| PatchError::PathNotFound(pointer.to_string()))?;
            items.insert(index, value);
            Ok(())
        }
        _ => Err(PatchError::PathNotFound(pointer.to_string())),
    }
}

fn remove(doc: &mut Value, pointer: &JsonPointer) -> Result<Value, PatchError> {
    let (parent, last) = pointer
        .split_last()
        .ok_or_else(|| PatchError::InvalidPointer("cannot remove the whole document".into()))?;

    let not_found = || PatchError::PathNotFound(pointer.to_string());
    match resolve_mut(doc, &parent).ok_or_else(not_found)? {
        Value::Object(map) => map.remove(last).ok_or_else(not_found),
        Value::Array(items) => {
            let index = array_index(last, items.len()).ok_or_else(not_found)?;
            Ok(items.remove(index))
        }
        _ => Err(not_found()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use begrep_domain::ConceptStatus;
    use serde_json::json;

    fn concept() -> Concept {
        let mut concept = Concept::new_lineage("910244132");
        concept.preferred_term.insert("nb".into(), "bil".into());
        concept.see_also = vec!["https://a".into()];
        concept
    }

    #[test]
    fn test_add_replace_remove() {
        let original = concept();
        let ops = vec![
            JsonPatchOperation::add("/preferredTerm/en", json!("car")),
            JsonPatchOperation::replace("/preferredTerm/nb", json!("personbil")),
            JsonPatchOperation::remove("/seeAlso"),
            JsonPatchOperation::replace("/status", json!("approved")),
        ];
        let patched = apply(&original, &ops, &PathPolicy::concept_patch()).unwrap();

        assert_eq!(patched.preferred_term["en"], "car");
        assert_eq!(patched.preferred_term["nb"], "personbil");
        assert!(patched.see_also.is_empty());
        assert_eq!(patched.status, ConceptStatus::Approved);
        assert_eq!(original.preferred_term["nb"], "bil");
    }

    #[test]
    fn test_array_operations() {
        let original = concept();
        let ops = vec![
            JsonPatchOperation::add("/seeAlso/-", json!("https://c")),
            JsonPatchOperation::add("/seeAlso/0", json!("https://b")),
        ];
        let patched = apply(&original, &ops, &PathPolicy::concept_patch()).unwrap();
        assert_eq!(patched.see_also, vec!["https://b", "https://a", "https://c"]);

        let bad = vec![JsonPatchOperation::add("/seeAlso/01", json!("x"))];
        assert!(apply(&original, &bad, &PathPolicy::concept_patch()).is_err());
    }

    #[test]
    fn test_move_and_copy() {
        let original = concept();
        let ops = vec![
            JsonPatchOperation::copy_value("/preferredTerm/nb", "/preferredTerm/nn"),
            JsonPatchOperation::add("/notes", json!({})),
            JsonPatchOperation::move_value("/preferredTerm/nb", "/notes/nb"),
        ];
        let patched = apply(&original, &ops, &PathPolicy::concept_patch()).unwrap();
        assert_eq!(patched.preferred_term.get("nb"), None);
        assert_eq!(patched.preferred_term["nn"], "bil");
        assert_eq!(patched.notes["nb"], "bil");
    }

    #[test]
    fn test_move_from_missing_path() {
        let ops = vec![JsonPatchOperation::move_value("/notes/nb", "/examples/nb")];
        assert!(matches!(
            apply(&concept(), &ops, &PathPolicy::concept_patch()),
            Err(PatchError::FromNotFound(_))
        ));
    }

    #[test]
    fn test_replace_missing_path() {
        let ops = vec![JsonPatchOperation::replace("/notes/nb", json!("x"))];
        assert!(matches!(
            apply(&concept(), &ops, &PathPolicy::concept_patch()),
            Err(PatchError::PathNotFound(_))
        ));
    }

    #[test]
    fn test_failed_test_aborts_whole_patch() {
        let original = concept();
        let ops = vec![
            JsonPatchOperation::replace("/preferredTerm/nb", json!("personbil")),
            JsonPatchOperation::test("/preferredTerm/nb", json!("bil")),
        ];
        let result = apply(&original, &ops, &PathPolicy::concept_patch());
        assert_eq!(result, Err(PatchError::TestFailed("/preferredTerm/nb".into())));
        assert_eq!(original.preferred_term["nb"], "bil");
    }

    #[test]
    fn test_passing_test() {
        let ops = vec![JsonPatchOperation::test("/preferredTerm/nb", json!("bil"))];
        assert!(apply(&concept(), &ops, &PathPolicy::concept_patch()).is_ok());
    }

    #[test]
    fn test_protected_path_rejects_entire_list() {
        let ops = vec![
            JsonPatchOperation::replace("/preferredTerm/nb", json!("personbil")),
            JsonPatchOperation::replace("/publishedAt", json!("2024-01-01T00:00:00Z")),
        ];
        assert!(matches!(
            apply(&concept(), &ops, &PathPolicy::concept_patch()),
            Err(PatchError::ProtectedPath(_))
        ));
    }

    #[test]
    fn test_schema_violation() {
        let ops = vec![JsonPatchOperation::replace("/status", json!("retired"))];
        assert!(matches!(
            apply(&concept(), &ops, &PathPolicy::concept_patch()),
            Err(PatchError::Schema(_))
        ));
    }

    #[test]
    fn test_move_into_child() {
        let doc = json!({"a": {"b": 1}});
        let ops = vec![JsonPatchOperation::move_value("/a", "/a/c")];
        assert!(matches!(
            apply_to_value(&doc, &ops),
            Err(PatchError::MoveIntoChild { .. })
        ));
    }

    #[test]
    fn test_root_replace_on_raw_document() {
        let doc = json!({"a": 1});
        let ops = vec![JsonPatchOperation::replace("", json!({"b": 2}))];
        assert_eq!(apply_to_value(&doc, &ops).unwrap(), json!({"b": 2}));
    }
}
