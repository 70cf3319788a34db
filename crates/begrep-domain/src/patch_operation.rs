//! RFC 6902 patch operations as exchanged with clients

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of a patch operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    /// Insert or overwrite a value
    Add,
    /// Delete a value
    Remove,
    /// Overwrite an existing value
    Replace,
    /// Move a value from `from` to `path`
    Move,
    /// Copy a value from `from` to `path`
    Copy,
    /// Assert that a value equals the given one
    Test,
}

/// One JSON patch operation
///
/// `path` and `from` are JSON pointers into a serialized concept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonPatchOperation {
    /// Operation kind
    pub op: OpKind,
    /// Target pointer
    pub path: String,
    /// Value for add, replace and test
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Source pointer for move and copy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

impl JsonPatchOperation {
    fn new(op: OpKind, path: impl Into<String>, value: Option<Value>, from: Option<String>) -> Self {
        Self {
            op,
            path: path.into(),
            value,
            from,
        }
    }

    /// `add` operation
    pub fn add(path: impl Into<String>, value: Value) -> Self {
        Self::new(OpKind::Add, path, Some(value), None)
    }

    /// `remove` operation
    pub fn remove(path: impl Into<String>) -> Self {
        Self::new(OpKind::Remove, path, None, None)
    }

    /// `replace` operation
    pub fn replace(path: impl Into<String>, value: Value) -> Self {
        Self::new(OpKind::Replace, path, Some(value), None)
    }

    /// `move` operation
    pub fn move_value(from: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(OpKind::Move, path, None, Some(from.into()))
    }

    /// `copy` operation
    pub fn copy_value(from: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(OpKind::Copy, path, None, Some(from.into()))
    }

    /// `test` operation
    pub fn test(path: impl Into<String>, value: Value) -> Self {
        Self::new(OpKind::Test, path, Some(value), None)
    }
}
