//! Identifiers for concepts, import jobs and change requests

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(u128);

        impl $name {
            /// Generate a new UUIDv7-based identifier
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7().as_u128())
            }

            /// Create an identifier from a raw u128 value
            pub fn from_value(value: u128) -> Self {
                Self(value)
            }

            /// Parse an identifier from its UUID string form
            pub fn from_string(s: &str) -> Result<Self, String> {
                uuid::Uuid::parse_str(s)
                    .map(|u| Self(u.as_u128()))
                    .map_err(|e| format!("Invalid {} '{}': {}", stringify!($name), s, e))
            }

            /// Get the raw u128 value
            pub fn value(&self) -> u128 {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", uuid::Uuid::from_u128(self.0))
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_string(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::from_string(&s)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.to_string()
            }
        }
    };
}

define_id!(
    /// Identifier of one concept version (`id`) or of a whole lineage (`originalId`)
    ///
    /// UUIDv7 keeps ids chronologically sortable, so freshly allocated
    /// versions never collide with older ones.
    ConceptId
);

define_id!(
    /// Identifier of one import attempt
    ImportId
);

define_id!(
    /// Identifier of a change request
    ChangeRequestId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concept_id_ordering() {
        let id1 = ConceptId::from_value(1000);
        let id2 = ConceptId::from_value(2000);
        assert!(id1 < id2);
    }

    #[test]
    fn test_concept_id_display_and_parse() {
        let id = ConceptId::new();
        let id_str = id.to_string();
        assert_eq!(id_str.len(), 36);
        assert_eq!(ConceptId::from_string(&id_str).unwrap(), id);
    }

    #[test]
    fn test_invalid_id_string() {
        assert!(ImportId::from_string("not-a-valid-uuid").is_err());
        assert!(ChangeRequestId::from_string("").is_err());
    }

    #[test]
    fn test_id_serializes_as_string() {
        let id = ConceptId::from_value(42);
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, serde_json::Value::String(id.to_string()));
        let back: ConceptId = serde_json::from_value(json).unwrap();
        assert_eq!(back, id);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Round-trip through string representation preserves the id
        #[test]
        fn test_id_string_roundtrip(value: u128) {
            let id = ConceptId::from_value(value);
            prop_assert_eq!(ConceptId::from_string(&id.to_string()).unwrap(), id);
        }
    }
}
