//! Opaque entity identifiers.
//!
//! Identifiers are UUID strings: opaque to callers, validated at every
//! boundary where raw text enters the domain.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors for entity identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IdValidationError {
    /// The identifier was empty.
    #[error("identifier must not be empty")]
    Empty,
    /// The identifier was not a valid UUID.
    #[error("identifier must be a valid UUID")]
    Invalid,
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and construct an identifier from borrowed input.
            pub fn new(id: impl AsRef<str>) -> Result<Self, IdValidationError> {
                Self::from_owned(id.as_ref().to_owned())
            }

            /// Generate a new random identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            fn from_owned(id: String) -> Result<Self, IdValidationError> {
                if id.is_empty() {
                    return Err(IdValidationError::Empty);
                }
                if Uuid::parse_str(&id).is_err() {
                    return Err(IdValidationError::Invalid);
                }
                Ok(Self(id))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_ref())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::from_owned(value)
            }
        }
    };
}

entity_id! {
    /// Stable user identifier stored as a UUID string.
    UserId
}

entity_id! {
    /// Stable region identifier stored as a UUID string.
    RegionId
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::empty("", IdValidationError::Empty)]
    #[case::garbage("not-a-uuid", IdValidationError::Invalid)]
    #[case::padded(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", IdValidationError::Invalid)]
    fn rejects_malformed_identifiers(#[case] raw: &str, #[case] expected: IdValidationError) {
        assert_eq!(UserId::new(raw), Err(expected));
        assert_eq!(RegionId::new(raw), Err(expected));
    }

    #[test]
    fn random_identifiers_are_valid_and_distinct() {
        let first = UserId::random();
        let second = UserId::random();
        assert_ne!(first, second);
        assert!(UserId::new(first.as_ref()).is_ok());
    }

    #[test]
    fn serde_round_trips_as_plain_string() {
        let id = RegionId::random();
        let encoded = serde_json::to_string(&id).expect("encode");
        let decoded: RegionId = serde_json::from_str(&encoded).expect("decode");
        assert_eq!(id, decoded);
    }
}
