//! Strongly-typed identifier value objects.
//!
//! Ledger identities (document, unit and action hashes) are opaque strings
//! handed out by the persistence collaborator. The engine never inspects
//! their structure; it only compares and forwards them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Declares a non-empty, opaque string identifier.
macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates the identifier, returning error if empty.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(ValidationError::empty_field($field));
                }
                Ok(Self(id))
            }

            /// Returns the inner string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

opaque_id!(
    /// Ledger hash of a persisted document entry.
    DocumentHash,
    "document_hash"
);

opaque_id!(
    /// Ledger hash of a persisted unit entry.
    UnitHash,
    "unit_hash"
);

opaque_id!(
    /// Ledger hash of a recorded action (delete, mark submission).
    ActionHash,
    "action_hash"
);

opaque_id!(
    /// Identity of an agent (author, editor, steward, voter).
    AgentId,
    "agent_id"
);
