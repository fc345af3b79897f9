//! CommentStatus enum for the review lifecycle of a comment.
//!
//! Status is never stored on the comment itself. It is derived from the
//! append-only mark log attached to the comment document; see
//! `domain::comment::comment_status`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{StateMachine, ValidationError};

/// Review status of a comment or suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CommentStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    /// Superseded by a joint resolution of overlapping suggestions.
    Modified,
}

impl CommentStatus {
    /// Returns true while the comment still awaits a decision.
    pub fn is_pending(&self) -> bool {
        matches!(self, CommentStatus::Pending)
    }

    /// Returns true if the comment's suggestion should be applied.
    pub fn is_approved(&self) -> bool {
        matches!(self, CommentStatus::Approved)
    }

    /// Returns the value written into a `CommentStatus` mark.
    ///
    /// `Pending` has no mark representation.
    pub fn mark_value(&self) -> Option<&'static str> {
        match self {
            CommentStatus::Pending => None,
            CommentStatus::Approved => Some("approved"),
            CommentStatus::Rejected => Some("rejected"),
            CommentStatus::Modified => Some("modified"),
        }
    }
}

impl StateMachine for CommentStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use CommentStatus::*;
        matches!(
            (self, target),
            (Pending, Approved) | (Pending, Rejected) | (Pending, Modified)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use CommentStatus::*;
        match self {
            Pending => vec![Approved, Rejected, Modified],
            Approved | Rejected | Modified => vec![],
        }
    }
}

impl fmt::Display for CommentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CommentStatus::Pending => "Pending",
            CommentStatus::Approved => "Approved",
            CommentStatus::Rejected => "Rejected",
            CommentStatus::Modified => "Modified",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for CommentStatus {
    type Err = ValidationError;

    /// Parses a mark value. Case-insensitive; `pending` is not a mark value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "approved" => Ok(CommentStatus::Approved),
            "rejected" => Ok(CommentStatus::Rejected),
            "modified" => Ok(CommentStatus::Modified),
            other => Err(ValidationError::invalid_format(
                "comment_status",
                format!("unknown status mark '{}'", other),
            )),
        }
    }
}
