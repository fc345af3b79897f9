//! Annotation engine error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

use super::TextRange;

/// Errors raised by offset arithmetic and suggestion application.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationError {
    /// A stored offset is not a number. Never defaulted: a false zero
    /// would corrupt unrelated ranges.
    #[error("Offset '{field}' is malformed: '{value}'")]
    MalformedOffset { field: &'static str, value: String },

    #[error("Range start {start} is after end {end}")]
    InvalidRange { start: usize, end: usize },

    #[error("Offset {offset} is beyond text of length {len}")]
    OffsetOutOfBounds { offset: usize, len: usize },

    #[error("Approved suggestions {first} and {second} overlap")]
    ConflictingSuggestions { first: TextRange, second: TextRange },

    #[error("No annotation at index {0}")]
    UnknownAnchor(usize),
}

impl From<AnnotationError> for DomainError {
    fn from(err: AnnotationError) -> Self {
        let code = match &err {
            AnnotationError::MalformedOffset { .. } => ErrorCode::MalformedOffset,
            AnnotationError::InvalidRange { .. } => ErrorCode::InvalidFormat,
            AnnotationError::OffsetOutOfBounds { .. } => ErrorCode::OutOfRange,
            AnnotationError::ConflictingSuggestions { .. } => ErrorCode::ConflictingSuggestions,
            AnnotationError::UnknownAnchor(_) => ErrorCode::CommentNotFound,
        };
        DomainError::new(code, err.to_string())
    }
}
