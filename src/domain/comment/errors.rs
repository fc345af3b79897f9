//! Comment error types.

use thiserror::Error;

use crate::domain::annotation::AnnotationError;
use crate::domain::document::{DocumentError, DocumentType};
use crate::domain::foundation::{CommentStatus, DomainError, ErrorCode, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommentError {
    #[error("Document of type {0} is not a comment")]
    NotAComment(DocumentType),

    #[error("Comment is missing meta field '{0}'")]
    MissingMeta(&'static str),

    #[error("Section '{0}' not found on the annotated document")]
    UnknownSection(String),

    #[error("Comment needs comment text or a suggestion")]
    Empty,

    #[error("Comment is already {0}")]
    NotPending(CommentStatus),

    #[error("Comment overlaps {0} other pending comments; resolve them together")]
    Overlapping(usize),

    #[error("Comment targets '{actual}', expected '{expected}'")]
    WrongTarget { expected: String, actual: String },

    #[error("Document has not been persisted")]
    Unpersisted,

    #[error(transparent)]
    Annotation(#[from] AnnotationError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl From<CommentError> for DomainError {
    fn from(err: CommentError) -> Self {
        match err {
            CommentError::Annotation(inner) => inner.into(),
            CommentError::Document(inner) => inner.into(),
            CommentError::Invalid(inner) => inner.into(),
            other => {
                let code = match &other {
                    CommentError::NotAComment(_) | CommentError::MissingMeta(_) => {
                        ErrorCode::InvalidFormat
                    }
                    CommentError::UnknownSection(_) => ErrorCode::UnknownSection,
                    CommentError::Empty => ErrorCode::EmptyField,
                    CommentError::NotPending(_) => ErrorCode::CommentNotPending,
                    CommentError::Overlapping(_) => ErrorCode::CommentOverlaps,
                    CommentError::WrongTarget { .. } => ErrorCode::ValidationFailed,
                    CommentError::Unpersisted => ErrorCode::DocumentNotFound,
                    CommentError::Annotation(_)
                    | CommentError::Document(_)
                    | CommentError::Invalid(_) => ErrorCode::InternalError,
                };
                DomainError::new(code, other.to_string())
            }
        }
    }
}
