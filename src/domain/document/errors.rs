//! Document-specific error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// Errors raised by document composition and editing rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("Section '{0}' is not present in the document")]
    UnknownSection(String),

    #[error("Section '{0}' already exists in the document")]
    DuplicateSection(String),

    #[error("Section '{section}' is not editable in state '{state}'")]
    NotEditable { section: String, state: String },

    #[error("Sections cannot be added in state '{0}'")]
    CannotAddSection(String),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl From<DocumentError> for DomainError {
    fn from(err: DocumentError) -> Self {
        let code = match &err {
            DocumentError::UnknownSection(_) => ErrorCode::UnknownSection,
            DocumentError::DuplicateSection(_) => ErrorCode::ValidationFailed,
            DocumentError::NotEditable { .. } => ErrorCode::SectionNotEditable,
            DocumentError::CannotAddSection(_) => ErrorCode::Forbidden,
            DocumentError::Invalid(_) => ErrorCode::ValidationFailed,
        };
        DomainError::new(code, err.to_string())
    }
}
