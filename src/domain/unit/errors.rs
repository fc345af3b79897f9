//! Unit error types.

use thiserror::Error;

use crate::domain::document::DocumentError;
use crate::domain::foundation::{AgentId, DomainError, ErrorCode, ValidationError};

/// Errors raised by unit updates and state advancement. All are raised
/// before anything is sent to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    #[error("Cannot transition from '{from}' to '{to}'")]
    IllegalTransition { from: String, to: String },

    #[error("Agent {0} is not a steward of this unit")]
    NotSteward(AgentId),

    #[error("{0} sections are still empty")]
    EmptySections(usize),

    #[error("Cannot attach '{unit}' under '{parent}': it would become its own ancestor")]
    CyclicParent { unit: String, parent: String },

    #[error("State '{0}' is not in the unit's transition table")]
    UnknownState(String),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl From<UnitError> for DomainError {
    fn from(err: UnitError) -> Self {
        match err {
            UnitError::Document(inner) => inner.into(),
            UnitError::Invalid(inner) => inner.into(),
            other => {
                let code = match &other {
                    UnitError::IllegalTransition { .. } | UnitError::UnknownState(_) => {
                        ErrorCode::IllegalTransition
                    }
                    UnitError::NotSteward(_) => ErrorCode::Forbidden,
                    UnitError::EmptySections(_) => ErrorCode::SectionsIncomplete,
                    UnitError::CyclicParent { .. } => ErrorCode::ValidationFailed,
                    UnitError::Document(_) | UnitError::Invalid(_) => ErrorCode::InternalError,
                };
                DomainError::new(code, other.to_string())
            }
        }
    }
}
