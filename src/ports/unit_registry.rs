//! UnitRegistry port - the persistence collaborator for units.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::document::Document;
use crate::domain::foundation::{AgentId, DocumentHash, DomainError, UnitHash};
use crate::domain::unit::Unit;

/// A stored unit with its current lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitRecord {
    pub hash: UnitHash,
    pub unit: Unit,
    pub state: String,
    pub updated_by: Vec<UnitHash>,
}

impl UnitRecord {
    pub fn is_live(&self) -> bool {
        self.updated_by.is_empty()
    }
}

/// Store `unit` as the successor of `hash`.
#[derive(Debug, Clone)]
pub struct UpdateUnit {
    pub hash: UnitHash,
    pub unit: Unit,
}

/// Move a unit to `new_state`, replacing its current document.
#[derive(Debug, Clone)]
pub struct AdvanceState {
    pub new_state: String,
    pub unit_hash: UnitHash,
    pub document_hash: DocumentHash,
    pub document: Document,
}

/// Port for unit persistence.
///
/// Implementations re-check that the author stewards the unit and that
/// the transition is in the unit's table before recording an advance.
/// Updates and advances through a superseded unit hash are refused with
/// `ErrorCode::Superseded`; the lifecycle state lives on the live record.
#[async_trait]
pub trait UnitRegistry: Send + Sync {
    async fn get_units(&self) -> Result<Vec<UnitRecord>, DomainError>;

    async fn get_unit(&self, hash: &UnitHash) -> Result<Option<UnitRecord>, DomainError>;

    /// Registers a unit in its machine's first state, `define`.
    async fn create_unit(&self, unit: Unit, author: &AgentId) -> Result<UnitHash, DomainError>;

    async fn update_unit(&self, update: UpdateUnit, author: &AgentId)
        -> Result<UnitHash, DomainError>;

    /// Records the transition and stores the new current document.
    async fn advance_state(
        &self,
        request: AdvanceState,
        author: &AgentId,
    ) -> Result<DocumentHash, DomainError>;
}
