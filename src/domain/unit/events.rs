//! Unit domain events.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{domain_event, AgentId, DocumentHash, EventId, Timestamp, UnitHash};

/// A unit moved to a new lifecycle state with a new current document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitStateAdvanced {
    pub event_id: EventId,
    pub unit_hash: UnitHash,
    pub document_hash: DocumentHash,
    pub from_state: String,
    pub to_state: String,
    pub advanced_by: AgentId,
    pub advanced_at: Timestamp,
}

domain_event!(
    UnitStateAdvanced,
    event_type = "unit.state_advanced.v1",
    aggregate_id = unit_hash,
    aggregate_type = "Unit",
    occurred_at = advanced_at,
    event_id = event_id
);

/// A unit was replaced by an updated successor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitUpdated {
    pub event_id: EventId,
    pub unit_hash: UnitHash,
    pub previous_hash: UnitHash,
    pub path: String,
    pub updated_by: AgentId,
    pub updated_at: Timestamp,
}

domain_event!(
    UnitUpdated,
    event_type = "unit.updated.v1",
    aggregate_id = unit_hash,
    aggregate_type = "Unit",
    occurred_at = updated_at,
    event_id = event_id
);

/// A unit was registered along with its first document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitCreated {
    pub event_id: EventId,
    pub unit_hash: UnitHash,
    pub document_hash: DocumentHash,
    pub path: String,
    pub created_by: AgentId,
    pub created_at: Timestamp,
}

domain_event!(
    UnitCreated,
    event_type = "unit.created.v1",
    aggregate_id = unit_hash,
    aggregate_type = "Unit",
    occurred_at = created_at,
    event_id = event_id
);
