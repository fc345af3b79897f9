//! Control domain events.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    domain_event, ActionHash, AgentId, DocumentHash, EventId, Timestamp,
};

use super::{ControlAction, ControlKind};

/// A vote or approval mark was recorded through a control.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlMarked {
    pub event_id: EventId,
    pub document_hash: DocumentHash,
    pub action_hash: ActionHash,
    pub control: ControlKind,
    pub action: ControlAction,
    pub marked_by: AgentId,
    pub marked_at: Timestamp,
}

domain_event!(
    ControlMarked,
    event_type = "control.marked.v1",
    aggregate_id = document_hash,
    aggregate_type = "Document",
    occurred_at = marked_at,
    event_id = event_id
);
