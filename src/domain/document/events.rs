//! Document domain events.
//!
//! - `DocumentUpdated` - A successor document was stored for a path
//! - `SectionAdded` - A section was appended to a document

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{domain_event, AgentId, DocumentHash, EventId, Timestamp};

/// Published when a document is superseded by a new entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentUpdated {
    pub event_id: EventId,
    /// Hash of the new entry.
    pub document_hash: DocumentHash,
    /// Hash of the entry it supersedes.
    pub previous_hash: DocumentHash,
    pub path: String,
    /// Sections whose content changed.
    pub sections: Vec<String>,
    pub updated_by: AgentId,
    pub updated_at: Timestamp,
}

domain_event!(
    DocumentUpdated,
    event_type = "document.updated.v1",
    aggregate_id = document_hash,
    aggregate_type = "Document",
    occurred_at = updated_at,
    event_id = event_id
);

/// Published when a new section is appended to a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionAdded {
    pub event_id: EventId,
    pub document_hash: DocumentHash,
    pub previous_hash: DocumentHash,
    pub section: String,
    pub added_by: AgentId,
    pub added_at: Timestamp,
}

domain_event!(
    SectionAdded,
    event_type = "document.section_added.v1",
    aggregate_id = document_hash,
    aggregate_type = "Document",
    occurred_at = added_at,
    event_id = event_id
);
