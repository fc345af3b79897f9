//! Comment domain events.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    domain_event, AgentId, CommentStatus, DocumentHash, EventId, Timestamp,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentCreated {
    pub event_id: EventId,
    pub comment_hash: DocumentHash,
    /// The annotated document.
    pub document_hash: DocumentHash,
    pub section: String,
    pub start_offset: usize,
    pub end_offset: usize,
    pub has_suggestion: bool,
    pub created_by: AgentId,
    pub created_at: Timestamp,
}

domain_event!(
    CommentCreated,
    event_type = "comment.created.v1",
    aggregate_id = comment_hash,
    aggregate_type = "Comment",
    occurred_at = created_at,
    event_id = event_id
);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentStatusChanged {
    pub event_id: EventId,
    pub comment_hash: DocumentHash,
    pub document_hash: DocumentHash,
    pub from: CommentStatus,
    pub to: CommentStatus,
    pub changed_by: AgentId,
    pub changed_at: Timestamp,
}

domain_event!(
    CommentStatusChanged,
    event_type = "comment.status_changed.v1",
    aggregate_id = comment_hash,
    aggregate_type = "Comment",
    occurred_at = changed_at,
    event_id = event_id
);

/// Overlapping comments were superseded by one approved replacement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentsResolved {
    pub event_id: EventId,
    pub replacement_hash: DocumentHash,
    pub document_hash: DocumentHash,
    pub section: String,
    pub modified: Vec<DocumentHash>,
    pub resolved_by: AgentId,
    pub resolved_at: Timestamp,
}

domain_event!(
    CommentsResolved,
    event_type = "comments.resolved.v1",
    aggregate_id = replacement_hash,
    aggregate_type = "Comment",
    occurred_at = resolved_at,
    event_id = event_id
);
