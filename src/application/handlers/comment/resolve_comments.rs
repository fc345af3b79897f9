//! ResolveCommentsHandler - replace an overlap set with one approved
//! suggestion.
//!
//! The seed comment's overlap closure is computed over the pending
//! comments on its section. A replacement comment covering the merged
//! range is stored, then one mark batch marks every member `modified` and
//! the replacement `approved`.

use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::domain::annotation::overlap_closure;
use crate::domain::comment::{
    resolution_marks, resolution_range, Comment, CommentDraft, CommentError, CommentsResolved,
};
use crate::domain::foundation::{
    CommandMetadata, DocumentHash, DomainError, EventId, SerializableDomainEvent, Timestamp,
};
use crate::application::handlers::ledger_reads::section_comments;
use crate::ports::{DocumentLedger, EventPublisher};

/// Command to replace an overlap set with one suggestion.
#[derive(Debug, Clone)]
pub struct ResolveCommentsCommand {
    /// Any pending member of the overlap set.
    pub comment_hash: DocumentHash,
    /// Text replacing the whole merged range.
    pub replacement: String,
    /// Remark stored on the replacement comment.
    pub comment: Option<String>,
}

/// Result of a resolution.
#[derive(Debug, Clone)]
pub struct ResolveCommentsResult {
    /// The new approved comment covering the merged range.
    pub replacement_hash: DocumentHash,
    /// Hashes of the comments marked `modified`.
    pub modified: Vec<DocumentHash>,
    /// The event that was published.
    pub event: CommentsResolved,
}

#[derive(Debug, Clone, Error)]
pub enum ResolveCommentsError {
    #[error("Comment not found: {0}")]
    CommentNotFound(DocumentHash),

    #[error("Annotated document not found: {0}")]
    DocumentNotFound(DocumentHash),

    /// The entry was superseded; work continues on its successor.
    #[error("Document {0} has been superseded")]
    Superseded(DocumentHash),

    #[error(transparent)]
    Comment(#[from] CommentError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

pub struct ResolveCommentsHandler {
    ledger: Arc<dyn DocumentLedger>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl ResolveCommentsHandler {
    pub fn new(ledger: Arc<dyn DocumentLedger>, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            ledger,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: ResolveCommentsCommand,
        metadata: CommandMetadata,
    ) -> Result<ResolveCommentsResult, ResolveCommentsError> {
        let agent = &metadata.agent_id;

        // 1. Load the seed and the pending comments around it
        let seed = self
            .ledger
            .get_document(&cmd.comment_hash)
            .await?
            .ok_or_else(|| ResolveCommentsError::CommentNotFound(cmd.comment_hash.clone()))?;
        let seed = Comment::from_document(seed.document)?;
        if !seed.status().is_pending() {
            return Err(CommentError::NotPending(seed.status()).into());
        }
        let target = self
            .ledger
            .get_document(seed.target())
            .await?
            .ok_or_else(|| ResolveCommentsError::DocumentNotFound(seed.target().clone()))?;
        if !target.is_live() {
            return Err(ResolveCommentsError::Superseded(target.hash));
        }
        let comments =
            section_comments(self.ledger.as_ref(), seed.target(), seed.section_name()).await?;
        let index = comments
            .iter()
            .position(|c| c.hash() == Some(&cmd.comment_hash))
            .ok_or_else(|| ResolveCommentsError::CommentNotFound(cmd.comment_hash.clone()))?;

        // 2. Compute the overlap closure
        let closure = overlap_closure(index, &comments).map_err(CommentError::from)?;

        // 3. Store the replacement over the merged range
        let range = resolution_range(&closure, &comments).with_replacement(cmd.replacement);
        let mut draft = CommentDraft::new(&target.document, range)?;
        if let Some(text) = cmd.comment {
            draft = draft.with_comment(text);
        }
        let replacement = draft.into_document(agent)?;
        let replacement_hash = self
            .ledger
            .create_document(&target.path, replacement, agent)
            .await?;

        // 4. Mark members modified and the replacement approved, together
        let marks = resolution_marks(&closure, &comments, &replacement_hash);
        let modified: Vec<DocumentHash> = marks
            .iter()
            .map(|m| m.hash.clone())
            .filter(|h| h != &replacement_hash)
            .collect();
        self.ledger.mark_document(marks, agent).await?;
        info!(
            replacement = %replacement_hash,
            members = modified.len(),
            range = %closure.range(),
            "overlapping comments resolved"
        );

        // 5. Publish event
        let event = CommentsResolved {
            event_id: EventId::new(),
            replacement_hash: replacement_hash.clone(),
            document_hash: seed.target().clone(),
            section: seed.section_name().to_string(),
            modified: modified.clone(),
            resolved_by: agent.clone(),
            resolved_at: Timestamp::now(),
        };
        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_agent_id(agent.to_string());
        self.event_publisher.publish(envelope).await?;

        Ok(ResolveCommentsResult {
            replacement_hash,
            modified,
            event,
        })
    }
}
