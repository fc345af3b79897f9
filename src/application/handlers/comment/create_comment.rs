//! CreateCommentHandler - Command handler for annotating a section.
//!
//! Comments may only be written while the target document's comments
//! control permits it, which in practice means during `refine`.

use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::domain::annotation::HilightRange;
use crate::domain::comment::{CommentCreated, CommentDraft, CommentError, SUGGESTION_SECTION};
use crate::domain::control::{find_control, ControlKind};
use crate::domain::foundation::{
    CommandMetadata, DocumentHash, DomainError, EventId, SerializableDomainEvent, Timestamp,
};
use crate::ports::{DocumentLedger, EventPublisher};

/// Command to attach a comment, a suggestion, or both to a range.
#[derive(Debug, Clone)]
pub struct CreateCommentCommand {
    /// The annotated document.
    pub document_hash: DocumentHash,
    /// Section and canonical offsets of the selection.
    pub range: HilightRange,
    /// Free-text remark shown beside the range.
    pub comment: Option<String>,
    /// Replacement text; an empty string proposes deleting the range.
    pub suggestion: Option<String>,
}

/// Result of successfully creating a comment.
#[derive(Debug, Clone)]
pub struct CreateCommentResult {
    /// The stored comment document.
    pub comment_hash: DocumentHash,
    /// The event that was published.
    pub event: CommentCreated,
}

#[derive(Debug, Clone, Error)]
pub enum CreateCommentError {
    #[error("Document not found: {0}")]
    DocumentNotFound(DocumentHash),

    /// The comments control is missing, disabled, or the state is wrong.
    #[error("Commenting is closed on this document in state '{0}'")]
    CommentingClosed(String),

    /// The entry was superseded; work continues on its successor.
    #[error("Document {0} has been superseded")]
    Superseded(DocumentHash),

    #[error(transparent)]
    Comment(#[from] CommentError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Handler for creating comments.
pub struct CreateCommentHandler {
    ledger: Arc<dyn DocumentLedger>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CreateCommentHandler {
    pub fn new(ledger: Arc<dyn DocumentLedger>, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            ledger,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateCommentCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateCommentResult, CreateCommentError> {
        let agent = &metadata.agent_id;

        // 1. Load the annotated document
        let record = self
            .ledger
            .get_document(&cmd.document_hash)
            .await?
            .ok_or_else(|| CreateCommentError::DocumentNotFound(cmd.document_hash.clone()))?;
        if !record.is_live() {
            return Err(CreateCommentError::Superseded(cmd.document_hash));
        }
        let target = record.document;

        // 2. Check the comments control
        let open = find_control(&target, ControlKind::Comments)
            .map(|c| c.can_do(agent, &target))
            .unwrap_or(false);
        if !open {
            return Err(CreateCommentError::CommentingClosed(target.state().to_string()));
        }

        // 3. Build the comment document
        let mut draft = CommentDraft::new(&target, cmd.range)?;
        if let Some(text) = cmd.comment {
            draft = draft.with_comment(text);
        }
        if let Some(text) = cmd.suggestion {
            draft = draft.with_suggestion(text);
        }
        let range = draft.range().clone();
        let document = draft.into_document(agent)?;
        let has_suggestion = document.get_section(SUGGESTION_SECTION).is_some();

        // 4. Store it next to the target
        let comment_hash = self
            .ledger
            .create_document(&record.path, document, agent)
            .await?;
        info!(comment = %comment_hash, document = %cmd.document_hash, section = %range.section_name, "comment created");

        // 5. Publish event
        let event = CommentCreated {
            event_id: EventId::new(),
            comment_hash: comment_hash.clone(),
            document_hash: cmd.document_hash,
            section: range.section_name,
            start_offset: range.start_offset,
            end_offset: range.end_offset,
            has_suggestion,
            created_by: agent.clone(),
            created_at: Timestamp::now(),
        };
        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_agent_id(agent.to_string());
        self.event_publisher.publish(envelope).await?;

        Ok(CreateCommentResult {
            comment_hash,
            event,
        })
    }
}
