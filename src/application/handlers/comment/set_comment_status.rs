//! SetCommentStatusHandler - approve or reject a single pending comment.
//!
//! A comment that overlaps other pending comments cannot be approved on its
//! own; its overlap set has to go through `ResolveCommentsHandler`.

use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::domain::comment::{
    ensure_decidable, status_mark, Comment, CommentError, CommentStatusChanged,
};
use crate::domain::foundation::{
    ActionHash, CommandMetadata, CommentStatus, DocumentHash, DomainError, EventId,
    SerializableDomainEvent, Timestamp,
};
use crate::application::handlers::ledger_reads::section_comments;
use crate::ports::{DocumentLedger, EventPublisher};

/// Command to approve or reject one comment.
#[derive(Debug, Clone)]
pub struct SetCommentStatusCommand {
    /// The comment to decide.
    pub comment_hash: DocumentHash,
    /// `Approved` or `Rejected`.
    pub status: CommentStatus,
}

/// Result of a recorded decision.
#[derive(Debug, Clone)]
pub struct SetCommentStatusResult {
    /// The ledger action that recorded the status mark.
    pub action_hash: ActionHash,
    /// The event that was published.
    pub event: CommentStatusChanged,
}

#[derive(Debug, Clone, Error)]
pub enum SetCommentStatusError {
    #[error("Comment not found: {0}")]
    CommentNotFound(DocumentHash),

    /// `Modified` is only reachable through a resolution.
    #[error("Status {0} cannot be set directly")]
    UnsupportedStatus(CommentStatus),

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

pub struct SetCommentStatusHandler {
    ledger: Arc<dyn DocumentLedger>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl SetCommentStatusHandler {
    pub fn new(ledger: Arc<dyn DocumentLedger>, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            ledger,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: SetCommentStatusCommand,
        metadata: CommandMetadata,
    ) -> Result<SetCommentStatusResult, SetCommentStatusError> {
        if !matches!(cmd.status, CommentStatus::Approved | CommentStatus::Rejected) {
            return Err(SetCommentStatusError::UnsupportedStatus(cmd.status));
        }

        // 1. Load the comment and check its document is still live
        let record = self
            .ledger
            .get_document(&cmd.comment_hash)
            .await?
            .ok_or_else(|| SetCommentStatusError::CommentNotFound(cmd.comment_hash.clone()))?;
        let comment = Comment::from_document(record.document)?;
        let target = self
            .ledger
            .get_document(comment.target())
            .await?
            .ok_or_else(|| SetCommentStatusError::DocumentNotFound(comment.target().clone()))?;
        if !target.is_live() {
            return Err(SetCommentStatusError::Superseded(target.hash));
        }

        // 2. Load its siblings on the same section to check for overlaps
        let siblings =
            section_comments(self.ledger.as_ref(), comment.target(), comment.section_name())
                .await?;
        let index = siblings
            .iter()
            .position(|c| c.hash() == Some(&cmd.comment_hash))
            .ok_or_else(|| SetCommentStatusError::CommentNotFound(cmd.comment_hash.clone()))?;
        ensure_decidable(index, &siblings, cmd.status)?;

        // 3. Record the status mark
        let mark = status_mark(&comment, cmd.status)?;
        let action_hash = self
            .ledger
            .mark_document(vec![mark], &metadata.agent_id)
            .await?;
        info!(comment = %cmd.comment_hash, status = %cmd.status, "comment decided");

        // 4. Publish event
        let event = CommentStatusChanged {
            event_id: EventId::new(),
            comment_hash: cmd.comment_hash,
            document_hash: comment.target().clone(),
            from: comment.status(),
            to: cmd.status,
            changed_by: metadata.agent_id.clone(),
            changed_at: Timestamp::now(),
        };
        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_agent_id(metadata.agent_id.to_string());
        self.event_publisher.publish(envelope).await?;

        Ok(SetCommentStatusResult { action_hash, event })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{metadata, World};
    use crate::domain::foundation::ErrorCode;

    fn handler(world: &World) -> SetCommentStatusHandler {
        SetCommentStatusHandler::new(world.ledger.clone(), world.bus.clone())
    }

    fn command(hash: &DocumentHash, status: CommentStatus) -> SetCommentStatusCommand {
        SetCommentStatusCommand {
            comment_hash: hash.clone(),
            status,
        }
    }

    async fn status_of(world: &World, hash: &DocumentHash) -> CommentStatus {
        Comment::from_document(world.stored(hash).await).unwrap().status()
    }

    #[tokio::test]
    async fn approves_isolated_comment() {
        let world = World::refining("The quick brown fox").await;
        let quick = world.comment("bob", 4, 9, Some("slow")).await;
        let _fox = world.comment("carol", 16, 19, Some("cat")).await;

        let result = handler(&world)
            .handle(command(&quick, CommentStatus::Approved), metadata("alice"))
            .await
            .unwrap();

        assert_eq!(status_of(&world, &quick).await, CommentStatus::Approved);
        assert_eq!(result.event.from, CommentStatus::Pending);
        assert!(world.bus.has_event("comment.status_changed.v1"));
    }

    #[tokio::test]
    async fn approval_withheld_while_overlapping() {
        let world = World::refining("The quick brown fox").await;
        let a = world.comment("bob", 4, 9, Some("slow")).await;
        let _b = world.comment("carol", 9, 15, Some(" red")).await;

        let err = handler(&world)
            .handle(command(&a, CommentStatus::Approved), metadata("alice"))
            .await
            .unwrap_err();

        assert!(matches!(err, SetCommentStatusError::Comment(CommentError::Overlapping(1))));
        assert_eq!(status_of(&world, &a).await, CommentStatus::Pending);
        assert_eq!(world.bus.event_count(), 0);
    }

    #[tokio::test]
    async fn rejection_allowed_while_overlapping() {
        let world = World::refining("The quick brown fox").await;
        let a = world.comment("bob", 4, 9, Some("slow")).await;
        let b = world.comment("carol", 6, 12, None).await;

        handler(&world)
            .handle(command(&a, CommentStatus::Rejected), metadata("alice"))
            .await
            .unwrap();

        // With `a` decided, `b` no longer overlaps a pending comment.
        handler(&world)
            .handle(command(&b, CommentStatus::Approved), metadata("alice"))
            .await
            .unwrap();
        assert_eq!(status_of(&world, &a).await, CommentStatus::Rejected);
        assert_eq!(status_of(&world, &b).await, CommentStatus::Approved);
    }

    #[tokio::test]
    async fn decided_comment_cannot_change_again() {
        let world = World::refining("The quick brown fox").await;
        let a = world.comment("bob", 4, 9, Some("slow")).await;
        handler(&world)
            .handle(command(&a, CommentStatus::Rejected), metadata("alice"))
            .await
            .unwrap();

        let err = handler(&world)
            .handle(command(&a, CommentStatus::Approved), metadata("alice"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SetCommentStatusError::Comment(CommentError::NotPending(CommentStatus::Rejected))
        ));
    }

    #[tokio::test]
    async fn modified_and_pending_cannot_be_set() {
        let world = World::refining("text").await;
        let a = world.comment("bob", 0, 2, None).await;
        for status in [CommentStatus::Modified, CommentStatus::Pending] {
            let err = handler(&world)
                .handle(command(&a, status), metadata("alice"))
                .await
                .unwrap_err();
            assert!(matches!(err, SetCommentStatusError::UnsupportedStatus(_)));
        }
    }

    #[tokio::test]
    async fn comments_on_superseded_document_cannot_be_decided() {
        let world = World::refining("The quick brown fox").await;
        let quick = world.comment("bob", 4, 9, Some("slow")).await;
        world.supersede().await;

        let err = handler(&world)
            .handle(command(&quick, CommentStatus::Approved), metadata("alice"))
            .await
            .unwrap_err();
        assert!(matches!(err, SetCommentStatusError::Superseded(ref h) if *h == world.document));
        assert_eq!(status_of(&world, &quick).await, CommentStatus::Pending);
    }

    #[tokio::test]
    async fn non_comment_document_is_rejected() {
        let world = World::refining("text").await;
        let err = handler(&world)
            .handle(command(&world.document, CommentStatus::Approved), metadata("alice"))
            .await
            .unwrap_err();
        let domain: DomainError = match err {
            SetCommentStatusError::Comment(inner) => inner.into(),
            other => panic!("unexpected error: {other}"),
        };
        assert_eq!(domain.code, ErrorCode::InvalidFormat);
    }
}
