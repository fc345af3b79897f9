//! ApplyApprovedCommentsHandler - splice approved suggestions into a section.
//!
//! All approved suggestions on the section are applied against one snapshot
//! of its text and the result is stored as a successor document. Comments
//! keep pointing at the entry they were written against.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::application::handlers::ledger_reads::section_comments;
use crate::domain::annotation::{apply_approved_comments, AnnotationError, Anchored};
use crate::domain::document::{DocumentError, DocumentUpdated};
use crate::domain::foundation::{
    CommandMetadata, DocumentHash, DomainError, EventId, SerializableDomainEvent, Timestamp,
};
use crate::ports::{DocumentLedger, EventPublisher, UpdateDocument};

/// Command to splice a section's approved suggestions into its text.
#[derive(Debug, Clone)]
pub struct ApplyApprovedCommentsCommand {
    /// The live entry the comments were written against.
    pub document_hash: DocumentHash,
    /// The section whose approved suggestions are spliced in.
    pub section: String,
}

/// Result of applying approved suggestions.
#[derive(Debug, Clone)]
pub struct ApplyApprovedCommentsResult {
    /// The successor entry, or the original hash when nothing applied.
    pub document_hash: DocumentHash,
    /// Approved suggestions spliced in.
    pub applied: usize,
    /// The published event, when a successor was stored.
    pub event: Option<DocumentUpdated>,
}

#[derive(Debug, Clone, Error)]
pub enum ApplyApprovedCommentsError {
    #[error("Document not found: {0}")]
    DocumentNotFound(DocumentHash),

    /// The entry was already superseded; comments must be applied to the
    /// text they were written against.
    #[error("Document {0} has been superseded")]
    Superseded(DocumentHash),

    #[error(transparent)]
    Annotation(#[from] AnnotationError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

pub struct ApplyApprovedCommentsHandler {
    ledger: Arc<dyn DocumentLedger>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl ApplyApprovedCommentsHandler {
    pub fn new(ledger: Arc<dyn DocumentLedger>, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            ledger,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: ApplyApprovedCommentsCommand,
        metadata: CommandMetadata,
    ) -> Result<ApplyApprovedCommentsResult, ApplyApprovedCommentsError> {
        // 1. Load the live document and its section
        let record = self
            .ledger
            .get_document(&cmd.document_hash)
            .await?
            .ok_or_else(|| ApplyApprovedCommentsError::DocumentNotFound(cmd.document_hash.clone()))?;
        if !record.is_live() {
            return Err(ApplyApprovedCommentsError::Superseded(cmd.document_hash));
        }
        let text = record
            .document
            .get_section(&cmd.section)
            .ok_or_else(|| DocumentError::UnknownSection(cmd.section.clone()))?
            .content()
            .to_string();

        // 2. Collect approved suggestions and splice them in
        let comments = section_comments(self.ledger.as_ref(), &cmd.document_hash, &cmd.section).await?;
        let applied = comments
            .iter()
            .filter(|c| c.status().is_approved() && c.suggestion().is_some())
            .filter(|c| Anchored::range(*c).is_ok())
            .count();
        if applied == 0 {
            debug!(document = %cmd.document_hash, section = %cmd.section, "no approved suggestions to apply");
            return Ok(ApplyApprovedCommentsResult {
                document_hash: cmd.document_hash,
                applied,
                event: None,
            });
        }
        let updated = apply_approved_comments(&text, &comments)?;

        // 3. Store the successor
        let successor = record.document.with_section_content(&cmd.section, updated)?;
        let document_hash = self
            .ledger
            .update_document(
                UpdateDocument {
                    hash: cmd.document_hash.clone(),
                    path: record.path.clone(),
                    document: successor,
                },
                &metadata.agent_id,
            )
            .await?;
        info!(previous = %cmd.document_hash, document = %document_hash, applied, "approved suggestions applied");

        // 4. Publish event
        let event = DocumentUpdated {
            event_id: EventId::new(),
            document_hash: document_hash.clone(),
            previous_hash: cmd.document_hash,
            path: record.path,
            sections: vec![cmd.section],
            updated_by: metadata.agent_id.clone(),
            updated_at: Timestamp::now(),
        };
        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_agent_id(metadata.agent_id.to_string());
        self.event_publisher.publish(envelope).await?;

        Ok(ApplyApprovedCommentsResult {
            document_hash,
            applied,
            event: Some(event),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::comment::{CreateCommentCommand, CreateCommentHandler};
    use crate::application::handlers::document::{EditDocumentCommand, EditDocumentHandler};
    use crate::application::handlers::test_support::{agent, metadata, World};
    use crate::domain::annotation::{HilightRange, TextRange};
    use crate::domain::document::{MarkRequest, MarkType, ProcessRoot, Section};

    fn handler(world: &World) -> ApplyApprovedCommentsHandler {
        ApplyApprovedCommentsHandler::new(world.ledger.clone(), world.bus.clone())
    }

    fn command(world: &World) -> ApplyApprovedCommentsCommand {
        ApplyApprovedCommentsCommand {
            document_hash: world.document.clone(),
            section: "body".to_string(),
        }
    }

    async fn decide(world: &World, hash: &DocumentHash, value: &str) {
        world
            .ledger
            .mark_document(
                vec![MarkRequest::new(hash.clone(), MarkType::CommentStatus, value)],
                &agent("alice"),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn applies_approved_suggestions_to_successor() {
        let world = World::refining("The quick brown fox").await;
        let quick = world.comment("bob", 4, 9, Some("slow")).await;
        let brown = world.comment("carol", 10, 15, Some("red")).await;
        let fox = world.comment("dave", 16, 19, Some("cat")).await;
        decide(&world, &quick, "approved").await;
        decide(&world, &brown, "approved").await;
        decide(&world, &fox, "rejected").await;

        let result = handler(&world)
            .handle(command(&world), metadata("alice"))
            .await
            .unwrap();

        assert_eq!(result.applied, 2);
        assert_ne!(result.document_hash, world.document);
        let updated = world.stored(&result.document_hash).await;
        assert_eq!(updated.get_section("body").unwrap().content(), "The slow red fox");

        let old = world.ledger.get_document(&world.document).await.unwrap().unwrap();
        assert_eq!(old.updated_by, vec![result.document_hash.clone()]);
        let events = world.bus.events_of_type("document.updated.v1");
        assert_eq!(events.len(), 1);
    }

    #[tokio::test]
    async fn nothing_approved_leaves_document_alone() {
        let world = World::refining("The quick brown fox").await;
        world.comment("bob", 4, 9, Some("slow")).await;

        let result = handler(&world)
            .handle(command(&world), metadata("alice"))
            .await
            .unwrap();

        assert_eq!(result.applied, 0);
        assert_eq!(result.document_hash, world.document);
        assert!(result.event.is_none());
        assert_eq!(world.bus.event_count(), 0);
    }

    #[tokio::test]
    async fn superseded_document_is_refused() {
        let world = World::refining("The quick brown fox").await;
        let quick = world.comment("bob", 4, 9, Some("slow")).await;
        decide(&world, &quick, "approved").await;
        handler(&world)
            .handle(command(&world), metadata("alice"))
            .await
            .unwrap();

        let err = handler(&world)
            .handle(command(&world), metadata("alice"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplyApprovedCommentsError::Superseded(_)));
    }

    #[tokio::test]
    async fn edit_retires_approvals_on_the_old_entry() {
        let world = World::refining("The quick brown fox").await;
        let quick = world.comment("bob", 4, 9, Some("slow")).await;
        decide(&world, &quick, "approved").await;

        let edited = EditDocumentHandler::new(world.ledger.clone(), world.bus.clone(), ProcessRoot::default())
            .handle(
                EditDocumentCommand::add_section(
                    world.document.clone(),
                    Section::markdown("notes", "later").unwrap(),
                ),
                metadata("alice"),
            )
            .await
            .unwrap();

        let err = handler(&world)
            .handle(command(&world), metadata("alice"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplyApprovedCommentsError::Superseded(_)));

        let again = CreateCommentHandler::new(world.ledger.clone(), world.bus.clone())
            .handle(
                CreateCommentCommand {
                    document_hash: edited.document_hash.clone(),
                    range: HilightRange::new("body", TextRange::new(4, 9).unwrap()),
                    comment: None,
                    suggestion: Some("slow".to_string()),
                },
                metadata("bob"),
            )
            .await
            .unwrap();
        decide(&world, &again.comment_hash, "approved").await;

        let result = handler(&world)
            .handle(
                ApplyApprovedCommentsCommand {
                    document_hash: edited.document_hash,
                    section: "body".to_string(),
                },
                metadata("alice"),
            )
            .await
            .unwrap();
        assert_eq!(result.applied, 1);
        let updated = world.stored(&result.document_hash).await;
        assert_eq!(updated.get_section("body").unwrap().content(), "The slow brown fox");
        assert_eq!(updated.get_section("notes").unwrap().content(), "later");
    }

    #[tokio::test]
    async fn conflicting_approvals_are_refused() {
        let world = World::refining("The quick brown fox").await;
        let a = world.comment("bob", 4, 9, Some("slow")).await;
        let b = world.comment("carol", 6, 12, Some("x")).await;
        decide(&world, &a, "approved").await;
        decide(&world, &b, "approved").await;

        let err = handler(&world)
            .handle(command(&world), metadata("alice"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApplyApprovedCommentsError::Annotation(AnnotationError::ConflictingSuggestions { .. })
        ));
        assert_eq!(world.ledger.document_count().await, 3);
    }

    #[tokio::test]
    async fn unknown_section_is_reported() {
        let world = World::refining("text").await;
        let err = handler(&world)
            .handle(
                ApplyApprovedCommentsCommand {
                    document_hash: world.document.clone(),
                    section: "missing".to_string(),
                },
                metadata("alice"),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApplyApprovedCommentsError::Document(DocumentError::UnknownSection(_))
        ));
    }
}
