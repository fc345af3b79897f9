//! EditDocumentHandler - direct section edits.
//!
//! Edits are last-writer-wins: each one stores a successor of the entry it
//! names, whether or not another edit got there first.

use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::domain::document::{
    DocumentError, DocumentUpdated, ProcessRoot, Section, SectionAdded,
};
use crate::domain::foundation::{
    CommandMetadata, DocumentHash, DomainError, EventEnvelope, EventId, SerializableDomainEvent,
    Timestamp,
};
use crate::ports::{DocumentLedger, EventPublisher, UpdateDocument};

/// What to change.
#[derive(Debug, Clone)]
pub enum DocumentEdit {
    /// Replace one section's content.
    SetContent { section: String, content: String },
    /// Append a new section.
    AddSection(Section),
}

/// Command to edit one section of a document, or add one.
#[derive(Debug, Clone)]
pub struct EditDocumentCommand {
    /// The entry the edit is based on.
    pub document_hash: DocumentHash,
    /// What to change.
    pub edit: DocumentEdit,
}

impl EditDocumentCommand {
    pub fn set_content(
        document_hash: DocumentHash,
        section: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            document_hash,
            edit: DocumentEdit::SetContent {
                section: section.into(),
                content: content.into(),
            },
        }
    }

    pub fn add_section(document_hash: DocumentHash, section: Section) -> Self {
        Self {
            document_hash,
            edit: DocumentEdit::AddSection(section),
        }
    }
}

/// Result of a stored edit.
#[derive(Debug, Clone)]
pub struct EditDocumentResult {
    /// The stored successor.
    pub document_hash: DocumentHash,
    /// The entry it supersedes.
    pub previous_hash: DocumentHash,
}

#[derive(Debug, Clone, Error)]
pub enum EditDocumentError {
    #[error("Document not found: {0}")]
    DocumentNotFound(DocumentHash),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

pub struct EditDocumentHandler {
    ledger: Arc<dyn DocumentLedger>,
    event_publisher: Arc<dyn EventPublisher>,
    process_root: ProcessRoot,
}

impl EditDocumentHandler {
    pub fn new(
        ledger: Arc<dyn DocumentLedger>,
        event_publisher: Arc<dyn EventPublisher>,
        process_root: ProcessRoot,
    ) -> Self {
        Self {
            ledger,
            event_publisher,
            process_root,
        }
    }

    pub async fn handle(
        &self,
        cmd: EditDocumentCommand,
        metadata: CommandMetadata,
    ) -> Result<EditDocumentResult, EditDocumentError> {
        let agent = &metadata.agent_id;

        // 1. Load the entry being edited
        let record = self
            .ledger
            .get_document(&cmd.document_hash)
            .await?
            .ok_or_else(|| EditDocumentError::DocumentNotFound(cmd.document_hash.clone()))?;
        let current = record.document;

        // 2. Apply the edit under the lifecycle rules
        let (successor, section_name) = match cmd.edit {
            DocumentEdit::SetContent { section, content } => {
                if current.get_section(&section).is_none() {
                    return Err(DocumentError::UnknownSection(section).into());
                }
                if !current.is_editable(&section, &self.process_root) {
                    return Err(DocumentError::NotEditable {
                        section,
                        state: current.state().to_string(),
                    }
                    .into());
                }
                (current.with_section_content(&section, content)?, section)
            }
            DocumentEdit::AddSection(section) => {
                if !current.can_add_section() {
                    return Err(DocumentError::CannotAddSection(current.state().to_string()).into());
                }
                let name = section.name().to_string();
                let mut next = current.successor();
                next.append_sections(vec![section])?;
                (next, name)
            }
        };
        let added = current.get_section(&section_name).is_none();

        // 3. Store the successor
        let document_hash = self
            .ledger
            .update_document(
                UpdateDocument {
                    hash: cmd.document_hash.clone(),
                    path: record.path.clone(),
                    document: successor.with_editor(agent.clone()),
                },
                agent,
            )
            .await?;
        info!(previous = %cmd.document_hash, document = %document_hash, section = %section_name, added, "document edited");

        // 4. Publish event
        let envelope = if added {
            SectionAdded {
                event_id: EventId::new(),
                document_hash: document_hash.clone(),
                previous_hash: cmd.document_hash.clone(),
                section: section_name,
                added_by: agent.clone(),
                added_at: Timestamp::now(),
            }
            .to_envelope()
        } else {
            DocumentUpdated {
                event_id: EventId::new(),
                document_hash: document_hash.clone(),
                previous_hash: cmd.document_hash.clone(),
                path: record.path,
                sections: vec![section_name],
                updated_by: agent.clone(),
                updated_at: Timestamp::now(),
            }
            .to_envelope()
        };
        self.publish(envelope, &metadata).await?;

        Ok(EditDocumentResult {
            document_hash,
            previous_hash: cmd.document_hash,
        })
    }

    async fn publish(
        &self,
        envelope: EventEnvelope,
        metadata: &CommandMetadata,
    ) -> Result<(), DomainError> {
        let envelope = envelope
            .with_correlation_id(metadata.correlation_id())
            .with_agent_id(metadata.agent_id.to_string());
        self.event_publisher.publish(envelope).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{agent, metadata, World};
    use crate::domain::document::SectionType;
    use crate::domain::foundation::ErrorCode;

    fn handler(world: &World) -> EditDocumentHandler {
        EditDocumentHandler::new(world.ledger.clone(), world.bus.clone(), ProcessRoot::default())
    }

    fn refine_section(name: &str) -> Section {
        Section::new(name, SectionType::Process, "text/markdown")
            .unwrap()
            .with_source("root.proc.refine.review", None)
    }

    #[tokio::test]
    async fn anything_is_editable_while_defining() {
        let world = World::new("define", vec![Section::markdown("body", "").unwrap()]).await;

        let result = handler(&world)
            .handle(
                EditDocumentCommand::set_content(world.document.clone(), "body", "drafted"),
                metadata("alice"),
            )
            .await
            .unwrap();

        let doc = world.stored(&result.document_hash).await;
        assert_eq!(doc.get_section("body").unwrap().content(), "drafted");
        assert!(doc.editors().contains(&agent("alice")));
        assert!(world.bus.has_event("document.updated.v1"));
    }

    #[tokio::test]
    async fn only_current_phase_sections_are_editable() {
        let world = World::new(
            "refine",
            vec![Section::markdown("body", "text").unwrap(), refine_section("review")],
        )
        .await;

        let err = handler(&world)
            .handle(
                EditDocumentCommand::set_content(world.document.clone(), "body", "changed"),
                metadata("alice"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EditDocumentError::Document(DocumentError::NotEditable { .. })));

        handler(&world)
            .handle(
                EditDocumentCommand::set_content(world.document.clone(), "review", "looks good"),
                metadata("alice"),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn sections_cannot_be_added_in_align() {
        let world = World::new("align", vec![Section::markdown("body", "text").unwrap()]).await;
        let err = handler(&world)
            .handle(
                EditDocumentCommand::add_section(
                    world.document.clone(),
                    Section::markdown("extra", "").unwrap(),
                ),
                metadata("alice"),
            )
            .await
            .unwrap_err();
        let domain: DomainError = match err {
            EditDocumentError::Document(inner) => inner.into(),
            other => panic!("unexpected error: {other}"),
        };
        assert_eq!(domain.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn add_section_publishes_section_added() {
        let world = World::new("refine", vec![Section::markdown("body", "text").unwrap()]).await;
        let result = handler(&world)
            .handle(
                EditDocumentCommand::add_section(
                    world.document.clone(),
                    Section::markdown("notes", "more").unwrap(),
                ),
                metadata("alice"),
            )
            .await
            .unwrap();

        let doc = world.stored(&result.document_hash).await;
        assert_eq!(doc.sections().len(), 2);
        assert!(world.bus.has_event("document.section_added.v1"));
        assert_eq!(result.previous_hash, world.document);
    }

    #[tokio::test]
    async fn duplicate_section_is_rejected() {
        let world = World::new("define", vec![Section::markdown("body", "text").unwrap()]).await;
        let err = handler(&world)
            .handle(
                EditDocumentCommand::add_section(
                    world.document.clone(),
                    Section::markdown("body", "again").unwrap(),
                ),
                metadata("alice"),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EditDocumentError::Document(DocumentError::DuplicateSection(_))
        ));
    }

    #[tokio::test]
    async fn later_edit_of_same_entry_wins_as_new_branch() {
        let world = World::new("define", vec![Section::markdown("body", "").unwrap()]).await;
        let first = handler(&world)
            .handle(
                EditDocumentCommand::set_content(world.document.clone(), "body", "one"),
                metadata("alice"),
            )
            .await
            .unwrap();
        let second = handler(&world)
            .handle(
                EditDocumentCommand::set_content(world.document.clone(), "body", "two"),
                metadata("bob"),
            )
            .await
            .unwrap();

        assert_ne!(first.document_hash, second.document_hash);
        let old = world.ledger.get_document(&world.document).await.unwrap().unwrap();
        assert_eq!(old.updated_by, vec![first.document_hash, second.document_hash]);
    }
}
