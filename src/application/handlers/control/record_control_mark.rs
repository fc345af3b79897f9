//! RecordControlMarkHandler - votes and approvals through a document's
//! controls.

use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::domain::control::{mark_request, ControlAction, ControlError, ControlMarked};
use crate::domain::foundation::{
    ActionHash, CommandMetadata, DocumentHash, DomainError, EventId, SerializableDomainEvent,
    Timestamp,
};
use crate::ports::{DocumentLedger, EventPublisher};

/// Command to vote on, approve, or retract approval of a document.
#[derive(Debug, Clone)]
pub struct RecordControlMarkCommand {
    /// The live document entry being voted on or approved.
    pub document_hash: DocumentHash,
    /// The action; its kind picks the responsible control.
    pub action: ControlAction,
}

/// Result of a recorded control mark.
#[derive(Debug, Clone)]
pub struct RecordControlMarkResult {
    /// The ledger action that appended the mark.
    pub action_hash: ActionHash,
    /// The event that was published.
    pub event: ControlMarked,
}

#[derive(Debug, Clone, Error)]
pub enum RecordControlMarkError {
    #[error("Document not found: {0}")]
    DocumentNotFound(DocumentHash),

    /// Marks count only on the entry that is still current.
    #[error("Document {0} has been superseded")]
    Superseded(DocumentHash),

    #[error(transparent)]
    Control(#[from] ControlError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

pub struct RecordControlMarkHandler {
    ledger: Arc<dyn DocumentLedger>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl RecordControlMarkHandler {
    pub fn new(ledger: Arc<dyn DocumentLedger>, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            ledger,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: RecordControlMarkCommand,
        metadata: CommandMetadata,
    ) -> Result<RecordControlMarkResult, RecordControlMarkError> {
        let agent = &metadata.agent_id;

        // 1. Load the document with its marks
        let record = self
            .ledger
            .get_document(&cmd.document_hash)
            .await?
            .ok_or_else(|| RecordControlMarkError::DocumentNotFound(cmd.document_hash.clone()))?;
        if !record.is_live() {
            return Err(RecordControlMarkError::Superseded(cmd.document_hash));
        }

        // 2. Ask the responsible control
        let mark = mark_request(&record.document, agent, cmd.action)?;

        // 3. Record the mark
        let action_hash = self.ledger.mark_document(vec![mark], agent).await?;
        info!(document = %cmd.document_hash, action = ?cmd.action, agent = %agent, "control mark recorded");

        // 4. Publish event
        let event = ControlMarked {
            event_id: EventId::new(),
            document_hash: cmd.document_hash,
            action_hash: action_hash.clone(),
            control: cmd.action.kind(),
            action: cmd.action,
            marked_by: agent.clone(),
            marked_at: Timestamp::now(),
        };
        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_agent_id(agent.to_string());
        self.event_publisher.publish(envelope).await?;

        Ok(RecordControlMarkResult { action_hash, event })
    }
}
