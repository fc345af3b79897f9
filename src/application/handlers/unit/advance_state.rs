//! AdvanceStateHandler - moves a unit along its transition table.
//!
//! Every check runs before the registry is called: the unit hash must be
//! the live one, the transition must be in the table, the agent must
//! steward the unit, and the current document must have no empty
//! sections. The registry re-checks on its side.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::application::handlers::ledger_reads::current_document;
use crate::domain::document::ProcessRoot;
use crate::domain::foundation::{
    CommandMetadata, DocumentHash, DomainError, EventId, SerializableDomainEvent, Timestamp,
    UnitHash,
};
use crate::domain::unit::{plan_advance, Template, Unit, UnitError, UnitStateAdvanced};
use crate::ports::{AdvanceState, DocumentLedger, DocumentRecord, EventPublisher, UnitRegistry};

/// Command to move a unit to its next lifecycle state.
#[derive(Debug, Clone)]
pub struct AdvanceStateCommand {
    /// The live hash of the unit to advance.
    pub unit_hash: UnitHash,
    /// Target state; must follow the unit's current state in its table.
    pub new_state: String,
}

/// Result of a successful advance.
#[derive(Debug, Clone)]
pub struct AdvanceStateResult {
    /// The unit's new current document, in `new_state`.
    pub document_hash: DocumentHash,
    /// The event that was published.
    pub event: UnitStateAdvanced,
}

#[derive(Debug, Clone, Error)]
pub enum AdvanceStateError {
    #[error("Unit not found: {0}")]
    UnitNotFound(UnitHash),

    /// An update stored a successor; its stewards and state are the ones
    /// that count.
    #[error("Unit {0} has been superseded")]
    Superseded(UnitHash),

    #[error("No current document at {0}")]
    DocumentNotFound(String),

    #[error(transparent)]
    Unit(#[from] UnitError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

pub struct AdvanceStateHandler {
    ledger: Arc<dyn DocumentLedger>,
    registry: Arc<dyn UnitRegistry>,
    event_publisher: Arc<dyn EventPublisher>,
    process_root: ProcessRoot,
}

impl AdvanceStateHandler {
    pub fn new(
        ledger: Arc<dyn DocumentLedger>,
        registry: Arc<dyn UnitRegistry>,
        event_publisher: Arc<dyn EventPublisher>,
        process_root: ProcessRoot,
    ) -> Self {
        Self {
            ledger,
            registry,
            event_publisher,
            process_root,
        }
    }

    pub async fn handle(
        &self,
        cmd: AdvanceStateCommand,
        metadata: CommandMetadata,
    ) -> Result<AdvanceStateResult, AdvanceStateError> {
        let agent = &metadata.agent_id;

        // 1. Load the unit and its current document
        let unit = self
            .registry
            .get_unit(&cmd.unit_hash)
            .await?
            .ok_or_else(|| AdvanceStateError::UnitNotFound(cmd.unit_hash.clone()))?;
        if !unit.is_live() {
            return Err(AdvanceStateError::Superseded(cmd.unit_hash));
        }
        let path = unit.unit.path();
        let current = current_document(self.ledger.as_ref(), &path)
            .await?
            .ok_or_else(|| AdvanceStateError::DocumentNotFound(path.clone()))?;

        // 2. Load the process templates for the new state
        let records = self.template_records(&unit.unit, &cmd.new_state).await?;
        let templates: Vec<Template<'_>> = records
            .iter()
            .map(|(path, record)| Template {
                path: path.as_str(),
                document: &record.document,
            })
            .collect();

        // 3. Validate and build the new document
        let from_state = current.document.state().to_string();
        let document = plan_advance(
            &unit.unit,
            agent,
            &current.document,
            &cmd.new_state,
            &self.process_root,
            &templates,
        )?
        .with_editor(agent.clone());

        // 4. Record the transition
        let document_hash = self
            .registry
            .advance_state(
                AdvanceState {
                    new_state: cmd.new_state.clone(),
                    unit_hash: cmd.unit_hash.clone(),
                    document_hash: current.hash.clone(),
                    document,
                },
                agent,
            )
            .await?;
        info!(unit = %cmd.unit_hash, from = %from_state, to = %cmd.new_state, document = %document_hash, "state advanced");

        // 5. Publish event
        let event = UnitStateAdvanced {
            event_id: EventId::new(),
            unit_hash: cmd.unit_hash,
            document_hash: document_hash.clone(),
            from_state,
            to_state: cmd.new_state,
            advanced_by: agent.clone(),
            advanced_at: Timestamp::now(),
        };
        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_agent_id(agent.to_string());
        self.event_publisher.publish(envelope).await?;

        Ok(AdvanceStateResult {
            document_hash,
            event,
        })
    }

    /// Current template documents along the new state's process lineage.
    async fn template_records(
        &self,
        unit: &Unit,
        new_state: &str,
    ) -> Result<Vec<(String, DocumentRecord)>, DomainError> {
        let Some(process_path) = unit.process_path(&self.process_root, new_state) else {
            return Ok(Vec::new());
        };
        let mut records = Vec::new();
        for node in self.process_root.template_lineage(&process_path) {
            match current_document(self.ledger.as_ref(), &node).await? {
                Some(record) => records.push((node, record)),
                None => debug!(template = %node, "no template document"),
            }
        }
        Ok(records)
    }
}
