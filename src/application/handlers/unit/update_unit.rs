//! UpdateUnitHandler - steward, version and parent changes.
//!
//! A change stores a successor unit with a new hash. Only stewards of the
//! live unit may make one.

use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::domain::foundation::{
    AgentId, CommandMetadata, DomainError, EventId, SerializableDomainEvent, Timestamp, UnitHash,
    ValidationError,
};
use crate::domain::unit::{UnitError, UnitUpdated};
use crate::ports::{EventPublisher, UnitRegistry, UpdateUnit};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitChange {
    /// Replace the steward set. It may not become empty.
    Stewards(BTreeSet<AgentId>),
    /// Replace the version label.
    Version(String),
    /// Move under another unit, or to the root with `None`.
    Reparent(Option<String>),
}

/// Command to change a unit's stewards, version or parent.
#[derive(Debug, Clone)]
pub struct UpdateUnitCommand {
    /// The live hash of the unit to change.
    pub unit_hash: UnitHash,
    /// What to change.
    pub change: UnitChange,
}

/// Result of a unit update.
#[derive(Debug, Clone)]
pub struct UpdateUnitResult {
    /// The successor unit; the old hash is superseded.
    pub unit_hash: UnitHash,
    /// The event that was published.
    pub event: UnitUpdated,
}

#[derive(Debug, Clone, Error)]
pub enum UpdateUnitError {
    #[error("Unit not found: {0}")]
    UnitNotFound(UnitHash),

    #[error("Unit {0} has been superseded")]
    Superseded(UnitHash),

    #[error("Parent unit not found: {0}")]
    ParentNotFound(String),

    #[error(transparent)]
    Unit(#[from] UnitError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

pub struct UpdateUnitHandler {
    registry: Arc<dyn UnitRegistry>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl UpdateUnitHandler {
    pub fn new(registry: Arc<dyn UnitRegistry>, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            registry,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: UpdateUnitCommand,
        metadata: CommandMetadata,
    ) -> Result<UpdateUnitResult, UpdateUnitError> {
        let agent = &metadata.agent_id;

        // 1. Load the live unit and check stewardship
        let record = self
            .registry
            .get_unit(&cmd.unit_hash)
            .await?
            .ok_or_else(|| UpdateUnitError::UnitNotFound(cmd.unit_hash.clone()))?;
        if !record.is_live() {
            return Err(UpdateUnitError::Superseded(cmd.unit_hash));
        }
        if !record.unit.is_steward(agent) {
            return Err(UnitError::NotSteward(agent.clone()).into());
        }

        // 2. Build the successor
        let successor = match cmd.change {
            UnitChange::Stewards(stewards) => {
                if stewards.is_empty() {
                    return Err(UnitError::from(ValidationError::empty_field("stewards")).into());
                }
                record.unit.with_stewards(stewards)
            }
            UnitChange::Version(version) => record.unit.with_version(version),
            UnitChange::Reparent(parent) => {
                let successor = record.unit.reparent(parent.as_deref())?;
                if let Some(parent) = parent {
                    self.ensure_parent_exists(&parent).await?;
                }
                successor
            }
        };
        let path = successor.path();

        // 3. Store it
        let unit_hash = self
            .registry
            .update_unit(
                UpdateUnit {
                    hash: cmd.unit_hash.clone(),
                    unit: successor,
                },
                agent,
            )
            .await?;
        info!(previous = %cmd.unit_hash, unit = %unit_hash, %path, "unit updated");

        // 4. Publish event
        let event = UnitUpdated {
            event_id: EventId::new(),
            unit_hash: unit_hash.clone(),
            previous_hash: cmd.unit_hash,
            path,
            updated_by: agent.clone(),
            updated_at: Timestamp::now(),
        };
        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_agent_id(agent.to_string());
        self.event_publisher.publish(envelope).await?;

        Ok(UpdateUnitResult { unit_hash, event })
    }

    async fn ensure_parent_exists(&self, parent: &str) -> Result<(), UpdateUnitError> {
        let found = self
            .registry
            .get_units()
            .await?
            .iter()
            .any(|u| u.is_live() && u.unit.path() == parent);
        if found {
            Ok(())
        } else {
            Err(UpdateUnitError::ParentNotFound(parent.to_string()))
        }
    }
}
