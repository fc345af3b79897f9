//! CreateUnitHandler - registers a unit and stores its first document.
//!
//! The first document starts in `define` and carries empty copies of the
//! parent's Requirement and Process sections ahead of the unit's own.

use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::application::handlers::ledger_reads::current_document;
use crate::domain::document::{DocumentError, Section, SectionType};
use crate::domain::foundation::{
    CommandMetadata, DocumentHash, DomainError, EventId, SerializableDomainEvent, Timestamp,
    UnitHash,
};
use crate::domain::unit::{initial_document, Template, Unit, UnitCreated, UnitError};
use crate::ports::{DocumentLedger, EventPublisher, UnitRegistry};

/// Command to register a unit and store its first document.
#[derive(Debug, Clone)]
pub struct CreateUnitCommand {
    /// The unit to register; its parent, if any, must already exist.
    pub unit: Unit,
    /// The unit's own sections, appended after the inherited ones.
    pub sections: Vec<Section>,
}

/// Result of registering a unit.
#[derive(Debug, Clone)]
pub struct CreateUnitResult {
    /// The registered unit.
    pub unit_hash: UnitHash,
    /// Its first document, in `define`.
    pub document_hash: DocumentHash,
    /// The event that was published.
    pub event: UnitCreated,
}

#[derive(Debug, Clone, Error)]
pub enum CreateUnitError {
    #[error("Parent unit not found: {0}")]
    ParentNotFound(String),

    #[error("A unit already lives at {0}")]
    PathTaken(String),

    #[error(transparent)]
    Unit(#[from] UnitError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<DocumentError> for CreateUnitError {
    fn from(err: DocumentError) -> Self {
        CreateUnitError::Unit(err.into())
    }
}

pub struct CreateUnitHandler {
    ledger: Arc<dyn DocumentLedger>,
    registry: Arc<dyn UnitRegistry>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CreateUnitHandler {
    pub fn new(
        ledger: Arc<dyn DocumentLedger>,
        registry: Arc<dyn UnitRegistry>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            ledger,
            registry,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateUnitCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateUnitResult, CreateUnitError> {
        let agent = &metadata.agent_id;
        let path = cmd.unit.path();

        // 1. Check the tree position
        let live: Vec<String> = self
            .registry
            .get_units()
            .await?
            .into_iter()
            .filter(|u| u.is_live())
            .map(|u| u.unit.path())
            .collect();
        if live.contains(&path) {
            return Err(CreateUnitError::PathTaken(path));
        }
        let parent = match cmd.unit.parents().first() {
            Some(parent) if !live.contains(parent) => {
                return Err(CreateUnitError::ParentNotFound(parent.clone()));
            }
            Some(parent) => current_document(self.ledger.as_ref(), parent)
                .await?
                .map(|record| (parent.clone(), record)),
            None => None,
        };
        let template = parent.as_ref().map(|(path, record)| Template {
            path: path.as_str(),
            document: &record.document,
        });
        check_section_names(template, &cmd.sections)?;

        // 2. Register the unit; its creator stewards it unless told otherwise
        let unit = if cmd.unit.stewards().is_empty() {
            cmd.unit.with_steward(agent.clone())
        } else {
            cmd.unit
        };
        let unit_hash = self.registry.create_unit(unit, agent).await?;

        // 3. Store the first document
        let document = initial_document(unit_hash.clone(), template, cmd.sections)?
            .with_editor(agent.clone());
        let document_hash = self.ledger.create_document(&path, document, agent).await?;
        info!(unit = %unit_hash, document = %document_hash, %path, "unit created");

        // 4. Publish event
        let event = UnitCreated {
            event_id: EventId::new(),
            unit_hash: unit_hash.clone(),
            document_hash: document_hash.clone(),
            path,
            created_by: agent.clone(),
            created_at: Timestamp::now(),
        };
        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_agent_id(agent.to_string());
        self.event_publisher.publish(envelope).await?;

        Ok(CreateUnitResult {
            unit_hash,
            document_hash,
            event,
        })
    }
}

/// Refuses own sections that collide with each other or with an
/// inherited name, before anything is registered.
fn check_section_names(
    parent: Option<Template<'_>>,
    own: &[Section],
) -> Result<(), DocumentError> {
    let inherited = parent
        .map(|p| {
            p.document
                .inheritable_sections(&[SectionType::Requirement, SectionType::Process])
        })
        .unwrap_or_default();
    let mut seen = BTreeSet::new();
    for name in inherited.into_iter().map(Section::name).chain(own.iter().map(Section::name)) {
        if !seen.insert(name) {
            return Err(DocumentError::DuplicateSection(name.to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryEventBus, InMemoryLedger};
    use crate::application::handlers::test_support::{agent, metadata};
    use crate::domain::document::states;

    struct Fixture {
        ledger: Arc<InMemoryLedger>,
        bus: Arc<InMemoryEventBus>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                ledger: Arc::new(InMemoryLedger::new()),
                bus: Arc::new(InMemoryEventBus::new()),
            }
        }

        fn handler(&self) -> CreateUnitHandler {
            CreateUnitHandler::new(self.ledger.clone(), self.ledger.clone(), self.bus.clone())
        }

        async fn create(
            &self,
            unit: Unit,
            sections: Vec<Section>,
        ) -> Result<CreateUnitResult, CreateUnitError> {
            self.handler()
                .handle(CreateUnitCommand { unit, sections }, metadata("alice"))
                .await
        }
    }

    fn requirement(name: &str, content: &str) -> Section {
        Section::new(name, SectionType::Requirement, "text/markdown")
            .unwrap()
            .with_content(content)
    }

    #[tokio::test]
    async fn root_unit_gets_define_document() {
        let fixture = Fixture::new();
        let result = fixture
            .create(
                Unit::new("std", "Standards").unwrap(),
                vec![Section::markdown("charter", "").unwrap()],
            )
            .await
            .unwrap();

        let unit = fixture.ledger.get_unit(&result.unit_hash).await.unwrap().unwrap();
        assert_eq!(unit.state, states::DEFINE);
        assert!(unit.unit.is_steward(&agent("alice")));

        let doc = fixture.ledger.get_document(&result.document_hash).await.unwrap().unwrap();
        assert_eq!(doc.path, "std");
        assert_eq!(doc.document.state(), states::DEFINE);
        assert_eq!(doc.document.unit_hash(), &result.unit_hash);
        assert!(fixture.bus.has_event("unit.created.v1"));
    }

    #[tokio::test]
    async fn child_inherits_parent_requirements() {
        let fixture = Fixture::new();
        let parent = fixture
            .create(
                Unit::new("std", "Standards").unwrap(),
                vec![
                    Section::markdown("charter", "prose").unwrap(),
                    requirement("scope", "what it covers"),
                ],
            )
            .await
            .unwrap();

        let child = fixture
            .create(
                Unit::new("core", "Core").unwrap().with_parent("std"),
                vec![Section::markdown("body", "").unwrap()],
            )
            .await
            .unwrap();

        let doc = fixture.ledger.get_document(&child.document_hash).await.unwrap().unwrap();
        let names: Vec<&str> = doc.document.sections().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["scope", "body"]);
        let scope = doc.document.get_section("scope").unwrap();
        assert!(scope.is_empty());
        assert_eq!(scope.source_path(), "std");
        assert_eq!(scope.source_unit(), Some(&parent.unit_hash));
    }

    #[tokio::test]
    async fn unknown_parent_is_refused() {
        let fixture = Fixture::new();
        let err = fixture
            .create(Unit::new("core", "Core").unwrap().with_parent("nowhere"), vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, CreateUnitError::ParentNotFound(p) if p == "nowhere"));
        assert!(fixture.ledger.get_units().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn path_collision_is_refused() {
        let fixture = Fixture::new();
        fixture.create(Unit::new("std", "Standards").unwrap(), vec![]).await.unwrap();
        let err = fixture
            .create(Unit::new("std", "Again").unwrap(), vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, CreateUnitError::PathTaken(_)));
    }

    #[tokio::test]
    async fn clashing_section_names_register_nothing() {
        let fixture = Fixture::new();
        fixture
            .create(
                Unit::new("std", "Standards").unwrap(),
                vec![requirement("scope", "covers")],
            )
            .await
            .unwrap();

        let err = fixture
            .create(
                Unit::new("core", "Core").unwrap().with_parent("std"),
                vec![Section::markdown("scope", "mine").unwrap()],
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CreateUnitError::Unit(UnitError::Document(DocumentError::DuplicateSection(_)))
        ));
        assert_eq!(fixture.ledger.get_units().await.unwrap().len(), 1);
    }
}
