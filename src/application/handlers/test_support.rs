//! Shared fixtures for handler tests.

use std::sync::Arc;

use crate::adapters::{InMemoryEventBus, InMemoryLedger};
use crate::domain::annotation::{HilightRange, TextRange};
use crate::domain::comment::CommentDraft;
use crate::domain::document::{Document, DocumentType, Section, SectionType};
use crate::domain::foundation::{AgentId, CommandMetadata, DocumentHash, UnitHash};
use crate::domain::unit::{ProcessRef, Unit};
use crate::ports::{DocumentLedger, UnitRegistry, UpdateDocument};

pub(crate) const UNIT_PATH: &str = "std.core";

pub(crate) fn agent(name: &str) -> AgentId {
    AgentId::new(name).unwrap()
}

pub(crate) fn metadata(name: &str) -> CommandMetadata {
    CommandMetadata::new(agent(name)).with_correlation_id("corr-1")
}

pub(crate) fn control(name: &str, content_type: &str, state: &str) -> Section {
    Section::new(name, SectionType::Process, content_type)
        .unwrap()
        .with_content(state)
}

pub(crate) fn comments_enabled() -> Section {
    control("comments", "control/comments", r#"{"enabled":true}"#)
}

/// A unit `std.core` stewarded by alice plus one stored document.
pub(crate) struct World {
    pub ledger: Arc<InMemoryLedger>,
    pub bus: Arc<InMemoryEventBus>,
    pub unit: UnitHash,
    pub document: DocumentHash,
}

impl World {
    pub(crate) async fn new(state: &str, sections: Vec<Section>) -> Self {
        let ledger = Arc::new(InMemoryLedger::new());
        let unit = Unit::new("core", "Core")
            .unwrap()
            .with_parent("std")
            .with_steward(agent("alice"))
            .with_process(ProcessRef::new("align", "vote"));
        let unit_hash = ledger.create_unit(unit, &agent("alice")).await.unwrap();
        let document = Document::new(unit_hash.clone(), DocumentType::Document, state)
            .with_sections(sections)
            .unwrap();
        let document = ledger
            .create_document(UNIT_PATH, document, &agent("alice"))
            .await
            .unwrap();
        Self {
            ledger,
            bus: Arc::new(InMemoryEventBus::new()),
            unit: unit_hash,
            document,
        }
    }

    /// A refine-state document with an enabled comments control and a
    /// `body` section holding `text`.
    pub(crate) async fn refining(text: &str) -> Self {
        Self::new(
            "refine",
            vec![Section::markdown("body", text).unwrap(), comments_enabled()],
        )
        .await
    }

    pub(crate) async fn stored(&self, hash: &DocumentHash) -> Document {
        self.ledger.get_document(hash).await.unwrap().unwrap().document
    }

    /// Stores an unchanged successor of the fixture document, leaving
    /// `self.document` superseded.
    pub(crate) async fn supersede(&self) -> DocumentHash {
        let successor = self.stored(&self.document).await.successor();
        self.ledger
            .update_document(
                UpdateDocument {
                    hash: self.document.clone(),
                    path: UNIT_PATH.to_string(),
                    document: successor,
                },
                &agent("alice"),
            )
            .await
            .unwrap()
    }

    /// Stores a comment on `body` directly, bypassing the handler.
    pub(crate) async fn comment(
        &self,
        author: &str,
        start: usize,
        end: usize,
        suggestion: Option<&str>,
    ) -> DocumentHash {
        let target = self.stored(&self.document).await;
        let mut draft = CommentDraft::new(
            &target,
            HilightRange::new("body", TextRange::new(start, end).unwrap()),
        )
        .unwrap()
        .with_comment("see suggestion");
        if let Some(text) = suggestion {
            draft = draft.with_suggestion(text);
        }
        let doc = draft.into_document(&agent(author)).unwrap();
        self.ledger
            .create_document(UNIT_PATH, doc, &agent(author))
            .await
            .unwrap()
    }
}
