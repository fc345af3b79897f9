//! GetDocumentOverviewHandler - Query handler for everything a document
//! view shows besides the text.
//!
//! Progress and stats, outstanding control tasks, the comments with their
//! overlap flags, and which transitions the asking agent is offered.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

use crate::application::handlers::ledger_reads::{comments_on, live_unit};
use crate::domain::annotation::{has_conflict, Anchored};
use crate::domain::comment::{Comment, ExcerptPolicy};
use crate::domain::control::{ControlKind, Task, TaskContext};
use crate::domain::document::{Document, DocumentStats, ProcessRoot, Progress};
use crate::domain::foundation::{AgentId, CommentStatus, DocumentHash, DomainError};
use crate::domain::unit::offered_transitions;
use crate::ports::{DocumentLedger, UnitRegistry};

#[derive(Debug, Clone)]
pub struct GetDocumentOverviewQuery {
    pub document_hash: DocumentHash,
    /// The agent the view is rendered for.
    pub viewer: AgentId,
}

/// One comment as listed beside its section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentSummary {
    pub hash: DocumentHash,
    pub section: String,
    /// `None` when the stored offsets are malformed.
    pub start_offset: Option<usize>,
    pub end_offset: Option<usize>,
    /// The commented text, pruned for display. `None` when it cannot be
    /// read back from the document.
    pub excerpt: Option<String>,
    pub status: CommentStatus,
    pub has_suggestion: bool,
    /// Overlaps another pending comment, so it can only be resolved jointly.
    pub overlaps: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentOverview {
    pub document_hash: DocumentHash,
    pub state: String,
    /// Entry is neither superseded nor deleted.
    pub live: bool,
    pub progress: Progress,
    pub stats: DocumentStats,
    pub controls: Vec<ControlKind>,
    pub tasks: Vec<Task>,
    pub comments: Vec<CommentSummary>,
    pub editable_sections: Vec<String>,
    pub can_add_section: bool,
    pub transitions: Vec<String>,
}

#[derive(Debug, Clone, Error)]
pub enum GetDocumentOverviewError {
    #[error("Document not found: {0}")]
    DocumentNotFound(DocumentHash),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

pub struct GetDocumentOverviewHandler {
    ledger: Arc<dyn DocumentLedger>,
    registry: Arc<dyn UnitRegistry>,
    process_root: ProcessRoot,
    excerpts: ExcerptPolicy,
}

impl GetDocumentOverviewHandler {
    pub fn new(
        ledger: Arc<dyn DocumentLedger>,
        registry: Arc<dyn UnitRegistry>,
        process_root: ProcessRoot,
    ) -> Self {
        Self {
            ledger,
            registry,
            process_root,
            excerpts: ExcerptPolicy::default(),
        }
    }

    pub fn with_excerpt_policy(mut self, excerpts: ExcerptPolicy) -> Self {
        self.excerpts = excerpts;
        self
    }

    pub async fn handle(
        &self,
        query: GetDocumentOverviewQuery,
    ) -> Result<DocumentOverview, GetDocumentOverviewError> {
        let record = self
            .ledger
            .get_document(&query.document_hash)
            .await?
            .ok_or_else(|| GetDocumentOverviewError::DocumentNotFound(query.document_hash.clone()))?;
        let live = record.is_live();
        let document = record.document;

        let comments = comments_on(self.ledger.as_ref(), &query.document_hash).await?;
        let summaries = summarize(&comments, &document, &self.excerpts);
        let pending = comments.iter().filter(|c| c.status().is_pending()).count();

        let ctx = TaskContext {
            document: &document,
            pending_comments: pending,
        };
        let controls = document.controls();
        let tasks = controls.iter().flat_map(|c| c.tasks(&ctx)).collect();

        let stats = document.stats();
        let transitions = if live {
            match live_unit(self.registry.as_ref(), document.unit_hash()).await? {
                Some(unit) => offered_transitions(&unit.unit, &query.viewer, &unit.state, &stats),
                None => Vec::new(),
            }
        } else {
            Vec::new()
        };

        Ok(DocumentOverview {
            document_hash: query.document_hash,
            state: document.state().to_string(),
            live,
            progress: document.progress(&self.process_root),
            stats,
            controls: controls.iter().map(|c| c.kind()).collect(),
            tasks,
            comments: summaries,
            editable_sections: document
                .sections()
                .iter()
                .filter(|s| document.is_editable(s.name(), &self.process_root))
                .map(|s| s.name().to_string())
                .collect(),
            can_add_section: document.can_add_section(),
            transitions,
        })
    }
}

/// Summaries in offset order. Overlaps are judged among the comments on
/// the same section only.
fn summarize(
    comments: &[Comment],
    document: &Document,
    excerpts: &ExcerptPolicy,
) -> Vec<CommentSummary> {
    let mut by_section: BTreeMap<&str, Vec<Comment>> = BTreeMap::new();
    for comment in comments {
        by_section
            .entry(comment.section_name())
            .or_default()
            .push(comment.clone());
    }

    comments
        .iter()
        .filter_map(|c| {
            let hash = c.hash()?.clone();
            let siblings = by_section.get(c.section_name())?;
            let index = siblings.iter().position(|s| s.hash() == Some(&hash))?;
            let range = Anchored::range(c).ok();
            Some(CommentSummary {
                section: c.section_name().to_string(),
                start_offset: range.map(|r| r.start()),
                end_offset: range.map(|r| r.end()),
                excerpt: c.commenting_on_text(document, Some(excerpts)).ok(),
                status: c.status(),
                has_suggestion: c.suggestion().is_some(),
                overlaps: has_conflict(index, siblings),
                hash,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{agent, metadata, World};
    use crate::application::handlers::unit::{UnitChange, UpdateUnitCommand, UpdateUnitHandler};
    use crate::domain::document::{MarkRequest, MarkType, Section};
    use std::collections::BTreeSet;

    fn handler(world: &World) -> GetDocumentOverviewHandler {
        GetDocumentOverviewHandler::new(
            world.ledger.clone(),
            world.ledger.clone(),
            ProcessRoot::default(),
        )
    }

    fn query(world: &World, viewer: &str) -> GetDocumentOverviewQuery {
        GetDocumentOverviewQuery {
            document_hash: world.document.clone(),
            viewer: agent(viewer),
        }
    }

    #[tokio::test]
    async fn reports_tasks_and_overlaps() {
        let world = World::refining("The quick brown fox").await;
        let a = world.comment("bob", 4, 9, Some("slow")).await;
        let b = world.comment("carol", 9, 15, Some("x")).await;
        let c = world.comment("dave", 16, 19, Some("cat")).await;

        let overview = handler(&world).handle(query(&world, "alice")).await.unwrap();

        assert_eq!(overview.state, "refine");
        assert!(overview.live);
        assert_eq!(overview.controls, vec![ControlKind::Comments]);
        assert_eq!(overview.tasks.len(), 1);
        assert_eq!(overview.tasks[0].count, 3);

        let flag = |hash: &DocumentHash| {
            overview
                .comments
                .iter()
                .find(|s| &s.hash == hash)
                .map(|s| s.overlaps)
                .unwrap()
        };
        assert!(flag(&a));
        assert!(flag(&b));
        assert!(!flag(&c));
    }

    #[tokio::test]
    async fn long_excerpts_are_pruned() {
        let world = World::refining("abcdefghijklmnopqrstuvwxyz").await;
        world.comment("bob", 2, 20, None).await;

        let overview = handler(&world)
            .with_excerpt_policy(ExcerptPolicy { threshold: 10, keep: 3 })
            .handle(query(&world, "alice"))
            .await
            .unwrap();
        assert_eq!(overview.comments[0].excerpt.as_deref(), Some("cde...rst"));
    }

    #[tokio::test]
    async fn transitions_offered_to_stewards_only() {
        let world = World::new("define", vec![Section::markdown("body", "done").unwrap()]).await;

        let steward = handler(&world).handle(query(&world, "alice")).await.unwrap();
        assert_eq!(steward.transitions, vec!["refine", "_defunct"]);
        assert_eq!(steward.progress.total, 2);
        assert_eq!(steward.progress.count, 1);
        assert!(steward.can_add_section);

        let other = handler(&world).handle(query(&world, "bob")).await.unwrap();
        assert!(other.transitions.is_empty());
    }

    #[tokio::test]
    async fn transitions_follow_the_live_unit() {
        let world = World::new("define", vec![Section::markdown("body", "done").unwrap()]).await;
        UpdateUnitHandler::new(world.ledger.clone(), world.bus.clone())
            .handle(
                UpdateUnitCommand {
                    unit_hash: world.unit.clone(),
                    change: UnitChange::Stewards(BTreeSet::from([agent("carol")])),
                },
                metadata("alice"),
            )
            .await
            .unwrap();

        let former = handler(&world).handle(query(&world, "alice")).await.unwrap();
        assert!(former.transitions.is_empty());

        let current = handler(&world).handle(query(&world, "carol")).await.unwrap();
        assert_eq!(current.transitions, vec!["refine", "_defunct"]);
    }

    #[tokio::test]
    async fn empty_sections_block_transitions() {
        let world = World::new(
            "define",
            vec![
                Section::markdown("body", "done").unwrap(),
                Section::markdown("summary", "").unwrap(),
            ],
        )
        .await;
        let overview = handler(&world).handle(query(&world, "alice")).await.unwrap();
        assert_eq!(overview.stats.empty_sections, 1);
        assert!(overview.transitions.is_empty());
    }

    #[tokio::test]
    async fn decided_comments_are_not_flagged() {
        let world = World::refining("The quick brown fox").await;
        let a = world.comment("bob", 4, 9, Some("slow")).await;
        let b = world.comment("carol", 6, 12, None).await;
        world
            .ledger
            .mark_document(
                vec![MarkRequest::new(b.clone(), MarkType::CommentStatus, "rejected")],
                &agent("alice"),
            )
            .await
            .unwrap();

        let overview = handler(&world).handle(query(&world, "alice")).await.unwrap();
        assert!(overview.comments.iter().all(|s| !s.overlaps));
        let summary = overview.comments.iter().find(|s| s.hash == a).unwrap();
        assert_eq!(summary.start_offset, Some(4));
        assert_eq!(summary.excerpt.as_deref(), Some("quick"));
        assert_eq!(overview.tasks[0].count, 1);
    }
}
