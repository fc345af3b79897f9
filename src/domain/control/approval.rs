use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::warn;

use crate::domain::document::{net_by_author, Document, MarkType};
use crate::domain::foundation::{AgentId, Percentage};

use super::{ControlKind, Task, TaskContext};

pub const APPROVE: &str = "approve";
pub const RETRACT: &str = "retract";

/// Threshold approval by a named set of agents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalControl {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub threshold: Percentage,
    /// Section whose content is a JSON array of eligible agent ids.
    #[serde(default)]
    pub agents_section_name: String,
}

/// Eligible approvers split by their current net approval.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApprovalStatus {
    pub approved: BTreeSet<AgentId>,
    pub pending: BTreeSet<AgentId>,
}

impl ApprovalStatus {
    pub fn eligible(&self) -> usize {
        self.approved.len() + self.pending.len()
    }
}

impl ApprovalControl {
    /// Parses the eligible approvers. An unreadable section yields nobody.
    pub fn eligible_agents(&self, doc: &Document) -> BTreeSet<AgentId> {
        let Some(section) = doc.get_section(&self.agents_section_name) else {
            return BTreeSet::new();
        };
        if section.is_empty() {
            return BTreeSet::new();
        }
        match serde_json::from_str::<Vec<AgentId>>(section.content()) {
            Ok(agents) => agents.into_iter().collect(),
            Err(err) => {
                warn!(
                    section = %self.agents_section_name,
                    error = %err,
                    "approver list is not a JSON array of agent ids"
                );
                BTreeSet::new()
            }
        }
    }

    pub fn can_do(&self, agent: &AgentId, doc: &Document) -> bool {
        self.eligible_agents(doc).contains(agent)
    }

    /// Approve counts +1 and retract -1 per author; net <= 0 is pending.
    /// Marks from agents outside the eligible set are ignored.
    pub fn status(&self, doc: &Document) -> ApprovalStatus {
        let nets = net_by_author(doc.marks(), MarkType::Approval, APPROVE, RETRACT);
        let mut status = ApprovalStatus::default();
        for agent in self.eligible_agents(doc) {
            if nets.get(&agent).copied().unwrap_or(0) > 0 {
                status.approved.insert(agent);
            } else {
                status.pending.insert(agent);
            }
        }
        status
    }

    pub fn threshold_met(&self, doc: &Document) -> bool {
        let status = self.status(doc);
        self.threshold
            .is_reached_by(status.approved.len(), status.eligible())
    }

    pub fn tasks(&self, ctx: &TaskContext<'_>) -> Vec<Task> {
        let status = self.status(ctx.document);
        if status.pending.is_empty() || self.threshold_met(ctx.document) {
            return Vec::new();
        }
        vec![Task::new(
            ControlKind::Approval,
            format!(
                "{} of {} approvals outstanding ({} required)",
                status.pending.len(),
                status.eligible(),
                self.threshold
            ),
            status.pending.len(),
        )]
    }
}
