use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::domain::document::{net_by_author, states, Document, Mark, MarkType};
use crate::domain::foundation::AgentId;

use super::{ControlKind, Task, TaskContext};

pub const VOTE_FOR: &str = "approve";
pub const VOTE_AGAINST: &str = "reject";

/// Open voting during alignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingControl {
    #[serde(default)]
    pub enabled: bool,
}

/// Votes bucketed by each author's net sign. Every author lands in
/// exactly one bucket however many marks they submitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub for_votes: usize,
    pub against: usize,
    pub abstain: usize,
}

impl VoteTally {
    pub fn voters(&self) -> usize {
        self.for_votes + self.against + self.abstain
    }

    pub fn is_carried(&self) -> bool {
        self.for_votes > self.against
    }
}

impl VotingControl {
    pub fn can_do(&self, _agent: &AgentId, doc: &Document) -> bool {
        self.enabled && doc.state() == states::ALIGN
    }

    pub fn tally(&self, marks: &[Mark]) -> VoteTally {
        net_by_author(marks, MarkType::Vote, VOTE_FOR, VOTE_AGAINST)
            .values()
            .fold(VoteTally::default(), |mut tally, net| {
                match net.cmp(&0) {
                    Ordering::Greater => tally.for_votes += 1,
                    Ordering::Less => tally.against += 1,
                    Ordering::Equal => tally.abstain += 1,
                }
                tally
            })
    }

    pub fn tasks(&self, ctx: &TaskContext<'_>) -> Vec<Task> {
        if !self.enabled || ctx.document.state() != states::ALIGN {
            return Vec::new();
        }
        let tally = self.tally(ctx.document.marks());
        vec![Task::new(
            ControlKind::Voting,
            format!(
                "voting open: {} for, {} against, {} abstaining",
                tally.for_votes, tally.against, tally.abstain
            ),
            tally.voters(),
        )]
    }
}
