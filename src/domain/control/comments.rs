use serde::{Deserialize, Serialize};

use crate::domain::document::{states, Document};
use crate::domain::foundation::AgentId;

use super::{ControlKind, Task, TaskContext};

/// Gates the commenting affordance for a whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentsControl {
    #[serde(default)]
    pub enabled: bool,
}

impl CommentsControl {
    pub fn can_do(&self, _agent: &AgentId, doc: &Document) -> bool {
        self.enabled && doc.state() == states::REFINE
    }

    pub fn tasks(&self, ctx: &TaskContext<'_>) -> Vec<Task> {
        if !self.enabled || ctx.document.state() != states::REFINE || ctx.pending_comments == 0 {
            return Vec::new();
        }
        vec![Task::new(
            ControlKind::Comments,
            format!("{} comments need addressing", ctx.pending_comments),
            ctx.pending_comments,
        )]
    }
}
