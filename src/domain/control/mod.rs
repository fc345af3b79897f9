//! Control policy engine.
//!
//! A control is a section whose content type is one of `control/comments`,
//! `control/voting` or `control/approval` and whose content is a JSON state
//! record. Controls gate actions for an agent on a document independently
//! of the unit state machine.
//!
//! Unreadable control state falls back to the control's default, which is
//! disabled, rather than failing the caller.

mod approval;
mod comments;
mod events;
mod voting;

pub use approval::{ApprovalControl, ApprovalStatus, APPROVE, RETRACT};
pub use comments::CommentsControl;
pub use events::ControlMarked;
pub use voting::{VoteTally, VotingControl, VOTE_AGAINST, VOTE_FOR};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::warn;

use crate::domain::document::{Document, MarkRequest, MarkType, Section};
use crate::domain::foundation::{AgentId, DomainError, ErrorCode};

// ════════════════════════════════════════════════════════════════════════════════
// Kinds and tasks
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    Comments,
    Voting,
    Approval,
}

impl ControlKind {
    pub fn content_type(&self) -> &'static str {
        match self {
            ControlKind::Comments => "control/comments",
            ControlKind::Voting => "control/voting",
            ControlKind::Approval => "control/approval",
        }
    }

    pub fn from_content_type(content_type: &str) -> Option<Self> {
        match content_type {
            "control/comments" => Some(ControlKind::Comments),
            "control/voting" => Some(ControlKind::Voting),
            "control/approval" => Some(ControlKind::Approval),
            _ => None,
        }
    }
}

impl fmt::Display for ControlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.content_type())
    }
}

/// An outstanding-work indicator. Reporting only; never gates anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub control: ControlKind,
    pub description: String,
    pub count: usize,
}

impl Task {
    pub fn new(control: ControlKind, description: impl Into<String>, count: usize) -> Self {
        Self {
            control,
            description: description.into(),
            count,
        }
    }
}

/// What a control needs to know to report tasks.
#[derive(Debug, Clone, Copy)]
pub struct TaskContext<'a> {
    pub document: &'a Document,
    /// Pending comments targeting the document.
    pub pending_comments: usize,
}

// ════════════════════════════════════════════════════════════════════════════════
// Actions
// ════════════════════════════════════════════════════════════════════════════════

/// A mark-producing action taken through a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlAction {
    VoteFor,
    VoteAgainst,
    Approve,
    Retract,
}

impl ControlAction {
    pub fn kind(&self) -> ControlKind {
        match self {
            ControlAction::VoteFor | ControlAction::VoteAgainst => ControlKind::Voting,
            ControlAction::Approve | ControlAction::Retract => ControlKind::Approval,
        }
    }

    pub fn mark_type(&self) -> MarkType {
        match self.kind() {
            ControlKind::Approval => MarkType::Approval,
            _ => MarkType::Vote,
        }
    }

    pub fn mark_value(&self) -> &'static str {
        match self {
            ControlAction::VoteFor => VOTE_FOR,
            ControlAction::VoteAgainst => VOTE_AGAINST,
            ControlAction::Approve => APPROVE,
            ControlAction::Retract => RETRACT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlError {
    #[error("Document has no {0} control")]
    Missing(ControlKind),

    #[error("Agent {agent} may not act through {control} in state '{state}'")]
    NotPermitted {
        agent: AgentId,
        control: ControlKind,
        state: String,
    },

    #[error("Document has not been persisted")]
    Unpersisted,
}

impl From<ControlError> for DomainError {
    fn from(err: ControlError) -> Self {
        let code = match &err {
            ControlError::Missing(_) => ErrorCode::UnknownSection,
            ControlError::NotPermitted { .. } => ErrorCode::Forbidden,
            ControlError::Unpersisted => ErrorCode::DocumentNotFound,
        };
        DomainError::new(code, err.to_string())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Control
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    Comments(CommentsControl),
    Voting(VotingControl),
    Approval(ApprovalControl),
}

impl Control {
    /// Instantiates the control a section declares, if any.
    pub fn from_section(section: &Section) -> Option<Control> {
        let control = match ControlKind::from_content_type(section.content_type())? {
            ControlKind::Comments => Control::Comments(parse_state(section)),
            ControlKind::Voting => Control::Voting(parse_state(section)),
            ControlKind::Approval => Control::Approval(parse_state(section)),
        };
        Some(control)
    }

    pub fn kind(&self) -> ControlKind {
        match self {
            Control::Comments(_) => ControlKind::Comments,
            Control::Voting(_) => ControlKind::Voting,
            Control::Approval(_) => ControlKind::Approval,
        }
    }

    pub fn is_enabled(&self) -> bool {
        match self {
            Control::Comments(c) => c.enabled,
            Control::Voting(c) => c.enabled,
            Control::Approval(c) => c.enabled,
        }
    }

    pub fn can_do(&self, agent: &AgentId, doc: &Document) -> bool {
        match self {
            Control::Comments(c) => c.can_do(agent, doc),
            Control::Voting(c) => c.can_do(agent, doc),
            Control::Approval(c) => c.can_do(agent, doc),
        }
    }

    pub fn tasks(&self, ctx: &TaskContext<'_>) -> Vec<Task> {
        match self {
            Control::Comments(c) => c.tasks(ctx),
            Control::Voting(c) => c.tasks(ctx),
            Control::Approval(c) => c.tasks(ctx),
        }
    }

    /// Serialized state record for storing back into a section.
    pub fn state_json(&self) -> Result<String, serde_json::Error> {
        match self {
            Control::Comments(c) => serde_json::to_string(c),
            Control::Voting(c) => serde_json::to_string(c),
            Control::Approval(c) => serde_json::to_string(c),
        }
    }
}

/// Finds the document's control of `kind`.
pub fn find_control(doc: &Document, kind: ControlKind) -> Option<Control> {
    doc.controls().into_iter().find(|c| c.kind() == kind)
}

/// Builds the mark for `action`, refusing when the responsible control is
/// missing or does not permit `agent` on `doc`.
pub fn mark_request(
    doc: &Document,
    agent: &AgentId,
    action: ControlAction,
) -> Result<MarkRequest, ControlError> {
    let kind = action.kind();
    let control = find_control(doc, kind).ok_or(ControlError::Missing(kind))?;
    if !control.can_do(agent, doc) {
        return Err(ControlError::NotPermitted {
            agent: agent.clone(),
            control: kind,
            state: doc.state().to_string(),
        });
    }
    let hash = doc.document_hash().cloned().ok_or(ControlError::Unpersisted)?;
    Ok(MarkRequest::new(hash, action.mark_type(), action.mark_value()))
}

fn parse_state<T: DeserializeOwned + Default>(section: &Section) -> T {
    if section.is_empty() {
        return T::default();
    }
    serde_json::from_str(section.content()).unwrap_or_else(|err| {
        warn!(
            section = %section.name(),
            content_type = %section.content_type(),
            error = %err,
            "invalid control state, using defaults"
        );
        T::default()
    })
}
