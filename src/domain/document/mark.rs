//! Marks - append-only, author-attributed annotations attached to a
//! document by its hash.
//!
//! The mark log is owned by the ledger. The engine only ever reads it as an
//! ordered slice, in the order the ledger returned it (append order).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::foundation::{AgentId, DocumentHash, ValidationError};

/// Kind of mark. Wire values are the numeric discriminants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum MarkType {
    CommentStatus = 1,
    Vote = 2,
    Approval = 3,
}

impl TryFrom<u8> for MarkType {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(MarkType::CommentStatus),
            2 => Ok(MarkType::Vote),
            3 => Ok(MarkType::Approval),
            other => Err(ValidationError::out_of_range("mark_type", 1, 3, i64::from(other))),
        }
    }
}

impl From<MarkType> for u8 {
    fn from(value: MarkType) -> Self {
        value as u8
    }
}

impl fmt::Display for MarkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MarkType::CommentStatus => "CommentStatus",
            MarkType::Vote => "Vote",
            MarkType::Approval => "Approval",
        };
        write!(f, "{}", s)
    }
}

/// A mark as returned by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mark {
    pub mark_type: MarkType,
    pub mark: String,
    pub author: AgentId,
}

impl Mark {
    pub fn new(mark_type: MarkType, mark: impl Into<String>, author: AgentId) -> Self {
        Self {
            mark_type,
            mark: mark.into(),
            author,
        }
    }
}

/// A mark to submit for a document. The ledger attributes the author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkRequest {
    pub hash: DocumentHash,
    pub mark_type: MarkType,
    pub mark: String,
}

impl MarkRequest {
    pub fn new(hash: DocumentHash, mark_type: MarkType, mark: impl Into<String>) -> Self {
        Self {
            hash,
            mark_type,
            mark: mark.into(),
        }
    }
}

/// Sums marks of one type per author: `positive` counts +1, `negative`
/// counts -1, any other value is ignored.
///
/// Marks from the same author accumulate; callers bucket on the sign.
pub fn net_by_author(
    marks: &[Mark],
    mark_type: MarkType,
    positive: &str,
    negative: &str,
) -> BTreeMap<AgentId, i64> {
    let mut totals: BTreeMap<AgentId, i64> = BTreeMap::new();
    for mark in marks.iter().filter(|m| m.mark_type == mark_type) {
        let delta = if mark.mark == positive {
            1
        } else if mark.mark == negative {
            -1
        } else {
            tracing::debug!(mark_type = %mark_type, value = %mark.mark, "ignoring unrecognized mark value");
            continue;
        };
        *totals.entry(mark.author.clone()).or_insert(0) += delta;
    }
    totals
}
