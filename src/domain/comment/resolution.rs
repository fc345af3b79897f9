//! Deciding comments: single approval/rejection and joint resolution of
//! overlapping suggestions.

use crate::domain::annotation::{overlap_closure, AnnotationError, HilightRange, OverlapClosure};
use crate::domain::document::{MarkRequest, MarkType};
use crate::domain::foundation::{CommentStatus, DocumentHash, StateMachine};

use super::{Comment, CommentError};

/// Checks that `comments[index]` may move to `status` on its own.
///
/// Approval of a pending comment that overlaps other pending comments is
/// withheld; the set must be resolved together instead.
pub fn ensure_decidable(
    index: usize,
    comments: &[Comment],
    status: CommentStatus,
) -> Result<(), CommentError> {
    let comment = comments
        .get(index)
        .ok_or(AnnotationError::UnknownAnchor(index))?;
    comment
        .status()
        .transition_to(status)
        .map_err(|_| CommentError::NotPending(comment.status()))?;
    if status.is_approved() {
        let closure = overlap_closure(index, comments)?;
        if closure.is_conflict() {
            return Err(CommentError::Overlapping(closure.len() - 1));
        }
    }
    Ok(())
}

/// The mark that records `status` on a persisted comment.
pub fn status_mark(comment: &Comment, status: CommentStatus) -> Result<MarkRequest, CommentError> {
    let hash = comment.hash().cloned().ok_or(CommentError::Unpersisted)?;
    let value = status
        .mark_value()
        .ok_or(CommentError::NotPending(CommentStatus::Pending))?;
    Ok(MarkRequest::new(hash, MarkType::CommentStatus, value))
}

/// Range covering a closure, carrying the member hashes. Seeds the
/// composer used to write one replacement for the whole set.
pub fn resolution_range(closure: &OverlapClosure, comments: &[Comment]) -> HilightRange {
    let section = closure
        .members()
        .first()
        .and_then(|&i| comments.get(i))
        .map(|c| c.section_name().to_string())
        .unwrap_or_default();
    let hashes = member_hashes(closure, comments);
    HilightRange::new(section, closure.range()).with_comments(hashes)
}

/// One batch: every member becomes `Modified`, the replacement `Approved`.
pub fn resolution_marks(
    closure: &OverlapClosure,
    comments: &[Comment],
    replacement: &DocumentHash,
) -> Vec<MarkRequest> {
    member_hashes(closure, comments)
        .into_iter()
        .map(|hash| MarkRequest::new(hash, MarkType::CommentStatus, "modified"))
        .chain(std::iter::once(MarkRequest::new(
            replacement.clone(),
            MarkType::CommentStatus,
            "approved",
        )))
        .collect()
}

fn member_hashes(closure: &OverlapClosure, comments: &[Comment]) -> Vec<DocumentHash> {
    closure
        .members()
        .iter()
        .filter_map(|&i| comments.get(i))
        .filter_map(|c| c.hash().cloned())
        .collect()
}
