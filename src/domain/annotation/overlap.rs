//! Overlap closure over pending annotations on one section.

use tracing::warn;

use super::{AnnotationError, Anchored, TextRange};

/// The transitively merged set of pending annotations that touch a seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlapClosure {
    members: Vec<usize>,
    range: TextRange,
}

impl OverlapClosure {
    /// Indices into the slice the closure was computed over, seed first,
    /// then in absorption order.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Union of all member ranges.
    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.members.contains(&index)
    }

    /// More than one member means the seed competes with other suggestions.
    pub fn is_conflict(&self) -> bool {
        self.members.len() > 1
    }
}

/// Computes the overlap closure seeded at `comments[seed]`.
///
/// Only pending annotations are absorbed; the seed is always a member.
/// Annotations with malformed offsets are logged and left out. A malformed
/// seed is an error.
pub fn overlap_closure<A: Anchored>(
    seed: usize,
    comments: &[A],
) -> Result<OverlapClosure, AnnotationError> {
    let seed_comment = comments
        .get(seed)
        .ok_or(AnnotationError::UnknownAnchor(seed))?;
    let mut range = seed_comment.range()?;

    let candidates: Vec<(usize, TextRange)> = comments
        .iter()
        .enumerate()
        .filter(|(i, c)| *i != seed && c.status().is_pending())
        .filter_map(|(i, c)| match c.range() {
            Ok(r) => Some((i, r)),
            Err(err) => {
                warn!(index = i, error = %err, "skipping annotation with malformed offsets");
                None
            }
        })
        .collect();

    let mut members = vec![seed];
    let mut absorbed = vec![false; candidates.len()];
    loop {
        let mut grew = false;
        for (k, (index, candidate)) in candidates.iter().enumerate() {
            if !absorbed[k] && range.overlaps(candidate) {
                range = range.merge(candidate);
                members.push(*index);
                absorbed[k] = true;
                grew = true;
            }
        }
        if !grew {
            break;
        }
    }

    Ok(OverlapClosure { members, range })
}

/// True when a pending annotation overlaps at least one other pending one.
/// Single approval is withheld until such a set is resolved jointly.
pub fn has_conflict<A: Anchored>(index: usize, comments: &[A]) -> bool {
    match comments.get(index) {
        Some(c) if c.status().is_pending() => overlap_closure(index, comments)
            .map(|closure| closure.is_conflict())
            .unwrap_or(false),
        _ => false,
    }
}
