//! Splicing approved suggestions back into section text.

use std::cmp::Reverse;
use tracing::{debug, warn};

use super::range::byte_offset;
use super::{AnnotationError, Anchored, TextRange};

/// Applies every approved suggestion in `comments` to `text`.
///
/// All offsets refer to the unmodified `text`. Splices run from the
/// rightmost range leftward against that one snapshot, so no splice shifts
/// the bytes another one targets. Approved comments without a suggestion
/// are commentary only and leave the text alone. Comments with malformed
/// offsets are logged and skipped.
///
/// Nothing is spliced unless every range fits the text and no two
/// approved ranges share interior characters.
pub fn apply_approved_comments<A: Anchored>(
    text: &str,
    comments: &[A],
) -> Result<String, AnnotationError> {
    let mut edits: Vec<(usize, TextRange, &str)> = comments
        .iter()
        .enumerate()
        .filter(|(_, c)| c.status().is_approved())
        .filter_map(|(i, c)| {
            let suggestion = c.suggestion()?;
            match c.range() {
                Ok(range) => Some((i, range, suggestion)),
                Err(err) => {
                    warn!(index = i, error = %err, "skipping approved suggestion with malformed offsets");
                    None
                }
            }
        })
        .collect();

    if edits.is_empty() {
        return Ok(text.to_string());
    }

    // Rightmost first. For equal starts the wider range goes first so an
    // insertion at its start lands in front of the replacement; equal
    // insertions keep their input order in the output.
    edits.sort_by_key(|(i, range, _)| (Reverse(range.start()), Reverse(range.end()), Reverse(*i)));

    let mut splices = Vec::with_capacity(edits.len());
    let mut previous: Option<TextRange> = None;
    for (_, range, suggestion) in &edits {
        if let Some(prev) = previous {
            if range.intersects(&prev) {
                return Err(AnnotationError::ConflictingSuggestions {
                    first: *range,
                    second: prev,
                });
            }
        }
        let start = byte_offset(text, range.start())?;
        let end = byte_offset(text, range.end())?;
        splices.push((start, end, *suggestion));
        previous = Some(*range);
    }

    let mut result = text.to_string();
    for (start, end, suggestion) in splices {
        result.replace_range(start..end, suggestion);
    }
    debug!(applied = edits.len(), "applied approved suggestions");
    Ok(result)
}
