//! Selection-to-offset mapping over a highlighted section.
//!
//! A section with an active highlight renders as three fragments: text
//! before the range, the highlighted range (or a cursor glyph for an
//! insertion point) and text after it. Selections arrive relative to one
//! of those fragments and are mapped back to offsets into the canonical
//! section content.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::DocumentHash;

use super::TextRange;

/// The rendered fragment a selection endpoint fell in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fragment {
    Pre,
    Highlighted,
    Post,
}

/// One selection endpoint: a fragment plus a char offset local to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionPoint {
    pub fragment: Fragment,
    pub offset: usize,
}

impl SelectionPoint {
    pub fn new(fragment: Fragment, offset: usize) -> Self {
        Self { fragment, offset }
    }

    /// An endpoint in a section rendered without any highlight.
    pub fn plain(offset: usize) -> Self {
        Self::new(Fragment::Pre, offset)
    }
}

/// View model of a section rendered around an active highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightView {
    range: TextRange,
    rendered_len: usize,
}

impl HighlightView {
    /// A highlight rendering exactly the covered text.
    pub fn new(range: TextRange) -> Self {
        Self {
            range,
            rendered_len: range.len(),
        }
    }

    /// Overrides the length of the highlighted fragment, e.g. a cursor
    /// glyph drawn for a zero-width range.
    pub fn with_rendered_len(mut self, rendered_len: usize) -> Self {
        self.rendered_len = rendered_len;
        self
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    /// Maps a fragment-local offset to a canonical content offset.
    pub fn to_canonical(&self, point: SelectionPoint) -> usize {
        match point.fragment {
            Fragment::Pre => point.offset,
            Fragment::Highlighted => {
                (point.offset + self.range.end()).saturating_sub(self.rendered_len)
            }
            Fragment::Post => point.offset + self.range.end(),
        }
    }

    /// Maps both endpoints and orders them.
    pub fn selection(&self, anchor: SelectionPoint, focus: SelectionPoint) -> TextRange {
        TextRange::spanning(self.to_canonical(anchor), self.to_canonical(focus))
    }
}

/// Ephemeral selection or annotation-in-progress on one section.
///
/// Lives only for a composing or resolving session and is consumed to
/// build a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HilightRange {
    pub section_name: String,
    pub start_offset: usize,
    pub end_offset: usize,
    /// Comments this range groups together when resolving.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<DocumentHash>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
}

impl HilightRange {
    pub fn new(section_name: impl Into<String>, range: TextRange) -> Self {
        Self {
            section_name: section_name.into(),
            start_offset: range.start(),
            end_offset: range.end(),
            comments: None,
            replacement: None,
        }
    }

    /// Builds a range from a raw selection, correcting for the fragment
    /// each endpoint fell in when a highlight is active.
    pub fn from_selection(
        section_name: impl Into<String>,
        active: Option<&HighlightView>,
        anchor: SelectionPoint,
        focus: SelectionPoint,
    ) -> Self {
        let range = match active {
            Some(view) => view.selection(anchor, focus),
            None => TextRange::spanning(anchor.offset, focus.offset),
        };
        Self::new(section_name, range)
    }

    pub fn with_comments(mut self, comments: Vec<DocumentHash>) -> Self {
        self.comments = Some(comments);
        self
    }

    pub fn with_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.replacement = Some(replacement.into());
        self
    }

    /// Covered range. Endpoints are ordered on construction.
    pub fn range(&self) -> TextRange {
        TextRange::spanning(self.start_offset, self.end_offset)
    }
}
