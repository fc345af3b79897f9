//! TextRange value object.
//!
//! Offsets count Unicode scalar values (chars) into the canonical section
//! content, never bytes, so a range can not split a UTF-8 sequence.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::AnnotationError;

/// A `[start, end)` span of section text. `start == end` is an insertion
/// point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    start: usize,
    end: usize,
}

impl TextRange {
    /// Creates a range, rejecting `start > end`.
    pub fn new(start: usize, end: usize) -> Result<Self, AnnotationError> {
        if start > end {
            return Err(AnnotationError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a zero-width insertion point.
    pub fn point(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Creates a range from two endpoints in either order.
    pub fn spanning(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns true for a zero-width range.
    pub fn is_insertion(&self) -> bool {
        self.is_empty()
    }

    /// Closed-interval overlap: touching endpoints count as overlapping,
    /// so an insertion point overlaps any range starting or ending there.
    pub fn overlaps(&self, other: &TextRange) -> bool {
        self.start.max(other.start) <= self.end.min(other.end)
    }

    /// Strict overlap: shared interior characters only. Used to decide
    /// whether two splices can both be applied.
    pub fn intersects(&self, other: &TextRange) -> bool {
        self.start.max(other.start) < self.end.min(other.end)
            || (self.is_insertion() && other.start < self.start && self.start < other.end)
            || (other.is_insertion() && self.start < other.start && other.start < self.end)
    }

    /// Smallest range covering both.
    pub fn merge(&self, other: &TextRange) -> TextRange {
        TextRange {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Converts this char range to byte offsets within `text`.
    pub fn byte_span(&self, text: &str) -> Result<(usize, usize), AnnotationError> {
        let start = byte_offset(text, self.start)?;
        let end = byte_offset(text, self.end)?;
        Ok((start, end))
    }

    /// Returns the covered slice of `text`.
    pub fn slice<'a>(&self, text: &'a str) -> Result<&'a str, AnnotationError> {
        let (start, end) = self.byte_span(text)?;
        Ok(&text[start..end])
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Byte index of the `char_offset`-th char; the text length maps to the end.
pub(crate) fn byte_offset(text: &str, char_offset: usize) -> Result<usize, AnnotationError> {
    text.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .nth(char_offset)
        .ok_or_else(|| AnnotationError::OffsetOutOfBounds {
            offset: char_offset,
            len: text.chars().count(),
        })
}

/// Closed-interval overlap of two ranges.
pub fn intervals_overlap(x: &TextRange, y: &TextRange) -> bool {
    x.overlaps(y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(start: usize, end: usize) -> TextRange {
        TextRange::new(start, end).unwrap()
    }

    #[test]
    fn new_rejects_inverted_range() {
        assert_eq!(
            TextRange::new(5, 2),
            Err(AnnotationError::InvalidRange { start: 5, end: 2 })
        );
    }

    #[test]
    fn touching_ranges_overlap() {
        assert!(r(0, 4).overlaps(&r(4, 9)));
        assert!(r(4, 9).overlaps(&r(0, 4)));
    }

    #[test]
    fn disjoint_ranges_do_not_overlap() {
        assert!(!r(0, 3).overlaps(&r(4, 9)));
    }

    #[test]
    fn insertion_point_overlaps_adjacent_replacement() {
        assert!(TextRange::point(9).overlaps(&r(4, 9)));
        assert!(TextRange::point(4).overlaps(&r(4, 9)));
        assert!(!TextRange::point(10).overlaps(&r(4, 9)));
    }

    #[test]
    fn intersects_ignores_touching_boundaries() {
        assert!(!r(0, 4).intersects(&r(4, 9)));
        assert!(!TextRange::point(4).intersects(&r(4, 9)));
        assert!(TextRange::point(6).intersects(&r(4, 9)));
        assert!(r(0, 5).intersects(&r(4, 9)));
    }

    #[test]
    fn merge_covers_both() {
        assert_eq!(r(4, 9).merge(&r(2, 6)), r(2, 9));
    }

    #[test]
    fn spanning_orders_endpoints() {
        assert_eq!(TextRange::spanning(9, 4), r(4, 9));
    }

    #[test]
    fn slice_uses_char_offsets() {
        let text = "naïve café";
        assert_eq!(r(0, 5).slice(text).unwrap(), "naïve");
        assert_eq!(r(6, 10).slice(text).unwrap(), "café");
    }

    #[test]
    fn slice_accepts_end_of_text() {
        assert_eq!(TextRange::point(3).slice("abc").unwrap(), "");
    }

    #[test]
    fn slice_rejects_offsets_past_end() {
        assert_eq!(
            r(2, 7).slice("abc"),
            Err(AnnotationError::OffsetOutOfBounds { offset: 7, len: 3 })
        );
    }
}
