//! Comment view over a persisted comment document.

use tracing::warn;

use crate::domain::annotation::{AnnotationError, Anchored, TextRange};
use crate::domain::document::{Document, DocumentType, Mark, MarkType, Section};
use crate::domain::foundation::{CommentStatus, DocumentHash};

use super::{CommentError, ExcerptPolicy};

pub const META_DOCUMENT: &str = "document";
pub const META_SECTION: &str = "section";
pub const META_START_OFFSET: &str = "startOffset";
pub const META_END_OFFSET: &str = "endOffset";
pub const COMMENT_SECTION: &str = "comment";
pub const SUGGESTION_SECTION: &str = "suggestion";

/// Derives a comment's status from its mark log.
///
/// The first `CommentStatus` mark whose value parses decides; unknown
/// values are logged and passed over. No such mark means pending. The
/// ledger returns marks in append order, so "first" is "earliest".
pub fn comment_status(marks: &[Mark]) -> CommentStatus {
    marks
        .iter()
        .filter(|m| m.mark_type == MarkType::CommentStatus)
        .find_map(|m| match m.mark.parse::<CommentStatus>() {
            Ok(status) => Some(status),
            Err(_) => {
                warn!(value = %m.mark, author = %m.author, "ignoring unrecognized comment status mark");
                None
            }
        })
        .unwrap_or_default()
}

/// A comment document with its derived status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    document: Document,
    target: DocumentHash,
    status: CommentStatus,
}

impl Comment {
    /// Wraps a comment-typed document. The target and section meta fields
    /// must be present; offsets are checked lazily.
    pub fn from_document(document: Document) -> Result<Self, CommentError> {
        if document.document_type() != DocumentType::Comment {
            return Err(CommentError::NotAComment(document.document_type()));
        }
        let target = document
            .meta(META_DOCUMENT)
            .ok_or(CommentError::MissingMeta(META_DOCUMENT))?
            .parse::<DocumentHash>()?;
        if document.meta(META_SECTION).is_none() {
            return Err(CommentError::MissingMeta(META_SECTION));
        }
        let status = comment_status(document.marks());
        Ok(Self {
            document,
            target,
            status,
        })
    }

    // ════════════════════════════════════════════════════════════════════════════════
    // Accessors
    // ════════════════════════════════════════════════════════════════════════════════

    pub fn hash(&self) -> Option<&DocumentHash> {
        self.document.document_hash()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Hash of the annotated document.
    pub fn target(&self) -> &DocumentHash {
        &self.target
    }

    pub fn section_name(&self) -> &str {
        self.document.meta(META_SECTION).unwrap_or_default()
    }

    pub fn status(&self) -> CommentStatus {
        self.status
    }

    pub fn start_offset(&self) -> Result<usize, AnnotationError> {
        self.offset(META_START_OFFSET)
    }

    pub fn end_offset(&self) -> Result<usize, AnnotationError> {
        self.offset(META_END_OFFSET)
    }

    pub fn comment_text(&self) -> Option<&str> {
        self.document.get_section(COMMENT_SECTION).map(Section::content)
    }

    /// Replacement text. Present but empty means the range is deleted.
    pub fn suggestion(&self) -> Option<&str> {
        self.document.get_section(SUGGESTION_SECTION).map(Section::content)
    }

    pub fn targets(&self, document_hash: &DocumentHash, section: &str) -> bool {
        &self.target == document_hash && self.section_name() == section
    }

    // ════════════════════════════════════════════════════════════════════════════════
    // Target resolution
    // ════════════════════════════════════════════════════════════════════════════════

    /// The annotated section on `target`, if it is still there.
    pub fn get_section<'a>(&self, target: &'a Document) -> Option<&'a Section> {
        target.get_section(self.section_name())
    }

    /// The excerpt this comment was made on, read from the target as it was
    /// when the comment was created. With a policy, long excerpts keep
    /// only their head and tail.
    pub fn commenting_on_text(
        &self,
        target: &Document,
        prune: Option<&ExcerptPolicy>,
    ) -> Result<String, CommentError> {
        let section = self
            .get_section(target)
            .ok_or_else(|| CommentError::UnknownSection(self.section_name().to_string()))?;
        let excerpt = Anchored::range(self)?.slice(section.content())?;
        Ok(match prune {
            Some(policy) => policy.prune(excerpt),
            None => excerpt.to_string(),
        })
    }

    fn offset(&self, field: &'static str) -> Result<usize, AnnotationError> {
        let raw = self.document.meta(field).unwrap_or_default();
        raw.trim()
            .parse::<usize>()
            .map_err(|_| AnnotationError::MalformedOffset {
                field,
                value: raw.to_string(),
            })
    }
}

impl Anchored for Comment {
    fn range(&self) -> Result<TextRange, AnnotationError> {
        TextRange::new(self.start_offset()?, self.end_offset()?)
    }

    fn status(&self) -> CommentStatus {
        self.status
    }

    fn suggestion(&self) -> Option<&str> {
        Comment::suggestion(self)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{comment_doc, target_doc};
    use super::*;
    use crate::domain::foundation::AgentId;

    fn agent(name: &str) -> AgentId {
        AgentId::new(name).unwrap()
    }

    fn status_mark(value: &str) -> Mark {
        Mark::new(MarkType::CommentStatus, value, agent("steward"))
    }

    // ────────────────────────────────────────────────────────────────────────────
    // Status reducer
    // ────────────────────────────────────────────────────────────────────────────

    #[test]
    fn no_marks_means_pending() {
        assert_eq!(comment_status(&[]), CommentStatus::Pending);
    }

    #[test]
    fn first_status_mark_wins() {
        let marks = vec![
            Mark::new(MarkType::Vote, "approve", agent("alice")),
            status_mark("rejected"),
            status_mark("approved"),
        ];
        assert_eq!(comment_status(&marks), CommentStatus::Rejected);
    }

    #[test]
    fn unknown_status_values_are_skipped() {
        let marks = vec![status_mark("maybe"), status_mark("modified")];
        assert_eq!(comment_status(&marks), CommentStatus::Modified);
    }

    // ────────────────────────────────────────────────────────────────────────────
    // Accessors
    // ────────────────────────────────────────────────────────────────────────────

    #[test]
    fn wraps_comment_documents_only() {
        let err = Comment::from_document(target_doc("The quick brown fox")).unwrap_err();
        assert_eq!(err, CommentError::NotAComment(DocumentType::Document));
    }

    #[test]
    fn parses_offsets_and_sections() {
        let c = Comment::from_document(comment_doc("c1", "4", "9", Some("slow"), vec![])).unwrap();
        assert_eq!(c.start_offset(), Ok(4));
        assert_eq!(c.end_offset(), Ok(9));
        assert_eq!(c.range(), TextRange::new(4, 9));
        assert_eq!(c.suggestion(), Some("slow"));
        assert_eq!(c.comment_text(), Some("needs work"));
        assert_eq!(c.section_name(), "body");
        assert_eq!(c.status(), CommentStatus::Pending);
    }

    #[test]
    fn malformed_offset_is_an_error_not_zero() {
        let c = Comment::from_document(comment_doc("c1", "four", "9", None, vec![])).unwrap();
        assert_eq!(
            c.start_offset(),
            Err(AnnotationError::MalformedOffset {
                field: "startOffset",
                value: "four".to_string()
            })
        );
        assert!(c.range().is_err());
    }

    #[test]
    fn status_comes_from_marks() {
        let c = Comment::from_document(comment_doc(
            "c1",
            "4",
            "9",
            Some("slow"),
            vec![status_mark("approved")],
        ))
        .unwrap();
        assert!(c.status().is_approved());
    }

    #[test]
    fn targets_matches_document_and_section() {
        let c = Comment::from_document(comment_doc("c1", "4", "9", None, vec![])).unwrap();
        let target = DocumentHash::new("doc-1").unwrap();
        assert!(c.targets(&target, "body"));
        assert!(!c.targets(&target, "summary"));
        assert!(!c.targets(&DocumentHash::new("doc-2").unwrap(), "body"));
    }

    #[test]
    fn commenting_on_text_reads_the_range() {
        let c = Comment::from_document(comment_doc("c1", "4", "9", None, vec![])).unwrap();
        let target = target_doc("The quick brown fox");
        assert_eq!(c.commenting_on_text(&target, None).unwrap(), "quick");
    }

    #[test]
    fn commenting_on_text_prunes_long_excerpts() {
        let text = "a".repeat(100) + &"b".repeat(100);
        let c = Comment::from_document(comment_doc("c1", "0", "200", None, vec![])).unwrap();
        let target = target_doc(&text);
        let pruned = c
            .commenting_on_text(&target, Some(&ExcerptPolicy::default()))
            .unwrap();
        assert_eq!(pruned, format!("{}...{}", "a".repeat(65), "b".repeat(65)));
    }

    #[test]
    fn commenting_on_missing_section_is_reported() {
        let c = Comment::from_document(comment_doc("c1", "0", "1", None, vec![])).unwrap();
        let target = Document::new(
            crate::domain::foundation::UnitHash::new("unit-1").unwrap(),
            DocumentType::Document,
            "refine",
        );
        assert_eq!(
            c.commenting_on_text(&target, None),
            Err(CommentError::UnknownSection("body".to_string()))
        );
    }
}
