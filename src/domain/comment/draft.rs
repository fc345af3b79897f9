//! Composing a new comment from a selection.

use crate::domain::annotation::HilightRange;
use crate::domain::document::{Document, DocumentType, Section};
use crate::domain::foundation::{AgentId, DocumentHash, UnitHash};

use super::record::{
    COMMENT_SECTION, META_DOCUMENT, META_END_OFFSET, META_SECTION, META_START_OFFSET,
    SUGGESTION_SECTION,
};
use super::CommentError;

/// A comment being composed against a persisted document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDraft {
    target: DocumentHash,
    unit: UnitHash,
    state: String,
    range: HilightRange,
    comment: Option<String>,
    suggestion: Option<String>,
}

impl CommentDraft {
    /// Starts a draft. The range must lie within the named section's
    /// current content; a replacement carried on the range becomes the
    /// suggestion.
    pub fn new(target: &Document, range: HilightRange) -> Result<Self, CommentError> {
        let hash = target
            .document_hash()
            .cloned()
            .ok_or(CommentError::Unpersisted)?;
        let section = target
            .get_section(&range.section_name)
            .ok_or_else(|| CommentError::UnknownSection(range.section_name.clone()))?;
        range.range().slice(section.content())?;
        Ok(Self {
            target: hash,
            unit: target.unit_hash().clone(),
            state: target.state().to_string(),
            suggestion: range.replacement.clone(),
            range,
            comment: None,
        })
    }

    pub fn with_comment(mut self, text: impl Into<String>) -> Self {
        self.comment = Some(text.into());
        self
    }

    /// An empty suggestion proposes deleting the range.
    pub fn with_suggestion(mut self, text: impl Into<String>) -> Self {
        self.suggestion = Some(text.into());
        self
    }

    pub fn range(&self) -> &HilightRange {
        &self.range
    }

    /// Builds the comment document, authored by `author`.
    pub fn into_document(self, author: &AgentId) -> Result<Document, CommentError> {
        let comment = self.comment.filter(|c| !c.trim().is_empty());
        if comment.is_none() && self.suggestion.is_none() {
            return Err(CommentError::Empty);
        }

        let mut sections = Vec::with_capacity(2);
        if let Some(text) = comment {
            sections.push(Section::markdown(COMMENT_SECTION, text)?);
        }
        if let Some(text) = self.suggestion {
            sections.push(Section::markdown(SUGGESTION_SECTION, text)?);
        }

        let range = self.range.range();
        Ok(Document::new(self.unit, DocumentType::Comment, self.state)
            .with_editor(author.clone())
            .with_meta(META_DOCUMENT, self.target.as_str())
            .with_meta(META_SECTION, self.range.section_name)
            .with_meta(META_START_OFFSET, range.start().to_string())
            .with_meta(META_END_OFFSET, range.end().to_string())
            .with_sections(sections)?)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::target_doc;
    use super::super::Comment;
    use super::*;
    use crate::domain::annotation::{AnnotationError, TextRange};

    fn author() -> AgentId {
        AgentId::new("alice").unwrap()
    }

    fn selection(start: usize, end: usize) -> HilightRange {
        HilightRange::new("body", TextRange::new(start, end).unwrap())
    }

    #[test]
    fn builds_comment_document_with_meta() {
        let target = target_doc("The quick brown fox");
        let doc = CommentDraft::new(&target, selection(4, 9))
            .unwrap()
            .with_comment("too fast")
            .with_suggestion("slow")
            .into_document(&author())
            .unwrap();

        assert_eq!(doc.document_type(), DocumentType::Comment);
        assert_eq!(doc.state(), "refine");
        assert_eq!(doc.meta("document"), Some("doc-1"));
        assert_eq!(doc.meta("startOffset"), Some("4"));
        assert_eq!(doc.meta("endOffset"), Some("9"));
        assert!(doc.editors().contains(&author()));

        let comment = Comment::from_document(doc).unwrap();
        assert_eq!(comment.suggestion(), Some("slow"));
        assert_eq!(comment.comment_text(), Some("too fast"));
    }

    #[test]
    fn replacement_on_range_becomes_suggestion() {
        let target = target_doc("The quick brown fox");
        let doc = CommentDraft::new(&target, selection(4, 9).with_replacement("slow"))
            .unwrap()
            .into_document(&author())
            .unwrap();
        assert_eq!(doc.get_section("suggestion").unwrap().content(), "slow");
        assert!(doc.get_section("comment").is_none());
    }

    #[test]
    fn empty_suggestion_is_kept_as_deletion() {
        let target = target_doc("The quick brown fox");
        let doc = CommentDraft::new(&target, selection(4, 10))
            .unwrap()
            .with_suggestion("")
            .into_document(&author())
            .unwrap();
        assert_eq!(doc.get_section("suggestion").unwrap().content(), "");
    }

    #[test]
    fn draft_needs_text_or_suggestion() {
        let target = target_doc("The quick brown fox");
        let err = CommentDraft::new(&target, selection(4, 9))
            .unwrap()
            .with_comment("   ")
            .into_document(&author())
            .unwrap_err();
        assert_eq!(err, CommentError::Empty);
    }

    #[test]
    fn range_must_fit_section() {
        let target = target_doc("short");
        assert_eq!(
            CommentDraft::new(&target, selection(2, 30)),
            Err(CommentError::Annotation(AnnotationError::OffsetOutOfBounds {
                offset: 30,
                len: 5
            }))
        );
    }

    #[test]
    fn section_must_exist() {
        let target = target_doc("text");
        let range = HilightRange::new("missing", TextRange::point(0));
        assert_eq!(
            CommentDraft::new(&target, range),
            Err(CommentError::UnknownSection("missing".to_string()))
        );
    }
}
