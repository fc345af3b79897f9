//! Section value object - a named, typed slot of content within a document.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{UnitHash, ValidationError};

/// Provenance marker for sections added by hand rather than inherited.
pub const MANUAL_SOURCE: &str = "_manual";

/// Content type for prose sections.
pub const MARKDOWN_CONTENT_TYPE: &str = "text/markdown";

/// Role a section plays within its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SectionType {
    #[default]
    Content,
    /// Required field picked up from a process template.
    Process,
    /// Required field inherited from an ancestor document.
    Requirement,
    CollectionDef,
}

impl SectionType {
    /// Returns true for section types copied forward from templates.
    pub fn is_inherited(&self) -> bool {
        matches!(self, SectionType::Process | SectionType::Requirement)
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SectionType::Content => "Content",
            SectionType::Process => "Process",
            SectionType::Requirement => "Requirement",
            SectionType::CollectionDef => "CollectionDef",
        };
        write!(f, "{}", s)
    }
}

/// A named slot of content inside a document.
///
/// # Invariants
///
/// - `name` is non-empty; uniqueness is enforced by the owning document
/// - `content` of a `control/*` section holds serialized control state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    name: String,
    section_type: SectionType,
    content_type: String,
    content: String,
    source_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source_unit: Option<UnitHash>,
}

impl Section {
    /// Creates an empty, manually-sourced section.
    pub fn new(
        name: impl Into<String>,
        section_type: SectionType,
        content_type: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("section_name"));
        }
        Ok(Self {
            name,
            section_type,
            content_type: content_type.into(),
            content: String::new(),
            source_path: MANUAL_SOURCE.to_string(),
            source_unit: None,
        })
    }

    /// Creates a manually-sourced markdown content section.
    pub fn markdown(
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self::new(name, SectionType::Content, MARKDOWN_CONTENT_TYPE)?.with_content(content))
    }

    /// Builder: replace the content.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Builder: record where this section was defined.
    pub fn with_source(mut self, source_path: impl Into<String>, source_unit: Option<UnitHash>) -> Self {
        self.source_path = source_path.into();
        self.source_unit = source_unit;
        self
    }

    /// Copies this section as a fresh, empty slot whose provenance points at
    /// the template it came from.
    pub fn inherited(&self, template_path: &str, template_unit: Option<UnitHash>) -> Self {
        Self {
            name: self.name.clone(),
            section_type: self.section_type,
            content_type: self.content_type.clone(),
            content: String::new(),
            source_path: template_path.to_string(),
            source_unit: template_unit,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn section_type(&self) -> SectionType {
        self.section_type
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    pub fn source_unit(&self) -> Option<&UnitHash> {
        self.source_unit.as_ref()
    }

    /// Returns true if the section has no content yet.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Returns true if the section was added by hand.
    pub fn is_manual(&self) -> bool {
        self.source_path == MANUAL_SOURCE
    }

    /// Returns true if the content holds control state rather than prose.
    pub fn is_control(&self) -> bool {
        self.content_type.starts_with("control/")
    }
}
