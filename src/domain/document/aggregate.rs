//! Document aggregate - an ordered collection of sections plus lifecycle
//! state, editors and marks.
//!
//! Documents are immutable once persisted. Every "update" builds a
//! successor value (hash unset) that the ledger stores as a new entry
//! linked from the old one.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use crate::domain::control::Control;
use crate::domain::foundation::{AgentId, DocumentHash, UnitHash};

use super::process::states;
use super::{DocumentError, Mark, ProcessRoot, Section, SectionType};

/// Kind of document entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DocumentType {
    TreeMeta,
    #[default]
    Document,
    Comment,
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DocumentType::TreeMeta => "TreeMeta",
            DocumentType::Document => "Document",
            DocumentType::Comment => "Comment",
        };
        write!(f, "{}", s)
    }
}

/// Completion of the sections relevant to the current state.
///
/// `total` includes one floor unit for the state transition itself, so a
/// document is never reported complete on content alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub total: usize,
    pub count: usize,
}

impl Progress {
    /// Completion as a whole percentage, rounded down.
    pub fn percent(&self) -> u8 {
        ((self.count * 100) / self.total.max(1)).min(100) as u8
    }
}

/// Counts used to gate state advancement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStats {
    pub empty_sections: usize,
}

impl DocumentStats {
    /// Advancement is allowed only once every section has content.
    pub fn allows_advance(&self) -> bool {
        self.empty_sections == 0
    }
}

/// The Document aggregate.
///
/// # Invariants
///
/// - section names are unique within the document
/// - `section_index` maps every section name to its position in `content`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DocumentData", into = "DocumentData")]
pub struct Document {
    document_hash: Option<DocumentHash>,
    unit_hash: UnitHash,
    document_type: DocumentType,
    editors: BTreeSet<AgentId>,
    content: Vec<Section>,
    meta: BTreeMap<String, String>,
    state: String,
    marks: Vec<Mark>,
    section_index: HashMap<String, usize>,
}

impl Document {
    // ════════════════════════════════════════════════════════════════════════════════
    // Construction
    // ════════════════════════════════════════════════════════════════════════════════

    /// Creates an empty, unpersisted document for a unit.
    pub fn new(unit_hash: UnitHash, document_type: DocumentType, state: impl Into<String>) -> Self {
        Self {
            document_hash: None,
            unit_hash,
            document_type,
            editors: BTreeSet::new(),
            content: Vec::new(),
            meta: BTreeMap::new(),
            state: state.into(),
            marks: Vec::new(),
            section_index: HashMap::new(),
        }
    }

    /// Builder: add sections, rejecting duplicate names.
    pub fn with_sections(mut self, sections: Vec<Section>) -> Result<Self, DocumentError> {
        self.append_sections(sections)?;
        Ok(self)
    }

    /// Builder: add an editor.
    pub fn with_editor(mut self, agent: AgentId) -> Self {
        self.editors.insert(agent);
        self
    }

    /// Builder: set a meta entry.
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// Attaches the ledger identity and mark log of a persisted entry.
    pub fn persisted(mut self, hash: DocumentHash, marks: Vec<Mark>) -> Self {
        self.document_hash = Some(hash);
        self.marks = marks;
        self
    }

    /// Appends sections while extending the lookup index.
    ///
    /// The whole batch is rejected if any name collides, so a failed call
    /// leaves the document unchanged.
    pub fn append_sections(&mut self, sections: Vec<Section>) -> Result<(), DocumentError> {
        let mut incoming = BTreeSet::new();
        for section in &sections {
            if self.section_index.contains_key(section.name()) || !incoming.insert(section.name()) {
                return Err(DocumentError::DuplicateSection(section.name().to_string()));
            }
        }
        for section in sections {
            self.section_index
                .insert(section.name().to_string(), self.content.len());
            self.content.push(section);
        }
        Ok(())
    }

    /// Returns an unpersisted copy to be stored as this document's successor.
    ///
    /// Marks stay with the old entry; the successor starts with none.
    pub fn successor(&self) -> Self {
        let mut next = self.clone();
        next.document_hash = None;
        next.marks.clear();
        next
    }

    /// Returns a successor with one section's content replaced.
    pub fn with_section_content(
        &self,
        section_name: &str,
        content: impl Into<String>,
    ) -> Result<Self, DocumentError> {
        let index = *self
            .section_index
            .get(section_name)
            .ok_or_else(|| DocumentError::UnknownSection(section_name.to_string()))?;
        let mut next = self.successor();
        let updated = next.content[index].clone().with_content(content);
        next.content[index] = updated;
        Ok(next)
    }

    /// Returns a successor moved to another lifecycle state.
    pub fn successor_in_state(&self, state: impl Into<String>) -> Self {
        let mut next = self.successor();
        next.state = state.into();
        next
    }

    // ════════════════════════════════════════════════════════════════════════════════
    // Accessors
    // ════════════════════════════════════════════════════════════════════════════════

    pub fn document_hash(&self) -> Option<&DocumentHash> {
        self.document_hash.as_ref()
    }

    pub fn unit_hash(&self) -> &UnitHash {
        &self.unit_hash
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    pub fn editors(&self) -> &BTreeSet<AgentId> {
        &self.editors
    }

    pub fn sections(&self) -> &[Section] {
        &self.content
    }

    pub fn meta(&self, key: &str) -> Option<&str> {
        self.meta.get(key).map(String::as_str)
    }

    pub fn meta_entries(&self) -> &BTreeMap<String, String> {
        &self.meta
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    /// Looks up a section by name. Absence is a normal outcome: documents
    /// may omit optional sections.
    pub fn get_section(&self, name: &str) -> Option<&Section> {
        self.section_index.get(name).map(|&i| &self.content[i])
    }

    /// Sections of the requested types, in document order.
    pub fn inheritable_sections(&self, kinds: &[SectionType]) -> Vec<&Section> {
        self.content
            .iter()
            .filter(|s| kinds.contains(&s.section_type()))
            .collect()
    }

    // ════════════════════════════════════════════════════════════════════════════════
    // Lifecycle rules
    // ════════════════════════════════════════════════════════════════════════════════

    /// A section may be edited only during the process phase that defines
    /// it. Everything is editable while the document is being defined.
    pub fn is_editable(&self, section_name: &str, root: &ProcessRoot) -> bool {
        if self.state == states::DEFINE {
            return true;
        }
        self.get_section(section_name)
            .map(|s| root.defines(s.source_path(), &self.state))
            .unwrap_or(false)
    }

    /// Sections may be added only before alignment.
    pub fn can_add_section(&self) -> bool {
        self.state == states::DEFINE || self.state == states::REFINE
    }

    /// Counts filled sections among those relevant to the current state.
    pub fn progress(&self, root: &ProcessRoot) -> Progress {
        let defining = self.state == states::DEFINE;
        self.content
            .iter()
            .filter(|s| defining || root.defines(s.source_path(), &self.state))
            .fold(Progress { total: 1, count: 0 }, |acc, s| Progress {
                total: acc.total + 1,
                count: acc.count + usize::from(!s.is_empty()),
            })
    }

    pub fn stats(&self) -> DocumentStats {
        DocumentStats {
            empty_sections: self.content.iter().filter(|s| s.is_empty()).count(),
        }
    }

    /// Instantiates a control for every section with a recognized control
    /// content type.
    pub fn controls(&self) -> Vec<Control> {
        self.content.iter().filter_map(Control::from_section).collect()
    }

    fn rebuild_index(&mut self) -> Result<(), DocumentError> {
        self.section_index.clear();
        for (i, section) in self.content.iter().enumerate() {
            if self
                .section_index
                .insert(section.name().to_string(), i)
                .is_some()
            {
                return Err(DocumentError::DuplicateSection(section.name().to_string()));
            }
        }
        Ok(())
    }
}

/// Wire shape of a document; the lookup index is derived, not stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    document_hash: Option<DocumentHash>,
    unit_hash: UnitHash,
    document_type: DocumentType,
    #[serde(default)]
    editors: BTreeSet<AgentId>,
    #[serde(default)]
    content: Vec<Section>,
    #[serde(default)]
    meta: BTreeMap<String, String>,
    state: String,
    #[serde(default)]
    marks: Vec<Mark>,
}

impl TryFrom<DocumentData> for Document {
    type Error = DocumentError;

    fn try_from(data: DocumentData) -> Result<Self, Self::Error> {
        let mut doc = Document {
            document_hash: data.document_hash,
            unit_hash: data.unit_hash,
            document_type: data.document_type,
            editors: data.editors,
            content: data.content,
            meta: data.meta,
            state: data.state,
            marks: data.marks,
            section_index: HashMap::new(),
        };
        doc.rebuild_index()?;
        Ok(doc)
    }
}

impl From<Document> for DocumentData {
    fn from(doc: Document) -> Self {
        DocumentData {
            document_hash: doc.document_hash,
            unit_hash: doc.unit_hash,
            document_type: doc.document_type,
            editors: doc.editors,
            content: doc.content,
            meta: doc.meta,
            state: doc.state,
            marks: doc.marks,
        }
    }
}
