//! Document module - sections, documents, marks and process paths.
//!
//! A Document is an ordered collection of named sections attached to a
//! unit at a lifecycle state. Section provenance (`source_path`) combined
//! with the document state decides which sections may be edited.

mod aggregate;
mod errors;
mod events;
mod mark;
pub mod process;
mod section;

pub use aggregate::{Document, DocumentStats, DocumentType, Progress};
pub use errors::DocumentError;
pub use events::{DocumentUpdated, SectionAdded};
pub use mark::{net_by_author, Mark, MarkRequest, MarkType};
pub use process::{states, ProcessRoot};
pub use section::{Section, SectionType, MANUAL_SOURCE, MARKDOWN_CONTENT_TYPE};
