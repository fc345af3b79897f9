//! DocumentLedger port - the persistence collaborator for documents.
//!
//! The ledger is append-only. Documents are never changed in place: an
//! update stores a new entry and links it from the old one, and marks
//! accumulate on an entry without altering it.
//!
//! # Contract
//!
//! - Records carry their marks in append order. Comment status takes the
//!   first status mark, so implementations must not reorder marks.
//! - Ledger failures are returned as `DomainError` with
//!   `ErrorCode::LedgerError` and passed through unchanged by handlers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::document::{Document, MarkRequest};
use crate::domain::foundation::{ActionHash, AgentId, DocumentHash, DomainError};

/// A stored document with its lineage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub hash: DocumentHash,
    pub path: String,
    /// The document with `document_hash` and marks attached.
    pub document: Document,
    /// Entries that superseded this one.
    pub updated_by: Vec<DocumentHash>,
    /// Delete actions recorded against this entry.
    pub deleted_by: Vec<ActionHash>,
}

impl DocumentRecord {
    /// Neither superseded nor deleted.
    pub fn is_live(&self) -> bool {
        self.updated_by.is_empty() && self.deleted_by.is_empty()
    }
}

/// Store `document` as the successor of `hash`.
#[derive(Debug, Clone)]
pub struct UpdateDocument {
    pub hash: DocumentHash,
    pub path: String,
    pub document: Document,
}

/// Port for reading and writing ledger documents.
#[async_trait]
pub trait DocumentLedger: Send + Sync {
    /// All records stored at a tree path, oldest first, including
    /// superseded and deleted ones.
    async fn get_documents(&self, path: &str) -> Result<Vec<DocumentRecord>, DomainError>;

    /// A single record by hash.
    async fn get_document(&self, hash: &DocumentHash)
        -> Result<Option<DocumentRecord>, DomainError>;

    /// Comment records annotating `target`, oldest first.
    async fn get_comments(&self, target: &DocumentHash) -> Result<Vec<DocumentRecord>, DomainError>;

    async fn create_document(
        &self,
        path: &str,
        document: Document,
        author: &AgentId,
    ) -> Result<DocumentHash, DomainError>;

    /// Always creates a new record and links it from the old one.
    async fn update_document(
        &self,
        update: UpdateDocument,
        author: &AgentId,
    ) -> Result<DocumentHash, DomainError>;

    async fn delete_document(
        &self,
        hash: &DocumentHash,
        author: &AgentId,
    ) -> Result<ActionHash, DomainError>;

    /// Appends a batch of marks in one action.
    async fn mark_document(
        &self,
        marks: Vec<MarkRequest>,
        author: &AgentId,
    ) -> Result<ActionHash, DomainError>;
}

/// Newest live record matching `predicate`.
pub fn latest_live<F>(records: Vec<DocumentRecord>, predicate: F) -> Option<DocumentRecord>
where
    F: Fn(&Document) -> bool,
{
    records
        .into_iter()
        .rev()
        .find(|r| r.is_live() && predicate(&r.document))
}
