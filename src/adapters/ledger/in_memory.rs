//! In-memory ledger.
//!
//! Implements the document, unit and tree ports over one shared state so
//! a whole editing lifecycle can run in-process. Entry hashes are SHA-256
//! digests of the serialized entry and a sequence number, so identical
//! entries stored twice still get distinct hashes.

use async_trait::async_trait;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::domain::document::{states, Document, DocumentType, Mark, MarkRequest};
use crate::domain::foundation::{
    ActionHash, AgentId, DocumentHash, DomainError, ErrorCode, UnitHash,
};
use crate::domain::unit::Unit;
use crate::ports::{
    AdvanceState, DocumentLedger, DocumentRecord, TreeNode, TreeReader, UnitRecord, UnitRegistry,
    UpdateDocument, UpdateUnit,
};

use super::tree::PathTrie;

#[derive(Debug, Clone)]
struct StoredDocument {
    hash: DocumentHash,
    path: String,
    document: Document,
    updated_by: Vec<DocumentHash>,
    deleted_by: Vec<ActionHash>,
}

#[derive(Debug, Clone)]
struct StoredUnit {
    hash: UnitHash,
    unit: Unit,
    state: String,
    updated_by: Vec<UnitHash>,
}

#[derive(Debug, Default)]
struct LedgerState {
    sequence: u64,
    documents: Vec<StoredDocument>,
    document_index: HashMap<DocumentHash, usize>,
    marks: HashMap<DocumentHash, Vec<Mark>>,
    units: Vec<StoredUnit>,
    unit_index: HashMap<UnitHash, usize>,
}

impl LedgerState {
    fn next_hash<T: Serialize>(&mut self, prefix: &str, entry: &T) -> Result<String, DomainError> {
        self.sequence += 1;
        let bytes = serde_json::to_vec(entry)
            .map_err(|e| DomainError::ledger(format!("failed to serialize entry: {e}")))?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        hasher.update(self.sequence.to_be_bytes());
        let digest = format!("{:x}", hasher.finalize());
        Ok(format!("{prefix}{}", &digest[..32]))
    }

    fn record(&self, stored: &StoredDocument) -> DocumentRecord {
        let marks = self.marks.get(&stored.hash).cloned().unwrap_or_default();
        DocumentRecord {
            hash: stored.hash.clone(),
            path: stored.path.clone(),
            document: stored.document.clone().persisted(stored.hash.clone(), marks),
            updated_by: stored.updated_by.clone(),
            deleted_by: stored.deleted_by.clone(),
        }
    }

    fn unit_record(stored: &StoredUnit) -> UnitRecord {
        UnitRecord {
            hash: stored.hash.clone(),
            unit: stored.unit.clone().persisted(stored.hash.clone()),
            state: stored.state.clone(),
            updated_by: stored.updated_by.clone(),
        }
    }

    fn document_position(&self, hash: &DocumentHash) -> Result<usize, DomainError> {
        self.document_index.get(hash).copied().ok_or_else(|| {
            DomainError::new(ErrorCode::DocumentNotFound, format!("No document {hash}"))
        })
    }

    fn unit_position(&self, hash: &UnitHash) -> Result<usize, DomainError> {
        self.unit_index
            .get(hash)
            .copied()
            .ok_or_else(|| DomainError::new(ErrorCode::UnitNotFound, format!("No unit {hash}")))
    }

    /// Position of `hash`, which must not have been superseded.
    fn live_unit_position(&self, hash: &UnitHash) -> Result<usize, DomainError> {
        let position = self.unit_position(hash)?;
        match self.units[position].updated_by.last() {
            None => Ok(position),
            Some(successor) => Err(DomainError::new(
                ErrorCode::Superseded,
                format!("Unit {hash} was superseded by {successor}"),
            )),
        }
    }

    fn insert_document(
        &mut self,
        path: &str,
        document: Document,
    ) -> Result<DocumentHash, DomainError> {
        let document = document.successor();
        let hash = DocumentHash::new(self.next_hash("doc-", &(path, &document))?)?;
        self.document_index.insert(hash.clone(), self.documents.len());
        self.documents.push(StoredDocument {
            hash: hash.clone(),
            path: path.to_string(),
            document,
            updated_by: Vec::new(),
            deleted_by: Vec::new(),
        });
        Ok(hash)
    }

    fn action_hash<T: Serialize>(&mut self, entry: &T) -> Result<ActionHash, DomainError> {
        Ok(ActionHash::new(self.next_hash("act-", entry)?)?)
    }
}

/// Ledger held entirely in memory behind an async `RwLock`.
///
/// # Example
///
/// ```ignore
/// let ledger = Arc::new(InMemoryLedger::new());
/// let unit_hash = ledger.create_unit(unit, &steward).await?;
/// let doc_hash = ledger.create_document("std.core", document, &steward).await?;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    state: RwLock<LedgerState>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored document entries, superseded ones included.
    pub async fn document_count(&self) -> usize {
        self.state.read().await.documents.len()
    }
}

#[async_trait]
impl DocumentLedger for InMemoryLedger {
    async fn get_documents(&self, path: &str) -> Result<Vec<DocumentRecord>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .documents
            .iter()
            .filter(|d| d.path == path)
            .map(|d| state.record(d))
            .collect())
    }

    async fn get_document(
        &self,
        hash: &DocumentHash,
    ) -> Result<Option<DocumentRecord>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .document_index
            .get(hash)
            .map(|&i| state.record(&state.documents[i])))
    }

    async fn get_comments(&self, target: &DocumentHash) -> Result<Vec<DocumentRecord>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .documents
            .iter()
            .filter(|d| {
                d.document.document_type() == DocumentType::Comment
                    && d.document.meta("document") == Some(target.as_str())
            })
            .map(|d| state.record(d))
            .collect())
    }

    async fn create_document(
        &self,
        path: &str,
        document: Document,
        author: &AgentId,
    ) -> Result<DocumentHash, DomainError> {
        let mut state = self.state.write().await;
        let hash = state.insert_document(path, document)?;
        debug!(%path, %hash, %author, "document created");
        Ok(hash)
    }

    async fn update_document(
        &self,
        update: UpdateDocument,
        author: &AgentId,
    ) -> Result<DocumentHash, DomainError> {
        let mut state = self.state.write().await;
        let previous = state.document_position(&update.hash)?;
        let hash = state.insert_document(&update.path, update.document)?;
        state.documents[previous].updated_by.push(hash.clone());
        debug!(previous = %update.hash, %hash, %author, "document updated");
        Ok(hash)
    }

    async fn delete_document(
        &self,
        hash: &DocumentHash,
        author: &AgentId,
    ) -> Result<ActionHash, DomainError> {
        let mut state = self.state.write().await;
        let position = state.document_position(hash)?;
        let action = state.action_hash(&("delete", hash, author))?;
        state.documents[position].deleted_by.push(action.clone());
        debug!(%hash, %author, "document deleted");
        Ok(action)
    }

    async fn mark_document(
        &self,
        marks: Vec<MarkRequest>,
        author: &AgentId,
    ) -> Result<ActionHash, DomainError> {
        let mut state = self.state.write().await;
        for request in &marks {
            state.document_position(&request.hash)?;
        }
        let action = state.action_hash(&(&marks, author))?;
        for request in marks {
            state
                .marks
                .entry(request.hash)
                .or_default()
                .push(Mark::new(request.mark_type, request.mark, author.clone()));
        }
        Ok(action)
    }
}

#[async_trait]
impl UnitRegistry for InMemoryLedger {
    async fn get_units(&self) -> Result<Vec<UnitRecord>, DomainError> {
        let state = self.state.read().await;
        Ok(state.units.iter().map(LedgerState::unit_record).collect())
    }

    async fn get_unit(&self, hash: &UnitHash) -> Result<Option<UnitRecord>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .unit_index
            .get(hash)
            .map(|&i| LedgerState::unit_record(&state.units[i])))
    }

    async fn create_unit(&self, unit: Unit, author: &AgentId) -> Result<UnitHash, DomainError> {
        let mut state = self.state.write().await;
        let hash = UnitHash::new(state.next_hash("unit-", &unit)?)?;
        let position = state.units.len();
        state.unit_index.insert(hash.clone(), position);
        info!(path = %unit.path(), %hash, %author, "unit created");
        state.units.push(StoredUnit {
            hash: hash.clone(),
            unit,
            state: states::DEFINE.to_string(),
            updated_by: Vec::new(),
        });
        Ok(hash)
    }

    async fn update_unit(
        &self,
        update: UpdateUnit,
        author: &AgentId,
    ) -> Result<UnitHash, DomainError> {
        let mut state = self.state.write().await;
        let previous = state.live_unit_position(&update.hash)?;
        let old_path = state.units[previous].unit.path();
        let new_path = update.unit.path();
        let hash = UnitHash::new(state.next_hash("unit-", &update.unit)?)?;

        let stored = StoredUnit {
            hash: hash.clone(),
            unit: update.unit,
            state: state.units[previous].state.clone(),
            updated_by: Vec::new(),
        };
        state.units[previous].updated_by.push(hash.clone());
        let position = state.units.len();
        state.unit_index.insert(hash.clone(), position);
        state.units.push(stored);

        if old_path != new_path {
            for doc in state.documents.iter_mut().filter(|d| d.path == old_path) {
                doc.path = new_path.clone();
            }
        }
        info!(previous = %update.hash, %hash, %author, "unit updated");
        Ok(hash)
    }

    async fn advance_state(
        &self,
        request: AdvanceState,
        author: &AgentId,
    ) -> Result<DocumentHash, DomainError> {
        let mut state = self.state.write().await;
        let unit_pos = state.live_unit_position(&request.unit_hash)?;
        let doc_pos = state.document_position(&request.document_hash)?;

        let unit = &state.units[unit_pos];
        if !unit.unit.is_steward(author) {
            return Err(DomainError::new(
                ErrorCode::Forbidden,
                format!("{author} is not a steward of {}", unit.hash),
            ));
        }
        if !unit.unit.machine().can_transition(&unit.state, &request.new_state) {
            return Err(DomainError::new(
                ErrorCode::IllegalTransition,
                format!("Cannot transition from '{}' to '{}'", unit.state, request.new_state),
            ));
        }
        if !state.documents[doc_pos].document.stats().allows_advance() {
            return Err(DomainError::new(
                ErrorCode::SectionsIncomplete,
                "Current document still has empty sections",
            ));
        }

        let from = unit.state.clone();
        let path = state.documents[doc_pos].path.clone();
        let hash = state.insert_document(&path, request.document)?;
        state.documents[doc_pos].updated_by.push(hash.clone());
        state.units[unit_pos].state = request.new_state.clone();
        info!(unit = %request.unit_hash, %from, to = %request.new_state, document = %hash, "unit advanced");
        Ok(hash)
    }
}

#[async_trait]
impl TreeReader for InMemoryLedger {
    async fn get_tree(&self) -> Result<Vec<TreeNode>, DomainError> {
        let state = self.state.read().await;
        let mut trie = PathTrie::default();
        for unit in state.units.iter().filter(|u| u.updated_by.is_empty()) {
            trie.insert_unit(&unit.unit.path(), unit.hash.clone());
        }
        for doc in state
            .documents
            .iter()
            .filter(|d| d.updated_by.is_empty() && d.deleted_by.is_empty())
            .filter(|d| d.document.document_type() != DocumentType::Comment)
        {
            trie.insert_document(&doc.path);
        }
        Ok(trie.into_nodes())
    }
}
