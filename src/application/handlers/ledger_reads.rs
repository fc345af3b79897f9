//! Ledger reads shared by several handlers.

use std::collections::HashSet;
use tracing::warn;

use crate::domain::comment::Comment;
use crate::domain::document::DocumentType;
use crate::domain::foundation::{DocumentHash, DomainError, UnitHash};
use crate::ports::{latest_live, DocumentLedger, DocumentRecord, UnitRecord, UnitRegistry};

/// Live comments on `target`, ordered by start offset.
///
/// Records that are not readable comments are logged and left out.
/// Comments whose offsets do not parse sort last and are skipped by the
/// engine later on.
pub(crate) async fn comments_on(
    ledger: &dyn DocumentLedger,
    target: &DocumentHash,
) -> Result<Vec<Comment>, DomainError> {
    let mut comments: Vec<Comment> = ledger
        .get_comments(target)
        .await?
        .into_iter()
        .filter(DocumentRecord::is_live)
        .filter_map(|record| match Comment::from_document(record.document) {
            Ok(comment) => Some(comment),
            Err(err) => {
                warn!(hash = %record.hash, error = %err, "skipping unreadable comment");
                None
            }
        })
        .collect();
    comments.sort_by_key(|c| c.start_offset().unwrap_or(usize::MAX));
    Ok(comments)
}

/// Live comments on one section of `target`, ordered by start offset.
pub(crate) async fn section_comments(
    ledger: &dyn DocumentLedger,
    target: &DocumentHash,
    section: &str,
) -> Result<Vec<Comment>, DomainError> {
    Ok(comments_on(ledger, target)
        .await?
        .into_iter()
        .filter(|c| c.targets(target, section))
        .collect())
}

/// The newest live plain document stored at `path`.
pub(crate) async fn current_document(
    ledger: &dyn DocumentLedger,
    path: &str,
) -> Result<Option<DocumentRecord>, DomainError> {
    let records = ledger.get_documents(path).await?;
    Ok(latest_live(records, |d| {
        d.document_type() == DocumentType::Document
    }))
}

/// The live successor of `hash`, following its `updated_by` links.
///
/// Documents keep the unit hash they were created under, so any hash in
/// a unit's history resolves to the record that currently holds its
/// stewards and state.
pub(crate) async fn live_unit(
    registry: &dyn UnitRegistry,
    hash: &UnitHash,
) -> Result<Option<UnitRecord>, DomainError> {
    let mut seen = HashSet::new();
    let mut next = hash.clone();
    loop {
        let Some(record) = registry.get_unit(&next).await? else {
            return Ok(None);
        };
        match record.updated_by.last() {
            Some(successor) if seen.insert(next.clone()) => next = successor.clone(),
            Some(_) => return Ok(None),
            None => return Ok(Some(record)),
        }
    }
}
