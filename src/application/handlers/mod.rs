//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod comment;
pub mod control;
pub mod document;
pub mod unit;

pub(crate) mod ledger_reads;

#[cfg(test)]
pub(crate) mod test_support;

pub use comment::{
    ApplyApprovedCommentsCommand, ApplyApprovedCommentsError, ApplyApprovedCommentsHandler,
    ApplyApprovedCommentsResult, CreateCommentCommand, CreateCommentError, CreateCommentHandler,
    CreateCommentResult, ResolveCommentsCommand, ResolveCommentsError, ResolveCommentsHandler,
    ResolveCommentsResult, SetCommentStatusCommand, SetCommentStatusError,
    SetCommentStatusHandler, SetCommentStatusResult,
};
pub use control::{
    RecordControlMarkCommand, RecordControlMarkError, RecordControlMarkHandler,
    RecordControlMarkResult,
};
pub use document::{
    CommentSummary, DocumentEdit, DocumentOverview, EditDocumentCommand, EditDocumentError,
    EditDocumentHandler, EditDocumentResult, GetDocumentOverviewError, GetDocumentOverviewHandler,
    GetDocumentOverviewQuery,
};
pub use unit::{
    AdvanceStateCommand, AdvanceStateError, AdvanceStateHandler, AdvanceStateResult,
    CreateUnitCommand, CreateUnitError, CreateUnitHandler, CreateUnitResult, UnitChange,
    UpdateUnitCommand, UpdateUnitError, UpdateUnitHandler, UpdateUnitResult,
};
