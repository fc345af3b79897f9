//! Document handlers - section edits and the document overview query.

mod edit_document;
mod get_document_overview;

pub use edit_document::{
    DocumentEdit, EditDocumentCommand, EditDocumentError, EditDocumentHandler, EditDocumentResult,
};
pub use get_document_overview::{
    CommentSummary, DocumentOverview, GetDocumentOverviewError, GetDocumentOverviewHandler,
    GetDocumentOverviewQuery,
};
