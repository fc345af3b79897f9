//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).

pub mod handlers;

pub use handlers::{
    // Comment handlers
    ApplyApprovedCommentsCommand, ApplyApprovedCommentsHandler, CreateCommentCommand,
    CreateCommentHandler, ResolveCommentsCommand, ResolveCommentsHandler,
    SetCommentStatusCommand, SetCommentStatusHandler,
    // Document handlers
    DocumentEdit, EditDocumentCommand, EditDocumentHandler,
    GetDocumentOverviewHandler, GetDocumentOverviewQuery,
    // Control handlers
    RecordControlMarkCommand, RecordControlMarkHandler,
    // Unit handlers
    AdvanceStateCommand, AdvanceStateHandler, CreateUnitCommand, CreateUnitHandler,
    UnitChange, UpdateUnitCommand, UpdateUnitHandler,
};
