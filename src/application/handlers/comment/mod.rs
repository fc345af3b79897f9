//! Comment handlers - annotating, deciding and applying suggestions.

mod apply_approved_comments;
mod create_comment;
mod resolve_comments;
mod set_comment_status;

pub use apply_approved_comments::{
    ApplyApprovedCommentsCommand, ApplyApprovedCommentsError, ApplyApprovedCommentsHandler,
    ApplyApprovedCommentsResult,
};
pub use create_comment::{
    CreateCommentCommand, CreateCommentError, CreateCommentHandler, CreateCommentResult,
};
pub use resolve_comments::{
    ResolveCommentsCommand, ResolveCommentsError, ResolveCommentsHandler, ResolveCommentsResult,
};
pub use set_comment_status::{
    SetCommentStatusCommand, SetCommentStatusError, SetCommentStatusHandler,
    SetCommentStatusResult,
};
