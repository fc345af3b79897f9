//! Comment lifecycle.
//!
//! A comment is a document of type `Comment` whose meta fields anchor it
//! to a range of a section on another document. Its status is never
//! stored; it is reduced from the comment's append-only mark log:
//!
//! ```text
//! Pending ──approve──► Approved
//!    │ ────reject───► Rejected
//!    └──resolve────► Modified
//! ```
//!
//! All three outcomes are terminal.

mod draft;
mod errors;
mod events;
mod excerpt;
mod record;
mod resolution;

pub use draft::CommentDraft;
pub use errors::CommentError;
pub use events::{CommentCreated, CommentStatusChanged, CommentsResolved};
pub use excerpt::ExcerptPolicy;
pub use record::{
    comment_status, Comment, COMMENT_SECTION, META_DOCUMENT, META_END_OFFSET, META_SECTION,
    META_START_OFFSET, SUGGESTION_SECTION,
};
pub use resolution::{ensure_decidable, resolution_marks, resolution_range, status_mark};
