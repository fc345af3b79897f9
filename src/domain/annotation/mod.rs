//! Annotation engine - range arithmetic over section text.
//!
//! Everything here is pure and synchronous. The engine works on any
//! [`Anchored`] value so it can be exercised without loading documents.

mod apply;
mod errors;
mod highlight;
mod overlap;
mod range;

pub use apply::apply_approved_comments;
pub use errors::AnnotationError;
pub use highlight::{Fragment, HighlightView, HilightRange, SelectionPoint};
pub use overlap::{has_conflict, overlap_closure, OverlapClosure};
pub use range::{intervals_overlap, TextRange};

use crate::domain::foundation::CommentStatus;

/// Something anchored to a range of section text.
pub trait Anchored {
    /// The anchored range. Fails when stored offsets do not parse.
    fn range(&self) -> Result<TextRange, AnnotationError>;

    fn status(&self) -> CommentStatus;

    /// Replacement text. `Some("")` deletes the range; `None` leaves the
    /// text alone.
    fn suggestion(&self) -> Option<&str>;
}
