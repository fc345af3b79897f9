//! Alignment Editor - annotation and consensus-gated editing for
//! collaboratively maintained standards.
//!
//! Units in a standards tree move through `define`, `refine` and `align`
//! before going `_alive`. Reviewers anchor comments to character ranges of
//! a unit's document, overlapping comments are resolved jointly, approved
//! suggestions are spliced into the text, and control sections gate
//! commenting, voting and approval.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
