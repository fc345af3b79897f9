//! Domain layer: the annotation and consensus-gated editing engine.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (identifiers, errors, events, state machines)
//! - `document` - Sections, documents, marks, editability and progress rules
//! - `annotation` - Range arithmetic, overlap closure, suggestion application
//! - `comment` - Comment documents, derived status, composition and resolution
//! - `unit` - Units, per-unit transition tables, state advancement
//! - `control` - Comments/voting/approval controls gating actions on documents

pub mod annotation;
pub mod comment;
pub mod control;
pub mod document;
pub mod foundation;
pub mod unit;
