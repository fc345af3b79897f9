//! Unit module - tree nodes with a per-unit lifecycle.
//!
//! # States
//!
//! ```text
//! define ──► refine ──► align ──► _alive
//!    │          │         │         │
//!    └──────────┴─────────┴─────────┴──► _defunct
//! ```
//!
//! The table is data on each unit; the diagram is the canonical one.

mod advance;
mod aggregate;
mod errors;
mod events;
mod machine;

pub use advance::{initial_document, offered_transitions, plan_advance, Template};
pub use aggregate::{ProcessRef, Unit};
pub use errors::UnitError;
pub use events::{UnitCreated, UnitStateAdvanced, UnitUpdated};
pub use machine::TransitionTable;
