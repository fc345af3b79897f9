//! Ledger adapters.
//!
//! - `InMemoryLedger` - Document, unit and tree ports over shared in-process state

mod in_memory;
mod tree;

pub use in_memory::InMemoryLedger;
