//! Adapters - Implementations of port interfaces.
//!
//! - `events` - In-process event bus
//! - `ledger` - In-memory document ledger, unit registry and tree reader

pub mod events;
pub mod ledger;

pub use events::InMemoryEventBus;
pub use ledger::InMemoryLedger;
