//! Ports - Interfaces for external collaborators.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the engine and the outside world. Adapters implement these ports.
//!
//! ## Ledger Ports
//!
//! - `DocumentLedger` - Append-only document store with marks
//! - `UnitRegistry` - Unit store and state advancement
//! - `TreeReader` - Path hierarchy for navigation
//!
//! ## Event Ports
//!
//! - `EventPublisher` - Publishing domain events
//! - `EventSubscriber` / `EventHandler` - Reacting to them

mod document_ledger;
mod event_publisher;
mod event_subscriber;
mod tree_reader;
mod unit_registry;

pub use document_ledger::{latest_live, DocumentLedger, DocumentRecord, UpdateDocument};
pub use event_publisher::EventPublisher;
pub use event_subscriber::{EventBus, EventHandler, EventSubscriber};
pub use tree_reader::{TreeNode, TreeReader};
pub use unit_registry::{AdvanceState, UnitRecord, UnitRegistry, UpdateUnit};
