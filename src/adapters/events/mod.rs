//! Event bus adapters.
//!
//! - `InMemoryEventBus` - In-process delivery with a replayable log

mod in_memory;

pub use in_memory::InMemoryEventBus;
