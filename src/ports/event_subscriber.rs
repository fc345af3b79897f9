//! EventSubscriber port - Interface for reacting to domain events.
//!
//! The rendering layer subscribes to document and comment events and
//! re-fetches what it shows.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Handler for processing domain events.
///
/// Implementations should be idempotent: the same event may arrive twice.
///
/// # Example
///
/// ```ignore
/// struct SectionView { /* ... */ }
///
/// #[async_trait]
/// impl EventHandler for SectionView {
///     async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
///         let updated: DocumentUpdated = event.payload_as()?;
///         // reload updated.document_hash ...
///         Ok(())
///     }
///
///     fn name(&self) -> &'static str {
///         "SectionView"
///     }
/// }
/// ```
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Handler name for logging and error messages.
    fn name(&self) -> &'static str;
}

/// Port for subscribing to domain events by type.
pub trait EventSubscriber: Send + Sync {
    fn subscribe(&self, event_type: &str, handler: Arc<dyn EventHandler>);

    /// Subscribe one handler to several event types.
    fn subscribe_all(&self, event_types: &[&str], handler: Arc<dyn EventHandler>);
}

/// Publishing and subscribing in one.
pub trait EventBus: super::EventPublisher + EventSubscriber {}

impl<T: super::EventPublisher + EventSubscriber> EventBus for T {}
