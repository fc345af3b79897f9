//! Command infrastructure for CQRS handlers.
//!
//! Every command handler accepts a `CommandMetadata` carrying the acting
//! agent plus correlation context instead of loose parameters.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AgentId;

/// Metadata context for command handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    /// The agent executing this command (required for authorization).
    pub agent_id: AgentId,

    /// Links related operations across a single request.
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,
}

impl CommandMetadata {
    /// Creates new command metadata for the acting agent.
    pub fn new(agent_id: AgentId) -> Self {
        Self {
            agent_id,
            correlation_id: None,
        }
    }

    /// Builder: Add correlation ID for request tracing.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Returns the correlation ID, generating one if not set.
    pub fn correlation_id(&self) -> String {
        self.correlation_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_creates_with_agent_id() {
        let agent = AgentId::new("alice").unwrap();
        let metadata = CommandMetadata::new(agent.clone());

        assert_eq!(metadata.agent_id, agent);
        assert!(metadata.correlation_id.is_none());
    }

    #[test]
    fn explicit_correlation_id_is_preserved() {
        let metadata =
            CommandMetadata::new(AgentId::new("bob").unwrap()).with_correlation_id("corr-1");
        assert_eq!(metadata.correlation_id(), "corr-1");
    }

    #[test]
    fn correlation_id_generates_if_missing() {
        let metadata = CommandMetadata::new(AgentId::new("carol").unwrap());
        assert!(!metadata.correlation_id().is_empty());
    }
}
