//! Process tree configuration

use serde::Deserialize;

use crate::domain::document::ProcessRoot;

use super::error::ValidationError;

/// Where process templates live in the tree
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessConfig {
    /// First path segment of the template hierarchy
    #[serde(default = "default_system_root")]
    pub system_root: String,

    /// Second path segment, under which each state has its node
    #[serde(default = "default_process_root")]
    pub process_root: String,
}

impl ProcessConfig {
    /// Builds the domain value handlers are constructed with
    pub fn root(&self) -> Result<ProcessRoot, ValidationError> {
        ProcessRoot::new(&self.system_root, &self.process_root)
            .map_err(|err| ValidationError::InvalidProcessRoot(err.to_string()))
    }

    /// Validate process configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.root().map(|_| ())
    }
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            system_root: default_system_root(),
            process_root: default_process_root(),
        }
    }
}

fn default_system_root() -> String {
    "root".to_string()
}

fn default_process_root() -> String {
    "proc".to_string()
}
