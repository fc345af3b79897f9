//! TreeReader port - hierarchical index of unit and document paths.
//!
//! Navigation only; the editing engine never consults it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, UnitHash};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    /// Last path segment.
    pub label: String,
    /// Full dotted path.
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_hash: Option<UnitHash>,
    /// Live documents stored at this path.
    pub document_count: usize,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn find(&self, path: &str) -> Option<&TreeNode> {
        if self.path == path {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(path))
    }
}

#[async_trait]
pub trait TreeReader: Send + Sync {
    /// Root nodes, children ordered by label.
    async fn get_tree(&self) -> Result<Vec<TreeNode>, DomainError>;
}
