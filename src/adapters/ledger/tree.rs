//! Dotted-path trie used to build the navigation tree.

use std::collections::BTreeMap;

use crate::domain::foundation::UnitHash;
use crate::ports::TreeNode;

#[derive(Debug, Default)]
struct TrieNode {
    unit_hash: Option<UnitHash>,
    document_count: usize,
    children: BTreeMap<String, TrieNode>,
}

/// Accumulates paths, then converts to `TreeNode`s ordered by label.
#[derive(Debug, Default)]
pub(crate) struct PathTrie {
    roots: BTreeMap<String, TrieNode>,
}

impl PathTrie {
    pub(crate) fn insert_unit(&mut self, path: &str, hash: UnitHash) {
        if let Some(node) = self.node_mut(path) {
            node.unit_hash = Some(hash);
        }
    }

    pub(crate) fn insert_document(&mut self, path: &str) {
        if let Some(node) = self.node_mut(path) {
            node.document_count += 1;
        }
    }

    pub(crate) fn into_nodes(self) -> Vec<TreeNode> {
        convert(self.roots, None)
    }

    fn node_mut(&mut self, path: &str) -> Option<&mut TrieNode> {
        let mut segments = path.split('.').filter(|s| !s.is_empty());
        let mut node = self.roots.entry(segments.next()?.to_string()).or_default();
        for segment in segments {
            node = node.children.entry(segment.to_string()).or_default();
        }
        Some(node)
    }
}

fn convert(level: BTreeMap<String, TrieNode>, prefix: Option<&str>) -> Vec<TreeNode> {
    level
        .into_iter()
        .map(|(label, node)| {
            let path = match prefix {
                Some(p) => format!("{p}.{label}"),
                None => label.clone(),
            };
            let children = convert(node.children, Some(&path));
            TreeNode {
                label,
                path,
                unit_hash: node.unit_hash,
                document_count: node.document_count,
                children,
            }
        })
        .collect()
}
