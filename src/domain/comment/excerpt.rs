use serde::{Deserialize, Serialize};

/// How long excerpts are shortened for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcerptPolicy {
    /// Excerpts longer than this many chars are pruned.
    pub threshold: usize,
    /// Chars kept at each end of a pruned excerpt.
    pub keep: usize,
}

impl Default for ExcerptPolicy {
    fn default() -> Self {
        Self {
            threshold: 140,
            keep: 65,
        }
    }
}

impl ExcerptPolicy {
    pub fn prune(&self, excerpt: &str) -> String {
        let len = excerpt.chars().count();
        if len <= self.threshold {
            return excerpt.to_string();
        }
        let head: String = excerpt.chars().take(self.keep).collect();
        let tail: String = excerpt.chars().skip(len.saturating_sub(self.keep)).collect();
        format!("{head}...{tail}")
    }
}
