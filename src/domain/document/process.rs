//! Process paths and lifecycle state names.
//!
//! Process templates live in the tree at
//! `<system>.<process>.<state>.<name>`, so the lifecycle state always sits
//! at position 2 of a template path. A section whose `source_path`
//! contains `.<process>.<state>` was defined by that state's process.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Canonical lifecycle state names.
pub mod states {
    pub const DEFINE: &str = "define";
    pub const REFINE: &str = "refine";
    pub const ALIGN: &str = "align";
    /// Terminal success.
    pub const ALIVE: &str = "_alive";
    /// Terminal failure.
    pub const DEFUNCT: &str = "_defunct";
}

/// Position of the state segment inside a process template path.
pub const STATE_POSITION: usize = 2;

/// Root segments of the process template hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRoot {
    system: String,
    process: String,
}

impl ProcessRoot {
    /// Creates a process root. Segments must be non-empty and dot-free.
    pub fn new(system: impl Into<String>, process: impl Into<String>) -> Result<Self, ValidationError> {
        let system = system.into();
        let process = process.into();
        for (field, value) in [("system_root", &system), ("process_root", &process)] {
            if value.is_empty() {
                return Err(ValidationError::empty_field(field));
            }
            if value.contains('.') {
                return Err(ValidationError::invalid_format(field, "must be a single path segment"));
            }
        }
        Ok(Self { system, process })
    }

    pub fn system(&self) -> &str {
        &self.system
    }

    pub fn process(&self) -> &str {
        &self.process
    }

    /// Substring that marks a section as defined by `state`'s process.
    pub fn state_marker(&self, state: &str) -> String {
        format!(".{}.{}", self.process, state)
    }

    /// Returns true if `source_path` belongs to `state`'s process.
    pub fn defines(&self, source_path: &str, state: &str) -> bool {
        source_path.contains(&self.state_marker(state))
    }

    /// Path of the process node for a state, e.g. `root.proc.refine`.
    pub fn state_path(&self, state: &str) -> String {
        format!("{}.{}.{}", self.system, self.process, state)
    }

    /// Path of a named process template for a state.
    pub fn template_path(&self, state: &str, process_name: &str) -> String {
        format!("{}.{}", self.state_path(state), process_name)
    }

    /// Prefixes of `path` from the state segment downward, shallowest first.
    ///
    /// `root.proc.refine.review.deep` yields `root.proc.refine`,
    /// `root.proc.refine.review`, `root.proc.refine.review.deep`. Paths not
    /// under this root yield nothing.
    pub fn template_lineage(&self, path: &str) -> Vec<String> {
        let segments: Vec<&str> = path.split('.').collect();
        if segments.len() <= STATE_POSITION
            || segments[0] != self.system
            || segments[1] != self.process
        {
            return Vec::new();
        }
        (STATE_POSITION..segments.len())
            .map(|last| segments[..=last].join("."))
            .collect()
    }

    /// Extracts the state segment from a template path under this root.
    pub fn state_of<'a>(&self, path: &'a str) -> Option<&'a str> {
        let mut segments = path.split('.');
        let system = segments.next()?;
        let process = segments.next()?;
        if system != self.system || process != self.process {
            return None;
        }
        segments.next()
    }
}

impl Default for ProcessRoot {
    fn default() -> Self {
        Self {
            system: "root".to_string(),
            process: "proc".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_marker_uses_leading_dot() {
        let root = ProcessRoot::default();
        assert_eq!(root.state_marker("refine"), ".proc.refine");
    }

    #[test]
    fn defines_matches_sections_of_that_state() {
        let root = ProcessRoot::default();
        assert!(root.defines("root.proc.refine.whatever", "refine"));
        assert!(!root.defines("root.proc.refine.whatever", "align"));
        assert!(!root.defines("_manual", "refine"));
    }

    #[test]
    fn template_path_places_state_at_position_two() {
        let root = ProcessRoot::default();
        let path = root.template_path("align", "vote");
        assert_eq!(path, "root.proc.align.vote");
        assert_eq!(path.split('.').nth(STATE_POSITION), Some("align"));
        assert_eq!(root.state_of(&path), Some("align"));
    }

    #[test]
    fn template_lineage_walks_from_state_downward() {
        let root = ProcessRoot::default();
        assert_eq!(
            root.template_lineage("root.proc.refine.review.deep"),
            vec![
                "root.proc.refine".to_string(),
                "root.proc.refine.review".to_string(),
                "root.proc.refine.review.deep".to_string(),
            ]
        );
    }

    #[test]
    fn template_lineage_ignores_foreign_paths() {
        let root = ProcessRoot::default();
        assert!(root.template_lineage("other.proc.refine.x").is_empty());
        assert!(root.template_lineage("root.proc").is_empty());
        assert_eq!(root.state_of("other.proc.refine"), None);
    }

    #[test]
    fn new_rejects_dotted_or_empty_segments() {
        assert!(ProcessRoot::new("soc.proto", "process").is_err());
        assert!(ProcessRoot::new("", "process").is_err());
        assert!(ProcessRoot::new("soc_proto", "process").is_ok());
    }
}
