//! Unit aggregate.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::document::ProcessRoot;
use crate::domain::foundation::{AgentId, UnitHash, ValidationError};

use super::{TransitionTable, UnitError};

/// Which named process template a unit follows in a given state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRef {
    /// The state this process applies to.
    pub process_type: String,
    pub name: String,
}

impl ProcessRef {
    pub fn new(process_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            process_type: process_type.into(),
            name: name.into(),
        }
    }
}

/// A node in the standards tree.
///
/// Units are replaced, never mutated: `reparent`, `with_stewards` and
/// `with_version` return a successor value without a ledger hash, to be
/// stored by an update that links it to its predecessor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unit_hash: Option<UnitHash>,
    parents: Vec<String>,
    version: String,
    path_abbreviation: String,
    short_name: String,
    stewards: BTreeSet<AgentId>,
    processes: Vec<ProcessRef>,
    #[serde(default)]
    machine: TransitionTable,
}

impl Unit {
    // ════════════════════════════════════════════════════════════════════════════════
    // Construction
    // ════════════════════════════════════════════════════════════════════════════════

    /// Creates a root unit following the canonical transition table.
    pub fn new(
        path_abbreviation: impl Into<String>,
        short_name: impl Into<String>,
    ) -> Result<Self, UnitError> {
        let path_abbreviation = path_abbreviation.into();
        if path_abbreviation.trim().is_empty() {
            return Err(ValidationError::empty_field("path_abbreviation").into());
        }
        if path_abbreviation.contains('.') {
            return Err(ValidationError::invalid_format(
                "path_abbreviation",
                "must be a single path segment",
            )
            .into());
        }
        Ok(Self {
            unit_hash: None,
            parents: Vec::new(),
            version: String::new(),
            path_abbreviation,
            short_name: short_name.into(),
            stewards: BTreeSet::new(),
            processes: Vec::new(),
            machine: TransitionTable::canonical(),
        })
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parents = vec![parent.into()];
        self
    }

    pub fn with_steward(mut self, steward: AgentId) -> Self {
        self.stewards.insert(steward);
        self
    }

    pub fn with_process(mut self, process: ProcessRef) -> Self {
        self.processes.push(process);
        self
    }

    pub fn with_machine(mut self, machine: TransitionTable) -> Self {
        self.machine = machine;
        self
    }

    /// Attaches the ledger identity of a stored unit.
    pub fn persisted(mut self, hash: UnitHash) -> Self {
        self.unit_hash = Some(hash);
        self
    }

    // ════════════════════════════════════════════════════════════════════════════════
    // Successors
    // ════════════════════════════════════════════════════════════════════════════════

    /// Successor with the steward set replaced.
    pub fn with_stewards(&self, stewards: BTreeSet<AgentId>) -> Self {
        Self {
            stewards,
            ..self.successor()
        }
    }

    pub fn with_version(&self, version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..self.successor()
        }
    }

    /// Successor attached under `new_parent`, or made a root with `None`.
    /// The unit may not be moved under itself or any of its descendants.
    pub fn reparent(&self, new_parent: Option<&str>) -> Result<Self, UnitError> {
        let parents = match new_parent {
            None => Vec::new(),
            Some(parent) => {
                let own = self.path();
                if parent == own || parent.starts_with(&format!("{own}.")) {
                    return Err(UnitError::CyclicParent {
                        unit: own,
                        parent: parent.to_string(),
                    });
                }
                vec![parent.to_string()]
            }
        };
        Ok(Self {
            parents,
            ..self.successor()
        })
    }

    fn successor(&self) -> Self {
        Self {
            unit_hash: None,
            ..self.clone()
        }
    }

    // ════════════════════════════════════════════════════════════════════════════════
    // Accessors
    // ════════════════════════════════════════════════════════════════════════════════

    pub fn unit_hash(&self) -> Option<&UnitHash> {
        self.unit_hash.as_ref()
    }

    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn path_abbreviation(&self) -> &str {
        &self.path_abbreviation
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn stewards(&self) -> &BTreeSet<AgentId> {
        &self.stewards
    }

    pub fn processes(&self) -> &[ProcessRef] {
        &self.processes
    }

    pub fn machine(&self) -> &TransitionTable {
        &self.machine
    }

    /// Dotted tree path: the first parent's path plus this abbreviation.
    pub fn path(&self) -> String {
        match self.parents.first() {
            Some(parent) => format!("{}.{}", parent, self.path_abbreviation),
            None => self.path_abbreviation.clone(),
        }
    }

    pub fn is_steward(&self, agent: &AgentId) -> bool {
        self.stewards.contains(agent)
    }

    /// Process the unit follows in `state`, if it declares one.
    pub fn process_name_for(&self, state: &str) -> Option<&str> {
        self.processes
            .iter()
            .find(|p| p.process_type == state)
            .map(|p| p.name.as_str())
    }

    /// Template path of the process followed in `state`.
    pub fn process_path(&self, root: &ProcessRoot, state: &str) -> Option<String> {
        self.process_name_for(state)
            .map(|name| root.template_path(state, name))
    }
}
