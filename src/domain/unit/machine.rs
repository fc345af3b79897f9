//! Per-unit transition table.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::document::states;

static CANONICAL: Lazy<TransitionTable> = Lazy::new(|| {
    TransitionTable::from_pairs([
        (states::DEFINE, vec![states::REFINE, states::DEFUNCT]),
        (states::REFINE, vec![states::ALIGN, states::DEFUNCT]),
        (states::ALIGN, vec![states::ALIVE, states::DEFUNCT]),
        (states::ALIVE, vec![states::DEFUNCT]),
        (states::DEFUNCT, vec![]),
    ])
});

/// Legal next states keyed by state. Fixed when the unit is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransitionTable(BTreeMap<String, Vec<String>>);

impl TransitionTable {
    /// define → refine → align → _alive, with _defunct reachable from
    /// every live state.
    pub fn canonical() -> Self {
        CANONICAL.clone()
    }

    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Vec<&'a str>)>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(from, to)| {
                    (
                        from.to_string(),
                        to.into_iter().map(str::to_string).collect(),
                    )
                })
                .collect(),
        )
    }

    /// Legal next states; empty for terminal and unknown states.
    pub fn next_states_from(&self, state: &str) -> &[String] {
        self.0.get(state).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn can_transition(&self, from: &str, to: &str) -> bool {
        self.next_states_from(from).iter().any(|s| s == to)
    }

    pub fn contains_state(&self, state: &str) -> bool {
        self.0.contains_key(state)
    }

    pub fn is_terminal(&self, state: &str) -> bool {
        self.next_states_from(state).is_empty()
    }
}

impl Default for TransitionTable {
    fn default() -> Self {
        Self::canonical()
    }
}
