//! Per-state transition tables.
//!
//! A [`State`] owns a map from the tuple of symbols read (one per tape) to the single
//! [`Transition`] that applies. Registration refuses a second rule for the same tuple, so a
//! machine assembled from states is deterministic by construction.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::types::{Direction, MachineError, StateRules, Symbol, Transition};

/// A named state and its transition table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    name: String,
    rules: HashMap<Vec<Symbol>, Transition>,
    // Registration order, used when the state is turned back into plain data.
    order: Vec<Vec<Symbol>>,
}

impl State {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Registers the rule "reading `read`, write `write`, move by `directions` and continue in
    /// `next_state`".
    ///
    /// # Errors
    ///
    /// * `MachineError::DeterminismViolation` if a rule for `read` already exists, even when the
    ///   new rule is identical to it.
    pub fn register(
        &mut self,
        read: impl Into<Vec<Symbol>>,
        next_state: impl Into<String>,
        write: impl Into<Vec<Symbol>>,
        directions: impl Into<Vec<Direction>>,
    ) -> Result<(), MachineError> {
        self.insert(Transition {
            read: read.into(),
            write: write.into(),
            directions: directions.into(),
            next_state: next_state.into(),
        })
    }

    /// Registers an already assembled [`Transition`], with the same rules as [`State::register`].
    pub fn insert(&mut self, transition: Transition) -> Result<(), MachineError> {
        match self.rules.entry(transition.read.clone()) {
            Entry::Occupied(entry) => Err(MachineError::DeterminismViolation {
                state: self.name.clone(),
                symbols: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                self.order.push(entry.key().clone());
                entry.insert(transition);
                Ok(())
            }
        }
    }

    /// Finds the rule for the symbols currently under the heads. `None` means no rule applies.
    pub fn lookup(&self, read: &[Symbol]) -> Option<&Transition> {
        self.rules.get(read)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Iterates over the rules in registration order.
    pub fn transitions(&self) -> impl Iterator<Item = &Transition> + '_ {
        self.order.iter().filter_map(|read| self.rules.get(read))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl TryFrom<&StateRules> for State {
    type Error = MachineError;

    fn try_from(rules: &StateRules) -> Result<Self, Self::Error> {
        let mut state = State::new(rules.name.as_str());
        for transition in &rules.transitions {
            state.insert(transition.clone())?;
        }

        Ok(state)
    }
}

impl From<&State> for StateRules {
    fn from(state: &State) -> Self {
        StateRules {
            name: state.name.clone(),
            transitions: state.transitions().cloned().collect(),
        }
    }
}
