//! This module provides functions for analyzing machine definitions for problems that do not
//! prevent a machine from being built but usually point at a mistake: states that can never be
//! reached, accepting states with rules that will never fire, and declared input symbols that
//! no rule ever reads.
//!
//! Structural problems (nondeterminism, arity, unknown states) are errors and are reported by
//! [`MachineBuilder::build`](crate::MachineBuilder::build) instead.

use crate::types::{Program, Symbol};
use std::collections::HashSet;
use std::fmt;

/// A non-fatal finding about a [`Program`].
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Lint {
    /// States that cannot be reached from the start state.
    UnreachableStates(Vec<String>),
    /// Accepting states that declare transitions. A run stops as soon as it enters an
    /// accepting state, so these transitions never apply.
    AcceptingStatesWithRules(Vec<String>),
    /// Alphabet symbols that no transition reads on the input tape.
    UnreadSymbols(Vec<Symbol>),
    /// The blank symbol is also declared as an input symbol.
    BlankInAlphabet(Symbol),
}

impl fmt::Display for Lint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lint::UnreachableStates(states) => {
                write!(f, "Unreachable states detected: {:?}", states)
            }
            Lint::AcceptingStatesWithRules(states) => {
                write!(f, "Accepting states have transitions that never apply: {:?}", states)
            }
            Lint::UnreadSymbols(symbols) => write!(
                f,
                "Alphabet symbols not read by any transition: {:?}",
                symbols
            ),
            Lint::BlankInAlphabet(blank) => {
                write!(f, "Blank symbol {:?} is part of the alphabet", blank)
            }
        }
    }
}

/// Analyzes a given `Program` and returns every lint found, in a stable order.
///
/// # Arguments
///
/// * `program` - A reference to the `Program` to be analyzed.
pub fn analyze(program: &Program) -> Vec<Lint> {
    [
        check_unreachable_states,
        check_accepting_states,
        check_unread_symbols,
        check_blank_in_alphabet,
    ]
    .iter()
    .filter_map(|check| check(program))
    .collect()
}

/// Checks for unreachable states by traversing the transitions from the start state.
///
/// Any state declared in the program that cannot be reached through any sequence of
/// transitions is reported.
fn check_unreachable_states(program: &Program) -> Option<Lint> {
    let initial_state = program.initial_state()?;
    let mut visited = HashSet::new();
    let mut queue = vec![initial_state];

    while let Some(state) = queue.pop() {
        if !visited.insert(state) {
            continue;
        }

        if let Some(rules) = program.states.iter().find(|rules| rules.name == state) {
            for transition in &rules.transitions {
                if !visited.contains(transition.next_state.as_str()) {
                    queue.push(&transition.next_state);
                }
            }
        }
    }

    let unreachable: Vec<String> = program
        .states
        .iter()
        .filter(|rules| !visited.contains(rules.name.as_str()))
        .map(|rules| rules.name.clone())
        .collect();

    (!unreachable.is_empty()).then_some(Lint::UnreachableStates(unreachable))
}

/// Checks whether any accepting state declares transitions.
fn check_accepting_states(program: &Program) -> Option<Lint> {
    let states: Vec<String> = program
        .states
        .iter()
        .filter(|rules| program.is_accepting(&rules.name) && !rules.transitions.is_empty())
        .map(|rules| rules.name.clone())
        .collect();

    (!states.is_empty()).then_some(Lint::AcceptingStatesWithRules(states))
}

/// Checks that every declared alphabet symbol is read on the input tape by some transition.
///
/// Such a symbol makes every run on an input containing it reject at the first encounter.
fn check_unread_symbols(program: &Program) -> Option<Lint> {
    let read: HashSet<Symbol> = program
        .states
        .iter()
        .flat_map(|rules| &rules.transitions)
        .filter_map(|transition| transition.read.first().copied())
        .collect();

    let mut unread: Vec<Symbol> = program
        .alphabet
        .iter()
        .filter(|symbol| !read.contains(symbol))
        .copied()
        .collect();

    if unread.is_empty() {
        return None;
    }

    unread.sort();
    unread.dedup();
    Some(Lint::UnreadSymbols(unread))
}

fn check_blank_in_alphabet(program: &Program) -> Option<Lint> {
    program
        .alphabet
        .contains(&program.blank)
        .then_some(Lint::BlankInAlphabet(program.blank))
}
