//! This module defines the core data structures and types used throughout the multi-tape
//! machine simulator, including program representation, transitions, run outcomes, and error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Rule;

/// A single tape symbol.
pub type Symbol = char;

/// The default blank symbol used on every tape.
pub const DEFAULT_BLANK_SYMBOL: Symbol = '_';
/// The maximum allowed size for a machine definition in bytes.
pub const MAX_PROGRAM_SIZE: usize = 65536; // 64KB
/// The default step budget of a run.
pub const DEFAULT_MAX_STEPS: usize = 10000;
/// Minimum number of blank cells kept at each end of a padded tape.
pub const PADDING: usize = 2;
/// The maximum number of tapes a machine may declare.
pub const MAX_TAPES: usize = 64;

/// A declarative description of a multi-tape machine.
///
/// A program is plain data: it can be parsed from a `.mtm` file, serialized, and turned
/// into an executable [`Machine`](crate::Machine) with [`Machine::from_program`](crate::Machine::from_program).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Program {
    /// The name of the machine.
    pub name: String,
    /// The number of tapes every transition reads, writes and moves.
    pub tapes: usize,
    /// The blank symbol used on the tapes.
    pub blank: Symbol,
    /// The declared input alphabet.
    pub alphabet: Vec<Symbol>,
    /// Names of the accepting states.
    pub accept: Vec<String>,
    /// Whether every tape keeps blank padding around its head after each step.
    pub padding: bool,
    /// How strictly the alphabet is applied to inputs.
    pub mode: Mode,
    /// The states in declaration order. The first one is the start state.
    pub states: Vec<StateRules>,
}

/// The transitions declared for one state of a [`Program`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StateRules {
    pub name: String,
    pub transitions: Vec<Transition>,
}

/// Controls how the declared alphabet is applied.
///
/// - `Normal` (default): the alphabet is informational only.
/// - `Strict`: inputs containing symbols outside the alphabet are refused before the run starts.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Mode {
    /// The alphabet is advisory.
    #[default]
    Normal,
    /// Input symbols must belong to the alphabet (or be blank).
    Strict,
}

impl Program {
    /// Returns the name of the start state, if any state is declared.
    pub fn initial_state(&self) -> Option<&str> {
        self.states.first().map(|state| state.name.as_str())
    }

    /// Total number of transitions across all states.
    pub fn transition_count(&self) -> usize {
        self.states.iter().map(|state| state.transitions.len()).sum()
    }

    /// Checks if `name` is one of the accepting states.
    pub fn is_accepting(&self, name: &str) -> bool {
        self.accept.iter().any(|accept| accept == name)
    }
}

/// A single transition rule of a multi-tape machine.
///
/// When the machine is in the owning state and reads `read` (one symbol per tape), it writes
/// `write`, moves each head according to `directions` and continues in `next_state`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Symbols to be read from each tape.
    pub read: Vec<Symbol>,
    /// Symbols to be written to each tape.
    pub write: Vec<Symbol>,
    /// Head movement for each tape.
    pub directions: Vec<Direction>,
    /// The state the machine transitions to.
    pub next_state: String,
}

/// Represents the possible directions a tape head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

impl Direction {
    /// The head offset this direction applies.
    pub fn offset(self) -> i64 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
            Direction::Stay => 0,
        }
    }
}

/// Represents the outcome of a single execution step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// The machine performed a step and continues execution.
    Continue,
    /// The machine has reached a verdict.
    Halt(Halt),
}

/// The terminal status of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Halt {
    /// An accepting state was reached.
    Accepted,
    /// No transition applies to the current state and symbols.
    Rejected(Rejection),
    /// The step budget ran out before a verdict was reached.
    StepLimit,
}

impl Halt {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Halt::Accepted)
    }
}

/// Details of a rejection outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub state: String,
    pub symbols: Vec<Symbol>,
}

/// Represents the errors that can occur while defining, loading or starting a machine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MachineError {
    /// A second transition was registered for the same state and read symbols.
    #[error("Nondeterministic transition in state {state} on {symbols:?}")]
    DeterminismViolation { state: String, symbols: Vec<Symbol> },
    /// A transition does not read, write and move exactly one entry per tape.
    #[error(
        "Transition in state {state} has inconsistent tape counts: expected {expected}, \
         read={read}, write={write}, directions={directions}"
    )]
    ArityMismatch {
        state: String,
        expected: usize,
        read: usize,
        write: usize,
        directions: usize,
    },
    /// The machine declares no states, so there is no start state.
    #[error("No start state defined")]
    NoStartState,
    /// A machine needs at least one tape.
    #[error("A machine needs at least one tape")]
    NoTapes,
    /// The machine declares more tapes than [`MAX_TAPES`].
    #[error("Too many tapes: {count} (limit is {max})")]
    TooManyTapes { count: usize, max: usize },
    /// A state name was declared more than once.
    #[error("Duplicate state: {0}")]
    DuplicateState(String),
    /// A transition or accepting set references a state that was never declared.
    #[error("Unknown state: {0}")]
    UnknownState(String),
    /// A strict machine was given an input symbol outside its alphabet.
    #[error("Input symbol {symbol:?} at position {position} is not in the alphabet")]
    InvalidInput { symbol: Symbol, position: usize },
    /// Indicates an error during the parsing of a machine definition.
    #[error("Program parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// Indicates an error during the validation of a machine definition.
    #[error("Program validation error: {0}")]
    ValidationError(String),
    /// Indicates an error related to file system operations.
    #[error("File error: {0}")]
    FileError(String),
}
