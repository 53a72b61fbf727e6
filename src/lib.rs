//! This crate provides the core logic for a deterministic multi-tape Turing machine simulator.
//! It includes modules for describing machines and their transition tables, parsing machine
//! definitions, simulating their execution step by step, analyzing definitions for likely
//! mistakes, and managing a collection of bundled machines.

pub mod analyzer;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod programs;
pub mod table;
pub mod tape;
pub mod trace;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the `analyze` function and `Lint` enum from the analyzer module.
pub use analyzer::{analyze, Lint};
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the machine, its builder and the state of a run from the machine module.
pub use machine::{Execution, Machine, MachineBuilder, Outcome, Report};
/// Re-exports the `parse` function from the parser module.
pub use parser::parse;
/// Re-exports `ProgramInfo`, `ProgramManager`, and `PROGRAMS` from the programs module.
pub use programs::{ProgramInfo, ProgramManager, PROGRAMS};
pub use table::State;
pub use tape::Tape;
pub use trace::{Observer, TracePrinter};
/// Re-exports the types describing machines and runs from the types module.
pub use types::{
    Direction, Halt, MachineError, Mode, Program, Rejection, StateRules, Step, Symbol,
    Transition, DEFAULT_BLANK_SYMBOL, DEFAULT_MAX_STEPS, MAX_PROGRAM_SIZE, MAX_TAPES, PADDING,
};
