//! This module defines the multi-tape execution engine.
//!
//! A [`MachineBuilder`] collects states and validates them eagerly into an immutable
//! [`Machine`]. Each call to [`Machine::start`] allocates fresh tapes for one run and returns an
//! [`Execution`], which drives the step loop until the machine accepts, finds no applicable
//! transition or exhausts its step budget.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::table::State;
use crate::tape::Tape;
use crate::trace::Observer;
use crate::types::{
    Halt, MachineError, Mode, Program, Rejection, StateRules, Step, Symbol, DEFAULT_BLANK_SYMBOL,
    MAX_TAPES,
};

/// Collects the parts of a machine and validates them into a [`Machine`].
///
/// The first state added is the start state.
#[derive(Debug, Clone)]
pub struct MachineBuilder {
    name: String,
    tapes: usize,
    blank: Symbol,
    alphabet: Vec<Symbol>,
    accept: Vec<String>,
    padding: bool,
    mode: Mode,
    states: Vec<State>,
}

impl MachineBuilder {
    /// Starts a machine with `tapes` tapes and the default blank symbol.
    pub fn new(tapes: usize) -> Self {
        Self {
            name: String::new(),
            tapes,
            blank: DEFAULT_BLANK_SYMBOL,
            alphabet: Vec::new(),
            accept: Vec::new(),
            padding: false,
            mode: Mode::default(),
            states: Vec::new(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn blank(mut self, blank: Symbol) -> Self {
        self.blank = blank;
        self
    }

    /// Declares the input alphabet. How it is applied depends on [`Mode`].
    pub fn alphabet(mut self, alphabet: impl IntoIterator<Item = Symbol>) -> Self {
        self.alphabet = alphabet.into_iter().collect();
        self
    }

    /// Marks the named states as accepting.
    pub fn accept<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accept.extend(states.into_iter().map(Into::into));
        self
    }

    /// Keeps blank padding around every head after each step.
    pub fn padding(mut self, padding: bool) -> Self {
        self.padding = padding;
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Adds a state with its transition table.
    pub fn state(mut self, state: State) -> Self {
        self.states.push(state);
        self
    }

    pub fn states(mut self, states: impl IntoIterator<Item = State>) -> Self {
        self.states.extend(states);
        self
    }

    /// Validates the collected parts and produces the machine.
    ///
    /// # Errors
    ///
    /// * `MachineError::NoTapes` if the tape count is zero.
    /// * `MachineError::TooManyTapes` if the tape count exceeds [`MAX_TAPES`].
    /// * `MachineError::NoStartState` if no state was added.
    /// * `MachineError::DuplicateState` if two states share a name.
    /// * `MachineError::ArityMismatch` if a transition does not cover every tape exactly once.
    /// * `MachineError::UnknownState` if a transition or the accepting set names an undeclared state.
    pub fn build(self) -> Result<Machine, MachineError> {
        if self.tapes == 0 {
            return Err(MachineError::NoTapes);
        }
        if self.tapes > MAX_TAPES {
            return Err(MachineError::TooManyTapes {
                count: self.tapes,
                max: MAX_TAPES,
            });
        }
        if self.states.is_empty() {
            return Err(MachineError::NoStartState);
        }

        let mut index = HashMap::with_capacity(self.states.len());
        for (i, state) in self.states.iter().enumerate() {
            if index.insert(state.name().to_string(), i).is_some() {
                return Err(MachineError::DuplicateState(state.name().to_string()));
            }
        }

        for state in &self.states {
            for transition in state.transitions() {
                if transition.read.len() != self.tapes
                    || transition.write.len() != self.tapes
                    || transition.directions.len() != self.tapes
                {
                    return Err(MachineError::ArityMismatch {
                        state: state.name().to_string(),
                        expected: self.tapes,
                        read: transition.read.len(),
                        write: transition.write.len(),
                        directions: transition.directions.len(),
                    });
                }

                if !index.contains_key(&transition.next_state) {
                    return Err(MachineError::UnknownState(transition.next_state.clone()));
                }
            }
        }

        let mut accepting = HashSet::with_capacity(self.accept.len());
        for name in &self.accept {
            match index.get(name) {
                Some(&i) => {
                    accepting.insert(i);
                }
                None => return Err(MachineError::UnknownState(name.clone())),
            }
        }

        debug!(
            name = %self.name,
            tapes = self.tapes,
            states = self.states.len(),
            accepting = accepting.len(),
            "machine built"
        );

        Ok(Machine {
            name: self.name,
            tapes: self.tapes,
            blank: self.blank,
            alphabet: self.alphabet,
            padding: self.padding,
            mode: self.mode,
            states: self.states,
            index,
            accepting,
        })
    }
}

/// A validated, immutable multi-tape machine.
///
/// A machine holds no run state, so it can be shared freely between runs and threads.
#[derive(Debug, Clone)]
pub struct Machine {
    name: String,
    tapes: usize,
    blank: Symbol,
    alphabet: Vec<Symbol>,
    padding: bool,
    mode: Mode,
    states: Vec<State>,
    index: HashMap<String, usize>,
    accepting: HashSet<usize>,
}

impl Machine {
    pub fn builder(tapes: usize) -> MachineBuilder {
        MachineBuilder::new(tapes)
    }

    /// Builds a machine from a declarative [`Program`].
    pub fn from_program(program: &Program) -> Result<Self, MachineError> {
        let states = program
            .states
            .iter()
            .map(State::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Machine::builder(program.tapes)
            .name(program.name.as_str())
            .blank(program.blank)
            .alphabet(program.alphabet.iter().copied())
            .accept(program.accept.iter().cloned())
            .padding(program.padding)
            .mode(program.mode)
            .states(states)
            .build()
    }

    /// Turns the machine back into plain data.
    pub fn to_program(&self) -> Program {
        let mut accept: Vec<_> = self.accepting.iter().copied().collect();
        accept.sort_unstable();

        Program {
            name: self.name.clone(),
            tapes: self.tapes,
            blank: self.blank,
            alphabet: self.alphabet.clone(),
            accept: accept
                .into_iter()
                .map(|i| self.states[i].name().to_string())
                .collect(),
            padding: self.padding,
            mode: self.mode,
            states: self.states.iter().map(StateRules::from).collect(),
        }
    }

    /// Starts a run on `input` without executing any step.
    ///
    /// Tape 0 holds the input from position 0 onwards, every other tape is blank, and all
    /// heads start at position 0.
    ///
    /// # Errors
    ///
    /// * `MachineError::InvalidInput` in [`Mode::Strict`] when the input holds a symbol that
    ///   is neither in the alphabet nor the blank symbol.
    pub fn start(&self, input: &str, max_steps: usize) -> Result<Execution<'_>, MachineError> {
        self.check_input(input)?;
        Ok(Execution::new(self, input, max_steps))
    }

    /// Runs the machine on `input` until it halts.
    pub fn run(&self, input: &str, max_steps: usize) -> Result<Outcome, MachineError> {
        let mut execution = self.start(input, max_steps)?;
        let halt = execution.run();
        Ok(execution.finish(halt))
    }

    /// Runs the machine on `input`, reporting the initial configuration and every step to
    /// `observer`.
    pub fn run_observed(
        &self,
        input: &str,
        max_steps: usize,
        observer: &mut dyn Observer,
    ) -> Result<Outcome, MachineError> {
        let mut execution = self.start(input, max_steps)?;
        observer.observe(&execution);

        let halt = loop {
            match execution.step() {
                Step::Continue => observer.observe(&execution),
                Step::Halt(halt) => break halt,
            }
        };

        Ok(execution.finish(halt))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of tapes.
    pub fn tape_count(&self) -> usize {
        self.tapes
    }

    pub fn blank(&self) -> Symbol {
        self.blank
    }

    /// The declared input alphabet.
    pub fn alphabet(&self) -> &[Symbol] {
        &self.alphabet
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn padding(&self) -> bool {
        self.padding
    }

    /// Name of the start state.
    pub fn initial_state(&self) -> &str {
        self.states[0].name()
    }

    /// Looks up a state by name.
    pub fn state(&self, name: &str) -> Option<&State> {
        self.index.get(name).map(|&i| &self.states[i])
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn is_accepting(&self, name: &str) -> bool {
        self.index
            .get(name)
            .is_some_and(|i| self.accepting.contains(i))
    }

    fn check_input(&self, input: &str) -> Result<(), MachineError> {
        if self.mode == Mode::Normal {
            return Ok(());
        }

        match input
            .chars()
            .enumerate()
            .find(|&(_, c)| c != self.blank && !self.alphabet.contains(&c))
        {
            Some((position, symbol)) => Err(MachineError::InvalidInput { symbol, position }),
            None => Ok(()),
        }
    }
}

/// The state of one run of a [`Machine`].
///
/// An execution owns its tapes; the machine is only borrowed, so several executions of the
/// same machine can proceed independently.
#[derive(Debug, Clone)]
pub struct Execution<'m> {
    machine: &'m Machine,
    input: Vec<Symbol>,
    state: usize,
    tapes: Vec<Tape>,
    step_count: usize,
    max_steps: usize,
    halt: Option<Halt>,
}

impl<'m> Execution<'m> {
    fn new(machine: &'m Machine, input: &str, max_steps: usize) -> Self {
        let input: Vec<Symbol> = input.chars().collect();
        let tapes = Self::initial_tapes(machine, &input);

        Self {
            machine,
            input,
            state: 0,
            tapes,
            step_count: 0,
            max_steps,
            halt: None,
        }
    }

    fn initial_tapes(machine: &Machine, input: &[Symbol]) -> Vec<Tape> {
        let mut tapes = Vec::with_capacity(machine.tapes);
        tapes.push(Tape::with_content(machine.blank, input.iter().copied()));
        tapes.extend((1..machine.tapes).map(|_| Tape::new(machine.blank)));

        if machine.padding {
            tapes.iter_mut().for_each(Tape::enforce_padding);
        }

        tapes
    }

    /// Executes a single step.
    ///
    /// # Returns
    ///
    /// * `Step::Continue` if a transition was applied.
    /// * `Step::Halt(_)` once the run has a verdict. Later calls keep returning the same halt.
    pub fn step(&mut self) -> Step {
        if let Some(halt) = &self.halt {
            return Step::Halt(halt.clone());
        }

        match self.advance() {
            Ok(()) => Step::Continue,
            Err(halt) => {
                debug!(
                    machine = %self.machine.name,
                    state = self.state(),
                    steps = self.step_count,
                    ?halt,
                    "machine halted"
                );
                self.halt = Some(halt.clone());
                Step::Halt(halt)
            }
        }
    }

    fn advance(&mut self) -> Result<(), Halt> {
        if self.machine.accepting.contains(&self.state) {
            return Err(Halt::Accepted);
        }

        if self.step_count > self.max_steps {
            return Err(Halt::StepLimit);
        }

        let machine = self.machine;
        let symbols = self.symbols();
        let current = &machine.states[self.state];
        let transition = current.lookup(&symbols).ok_or_else(|| {
            Halt::Rejected(Rejection {
                state: current.name().to_string(),
                symbols: symbols.clone(),
            })
        })?;

        // Validated by the builder.
        self.state = machine.index[&transition.next_state];

        for (tape, &symbol) in self.tapes.iter_mut().zip(&transition.write) {
            tape.write(symbol);
        }

        for (tape, &direction) in self.tapes.iter_mut().zip(&transition.directions) {
            tape.shift(direction);
        }

        if machine.padding {
            self.tapes.iter_mut().for_each(Tape::enforce_padding);
        }

        self.step_count += 1;
        trace!(
            step = self.step_count,
            state = self.state(),
            heads = ?self.heads(),
            "step"
        );

        Ok(())
    }

    /// Runs until the machine halts and returns the verdict.
    pub fn run(&mut self) -> Halt {
        loop {
            if let Step::Halt(halt) = self.step() {
                return halt;
            }
        }
    }

    /// Resets the run to its initial configuration.
    pub fn reset(&mut self) {
        self.state = 0;
        self.tapes = Self::initial_tapes(self.machine, &self.input);
        self.step_count = 0;
        self.halt = None;
    }

    /// Consumes the run and packages its final configuration.
    fn finish(self, halt: Halt) -> Outcome {
        Outcome {
            halt,
            state: self.state().to_string(),
            steps: self.step_count,
            tapes: self.tapes,
        }
    }

    /// Returns the name of the current state.
    pub fn state(&self) -> &str {
        self.machine.states[self.state].name()
    }

    pub fn machine(&self) -> &'m Machine {
        self.machine
    }

    /// Returns the verdict, if the run has halted.
    pub fn halt(&self) -> Option<&Halt> {
        self.halt.as_ref()
    }

    /// Returns the total number of steps executed.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    pub fn tapes(&self) -> &[Tape] {
        &self.tapes
    }

    /// Returns the head position of every tape.
    pub fn heads(&self) -> Vec<i64> {
        self.tapes.iter().map(Tape::head).collect()
    }

    /// Returns the symbol under each head.
    pub fn symbols(&self) -> Vec<Symbol> {
        self.tapes.iter().map(Tape::read).collect()
    }
}

/// The final configuration of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// How the run ended.
    pub halt: Halt,
    /// The state the machine was in when it halted.
    pub state: String,
    /// Number of steps executed.
    pub steps: usize,
    /// The tapes as they were when the machine halted.
    pub tapes: Vec<Tape>,
}

impl Outcome {
    pub fn is_accepted(&self) -> bool {
        self.halt.is_accepted()
    }

    /// Returns tape `index`, if the machine has that many tapes.
    pub fn tape(&self, index: usize) -> Option<&Tape> {
        self.tapes.get(index)
    }

    /// A serializable summary of the outcome.
    pub fn report(&self) -> Report {
        Report {
            halt: self.halt.clone(),
            state: self.state.clone(),
            steps: self.steps,
            heads: self.tapes.iter().map(Tape::head).collect(),
            tapes: self.tapes.iter().map(Tape::trimmed).collect(),
        }
    }
}

/// Plain-data view of an [`Outcome`], with each tape trimmed of surrounding blanks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub halt: Halt,
    pub state: String,
    pub steps: usize,
    pub heads: Vec<i64>,
    pub tapes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction::{Left, Right, Stay};
    use crate::types::DEFAULT_MAX_STEPS;

    fn create_simple_multi_tape_machine() -> Machine {
        // Replace ['a', '-'] with ['b', 'y'], move right on both tapes, then accept.
        let mut start = State::new("start");
        start
            .register(['a', '-'], "halt", ['b', 'y'], [Right, Right])
            .unwrap();

        Machine::builder(2)
            .name("Simple Multi-Tape Test")
            .blank('-')
            .accept(["halt"])
            .state(start)
            .state(State::new("halt"))
            .build()
            .unwrap()
    }

    fn copy_machine() -> Machine {
        // Copies tape 0 onto tape 1.
        let mut copy = State::new("copy");
        copy.register(['0', '_'], "copy", ['0', '0'], [Right, Right])
            .unwrap();
        copy.register(['1', '_'], "copy", ['1', '1'], [Right, Right])
            .unwrap();
        copy.register(['_', '_'], "done", ['_', '_'], [Stay, Stay])
            .unwrap();

        Machine::builder(2)
            .name("Copy")
            .alphabet(['0', '1'])
            .accept(["done"])
            .state(copy)
            .state(State::new("done"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_multi_tape_machine_creation() {
        let machine = create_simple_multi_tape_machine();
        let execution = machine.start("a", DEFAULT_MAX_STEPS).unwrap();

        assert_eq!(execution.state(), "start");
        assert_eq!(execution.heads(), vec![0, 0]);
        assert_eq!(execution.symbols(), vec!['a', '-']);
        assert_eq!(execution.step_count(), 0);
        assert_eq!(machine.initial_state(), "start");
        assert_eq!(machine.tape_count(), 2);
    }

    #[test]
    fn test_multi_tape_single_step() {
        let machine = create_simple_multi_tape_machine();
        let mut execution = machine.start("a", DEFAULT_MAX_STEPS).unwrap();

        assert_eq!(execution.step(), Step::Continue);
        assert_eq!(execution.state(), "halt");
        assert_eq!(execution.heads(), vec![1, 1]);
        assert_eq!(execution.tapes()[0].contents(), "b");
        assert_eq!(execution.tapes()[1].contents(), "y");
        assert_eq!(execution.step_count(), 1);

        assert_eq!(execution.step(), Step::Halt(Halt::Accepted));
    }

    #[test]
    fn test_multi_tape_rejection() {
        let machine = create_simple_multi_tape_machine();
        let mut execution = machine.start("z", DEFAULT_MAX_STEPS).unwrap();

        match execution.step() {
            Step::Halt(Halt::Rejected(Rejection { state, symbols })) => {
                assert_eq!(state, "start");
                assert_eq!(symbols, vec!['z', '-']);
            }
            result => panic!("Expected a rejection, but got {:?}", result),
        }
    }

    #[test]
    fn test_accepts_and_stays_halted() {
        let machine = copy_machine();
        let mut execution = machine.start("10", DEFAULT_MAX_STEPS).unwrap();

        assert_eq!(execution.step(), Step::Continue);
        assert_eq!(execution.step(), Step::Continue);
        assert_eq!(execution.step(), Step::Continue);
        assert_eq!(execution.state(), "done");
        assert_eq!(execution.step(), Step::Halt(Halt::Accepted));
        assert_eq!(execution.step(), Step::Halt(Halt::Accepted));
        assert_eq!(execution.step_count(), 3);
        assert_eq!(execution.halt(), Some(&Halt::Accepted));
    }

    #[test]
    fn test_run_copies_input() {
        let machine = copy_machine();
        let outcome = machine.run("1011", DEFAULT_MAX_STEPS).unwrap();

        assert!(outcome.is_accepted());
        assert_eq!(outcome.state, "done");
        assert_eq!(outcome.steps, 5);
        assert_eq!(outcome.tape(0).unwrap().trimmed(), "1011");
        assert_eq!(outcome.tape(1).unwrap().trimmed(), "1011");
        assert_eq!(outcome.tape(1).unwrap().head(), 4);
        assert!(outcome.tape(2).is_none());
    }

    #[test]
    fn test_rejection_leaves_tapes_untouched() {
        let machine = copy_machine();
        let mut execution = machine.start("1x1", DEFAULT_MAX_STEPS).unwrap();

        assert_eq!(execution.step(), Step::Continue);
        let before = execution.tapes().to_vec();

        assert_eq!(
            execution.step(),
            Step::Halt(Halt::Rejected(Rejection {
                state: "copy".to_string(),
                symbols: vec!['x', '_'],
            }))
        );
        assert_eq!(execution.tapes(), before.as_slice());
        assert_eq!(execution.step_count(), 1);
    }

    #[test]
    fn test_step_limit() {
        let mut spin = State::new("spin");
        spin.register(['_'], "spin", ['_'], [Stay]).unwrap();
        let machine = Machine::builder(1)
            .accept(["end"])
            .state(spin)
            .state(State::new("end"))
            .build()
            .unwrap();

        let outcome = machine.run("", 10).unwrap();
        assert_eq!(outcome.halt, Halt::StepLimit);
        assert_eq!(outcome.steps, 11);

        let outcome = machine.run("", 0).unwrap();
        assert_eq!(outcome.halt, Halt::StepLimit);
        assert_eq!(outcome.steps, 1);
    }

    #[test]
    fn test_accepting_start_state() {
        let machine = Machine::builder(1)
            .accept(["done"])
            .state(State::new("done"))
            .build()
            .unwrap();

        let outcome = machine.run("abc", 0).unwrap();
        assert!(outcome.is_accepted());
        assert_eq!(outcome.steps, 0);
        assert_eq!(outcome.tape(0).unwrap().trimmed(), "abc");
    }

    #[test]
    fn test_reset() {
        let machine = copy_machine();
        let mut execution = machine.start("01", DEFAULT_MAX_STEPS).unwrap();
        let initial = execution.tapes().to_vec();

        execution.run();
        assert_eq!(execution.state(), "done");

        execution.reset();
        assert_eq!(execution.state(), "copy");
        assert_eq!(execution.tapes(), initial.as_slice());
        assert_eq!(execution.step_count(), 0);
        assert_eq!(execution.halt(), None);
    }

    #[test]
    fn test_padding_keeps_content() {
        let machine = copy_machine();
        let padded = Machine::from_program(&Program {
            padding: true,
            ..machine.to_program()
        })
        .unwrap();

        let plain = machine.run("0110", DEFAULT_MAX_STEPS).unwrap();
        let outcome = padded.run("0110", DEFAULT_MAX_STEPS).unwrap();

        assert_eq!(outcome.halt, plain.halt);
        assert_eq!(outcome.steps, plain.steps);
        assert_eq!(outcome.report().tapes, plain.report().tapes);
        for tape in &outcome.tapes {
            let (lower, upper) = tape.bounds().unwrap();
            assert!(tape.head() - lower >= 2);
            assert!(upper - tape.head() >= 2);
        }
    }

    #[test]
    fn test_build_rejects_arity_mismatch() {
        let mut start = State::new("start");
        start.register(['a'], "start", ['a', 'b'], [Right]).unwrap();

        let error = Machine::builder(1).state(start).build().unwrap_err();
        assert_eq!(
            error,
            MachineError::ArityMismatch {
                state: "start".to_string(),
                expected: 1,
                read: 1,
                write: 2,
                directions: 1,
            }
        );
    }

    #[test]
    fn test_build_rejects_missing_states() {
        assert_eq!(
            Machine::builder(1).build().unwrap_err(),
            MachineError::NoStartState
        );
        assert_eq!(
            Machine::builder(0).state(State::new("q0")).build().unwrap_err(),
            MachineError::NoTapes
        );
    }

    #[test]
    fn test_build_rejects_too_many_tapes() {
        let error = Machine::builder(usize::MAX / 2)
            .accept(["q0"])
            .state(State::new("q0"))
            .build()
            .unwrap_err();
        assert_eq!(
            error,
            MachineError::TooManyTapes {
                count: usize::MAX / 2,
                max: MAX_TAPES,
            }
        );

        let widest = Machine::builder(MAX_TAPES)
            .accept(["q0"])
            .state(State::new("q0"))
            .build()
            .unwrap();
        let outcome = widest.run("", 10).unwrap();
        assert!(outcome.is_accepted());
        assert_eq!(outcome.tapes.len(), MAX_TAPES);
    }

    #[test]
    fn test_build_rejects_unknown_states() {
        let mut start = State::new("start");
        start.register(['a'], "nowhere", ['a'], [Right]).unwrap();
        assert_eq!(
            Machine::builder(1).state(start).build().unwrap_err(),
            MachineError::UnknownState("nowhere".to_string())
        );

        let error = Machine::builder(1)
            .accept(["qf"])
            .state(State::new("q0"))
            .build()
            .unwrap_err();
        assert_eq!(error, MachineError::UnknownState("qf".to_string()));
    }

    #[test]
    fn test_build_rejects_duplicate_states() {
        let error = Machine::builder(1)
            .state(State::new("q0"))
            .state(State::new("q0"))
            .build()
            .unwrap_err();

        assert_eq!(error, MachineError::DuplicateState("q0".to_string()));
    }

    #[test]
    fn test_strict_mode_checks_input() {
        let machine = Machine::from_program(&Program {
            mode: Mode::Strict,
            ..copy_machine().to_program()
        })
        .unwrap();

        assert_eq!(
            machine.run("10a1", DEFAULT_MAX_STEPS).unwrap_err(),
            MachineError::InvalidInput {
                symbol: 'a',
                position: 2,
            }
        );
        assert!(machine.run("1_0", DEFAULT_MAX_STEPS).is_ok());

        // Normal mode keeps the alphabet advisory.
        let outcome = copy_machine().run("10a1", DEFAULT_MAX_STEPS).unwrap();
        assert!(matches!(outcome.halt, Halt::Rejected(_)));
    }

    #[test]
    fn test_program_round_trip() {
        let machine = copy_machine();
        let program = machine.to_program();

        assert_eq!(program.initial_state(), Some("copy"));
        assert_eq!(program.accept, vec!["done".to_string()]);
        assert_eq!(program.transition_count(), 3);
        assert_eq!(Machine::from_program(&program).unwrap().to_program(), program);
    }

    #[test]
    fn test_run_observed_sees_every_step() {
        let machine = copy_machine();
        let mut seen = Vec::new();
        let mut observer = |execution: &Execution<'_>| {
            seen.push((execution.step_count(), execution.state().to_string()));
        };

        let outcome = machine
            .run_observed("01", DEFAULT_MAX_STEPS, &mut observer)
            .unwrap();

        assert_eq!(outcome.steps, 3);
        assert_eq!(
            seen,
            vec![
                (0, "copy".to_string()),
                (1, "copy".to_string()),
                (2, "copy".to_string()),
                (3, "done".to_string()),
            ]
        );
    }

    #[test]
    fn test_report() {
        let outcome = copy_machine().run("11", DEFAULT_MAX_STEPS).unwrap();
        let report = outcome.report();

        assert_eq!(report.halt, Halt::Accepted);
        assert_eq!(report.tapes, vec!["11".to_string(), "11".to_string()]);
        assert_eq!(report.heads, vec![2, 2]);

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"halt\":\"Accepted\""));
    }
}
