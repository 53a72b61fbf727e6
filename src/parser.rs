//! This module provides the parser for machine definitions, utilizing the `pest` crate.
//! It defines the grammar for `.mtm` files and functions to parse the input into a `Program` struct.

use crate::{
    machine::Machine,
    types::{
        Direction, MachineError, Mode, Program, StateRules, Symbol, Transition,
        DEFAULT_BLANK_SYMBOL, MAX_PROGRAM_SIZE,
    },
};
use pest::{
    error::{Error, ErrorVariant},
    iterators::{Pair, Pairs},
    Parser as PestParser, Span,
};
use pest_derive::Parser as PestParser;
use std::collections::HashSet;

/// Derives a `PestParser` for the machine grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct MachineParser;

/// Parses the given input string into a `Program` struct.
///
/// This is the main entry point for parsing machine definitions. The parsed program is
/// validated by building a [`Machine`] from it before being returned, so a program that
/// comes out of this function always builds.
///
/// # Arguments
///
/// * `input` - A string slice containing the machine definition.
///
/// # Returns
///
/// * `Ok(Program)` if the input is successfully parsed and validated.
/// * `Err(MachineError::ParseError)` if there are any syntax errors.
/// * `Err(MachineError::ValidationError)` if a required section is missing.
/// * Any build error of [`Machine::from_program`], such as `DeterminismViolation`.
pub fn parse(input: &str) -> Result<Program, MachineError> {
    if input.len() > MAX_PROGRAM_SIZE {
        return Err(MachineError::ValidationError(format!(
            "Program is too large: {} bytes (limit is {} bytes)",
            input.len(),
            MAX_PROGRAM_SIZE
        )));
    }

    let root = MachineParser::parse(Rule::program, input.trim())
        .map_err(|e| MachineError::ParseError(e.into()))?
        .next()
        .ok_or_else(|| MachineError::ValidationError("Empty program".to_string()))?;

    let program = parse_program(root)?;

    // Building the machine performs all structural checks.
    Machine::from_program(&program)?;

    Ok(program)
}

/// Parses the top-level structure of a machine definition from a `Pair<Rule::program>`.
///
/// Each header section may appear at most once; `name` and `tapes` are required.
fn parse_program(pair: Pair<Rule>) -> Result<Program, MachineError> {
    let mut name: Option<String> = None;
    let mut tapes: Option<usize> = None;
    let mut blank: Option<Symbol> = None;
    let mut alphabet: Option<Vec<Symbol>> = None;
    let mut accept: Option<Vec<String>> = None;
    let mut padding: Option<bool> = None;
    let mut mode: Option<Mode> = None;
    let mut states: Option<Vec<StateRules>> = None;
    let mut seen = HashSet::new();

    for p in pair.into_inner() {
        let span = p.as_span();
        let rule = p.as_rule();

        check_unique_rule(rule, span, &mut seen)?;

        match rule {
            Rule::name => name = Some(parse_inner_string(p).trim().to_string()),
            Rule::blank => blank = Some(parse_symbol(&parse_inner_string(p))),
            Rule::tapes => tapes = Some(parse_count(p)?),
            Rule::alphabet => alphabet = Some(parse_symbols(p.into_inner().flatten())),
            Rule::accept => {
                accept = Some(p.into_inner().map(|s| s.as_str().to_string()).collect())
            }
            Rule::padding => padding = Some(parse_inner_string(p) == "true"),
            Rule::mode => mode = Some(parse_mode(&parse_inner_string(p))),
            Rule::rules => states = Some(parse_blocks(p)?),
            _ => {} // Skip EOI
        }
    }

    // Handle mandatory checks; a blank name counts as missing
    let name = check_required_rule(name.filter(|name| !name.is_empty()), "name")?;
    let tapes = check_required_rule(tapes, "tapes")?;
    let states = check_required_rule(states, "rules")?;

    Ok(Program {
        name,
        tapes,
        blank: blank.unwrap_or(DEFAULT_BLANK_SYMBOL),
        alphabet: alphabet.unwrap_or_default(),
        accept: accept.unwrap_or_default(),
        padding: padding.unwrap_or(false),
        mode: mode.unwrap_or_default(),
        states,
    })
}

/// Parses the state blocks of the `rules:` section. The first block is the start state.
fn parse_blocks(pair: Pair<Rule>) -> Result<Vec<StateRules>, MachineError> {
    let mut states: Vec<StateRules> = Vec::new();

    for block in pair.into_inner() {
        let span = block.as_span();
        let mut pairs = block.into_inner();
        let name = parse_string(&mut pairs);

        // Prevent a state from being declared twice
        if states.iter().any(|state| state.name == name) {
            return Err(parse_error(&format!("Duplicate state: {name}"), span));
        }

        let transitions = pairs
            .filter(|p| p.as_rule() == Rule::transition)
            .map(parse_transition)
            .collect::<Result<Vec<_>, _>>()?;

        states.push(StateRules { name, transitions });
    }

    Ok(states)
}

/// Parses a single transition from a `Pair<Rule::transition>`:
/// `[read...] -> [write...], [directions...], next`.
fn parse_transition(pair: Pair<Rule>) -> Result<Transition, MachineError> {
    let mut pairs = pair.into_inner();

    let read = parse_symbols(pairs.next().into_iter().flat_map(|p| p.into_inner()));
    let write = parse_symbols(pairs.next().into_iter().flat_map(|p| p.into_inner()));
    let directions = pairs
        .next()
        .into_iter()
        .flat_map(|p| p.into_inner())
        .map(parse_direction)
        .collect::<Result<Vec<_>, _>>()?;
    let next_state = parse_string(&mut pairs);

    Ok(Transition {
        read,
        write,
        directions,
        next_state,
    })
}

/// Parses a single direction from a `Pair<Rule::direction>`.
///
/// Supports 'L' for Left, 'R' for Right, and 'S' for Stay.
fn parse_direction(pair: Pair<Rule>) -> Result<Direction, MachineError> {
    let span = pair.as_span();
    match pair.as_str() {
        "L" => Ok(Direction::Left),
        "R" => Ok(Direction::Right),
        "S" => Ok(Direction::Stay),
        other => Err(parse_error(&format!("Unsupported direction: {other}"), span)),
    }
}

/// Parses the tape count of a `Pair<Rule::tapes>`.
fn parse_count(pair: Pair<Rule>) -> Result<usize, MachineError> {
    let span = pair.as_span();
    parse_inner_string(pair)
        .parse::<usize>()
        .map_err(|e| parse_error(&format!("Invalid tape count: {e}"), span))
}

fn parse_mode(input: &str) -> Mode {
    match input {
        "strict" => Mode::Strict,
        _ => Mode::Normal,
    }
}

/// Parses every `symbol` pair of a list.
fn parse_symbols<'i>(pairs: impl Iterator<Item = Pair<'i, Rule>>) -> Vec<Symbol> {
    pairs
        .filter(|p| p.as_rule() == Rule::symbol)
        .map(|p| parse_symbol(p.as_str()))
        .collect()
}

/// Parses a single character symbol from a string, handling quoted and unquoted symbols.
fn parse_symbol(input: &str) -> Symbol {
    let inner = input
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .unwrap_or(input);

    inner.chars().next().unwrap_or(DEFAULT_BLANK_SYMBOL)
}

/// Creates a `MachineError::ParseError` from a message and a `Span`.
fn parse_error(msg: &str, span: Span) -> MachineError {
    MachineError::ParseError(Box::new(Error::new_from_span(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        span,
    )))
}

/// Extracts the inner string content from a `Pair`.
fn parse_inner_string(pair: Pair<Rule>) -> String {
    pair.into_inner()
        .next()
        .map(|p| p.as_str().to_string())
        .unwrap_or_default()
}

/// Extracts the string content from the current `Pair` in a `Pairs` iterator.
fn parse_string(pairs: &mut Pairs<Rule>) -> String {
    pairs
        .next()
        .map(|p| p.as_str().to_string())
        .unwrap_or_default()
}

/// Checks if a given section has already been declared.
fn check_unique_rule(
    rule: Rule,
    span: Span,
    seen: &mut HashSet<Rule>,
) -> Result<(), MachineError> {
    if !matches!(
        rule,
        Rule::name
            | Rule::blank
            | Rule::tapes
            | Rule::alphabet
            | Rule::accept
            | Rule::padding
            | Rule::mode
    ) {
        return Ok(());
    };

    if !seen.insert(rule) {
        return Err(parse_error(
            &format!("Duplicate \"{rule:?}:\" declaration"),
            span,
        ));
    }

    Ok(())
}

/// Checks if a required section is present, returning an `Err` if it's missing.
fn check_required_rule<T>(value: Option<T>, name: &str) -> Result<T, MachineError> {
    value.ok_or_else(|| MachineError::ValidationError(format!("Missing '{name}' section")))
}
