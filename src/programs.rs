use crate::types::{MachineError, Program};

use std::sync::RwLock;
use tracing::error;

// Machines bundled with the crate
const PROGRAM_TEXTS: [&str; 3] = [
    include_str!("../machines/binary-addition.mtm"),
    include_str!("../machines/column-or.mtm"),
    include_str!("../machines/busy-loop.mtm"),
];

lazy_static::lazy_static! {
    pub static ref PROGRAMS: RwLock<Vec<Program>> = RwLock::new(Vec::new());
}

pub struct ProgramManager;

impl ProgramManager {
    /// Parses the bundled machines and stores them in [`PROGRAMS`].
    ///
    /// Does nothing once the programs are loaded.
    pub fn load() -> Result<(), MachineError> {
        if PROGRAMS.read().map(|programs| !programs.is_empty()).unwrap_or(false) {
            return Ok(());
        }

        let mut programs = Vec::new();

        for (index, program_text) in PROGRAM_TEXTS.iter().enumerate() {
            match crate::parser::parse(program_text) {
                Ok(program) => programs.push(program),
                Err(e) => error!(index, "failed to parse bundled program: {e}"),
            }
        }

        let mut write_guard = PROGRAMS
            .write()
            .map_err(|_| MachineError::FileError("Failed to acquire write lock".to_string()))?;
        *write_guard = programs;

        Ok(())
    }

    /// Get the number of available programs
    pub fn get_program_count() -> usize {
        let _ = Self::load();

        PROGRAMS.read().map(|programs| programs.len()).unwrap_or(0)
    }

    /// Get a program by its index
    pub fn get_program_by_index(index: usize) -> Result<Program, MachineError> {
        Self::load()?;

        PROGRAMS
            .read()
            .map_err(|_| MachineError::FileError("Failed to acquire read lock".to_string()))?
            .get(index)
            .cloned()
            .ok_or_else(|| {
                MachineError::ValidationError(format!("Program index {} out of range", index))
            })
    }

    /// Get a program by its name
    pub fn get_program_by_name(name: &str) -> Result<Program, MachineError> {
        Self::load()?;

        PROGRAMS
            .read()
            .map_err(|_| MachineError::FileError("Failed to acquire read lock".to_string()))?
            .iter()
            .find(|program| program.name == name)
            .cloned()
            .ok_or_else(|| MachineError::ValidationError(format!("Program '{}' not found", name)))
    }

    /// List all program names
    pub fn list_program_names() -> Vec<String> {
        let _ = Self::load();

        PROGRAMS
            .read()
            .map(|programs| {
                programs
                    .iter()
                    .map(|program| program.name.clone())
                    .collect()
            })
            .unwrap_or_else(|_| Vec::new())
    }

    /// Get information about a program by its index
    pub fn get_program_info(index: usize) -> Result<ProgramInfo, MachineError> {
        let program = Self::get_program_by_index(index)?;

        Ok(ProgramInfo {
            index,
            name: program.name.clone(),
            initial_state: program.initial_state().unwrap_or_default().to_string(),
            tapes: program.tapes,
            state_count: program.states.len(),
            transition_count: program.transition_count(),
        })
    }

    /// Search for programs by name, case insensitively
    pub fn search_programs(query: &str) -> Vec<usize> {
        let _ = Self::load();
        let query = query.to_lowercase();

        PROGRAMS
            .read()
            .map(|programs| {
                programs
                    .iter()
                    .enumerate()
                    .filter(|(_, program)| program.name.to_lowercase().contains(&query))
                    .map(|(index, _)| index)
                    .collect()
            })
            .unwrap_or_else(|_| Vec::new())
    }

    /// Get the source text of a bundled program by its index
    pub fn get_program_text_by_index(index: usize) -> Result<&'static str, MachineError> {
        PROGRAM_TEXTS.get(index).copied().ok_or_else(|| {
            MachineError::ValidationError(format!("Program text index {} out of range", index))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramInfo {
    pub index: usize,
    pub name: String,
    pub initial_state: String,
    pub tapes: usize,
    pub state_count: usize,
    pub transition_count: usize,
}
