//! This module provides the `ProgramLoader` struct, responsible for loading machine definitions
//! from various sources, including files and strings.

use crate::analyzer::analyze;
use crate::parser::parse;
use crate::types::{MachineError, Program};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File extension of machine definition files.
pub const PROGRAM_EXTENSION: &str = "mtm";

/// `ProgramLoader` is a utility struct for loading machine definitions.
/// It provides methods to load programs from individual files, from string content,
/// and to discover and load all `.mtm` files within a specified directory.
///
/// Every loaded program is analyzed; each lint is logged as a warning.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads a single machine definition from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(Program)` if the file is successfully read and parsed into a `Program`.
    /// * `Err(MachineError::FileError)` if the file cannot be read.
    /// * Any error of [`parse`] if the content is not a valid definition.
    pub fn load_program(path: &Path) -> Result<Program, MachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            MachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        debug!(path = %path.display(), "loading program");
        Self::load_program_from_string(&content)
    }

    /// Loads a single machine definition from the provided string content.
    pub fn load_program_from_string(content: &str) -> Result<Program, MachineError> {
        let program = parse(content)?;

        for lint in analyze(&program) {
            warn!(program = %program.name, "{lint}");
        }

        Ok(program)
    }

    /// Loads all machine definitions (`.mtm` extension) from a given directory.
    ///
    /// Directories and files with other extensions are skipped. Each element of the result
    /// is either the path and program of a successfully loaded file, or the error that
    /// prevented loading it.
    pub fn load_programs(directory: &Path) -> Vec<Result<(PathBuf, Program), MachineError>> {
        if !directory.exists() {
            return vec![Err(MachineError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(MachineError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        let mut results: Vec<_> = entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(MachineError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();

                if path.is_dir() || path.extension().map_or(true, |ext| ext != PROGRAM_EXTENSION) {
                    return None;
                }

                match Self::load_program(&path) {
                    Ok(program) => Some(Ok((path, program))),
                    Err(e) => Some(Err(MachineError::FileError(format!(
                        "Failed to load program from {}: {}",
                        path.display(),
                        e
                    )))),
                }
            })
            .collect();

        // Directory order is platform dependent
        results.sort_by_key(|result| result.as_ref().ok().map(|(path, _)| path.clone()));
        results
    }
}
