//! Observers of a running machine.
//!
//! The step loop performs no I/O. Anything that wants to watch a run, such as the text trace
//! printed by the command line tool, implements [`Observer`] and is handed to
//! [`Machine::run_observed`](crate::Machine::run_observed).

use std::io::{self, Write};

use crate::machine::Execution;

/// Receives the configuration of a run once before the first step and after every step.
pub trait Observer {
    fn observe(&mut self, execution: &Execution<'_>);
}

impl<F> Observer for F
where
    F: FnMut(&Execution<'_>),
{
    fn observe(&mut self, execution: &Execution<'_>) {
        self(execution)
    }
}

/// Prints a human readable trace of a run.
///
/// ```text
/// Original tapes:
/// Tape 1: 101+11=
/// Tape 2:
/// ----------------------------------------
/// Step 1: State=q0, Heads=[1, 0]
/// Tape 1: 101+11=
/// ...
/// ```
///
/// Write errors do not interrupt the run. The first one is kept and returned by
/// [`TracePrinter::finish`].
pub struct TracePrinter<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> TracePrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    /// Flushes the output and returns the writer, or the first write error encountered.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn print(&mut self, execution: &Execution<'_>) -> io::Result<()> {
        if execution.step_count() == 0 {
            writeln!(self.out, "Original tapes:")?;
        } else {
            writeln!(
                self.out,
                "Step {}: State={}, Heads={:?}",
                execution.step_count(),
                execution.state(),
                execution.heads()
            )?;
        }

        for (i, tape) in execution.tapes().iter().enumerate() {
            writeln!(self.out, "Tape {}: {}", i + 1, tape)?;
        }
        writeln!(self.out, "{}", "-".repeat(40))
    }
}

impl<W: Write> Observer for TracePrinter<W> {
    fn observe(&mut self, execution: &Execution<'_>) {
        if self.error.is_some() {
            return;
        }
        if let Err(error) = self.print(execution) {
            self.error = Some(error);
        }
    }
}
