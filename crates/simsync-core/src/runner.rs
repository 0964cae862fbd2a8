//! External process execution for the sync tool.
//!
//! The sync engine only depends on [`CommandRunner`]; [`SystemRunner`] is the
//! real implementation and tests substitute a recording one.

use std::process::{Command, ExitStatus};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to launch {program}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Exit status of a finished invocation. `code` is `None` when killed by a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStatus {
    pub code: Option<i32>,
}

impl RunStatus {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<ExitStatus> for RunStatus {
    fn from(status: ExitStatus) -> Self {
        RunStatus {
            code: status.code(),
        }
    }
}

/// Runs a program to completion and reports how it exited.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<RunStatus, RunError>;
}

/// Spawns the program with inherited stdio and blocks until it exits.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<RunStatus, RunError> {
        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|source| RunError::Spawn {
                program: program.to_string(),
                source,
            })?;
        Ok(status.into())
    }
}
