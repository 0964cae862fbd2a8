//! Shared helpers for integration tests.

use simsync_core::runner::{CommandRunner, RunError, RunStatus};
use std::cell::RefCell;

/// A single recorded sync tool invocation.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

/// Runner that records calls instead of spawning processes.
/// Exits with `fail_code` for any invocation whose source ends with one of `fail_suffixes`.
#[derive(Default)]
pub struct RecordingRunner {
    pub calls: RefCell<Vec<Invocation>>,
    pub fail_suffixes: Vec<&'static str>,
    pub fail_code: i32,
}

impl RecordingRunner {
    pub fn failing(suffixes: Vec<&'static str>, code: i32) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            fail_suffixes: suffixes,
            fail_code: code,
        }
    }

    pub fn sources(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|c| c.args[c.args.len() - 2].clone())
            .collect()
    }

    pub fn destinations(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|c| c.args[c.args.len() - 1].clone())
            .collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<RunStatus, RunError> {
        let source = args.get(args.len().saturating_sub(2)).cloned().unwrap_or_default();
        let failed = self.fail_suffixes.iter().any(|s| source.ends_with(s));
        self.calls.borrow_mut().push(Invocation {
            program: program.to_string(),
            args: args.to_vec(),
        });
        Ok(RunStatus {
            code: Some(if failed { self.fail_code } else { 0 }),
        })
    }
}
