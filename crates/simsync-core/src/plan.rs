//! Builds the list of (remote, local) pairs for one run.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::category::{Category, Selection};

/// One sync tool invocation: mirror `remote` into `local`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncJob {
    pub category: Category,
    pub remote: String,
    pub local: PathBuf,
}

impl SyncJob {
    /// Full argument vector: `flags`, then source, then destination.
    pub fn args(&self, flags: &[String]) -> Vec<String> {
        let mut args = flags.to_vec();
        args.push(self.remote.clone());
        args.push(self.local.to_string_lossy().into_owned());
        args
    }

    /// Human-readable command line, quoting arguments that contain whitespace.
    pub fn command_line(&self, program: &str, flags: &[String]) -> String {
        std::iter::once(program.to_string())
            .chain(self.args(flags))
            .map(|a| shell_quote(&a))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn shell_quote(arg: &str) -> String {
    if !arg.is_empty() && !arg.chars().any(|c| c.is_whitespace() || c == '\'' || c == '"') {
        return arg.to_string();
    }
    format!("'{}'", arg.replace('\'', r"'\''"))
}

/// Remote path for a category: `location` and the category name joined by `/`.
pub fn remote_path(location: &str, category: Category) -> String {
    if location.is_empty() {
        category.name().to_string()
    } else if location.ends_with('/') {
        format!("{}{}", location, category.name())
    } else {
        format!("{}/{}", location, category.name())
    }
}

/// Ordered invocations for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncPlan {
    pub jobs: Vec<SyncJob>,
}

impl SyncPlan {
    pub fn build(remote_location: &str, data_dir: &Path, selection: &Selection) -> Self {
        let jobs = selection
            .selected()
            .map(|category| SyncJob {
                category,
                remote: remote_path(remote_location, category),
                local: data_dir.join(category.name()),
            })
            .collect();
        SyncPlan { jobs }
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }
}
