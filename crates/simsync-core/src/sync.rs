//! Mirror the selected dataset categories into the local data directory.
//!
//! Resolve the directory, make sure it exists, then run the sync tool once
//! per selected category, sequentially. A category whose sync exits non-zero
//! is recorded and the run moves on; a sync tool that cannot be launched
//! aborts the run.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::category::{Category, Selection};
use crate::config::SimSyncConfig;
use crate::data_dir::{self, DirInputs, ResolvedDir};
use crate::plan::{SyncJob, SyncPlan};
use crate::runner::CommandRunner;

/// What the caller asked for. `None` fields fall back to config and environment.
#[derive(Debug, Clone, Default)]
pub struct SyncRequest {
    pub data_dir: Option<PathBuf>,
    pub remote_location: Option<String>,
    pub selection: Selection,
    /// Log the planned commands without creating directories or running anything.
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Skipped,
    Succeeded,
    Failed { code: Option<i32> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    pub job: SyncJob,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub data_dir: ResolvedDir,
    /// True when the data directory did not exist and was created by this run.
    pub created_dir: bool,
    pub jobs: Vec<JobOutcome>,
}

impl SyncReport {
    pub fn failed(&self) -> Vec<Category> {
        self.jobs
            .iter()
            .filter(|j| matches!(j.outcome, Outcome::Failed { .. }))
            .map(|j| j.job.category)
            .collect()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed().is_empty()
    }
}

/// Resolve the data directory for `request` against `inputs` and the config.
///
/// A config tier already present in `inputs` wins over `cfg.data_dir`.
pub fn resolve_data_dir(
    request: &SyncRequest,
    inputs: &DirInputs,
    cfg: &SimSyncConfig,
) -> Result<ResolvedDir> {
    let mut inputs = inputs.clone();
    if request.data_dir.is_some() {
        inputs.explicit = request.data_dir.clone();
    }
    let configured = inputs.configured.take().or_else(|| cfg.data_dir.clone());
    Ok(data_dir::resolve(&inputs.with_configured(configured))?)
}

/// Build the plan for `request` without running anything.
pub fn build_plan(request: &SyncRequest, data_dir: &ResolvedDir, cfg: &SimSyncConfig) -> SyncPlan {
    let remote = request
        .remote_location
        .as_deref()
        .unwrap_or(&cfg.remote_location);
    SyncPlan::build(remote, &data_dir.path, &request.selection)
}

/// A run whose data directory is resolved (and, unless dry, created) but
/// whose sync tool invocations have not started yet.
#[derive(Debug, Clone)]
pub struct PreparedSync {
    pub data_dir: ResolvedDir,
    /// True when the data directory did not exist and was created here.
    pub created_dir: bool,
    pub plan: SyncPlan,
    pub dry_run: bool,
}

/// Resolve the data directory, create it if missing, and build the plan.
pub fn prepare(
    request: &SyncRequest,
    inputs: &DirInputs,
    cfg: &SimSyncConfig,
) -> Result<PreparedSync> {
    let data_dir = resolve_data_dir(request, inputs, cfg)?;
    tracing::debug!(dir = %data_dir, "resolved data directory");

    let created_dir = if request.dry_run {
        false
    } else {
        data_dir::ensure_dir(&data_dir.path)?
    };

    let plan = build_plan(request, &data_dir, cfg);
    if plan.is_empty() {
        tracing::warn!("no dataset categories selected, nothing to sync");
    }

    Ok(PreparedSync {
        data_dir,
        created_dir,
        plan,
        dry_run: request.dry_run,
    })
}

impl PreparedSync {
    /// Run the sync tool once per planned job, in order.
    pub fn execute(self, cfg: &SimSyncConfig, runner: &dyn CommandRunner) -> Result<SyncReport> {
        let mut jobs = Vec::with_capacity(self.plan.len());
        for job in self.plan.jobs {
            let cmdline = job.command_line(&cfg.rsync_program, &cfg.rsync_flags);
            if self.dry_run {
                tracing::info!(category = %job.category, "dry run: {}", cmdline);
                jobs.push(JobOutcome {
                    job,
                    outcome: Outcome::Skipped,
                });
                continue;
            }

            tracing::info!(category = %job.category, "running: {}", cmdline);
            let status = runner
                .run(&cfg.rsync_program, &job.args(&cfg.rsync_flags))
                .with_context(|| format!("sync {}", job.category))?;
            let outcome = if status.success() {
                tracing::info!(category = %job.category, "sync finished");
                Outcome::Succeeded
            } else {
                tracing::warn!(
                    category = %job.category,
                    code = ?status.code,
                    "sync tool exited with failure"
                );
                Outcome::Failed { code: status.code }
            };
            jobs.push(JobOutcome { job, outcome });
        }

        Ok(SyncReport {
            data_dir: self.data_dir,
            created_dir: self.created_dir,
            jobs,
        })
    }
}

pub fn sync_datasets(
    request: &SyncRequest,
    inputs: &DirInputs,
    cfg: &SimSyncConfig,
    runner: &dyn CommandRunner,
) -> Result<SyncReport> {
    prepare(request, inputs, cfg)?.execute(cfg, runner)
}
