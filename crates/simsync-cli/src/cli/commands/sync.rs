//! `simsync sync` – mirror the selected categories into the data directory.

use anyhow::Result;
use simsync_core::category::Selection;
use simsync_core::config::SimSyncConfig;
use simsync_core::data_dir::{DirInputs, DirSource};
use simsync_core::runner::CommandRunner;
use simsync_core::sync::{self, Outcome, PreparedSync, SyncReport, SyncRequest};
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug)]
pub struct SyncArgs {
    pub data_dir: Option<PathBuf>,
    pub remote: Option<String>,
    pub selection: Selection,
    pub dry_run: bool,
    pub json: bool,
}

/// How a `sync` run ended when no fatal error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncExit {
    Success,
    /// At least one category's sync tool exited non-zero.
    PartialFailure,
}

impl SyncExit {
    pub fn code(self) -> u8 {
        match self {
            SyncExit::Success => 0,
            SyncExit::PartialFailure => 2,
        }
    }
}

/// Warnings go to `err` before any sync tool is launched.
pub fn run_sync(
    cfg: &SimSyncConfig,
    args: SyncArgs,
    inputs: &DirInputs,
    runner: &dyn CommandRunner,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<SyncExit> {
    if args.selection.is_empty() {
        writeln!(
            err,
            "warning: no dataset categories selected (use --orbit-files, --maps or --all)"
        )?;
    }

    let request = SyncRequest {
        data_dir: args.data_dir,
        remote_location: args.remote,
        selection: args.selection,
        dry_run: args.dry_run,
    };
    let prepared = sync::prepare(&request, inputs, cfg)?;
    print_warnings(&prepared, err)?;

    let report = prepared.execute(cfg, runner)?;

    if args.dry_run {
        print_dry_run(cfg, &report, args.json, out)?;
        return Ok(SyncExit::Success);
    }

    let failed = report.failed();
    if failed.is_empty() {
        if !report.jobs.is_empty() {
            writeln!(
                out,
                "Synced {} categor{} into {}",
                report.jobs.len(),
                if report.jobs.len() == 1 { "y" } else { "ies" },
                report.data_dir.path.display()
            )?;
        }
        return Ok(SyncExit::Success);
    }

    for j in report.jobs.iter() {
        if let Outcome::Failed { code } = j.outcome {
            let code = code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".to_string());
            writeln!(err, "{}: {} exited with {}", j.job.category, cfg.rsync_program, code)?;
        }
    }
    tracing::warn!("{} of {} categories failed", failed.len(), report.jobs.len());
    Ok(SyncExit::PartialFailure)
}

fn print_warnings(prepared: &PreparedSync, err: &mut dyn Write) -> Result<()> {
    if prepared.data_dir.source == DirSource::HomeDefault {
        writeln!(
            err,
            "warning: no data directory specified and $RUBIN_SIM_DATA_DIR unset, using {}",
            prepared.data_dir.path.display()
        )?;
    }
    if prepared.created_dir {
        writeln!(
            err,
            "warning: directory {} did not exist, created it",
            prepared.data_dir.path.display()
        )?;
    }
    Ok(())
}

fn print_dry_run(
    cfg: &SimSyncConfig,
    report: &SyncReport,
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    if json {
        let plan = simsync_core::plan::SyncPlan {
            jobs: report.jobs.iter().map(|j| j.job.clone()).collect(),
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&plan)?)?;
        return Ok(());
    }
    for j in report.jobs.iter() {
        writeln!(out, "{}", j.job.command_line(&cfg.rsync_program, &cfg.rsync_flags))?;
    }
    Ok(())
}
