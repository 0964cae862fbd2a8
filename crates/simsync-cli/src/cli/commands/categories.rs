//! `simsync categories` – list dataset categories with their remote and local paths.

use anyhow::Result;
use simsync_core::category::Selection;
use simsync_core::config::SimSyncConfig;
use simsync_core::data_dir::DirInputs;
use simsync_core::plan::SyncPlan;
use simsync_core::sync::{self, SyncRequest};
use std::io::Write;

pub fn run_categories(cfg: &SimSyncConfig, inputs: &DirInputs, out: &mut dyn Write) -> Result<()> {
    let dir = sync::resolve_data_dir(&SyncRequest::default(), inputs, cfg)?;
    let plan = SyncPlan::build(&cfg.remote_location, &dir.path, &Selection::all());
    writeln!(
        out,
        "{:<12} {:<48} {:<40} {}",
        "CATEGORY", "REMOTE", "LOCAL", "DESCRIPTION"
    )?;
    for job in plan.jobs {
        writeln!(
            out,
            "{:<12} {:<48} {:<40} {}",
            job.category.name(),
            job.remote,
            job.local.display().to_string(),
            job.category.description()
        )?;
    }
    Ok(())
}
