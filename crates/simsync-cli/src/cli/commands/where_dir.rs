//! `simsync where` – show the resolved data directory and where it came from.

use anyhow::Result;
use simsync_core::config::SimSyncConfig;
use simsync_core::data_dir::DirInputs;
use simsync_core::sync::{self, SyncRequest};
use std::path::PathBuf;

pub fn run_where(cfg: &SimSyncConfig, data_dir: Option<PathBuf>) -> Result<()> {
    let request = SyncRequest {
        data_dir: data_dir.clone(),
        ..Default::default()
    };
    let dir = sync::resolve_data_dir(&request, &DirInputs::from_env(data_dir), cfg)?;
    let state = if dir.path.is_dir() { "exists" } else { "missing" };
    println!("{}\t{}\t{}", dir.path.display(), dir.source, state);
    Ok(())
}
