use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Remote rsync module serving the simulation datasets.
pub const DEFAULT_REMOTE_LOCATION: &str = "lsst-rsync.ncsa.illinois.edu::sim/";

/// Archive, compress, verbose, progress, delete files missing on the remote.
pub const DEFAULT_RSYNC_FLAGS: [&str; 3] = ["-avz", "--progress", "--delete"];

/// Global configuration loaded from `~/.config/simsync/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSyncConfig {
    /// Remote location the category directories live under.
    pub remote_location: String,
    /// Sync tool to invoke; looked up on `$PATH` unless absolute.
    pub rsync_program: String,
    /// Flags passed before the source and destination arguments.
    pub rsync_flags: Vec<String>,
    /// Fallback data directory, consulted after `$RUBIN_SIM_DATA_DIR`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for SimSyncConfig {
    fn default() -> Self {
        Self {
            remote_location: DEFAULT_REMOTE_LOCATION.to_string(),
            rsync_program: "rsync".to_string(),
            rsync_flags: DEFAULT_RSYNC_FLAGS.iter().map(|s| s.to_string()).collect(),
            data_dir: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("simsync")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SimSyncConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = SimSyncConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

/// Load configuration from an explicit file. Missing keys take their defaults.
pub fn load_from_path(path: &Path) -> Result<SimSyncConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: SimSyncConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
