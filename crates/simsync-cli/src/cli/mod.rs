//! CLI for simsync.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use simsync_core::category::Selection;
use simsync_core::config::{self, SimSyncConfig};
use simsync_core::data_dir::DirInputs;
use simsync_core::runner::SystemRunner;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use commands::{run_categories, run_completions, run_man, run_sync, run_where, SyncArgs};

/// Top-level CLI for simsync.
#[derive(Debug, Parser)]
#[command(name = "simsync")]
#[command(about = "Mirror simulation datasets into a local data directory with rsync", long_about = None)]
pub struct Cli {
    /// Use this config file instead of ~/.config/simsync/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download (mirror) the selected dataset categories.
    Sync {
        /// Local data directory. Must agree with $RUBIN_SIM_DATA_DIR when both are set.
        #[arg(long, value_name = "DIR")]
        data_dir: Option<PathBuf>,

        /// Remote rsync location the category directories live under.
        #[arg(long, value_name = "LOCATION")]
        remote: Option<String>,

        /// Download the orbit files.
        #[arg(long)]
        orbit_files: bool,

        /// Download the maps.
        #[arg(long)]
        maps: bool,

        /// Download every category.
        #[arg(long, conflicts_with_all = ["orbit_files", "maps"])]
        all: bool,

        /// Print the rsync commands without creating directories or running them.
        #[arg(long)]
        dry_run: bool,

        /// With --dry-run, print the plan as JSON.
        #[arg(long, requires = "dry_run")]
        json: bool,
    },

    /// Show which data directory would be used and why.
    Where {
        /// Local data directory, as it would be passed to `sync`.
        #[arg(long, value_name = "DIR")]
        data_dir: Option<PathBuf>,
    },

    /// List the dataset categories and their remote/local paths.
    Categories,

    /// Print a shell completion script.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print the man page (roff).
    Man,
}

fn load_config(path: Option<&Path>) -> Result<SimSyncConfig> {
    let cfg = match path {
        Some(p) => config::load_from_path(p)?,
        None => config::load_or_init()?,
    };
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

impl CliCommand {
    pub fn run_from_args() -> Result<ExitCode> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Sync {
                data_dir,
                remote,
                orbit_files,
                maps,
                all,
                dry_run,
                json,
            } => {
                let cfg = load_config(cli.config.as_deref())?;
                let selection = if all {
                    Selection::all()
                } else {
                    Selection::new(orbit_files, maps)
                };
                let inputs = DirInputs::from_env(data_dir.clone());
                let args = SyncArgs {
                    data_dir,
                    remote,
                    selection,
                    dry_run,
                    json,
                };
                let status = run_sync(
                    &cfg,
                    args,
                    &inputs,
                    &SystemRunner,
                    &mut io::stdout(),
                    &mut io::stderr(),
                )?;
                return Ok(ExitCode::from(status.code()));
            }
            CliCommand::Where { data_dir } => {
                let cfg = load_config(cli.config.as_deref())?;
                run_where(&cfg, data_dir)?;
            }
            CliCommand::Categories => {
                let cfg = load_config(cli.config.as_deref())?;
                run_categories(&cfg, &DirInputs::from_env(None), &mut io::stdout())?;
            }
            CliCommand::Completions { shell } => run_completions(shell)?,
            CliCommand::Man => run_man()?,
        }

        Ok(ExitCode::SUCCESS)
    }
}

#[cfg(test)]
mod tests;
