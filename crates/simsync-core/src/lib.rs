pub mod config;
pub mod logging;

pub mod category;
pub mod data_dir;
pub mod plan;
pub mod runner;
pub mod sync;

/// Serializes tests that mutate process environment variables.
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
