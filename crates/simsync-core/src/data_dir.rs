//! Local data directory resolution.
//!
//! Precedence: explicit argument, then `$RUBIN_SIM_DATA_DIR`, then the
//! `data_dir` key of the config file, then `$HOME/rubin_sim_data`.
//! An explicit directory that disagrees with the environment is rejected.

use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "RUBIN_SIM_DATA_DIR";

/// Directory name used under `$HOME` when nothing else is set.
pub const DEFAULT_DIR_NAME: &str = "rubin_sim_data";

#[derive(Debug, Error)]
pub enum DataDirError {
    #[error(
        "data directory {} does not match ${} ({})",
        .explicit.display(),
        DATA_DIR_ENV,
        .env.display()
    )]
    Mismatch { explicit: PathBuf, env: PathBuf },

    #[error("no data directory given, $RUBIN_SIM_DATA_DIR is unset and $HOME is unknown")]
    NoHome,

    #[error("{} exists but is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("failed to create data directory {}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where the resolved directory came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirSource {
    Explicit,
    Environment,
    ConfigFile,
    HomeDefault,
}

impl fmt::Display for DirSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirSource::Explicit => f.write_str("command line"),
            DirSource::Environment => write!(f, "${}", DATA_DIR_ENV),
            DirSource::ConfigFile => f.write_str("config file"),
            DirSource::HomeDefault => write!(f, "default ($HOME/{})", DEFAULT_DIR_NAME),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDir {
    pub path: PathBuf,
    pub source: DirSource,
}

impl fmt::Display for ResolvedDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (from {})", self.path.display(), self.source)
    }
}

/// Every candidate location, captured once so resolution is a pure function.
#[derive(Debug, Clone, Default)]
pub struct DirInputs {
    pub explicit: Option<PathBuf>,
    pub env: Option<PathBuf>,
    pub configured: Option<PathBuf>,
    pub home: Option<PathBuf>,
}

impl DirInputs {
    /// Reads `$RUBIN_SIM_DATA_DIR` and `$HOME` from the process environment.
    pub fn from_env(explicit: Option<PathBuf>) -> Self {
        Self {
            explicit,
            env: non_empty_env(DATA_DIR_ENV),
            configured: None,
            home: non_empty_env("HOME"),
        }
    }

    pub fn with_configured(mut self, configured: Option<PathBuf>) -> Self {
        self.configured = configured;
        self
    }
}

fn non_empty_env(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Pick the data directory. Does not touch the filesystem.
pub fn resolve(inputs: &DirInputs) -> Result<ResolvedDir, DataDirError> {
    if let (Some(explicit), Some(env)) = (&inputs.explicit, &inputs.env) {
        if normalize(explicit).as_os_str() != normalize(env).as_os_str() {
            return Err(DataDirError::Mismatch {
                explicit: explicit.clone(),
                env: env.clone(),
            });
        }
    }

    if let Some(path) = &inputs.explicit {
        return Ok(ResolvedDir {
            path: path.clone(),
            source: DirSource::Explicit,
        });
    }
    if let Some(path) = &inputs.env {
        return Ok(ResolvedDir {
            path: path.clone(),
            source: DirSource::Environment,
        });
    }
    if let Some(path) = &inputs.configured {
        return Ok(ResolvedDir {
            path: path.clone(),
            source: DirSource::ConfigFile,
        });
    }

    let home = inputs.home.as_ref().ok_or(DataDirError::NoHome)?;
    let path = home.join(DEFAULT_DIR_NAME);
    tracing::warn!(
        path = %path.display(),
        "no data directory specified and ${} unset, using default",
        DATA_DIR_ENV
    );
    Ok(ResolvedDir {
        path,
        source: DirSource::HomeDefault,
    })
}

/// Lexical normalization: no filesystem access, symlinks are not resolved.
///
/// Drops `.` components and redundant separators and folds `dir/..` pairs.
/// A leading `..` on a relative path is kept; `..` at the root is dropped.
/// An empty result becomes `.`.
///
/// Exactly two leading slashes are preserved (POSIX leaves `//` to the
/// implementation), three or more collapse to one. `PathBuf` equality
/// ignores that difference, so compare results with `as_os_str()`.
pub fn normalize(path: &Path) -> PathBuf {
    let raw = path.as_os_str().to_string_lossy();
    let double_root = raw.starts_with("//") && !raw.starts_with("///");
    let mut out: Vec<Component<'_>> = Vec::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(comp),
            },
            other => out.push(other),
        }
    }
    if out.is_empty() {
        return PathBuf::from(".");
    }
    let normalized: PathBuf = out.iter().map(|c| c.as_os_str()).collect();
    if double_root {
        let mut o = std::ffi::OsString::from("/");
        o.push(normalized.as_os_str());
        return PathBuf::from(o);
    }
    normalized
}

/// Make sure `path` is a directory. Returns `true` if it had to be created.
pub fn ensure_dir(path: &Path) -> Result<bool, DataDirError> {
    if path.is_dir() {
        return Ok(false);
    }
    if path.exists() {
        return Err(DataDirError::NotADirectory(path.to_path_buf()));
    }
    tracing::warn!(path = %path.display(), "data directory does not exist, creating it");
    fs::create_dir_all(path).map_err(|source| DataDirError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(
        explicit: Option<&str>,
        env: Option<&str>,
        configured: Option<&str>,
        home: Option<&str>,
    ) -> DirInputs {
        DirInputs {
            explicit: explicit.map(PathBuf::from),
            env: env.map(PathBuf::from),
            configured: configured.map(PathBuf::from),
            home: home.map(PathBuf::from),
        }
    }

    #[test]
    fn normalize_lexical() {
        assert_eq!(normalize(Path::new("/data/sims/")), PathBuf::from("/data/sims"));
        assert_eq!(normalize(Path::new("/data//./sims")), PathBuf::from("/data/sims"));
        assert_eq!(normalize(Path::new("/data/x/../sims")), PathBuf::from("/data/sims"));
        assert_eq!(normalize(Path::new("/../data")), PathBuf::from("/data"));
        assert_eq!(normalize(Path::new("../a/./b")), PathBuf::from("../a/b"));
        assert_eq!(normalize(Path::new("a/..")), PathBuf::from("."));
        assert_eq!(normalize(Path::new("")), PathBuf::from("."));
    }

    #[test]
    fn normalize_keeps_exactly_two_leading_slashes() {
        assert_eq!(normalize(Path::new("//data")).as_os_str(), "//data");
        assert_eq!(normalize(Path::new("//data/./x/..")).as_os_str(), "//data");
        assert_eq!(normalize(Path::new("///data")).as_os_str(), "/data");
        assert_eq!(normalize(Path::new("/data//")).as_os_str(), "/data");
    }

    #[test]
    fn double_slash_root_differs_from_single() {
        let err = resolve(&inputs(Some("//data"), Some("/data"), None, None)).unwrap_err();
        assert!(matches!(err, DataDirError::Mismatch { .. }));
        let r = resolve(&inputs(Some("///data"), Some("/data"), None, None)).unwrap();
        assert_eq!(r.source, DirSource::Explicit);
    }

    #[test]
    fn from_env_treats_empty_values_as_unset() {
        let _guard = crate::ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let prev_data = std::env::var_os(DATA_DIR_ENV);
        let prev_home = std::env::var_os("HOME");
        std::env::set_var(DATA_DIR_ENV, "");
        std::env::set_var("HOME", "/home/tester");

        let captured = DirInputs::from_env(None);

        match prev_data {
            Some(v) => std::env::set_var(DATA_DIR_ENV, v),
            None => std::env::remove_var(DATA_DIR_ENV),
        }
        match prev_home {
            Some(v) => std::env::set_var("HOME", v),
            None => std::env::remove_var("HOME"),
        }

        assert!(captured.env.is_none());
        assert_eq!(captured.home, Some(PathBuf::from("/home/tester")));
        let r = resolve(&captured).unwrap();
        assert_eq!(r.path, PathBuf::from("/home/tester/rubin_sim_data"));
        assert_eq!(r.source, DirSource::HomeDefault);
    }

    #[test]
    fn with_configured_adds_config_tier() {
        let base = inputs(None, None, None, Some("/home/u"));
        let r = resolve(&base.clone().with_configured(Some(PathBuf::from("/cfg")))).unwrap();
        assert_eq!((r.path, r.source), (PathBuf::from("/cfg"), DirSource::ConfigFile));
        let r = resolve(&base.with_configured(None)).unwrap();
        assert_eq!(r.source, DirSource::HomeDefault);
    }

    #[test]
    fn explicit_wins() {
        let r = resolve(&inputs(Some("/a"), None, Some("/c"), Some("/home/u"))).unwrap();
        assert_eq!(r.path, PathBuf::from("/a"));
        assert_eq!(r.source, DirSource::Explicit);
    }

    #[test]
    fn explicit_equal_to_env_after_normalization() {
        let r = resolve(&inputs(Some("/data/sims/"), Some("/data/./sims"), None, None)).unwrap();
        assert_eq!(r.path, PathBuf::from("/data/sims/"));
        assert_eq!(r.source, DirSource::Explicit);
    }

    #[test]
    fn mismatch_is_an_error() {
        let err = resolve(&inputs(Some("/a"), Some("/b"), None, Some("/home/u"))).unwrap_err();
        match &err {
            DataDirError::Mismatch { explicit, env } => {
                assert_eq!(explicit, &PathBuf::from("/a"));
                assert_eq!(env, &PathBuf::from("/b"));
            }
            other => panic!("expected Mismatch, got {other:?}"),
        }
        let msg = err.to_string();
        assert!(msg.contains("/a"));
        assert!(msg.contains("$RUBIN_SIM_DATA_DIR"));
    }

    #[test]
    fn env_then_config_then_home() {
        let r = resolve(&inputs(None, Some("/env"), Some("/cfg"), Some("/home/u"))).unwrap();
        assert_eq!((r.path, r.source), (PathBuf::from("/env"), DirSource::Environment));

        let r = resolve(&inputs(None, None, Some("/cfg"), Some("/home/u"))).unwrap();
        assert_eq!((r.path, r.source), (PathBuf::from("/cfg"), DirSource::ConfigFile));

        let r = resolve(&inputs(None, None, None, Some("/home/u"))).unwrap();
        assert_eq!(r.path, PathBuf::from("/home/u/rubin_sim_data"));
        assert_eq!(r.source, DirSource::HomeDefault);
    }

    #[test]
    fn no_home_is_an_error() {
        let err = resolve(&inputs(None, None, None, None)).unwrap_err();
        assert!(matches!(err, DataDirError::NoHome));
    }

    #[test]
    fn ensure_dir_creates_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("nested").join("data");
        assert!(ensure_dir(&target).unwrap());
        assert!(target.is_dir());
        assert!(!ensure_dir(&target).unwrap());
    }

    #[test]
    fn ensure_dir_rejects_file() {
        let f = tempfile::NamedTempFile::new().unwrap();
        let err = ensure_dir(f.path()).unwrap_err();
        assert!(matches!(err, DataDirError::NotADirectory(_)));
    }

    #[test]
    fn source_display() {
        assert_eq!(DirSource::Environment.to_string(), "$RUBIN_SIM_DATA_DIR");
        let r = ResolvedDir {
            path: PathBuf::from("/x"),
            source: DirSource::Explicit,
        };
        assert_eq!(r.to_string(), "/x (from command line)");
    }
}
