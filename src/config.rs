//! Configuration constants and path resolution

use std::path::{Path, PathBuf};

use crate::error::{Result, SwitchError};

/// Environment variable names
pub mod env {
    /// Path to the active kubeconfig file
    pub const KUBECONFIG: &str = "KUBECONFIG";

    /// Directory containing per-cluster kubeconfig files
    pub const KUBECONFIG_DIR: &str = "KUBECONFIG_DIR";
}

/// Well-known paths and file names
pub mod paths {
    /// Default active kubeconfig location (relative to HOME)
    pub const DEFAULT_KUBECONFIG: &str = "~/.kube/config";

    /// Backup slot file name, stored next to the active kubeconfig
    pub const PREVIOUS_FILE_NAME: &str = "config.previous";

    /// File extensions recognized as kubeconfig files during a directory scan
    pub const KUBECONFIG_EXTENSIONS: &[&str] = &["yaml", "yml"];
}

/// Default values for CLI
pub mod defaults {
    /// Default log level
    pub const LOG_LEVEL: &str = "info";

    /// Number of options visible at once in interactive selection
    pub const PAGE_SIZE: usize = 10;
}

/// Expand a leading `~/` to the user's home directory.
/// Paths without the prefix are returned unchanged.
pub fn expand_tilde(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(rest),
        None => PathBuf::from(path),
    }
}

/// Resolve the active kubeconfig path from the `--kubeconfig` flag (which clap
/// also binds to the KUBECONFIG env var), falling back to `~/.kube/config`.
pub fn resolve_kubeconfig_path(flag: Option<&str>) -> PathBuf {
    expand_tilde(flag.unwrap_or(paths::DEFAULT_KUBECONFIG))
}

/// Resolve and validate the kubeconfig directory. The flag is env-bound to
/// KUBECONFIG_DIR by clap; an absent value is a hard error since there is no
/// sensible default universe to scan.
pub fn resolve_config_dir(flag: Option<&str>) -> Result<PathBuf> {
    let raw = flag.ok_or_else(|| {
        SwitchError::ConfigDir(format!(
            "kubeconfig directory not provided, please provide the directory containing \
             kubeconfig files via the --kubeconfig-dir flag or {} environment variable",
            env::KUBECONFIG_DIR
        ))
    })?;

    let dir = expand_tilde(raw);
    let metadata = std::fs::metadata(&dir).map_err(|e| {
        SwitchError::ConfigDir(format!(
            "failed to read kubeconfig directory {}: {}",
            dir.display(),
            e
        ))
    })?;

    if !metadata.is_dir() {
        return Err(SwitchError::ConfigDir(format!(
            "kubeconfig directory path is not a directory: {}",
            dir.display()
        )));
    }

    Ok(dir)
}

/// Check whether a directory entry looks like a kubeconfig file by extension.
pub fn has_kubeconfig_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| paths::KUBECONFIG_EXTENSIONS.contains(&ext))
}
