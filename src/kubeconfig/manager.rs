//! Active kubeconfig store: switch, backup, restore
//!
//! Owns every read/modify/write cycle on the active kubeconfig file and its
//! single backup slot. Each mutating operation backs the current file up
//! first; a failed backup only costs one generation of undo history, so it is
//! logged as a warning rather than blocking the switch itself.

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;

use crate::config;
use crate::error::{Result, SwitchError};

use super::aggregator::ContextUniverse;
use super::document::Kubeconfig;

/// Handles the active kubeconfig file and its one-slot backup
pub struct Manager {
    kubeconfig_path: PathBuf,
    previous_path: PathBuf,
}

impl Manager {
    /// Create a manager with the backup slot at its conventional location,
    /// a `config.previous` file next to the active kubeconfig.
    pub fn new(kubeconfig_path: PathBuf) -> Self {
        let previous_path = kubeconfig_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(config::paths::PREVIOUS_FILE_NAME);
        Self {
            kubeconfig_path,
            previous_path,
        }
    }

    /// Create a manager with an explicit backup slot path
    pub fn with_previous_path(kubeconfig_path: PathBuf, previous_path: PathBuf) -> Self {
        Self {
            kubeconfig_path,
            previous_path,
        }
    }

    pub fn kubeconfig_path(&self) -> &Path {
        &self.kubeconfig_path
    }

    pub fn previous_path(&self) -> &Path {
        &self.previous_path
    }

    /// Switch the active configuration to the named context.
    ///
    /// The source file's whole document replaces the active file, with only
    /// the current-context pointer updated; nothing is merged from the
    /// previous active configuration.
    pub fn switch_to_context(&self, universe: &ContextUniverse, name: &str) -> Result<()> {
        let source = universe
            .get(name)
            .ok_or_else(|| SwitchError::ContextNotFound(name.to_string()))?;

        if let Err(e) = self.backup() {
            warn!("failed to save current configuration as previous: {}", e);
        }

        let mut doc = Kubeconfig::load(source)?;
        doc.current_context = Some(name.to_string());
        doc.save(&self.kubeconfig_path)
    }

    /// Switch the namespace of the active configuration's current context
    pub fn switch_to_namespace(&self, namespace: &str) -> Result<()> {
        if let Err(e) = self.backup() {
            warn!("failed to save current configuration as previous: {}", e);
        }

        let mut doc = Kubeconfig::load(&self.kubeconfig_path)?;
        doc.set_namespace(namespace)?;
        doc.save(&self.kubeconfig_path)
    }

    /// Swap the active configuration with the backup slot, byte for byte
    pub fn restore_previous(&self) -> Result<()> {
        if !self.previous_path.exists() {
            return Err(SwitchError::NoPreviousConfig);
        }

        let current = fs::read(&self.kubeconfig_path).map_err(|e| {
            SwitchError::io(
                format!("failed to read current config {}", self.kubeconfig_path.display()),
                e,
            )
        })?;
        let previous = fs::read(&self.previous_path).map_err(|e| {
            SwitchError::io(
                format!("failed to read previous config {}", self.previous_path.display()),
                e,
            )
        })?;

        write_private(&self.kubeconfig_path, &previous).map_err(|e| {
            SwitchError::io(
                format!("failed to write current config {}", self.kubeconfig_path.display()),
                e,
            )
        })?;
        write_private(&self.previous_path, &current).map_err(|e| {
            SwitchError::io(
                format!("failed to write previous config {}", self.previous_path.display()),
                e,
            )
        })?;

        Ok(())
    }

    /// Current-context pointer of the active configuration, best-effort.
    /// Used to mark the active entry in interactive selection.
    pub fn current_context(&self) -> Option<String> {
        Kubeconfig::load(&self.kubeconfig_path)
            .ok()
            .and_then(|doc| doc.current_context)
    }

    /// Namespace of the active configuration's current context, best-effort
    pub fn current_namespace(&self) -> Option<String> {
        Kubeconfig::load(&self.kubeconfig_path)
            .ok()
            .and_then(|doc| doc.current_namespace().map(str::to_string))
    }

    /// Copy the active configuration into the backup slot, overwriting any
    /// prior backup
    fn backup(&self) -> Result<()> {
        if !self.kubeconfig_path.exists() {
            return Err(SwitchError::Io {
                context: format!(
                    "kubeconfig file does not exist: {}",
                    self.kubeconfig_path.display()
                ),
                message: "not found".to_string(),
            });
        }

        let data = fs::read(&self.kubeconfig_path).map_err(|e| {
            SwitchError::io(
                format!("failed to read current kubeconfig {}", self.kubeconfig_path.display()),
                e,
            )
        })?;

        write_private(&self.previous_path, &data).map_err(|e| {
            SwitchError::io(
                format!("failed to write previous kubeconfig {}", self.previous_path.display()),
                e,
            )
        })
    }
}

/// Whole-file write with 0600 permissions on Unix
fn write_private(path: &Path, data: &[u8]) -> std::io::Result<()> {
    fs::write(path, data)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}
