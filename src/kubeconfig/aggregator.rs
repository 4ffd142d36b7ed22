//! Directory scan aggregating contexts from many kubeconfig files

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use serde::Serialize;

use crate::config;
use crate::error::{Result, SwitchError};

use super::document::Kubeconfig;

/// How to handle a context name that appears in more than one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Keep the first occurrence, warn naming both files, continue the scan
    Skip,
    /// Abort the whole scan with an error naming both files
    Fail,
}

/// A context name together with the kubeconfig file it was found in
#[derive(Debug, Clone, Serialize)]
pub struct ContextEntry {
    pub name: String,
    pub file: PathBuf,
}

/// The aggregated set of selectable contexts from one directory scan.
/// Names are unique by construction under either duplicate policy.
#[derive(Debug, Default)]
pub struct ContextUniverse {
    names: Vec<String>,
    sources: HashMap<String, PathBuf>,
}

impl ContextUniverse {
    /// Source file for a context name
    pub fn get(&self, name: &str) -> Option<&Path> {
        self.sources.get(name).map(PathBuf::as_path)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    /// Context names in discovery order (file name order, then in-file
    /// declaration order)
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Entries in discovery order
    pub fn entries(&self) -> Vec<ContextEntry> {
        self.names
            .iter()
            .map(|name| ContextEntry {
                name: name.clone(),
                file: self.sources[name].clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn insert(&mut self, name: String, file: PathBuf) {
        self.names.push(name.clone());
        self.sources.insert(name, file);
    }
}

/// Scans a directory of kubeconfig files and builds the context universe
pub struct Aggregator {
    config_dir: PathBuf,
    policy: DuplicatePolicy,
}

impl Aggregator {
    pub fn new(config_dir: PathBuf, policy: DuplicatePolicy) -> Self {
        Self { config_dir, policy }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Scan the directory and aggregate every context found.
    ///
    /// Subdirectories and files without a kubeconfig extension are skipped;
    /// files that fail to parse are skipped with a warning since the rest of
    /// the directory may still be valid. An empty result is not an error.
    pub fn scan(&self) -> Result<ContextUniverse> {
        let mut universe = ContextUniverse::default();

        let entries = fs::read_dir(&self.config_dir).map_err(|e| {
            SwitchError::io(
                format!("failed to read kubeconfig directory {}", self.config_dir.display()),
                e,
            )
        })?;

        // read_dir order is platform-dependent; sort by file name so repeated
        // scans of the same directory yield the same universe
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .collect();
        paths.sort();

        for path in paths {
            if path.is_dir() {
                continue;
            }
            if !config::has_kubeconfig_extension(&path) {
                continue;
            }

            let doc = match Kubeconfig::load(&path) {
                Ok(doc) => doc,
                Err(e) => {
                    warn!("skipping {}: {}", path.display(), e);
                    continue;
                }
            };

            for name in doc.context_names() {
                if let Some(existing) = universe.get(name) {
                    match self.policy {
                        DuplicatePolicy::Fail => {
                            return Err(SwitchError::DuplicateContext {
                                name: name.to_string(),
                                first: existing.to_path_buf(),
                                second: path.clone(),
                            });
                        }
                        DuplicatePolicy::Skip => {
                            warn!(
                                "duplicate context name '{}' found in files:\n  - {}\n  - {}",
                                name,
                                existing.display(),
                                path.display()
                            );
                            continue;
                        }
                    }
                }
                universe.insert(name.to_string(), path.clone());
            }
        }

        Ok(universe)
    }
}
