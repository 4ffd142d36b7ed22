//! Namespace listing against the live cluster
//!
//! The switching core never talks to a cluster; it only consumes an ordered
//! list of namespace names from this collaborator. The production
//! implementation shells out to kubectl so the tool works with whatever
//! authentication the kubeconfig demands (exec plugins included) without
//! carrying a Kubernetes client.

use std::path::PathBuf;
use std::process::Command;

use log::debug;

use crate::error::{Result, SwitchError};

/// Source of namespace names for the active configuration
pub trait NamespaceLister {
    /// Namespace names in the order the cluster reports them
    fn namespaces(&self) -> Result<Vec<String>>;
}

/// Lists namespaces by invoking `kubectl get namespaces`
pub struct KubectlLister {
    kubeconfig_path: PathBuf,
}

impl KubectlLister {
    pub fn new(kubeconfig_path: PathBuf) -> Self {
        Self { kubeconfig_path }
    }
}

impl NamespaceLister for KubectlLister {
    fn namespaces(&self) -> Result<Vec<String>> {
        debug!(
            "listing namespaces via kubectl with kubeconfig {}",
            self.kubeconfig_path.display()
        );

        let output = Command::new("kubectl")
            .arg("--kubeconfig")
            .arg(&self.kubeconfig_path)
            .args(["get", "namespaces", "-o", "name"])
            .output()
            .map_err(|e| SwitchError::Cluster(format!("failed to run kubectl: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SwitchError::Cluster(format!(
                "kubectl get namespaces failed: {}",
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_name_output(&stdout))
    }
}

/// Parse `kubectl get ... -o name` output, stripping the resource prefix
fn parse_name_output(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            line.strip_prefix("namespace/")
                .unwrap_or(line)
                .to_string()
        })
        .collect()
}
