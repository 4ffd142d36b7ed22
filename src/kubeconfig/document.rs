//! Kubeconfig document model and file I/O
//!
//! Only the fields the switcher actually touches are modeled explicitly; every
//! other key (clusters, users, preferences, extensions) is captured in a
//! flattened mapping so a loaded document can be written back without losing
//! anything. Switching contexts replaces the whole active file with the source
//! file's document, so lossless round-tripping is a hard requirement.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SwitchError};

/// A kubeconfig document as found on disk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Kubeconfig {
    /// Name of the currently active context
    #[serde(rename = "current-context", default, skip_serializing_if = "Option::is_none")]
    pub current_context: Option<String>,
    /// Named contexts, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contexts: Vec<NamedContext>,
    /// All remaining top-level keys, preserved verbatim
    #[serde(flatten)]
    pub rest: BTreeMap<String, serde_yml::Value>,
}

/// A named entry in the `contexts` list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedContext {
    pub name: String,
    #[serde(default)]
    pub context: ContextSpec,
}

/// The body of a context entry; only the namespace is ever mutated
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(flatten)]
    pub rest: BTreeMap<String, serde_yml::Value>,
}

impl Kubeconfig {
    /// Load and parse a kubeconfig document from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| SwitchError::io(format!("failed to read kubeconfig {}", path.display()), e))?;

        serde_yml::from_str(&content).map_err(|e| SwitchError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Save the document to disk.
    /// Uses atomic write (tmp file + rename), creates the parent directory if
    /// needed, and sets 0600 permissions on Unix.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SwitchError::io(
                    format!("failed to create directory {}", parent.display()),
                    e,
                )
            })?;
        }

        let yaml = serde_yml::to_string(self).map_err(|e| SwitchError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, &yaml).map_err(|e| {
            SwitchError::io(format!("failed to write temp file {}", tmp_path.display()), e)
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&tmp_path, permissions).map_err(|e| {
                SwitchError::io(
                    format!("failed to set permissions on {}", tmp_path.display()),
                    e,
                )
            })?;
        }

        fs::rename(&tmp_path, path).map_err(|e| {
            SwitchError::io(format!("failed to rename temp file to {}", path.display()), e)
        })?;

        Ok(())
    }

    /// Context names in declaration order
    pub fn context_names(&self) -> Vec<&str> {
        self.contexts.iter().map(|c| c.name.as_str()).collect()
    }

    /// Mutable access to a context entry by name
    pub fn context_mut(&mut self, name: &str) -> Option<&mut ContextSpec> {
        self.contexts
            .iter_mut()
            .find(|c| c.name == name)
            .map(|c| &mut c.context)
    }

    /// Namespace of the current context, if any
    pub fn current_namespace(&self) -> Option<&str> {
        let current = self.current_context.as_deref()?;
        self.contexts
            .iter()
            .find(|c| c.name == current)
            .and_then(|c| c.context.namespace.as_deref())
    }

    /// Set the namespace of the context the current-context pointer names.
    /// Fails if there is no pointer or the pointed-at entry is missing.
    pub fn set_namespace(&mut self, namespace: &str) -> Result<()> {
        let current = self.current_context.clone().ok_or_else(|| {
            SwitchError::NoCurrentContext(
                "the active kubeconfig has no current-context set".to_string(),
            )
        })?;

        let spec = self
            .context_mut(&current)
            .ok_or(SwitchError::ContextNotFound(current))?;
        spec.namespace = Some(namespace.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = "\
apiVersion: v1
kind: Config
current-context: dev
preferences: {}
clusters:
  - name: dev-cluster
    cluster:
      server: https://dev.example.com:6443
      certificate-authority-data: Zm9vYmFy
contexts:
  - name: dev
    context:
      cluster: dev-cluster
      user: dev-user
      namespace: default
  - name: dev-admin
    context:
      cluster: dev-cluster
      user: admin-user
users:
  - name: dev-user
    user:
      token: secret
  - name: admin-user
    user:
      token: admin-secret
";

    #[test]
    fn test_parse_sample() {
        let doc: Kubeconfig = serde_yml::from_str(SAMPLE).unwrap();
        assert_eq!(doc.current_context.as_deref(), Some("dev"));
        assert_eq!(doc.context_names(), vec!["dev", "dev-admin"]);
        assert_eq!(doc.contexts[0].context.namespace.as_deref(), Some("default"));
        assert!(doc.contexts[1].context.namespace.is_none());
    }

    #[test]
    fn test_declaration_order_preserved() {
        let yaml = "\
contexts:
  - name: zeta
    context: {cluster: c, user: u}
  - name: alpha
    context: {cluster: c, user: u}
";
        let doc: Kubeconfig = serde_yml::from_str(yaml).unwrap();
        assert_eq!(doc.context_names(), vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_roundtrip_preserves_unknown_keys() {
        let doc: Kubeconfig = serde_yml::from_str(SAMPLE).unwrap();
        let yaml = serde_yml::to_string(&doc).unwrap();
        let reparsed: Kubeconfig = serde_yml::from_str(&yaml).unwrap();

        assert!(reparsed.rest.contains_key("clusters"));
        assert!(reparsed.rest.contains_key("users"));
        assert!(reparsed.rest.contains_key("preferences"));
        assert!(reparsed.rest.contains_key("apiVersion"));
        // Per-context cluster/user live in the flattened spec mapping
        assert!(reparsed.contexts[0].context.rest.contains_key("cluster"));
        assert!(reparsed.contexts[0].context.rest.contains_key("user"));
        assert_eq!(reparsed.rest["clusters"], doc.rest["clusters"]);
        assert_eq!(reparsed.rest["users"], doc.rest["users"]);
    }

    #[test]
    fn test_current_namespace() {
        let doc: Kubeconfig = serde_yml::from_str(SAMPLE).unwrap();
        assert_eq!(doc.current_namespace(), Some("default"));
    }

    #[test]
    fn test_current_namespace_none_without_pointer() {
        let doc: Kubeconfig = serde_yml::from_str("contexts: []").unwrap();
        assert!(doc.current_namespace().is_none());
    }

    #[test]
    fn test_set_namespace_updates_current_context() {
        let mut doc: Kubeconfig = serde_yml::from_str(SAMPLE).unwrap();
        doc.set_namespace("kube-system").unwrap();
        assert_eq!(
            doc.contexts[0].context.namespace.as_deref(),
            Some("kube-system")
        );
        // Other contexts untouched
        assert!(doc.contexts[1].context.namespace.is_none());
    }

    #[test]
    fn test_set_namespace_without_current_context_errors() {
        let mut doc: Kubeconfig = serde_yml::from_str("contexts: []").unwrap();
        let err = doc.set_namespace("default").unwrap_err();
        match err {
            SwitchError::NoCurrentContext(_) => {}
            other => panic!("Expected NoCurrentContext, got {:?}", other),
        }
    }

    #[test]
    fn test_set_namespace_dangling_pointer_errors() {
        let mut doc: Kubeconfig = serde_yml::from_str("current-context: gone").unwrap();
        let err = doc.set_namespace("default").unwrap_err();
        match err {
            SwitchError::ContextNotFound(name) => assert_eq!(name, "gone"),
            other => panic!("Expected ContextNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_file_errors() {
        let dir = TempDir::new().unwrap();
        let result = Kubeconfig::load(&dir.path().join("missing.yaml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_invalid_yaml_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.yaml");
        fs::write(&path, "contexts: [unbalanced").unwrap();
        match Kubeconfig::load(&path) {
            Err(SwitchError::Parse { path: p, .. }) => assert_eq!(p, path),
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config");
        let doc: Kubeconfig = serde_yml::from_str(SAMPLE).unwrap();
        doc.save(&path).unwrap();

        let loaded = Kubeconfig::load(&path).unwrap();
        assert_eq!(loaded.current_context.as_deref(), Some("dev"));
        assert_eq!(loaded.context_names(), vec!["dev", "dev-admin"]);
        assert!(loaded.rest.contains_key("clusters"));
    }

    #[test]
    fn test_save_creates_parent_dir() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config");
        Kubeconfig::default().save(&path).unwrap();
        assert!(path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_save_sets_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config");
        Kubeconfig::default().save(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }
}
