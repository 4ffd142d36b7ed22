//! kubectl-switch - Switch Kubernetes contexts from multiple kubeconfig files
//!
//! A CLI tool that keeps one kubeconfig file per cluster in a directory and
//! rewrites the active kubeconfig when switching, instead of maintaining a
//! single merged file.
//!
//! # Features
//!
//! - Aggregate contexts from every kubeconfig file in a directory
//! - Switch context or namespace by name, or pick interactively with fuzzy
//!   filtering
//! - One-level undo: `context -` swaps back to the previous configuration
//! - List available contexts (table, plain, or JSON)
//!
//! # Example
//!
//! ```bash
//! # Pick a context interactively
//! kubectl-switch context
//!
//! # Switch directly
//! kubectl-switch context prod-cluster
//!
//! # Switch back to the previous configuration
//! kubectl-switch context -
//!
//! # Switch the namespace of the current context
//! kubectl-switch ns kube-system
//!
//! # List everything found in $KUBECONFIG_DIR
//! kubectl-switch list -o json
//! ```

pub mod cli;
pub mod cluster;
pub mod config;
pub mod error;
pub mod kubeconfig;
pub mod ui;

pub use cli::{Cli, Command, ContextArgs, ListArgs, ListFormat, NamespaceArgs};
pub use cluster::{KubectlLister, NamespaceLister};
pub use error::{Result, SwitchError};
pub use kubeconfig::{
    run_context_switch, run_list, run_namespace_switch, run_restore, Aggregator, ContextEntry,
    ContextUniverse, DuplicatePolicy, Kubeconfig, Manager,
};
pub use ui::{fuzzy_match, select, SelectEvent, SelectState, SelectStatus};
