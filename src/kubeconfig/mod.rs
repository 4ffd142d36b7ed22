//! Kubeconfig aggregation and switching
//!
//! Aggregates contexts from a directory of kubeconfig files and owns the
//! active kubeconfig file together with its one-slot backup.

mod aggregator;
mod commands;
mod document;
mod manager;

pub use aggregator::{Aggregator, ContextEntry, ContextUniverse, DuplicatePolicy};
pub use commands::{run_context_switch, run_list, run_namespace_switch, run_restore};
pub use document::{ContextSpec, Kubeconfig, NamedContext};
pub use manager::Manager;
