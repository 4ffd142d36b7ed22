//! CLI argument parsing

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::defaults;

/// kubectl-switch CLI
#[derive(Parser, Debug)]
#[command(name = "kubectl-switch")]
#[command(version)]
#[command(about = "Switch Kubernetes contexts from multiple kubeconfig files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory containing kubeconfig files
    #[arg(long, env = "KUBECONFIG_DIR", global = true)]
    pub kubeconfig_dir: Option<String>,

    /// Path to the active kubeconfig file (defaults to ~/.kube/config)
    #[arg(long, env = "KUBECONFIG", global = true)]
    pub kubeconfig: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, default_value = defaults::LOG_LEVEL, global = true)]
    pub log_level: String,

    /// Fail the directory scan when two files declare the same context name
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Switch the active Kubernetes context
    #[command(alias = "ctx")]
    Context(ContextArgs),
    /// Switch the active Kubernetes namespace
    #[command(alias = "ns")]
    Namespace(NamespaceArgs),
    /// List all available Kubernetes contexts
    #[command(alias = "ls")]
    List(ListArgs),
}

#[derive(Args, Debug)]
pub struct ContextArgs {
    /// Context to switch to; prompts interactively when omitted.
    /// Pass "-" to switch back to the previous configuration.
    pub name: Option<String>,
}

#[derive(Args, Debug)]
pub struct NamespaceArgs {
    /// Namespace to switch to; prompts interactively when omitted.
    /// Pass "-" to switch back to the previous configuration.
    pub name: Option<String>,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = ListFormat::Table)]
    pub output: ListFormat,
}

/// Output format options for the list command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// ASCII table (default)
    Table,
    /// One `- name [file]` line per context
    Plain,
    /// JSON array
    Json,
}

impl std::fmt::Display for ListFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListFormat::Table => write!(f, "table"),
            ListFormat::Plain => write!(f, "plain"),
            ListFormat::Json => write!(f, "json"),
        }
    }
}
