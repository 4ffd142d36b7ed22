use std::fmt;
use std::path::PathBuf;

/// Custom error type for context-switching operations
#[derive(Debug)]
pub enum SwitchError {
    /// Kubeconfig directory missing, unreadable, or not a directory
    ConfigDir(String),
    /// Requested context does not exist in the aggregated universe
    ContextNotFound(String),
    /// Requested namespace does not exist in the cluster
    NamespaceNotFound(String),
    /// The same context name was found in two kubeconfig files
    DuplicateContext {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },
    /// Restore requested but no backup configuration exists
    NoPreviousConfig,
    /// The active kubeconfig has no usable current-context pointer
    NoCurrentContext(String),
    /// Failed to parse a kubeconfig document
    Parse { path: PathBuf, message: String },
    /// File I/O failure, with the operation that failed
    Io { context: String, message: String },
    /// Namespace-listing collaborator failure
    Cluster(String),
    /// Terminal/interactive prompt failure
    Terminal(String),
}

impl SwitchError {
    /// Wrap an I/O error with the operation and path it belongs to
    pub fn io(context: impl Into<String>, err: std::io::Error) -> Self {
        SwitchError::Io {
            context: context.into(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for SwitchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwitchError::ConfigDir(msg) => write!(f, "{}", msg),
            SwitchError::ContextNotFound(name) => write!(f, "context '{}' not found", name),
            SwitchError::NamespaceNotFound(name) => write!(f, "namespace '{}' not found", name),
            SwitchError::DuplicateContext {
                name,
                first,
                second,
            } => write!(
                f,
                "duplicate context name '{}' found in files:\n  - {}\n  - {}",
                name,
                first.display(),
                second.display()
            ),
            SwitchError::NoPreviousConfig => write!(f, "no previous configuration found"),
            SwitchError::NoCurrentContext(msg) => write!(f, "{}", msg),
            SwitchError::Parse { path, message } => {
                write!(f, "failed to parse kubeconfig {}: {}", path.display(), message)
            }
            SwitchError::Io { context, message } => write!(f, "{}: {}", context, message),
            SwitchError::Cluster(msg) => write!(f, "cluster error: {}", msg),
            SwitchError::Terminal(msg) => write!(f, "terminal error: {}", msg),
        }
    }
}

impl std::error::Error for SwitchError {}

impl From<std::io::Error> for SwitchError {
    fn from(err: std::io::Error) -> Self {
        SwitchError::Terminal(err.to_string())
    }
}

/// Result type alias for context-switching operations
pub type Result<T> = std::result::Result<T, SwitchError>;
