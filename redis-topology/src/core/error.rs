use thiserror::Error;

/// Main error type for topology discovery
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("Query failed for {address}: {reason}")]
    QueryFailed { address: String, reason: String },

    #[error("Malformed status text: {0}")]
    MalformedStatusText(String),

    #[error("Unknown output: {0}")]
    UnknownOutput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl TopologyError {
    /// Whether discovery recovers from this error locally
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::QueryFailed { .. } | Self::MalformedStatusText(_)
        )
    }
}

/// Result type alias for topology operations
pub type Result<T> = std::result::Result<T, TopologyError>;
