use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::core::{Result, TopologyError};
use crate::discovery::UnresolvedEdgePolicy;
use crate::output::OutputFormat;

/// Discovery run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Seed addresses (`host:port`)
    pub seeds: Vec<String>,
    /// Password sent to every node
    pub password: Option<String>,
    pub output: OutputFormat,
    pub unresolved_edges: UnresolvedEdgePolicy,
    /// Connect + INFO timeout per node
    pub query_timeout_ms: u64,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            seeds: Vec::new(),
            password: None,
            output: OutputFormat::Graphviz,
            unresolved_edges: UnresolvedEdgePolicy::Placeholder,
            query_timeout_ms: 2000,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "text".to_string(),
        }
    }
}

impl DiscoveryConfig {
    /// Load configuration from YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: DiscoveryConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Split a comma-separated address list, dropping blank entries
    pub fn parse_seeds(csv: &str) -> Vec<String> {
        csv.split(',')
            .map(str::trim)
            .filter(|addr| !addr.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.seeds.iter().all(|seed| seed.trim().is_empty()) {
            return Err(TopologyError::Config("no seed addresses given".to_string()));
        }

        if self.query_timeout_ms == 0 {
            return Err(TopologyError::Config(
                "query_timeout_ms must be greater than 0".to_string(),
            ));
        }

        match self.logging.format.as_str() {
            "text" | "json" => Ok(()),
            other => Err(TopologyError::Config(format!(
                "unknown logging format '{}'",
                other
            ))),
        }
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    /// Password to send, if any. An empty password means none.
    pub fn credential(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}
