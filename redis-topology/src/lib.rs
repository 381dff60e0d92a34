pub mod client;
pub mod config;
pub mod core;
pub mod discovery;
pub mod logging;
pub mod output;

// Re-export commonly used types
pub use client::{NodeQuery, RedisInfoClient};
pub use config::{DiscoveryConfig, LoggingConfig};
pub use crate::core::{Edge, NodeId, NodeRecord, NodeRole, Result, TopologyError};
pub use discovery::{DiscoveryStats, GraphBuilder, Topology, UnresolvedEdgePolicy, parse_info};
pub use output::{OutputFormat, Renderer, RendererRegistry};
