pub mod error;
pub mod types;

pub use error::{Result, TopologyError};
pub use types::{Edge, NodeId, NodeRecord, NodeRole};
