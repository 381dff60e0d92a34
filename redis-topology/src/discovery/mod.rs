/// Discovery module - recursive walk of a Redis replication topology
///
/// Starting from seed addresses, each node is asked for INFO and the reply
/// is followed along three kinds of references:
/// - `master_host`/`master_port` (replica -> master)
/// - `slaveN` descriptors (master -> replicas)
/// - `masterN` descriptors (sentinel -> watched masters)
pub mod address;
pub mod graph;
pub mod info_parser;

pub use graph::{DiscoveryStats, GraphBuilder, Topology, UnresolvedEdgePolicy};
pub use info_parser::parse_info;
