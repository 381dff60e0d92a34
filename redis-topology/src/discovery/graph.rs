//! Recursive topology discovery
//!
//! [`GraphBuilder`] walks the deployment depth-first from a set of seeds.
//! Every successfully queried address is registered in a [`Topology`] before
//! its relationships are followed, so a reference back to a node that is
//! still being populated resolves to the existing record instead of issuing
//! another query. That ordering is what makes cyclic topologies terminate.

use super::address::{master_address, replica_address, sentinel_master_address};
use super::info_parser::parse_info;
use crate::client::NodeQuery;
use crate::core::{Edge, NodeId, NodeRecord, NodeRole, Result, TopologyError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, info, warn};

/// What to store in a relationship slot whose target could not be discovered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedEdgePolicy {
    /// Keep an [`Edge::Unresolved`] so slot positions match the reported counters
    #[default]
    Placeholder,
    /// Drop the slot
    Omit,
}

/// Registry of discovered nodes, keyed by address
#[derive(Debug, Clone, Default)]
pub struct Topology {
    nodes: Vec<NodeRecord>,
    by_address: HashMap<String, NodeId>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record unless its address is already registered.
    /// Returns the id owning the address either way.
    pub(crate) fn register(&mut self, record: NodeRecord) -> NodeId {
        if let Some(id) = self.by_address.get(&record.address) {
            return *id;
        }

        let id = NodeId(self.nodes.len());
        self.by_address.insert(record.address.clone(), id);
        self.nodes.push(record);
        id
    }

    fn node_mut(&mut self, id: NodeId) -> &mut NodeRecord {
        &mut self.nodes[id.0]
    }

    pub fn lookup(&self, address: &str) -> Option<NodeId> {
        self.by_address.get(address).copied()
    }

    pub fn get(&self, id: NodeId) -> Option<&NodeRecord> {
        self.nodes.get(id.0)
    }

    pub fn find(&self, address: &str) -> Option<&NodeRecord> {
        self.lookup(address).and_then(|id| self.get(id))
    }

    /// Address an edge points at. Unresolved edges report their raw target.
    pub fn edge_target<'a>(&'a self, edge: &'a Edge) -> &'a str {
        match edge {
            Edge::Resolved(id) => self
                .get(*id)
                .map(|node| node.address.as_str())
                .unwrap_or_default(),
            Edge::Unresolved { target } => target,
        }
    }

    pub fn nodes(&self) -> &[NodeRecord] {
        &self.nodes
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &NodeRecord)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Counters collected over one discovery run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiscoveryStats {
    /// INFO queries issued
    pub queries: u64,
    pub failed_queries: u64,
    /// References answered from the registry without a query
    pub registry_hits: u64,
    pub malformed_descriptors: u64,
}

/// Depth-first, deduplicating topology walker
pub struct GraphBuilder<Q> {
    query: Q,
    credential: Option<String>,
    policy: UnresolvedEdgePolicy,
    topology: Topology,
    stats: DiscoveryStats,
}

impl<Q: NodeQuery> GraphBuilder<Q> {
    pub fn new(query: Q, credential: Option<String>) -> Self {
        Self {
            query,
            credential,
            policy: UnresolvedEdgePolicy::default(),
            topology: Topology::new(),
            stats: DiscoveryStats::default(),
        }
    }

    pub fn with_policy(mut self, policy: UnresolvedEdgePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Discover everything reachable from `seeds`.
    ///
    /// Never fails. Seeds that cannot be queried are simply absent from the
    /// result; empty seed strings are skipped.
    pub async fn build_graph<S: AsRef<str>>(&mut self, seeds: &[S]) {
        for seed in seeds {
            let seed = seed.as_ref();
            if seed.is_empty() {
                continue;
            }
            self.discover(seed.to_string()).await;
        }

        info!(
            "Discovered {} nodes ({} queries, {} failed, {} malformed descriptors)",
            self.topology.len(),
            self.stats.queries,
            self.stats.failed_queries,
            self.stats.malformed_descriptors
        );
    }

    /// Discover one address and, recursively, everything it references.
    ///
    /// Returns the existing id without querying if the address is already
    /// registered. Failed queries are not remembered, so a later reference
    /// to the same address queries it again.
    pub fn discover<'a>(
        &'a mut self,
        address: String,
    ) -> Pin<Box<dyn Future<Output = Option<NodeId>> + 'a>> {
        Box::pin(async move {
            if let Some(id) = self.topology.lookup(&address) {
                debug!("{} already registered", address);
                self.stats.registry_hits += 1;
                return Some(id);
            }

            self.stats.queries += 1;
            let raw = match self
                .query
                .query(&address, self.credential.as_deref())
                .await
            {
                Ok(raw) => raw,
                Err(e) => {
                    self.stats.failed_queries += 1;
                    warn!("{}", e);
                    return None;
                }
            };

            let info = parse_info(&raw);
            let role = NodeRole::from_info(info.get("role").map(String::as_str));

            // Register before following any edge
            let id = self.topology.register(NodeRecord::new(address.as_str(), role));
            info!("Discovered {} ({})", address, role.as_str());

            if let Some(host) = info.get("master_host") {
                let port = info.get("master_port").map(String::as_str).unwrap_or_default();
                let target = master_address(host, port);
                let edge = self.resolve_edge(Ok(target), "").await;
                self.topology.node_mut(id).master = edge;
            }

            let replicas = self
                .resolve_indexed(&info, "connected_slaves", "slave", replica_address)
                .await;
            self.topology.node_mut(id).replicas = replicas;

            let watched = self
                .resolve_indexed(&info, "sentinel_masters", "master", sentinel_master_address)
                .await;
            self.topology.node_mut(id).watched_masters = watched;

            Some(id)
        })
    }

    /// Follow `count_field` indexed descriptors (`prefix0`, `prefix1`, ...) in order
    async fn resolve_indexed(
        &mut self,
        info: &HashMap<String, String>,
        count_field: &str,
        prefix: &str,
        decode: fn(&str) -> Result<String>,
    ) -> Vec<Edge> {
        let Some(raw_count) = info.get(count_field) else {
            return Vec::new();
        };

        let reported = raw_count.parse::<usize>().unwrap_or_else(|_| {
            debug!("Unparsable {} '{}', treating as 0", count_field, raw_count);
            0
        });

        // Every real slot has its own line, so the reply bounds the slot count
        let count = reported.min(info.len());
        if count < reported {
            warn!(
                "{}",
                TopologyError::MalformedStatusText(format!(
                    "{} reports {} entries but the reply has only {} fields",
                    count_field,
                    reported,
                    info.len()
                ))
            );
        }

        let mut edges = Vec::new();
        for index in 0..count {
            let field = format!("{}{}", prefix, index);
            let decoded = match info.get(&field) {
                Some(descriptor) => decode(descriptor),
                None => Err(TopologyError::MalformedStatusText(format!(
                    "{} reports {} entries but {} is missing",
                    count_field, count, field
                ))),
            };

            let descriptor = info.get(&field).map(String::as_str).unwrap_or_default();
            if let Some(edge) = self.resolve_edge(decoded, descriptor).await {
                edges.push(edge);
            }
        }
        edges
    }

    /// Discover a decoded target and turn the outcome into an edge per policy
    async fn resolve_edge(&mut self, decoded: Result<String>, descriptor: &str) -> Option<Edge> {
        let edge = match decoded {
            Ok(target) => match self.discover(target.clone()).await {
                Some(id) => Edge::Resolved(id),
                None => Edge::Unresolved { target },
            },
            Err(e) => {
                self.stats.malformed_descriptors += 1;
                warn!("{}", e);
                Edge::Unresolved {
                    target: descriptor.to_string(),
                }
            }
        };

        if !edge.is_resolved() && self.policy == UnresolvedEdgePolicy::Omit {
            return None;
        }
        Some(edge)
    }

    /// All discovered records, in registry order
    pub fn result(&self) -> Vec<&NodeRecord> {
        self.topology.nodes().iter().collect()
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn into_topology(self) -> Topology {
        self.topology
    }

    pub fn stats(&self) -> &DiscoveryStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_insert_if_absent() {
        let mut topology = Topology::new();
        let first = topology.register(NodeRecord::new("10.0.0.1:6379", NodeRole::Master));
        let second = topology.register(NodeRecord::new("10.0.0.1:6379", NodeRole::Replica));

        assert_eq!(first, second);
        assert_eq!(topology.len(), 1);
        assert_eq!(topology.get(first).unwrap().role, NodeRole::Master);
    }

    #[test]
    fn test_edge_target() {
        let mut topology = Topology::new();
        let id = topology.register(NodeRecord::new("10.0.0.1:6379", NodeRole::Master));

        assert_eq!(topology.edge_target(&Edge::Resolved(id)), "10.0.0.1:6379");
        let unresolved = Edge::Unresolved {
            target: "10.0.0.2:6379".to_string(),
        };
        assert_eq!(topology.edge_target(&unresolved), "10.0.0.2:6379");
    }

    #[test]
    fn test_find_and_iter() {
        let mut topology = Topology::new();
        topology.register(NodeRecord::new("a:1", NodeRole::Master));
        topology.register(NodeRecord::new("b:2", NodeRole::Replica));

        assert_eq!(topology.find("b:2").unwrap().role, NodeRole::Replica);
        assert!(topology.find("c:3").is_none());

        let ids: Vec<usize> = topology.iter().map(|(id, _)| id.index()).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn test_policy_serde() {
        let policy: UnresolvedEdgePolicy = serde_yaml::from_str("omit").unwrap();
        assert_eq!(policy, UnresolvedEdgePolicy::Omit);
        assert_eq!(UnresolvedEdgePolicy::default(), UnresolvedEdgePolicy::Placeholder);
    }
}
