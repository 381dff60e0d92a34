use serde::{Deserialize, Serialize};

/// Node role as reported in the `role` field of INFO
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    /// Accepts writes, streams to replicas
    Master,
    /// Replicates from a master
    Replica,
    /// Monitoring node, also the fallback for unknown roles
    #[default]
    Sentinel,
}

impl NodeRole {
    /// Map the raw `role` value. Only exact matches are recognised.
    pub fn from_info(role: Option<&str>) -> Self {
        match role {
            Some("master") => Self::Master,
            Some("slave") => Self::Replica,
            _ => Self::Sentinel,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Master => "master",
            Self::Replica => "replica",
            Self::Sentinel => "sentinel",
        }
    }
}

/// Stable index of a record inside a [`Topology`](crate::discovery::Topology)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Non-owning relationship from one record to another
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edge {
    Resolved(NodeId),
    /// Discovery of the target failed or its descriptor could not be decoded.
    /// `target` is the decoded address, or the raw descriptor when decoding failed.
    Unresolved { target: String },
}

impl Edge {
    pub fn node_id(&self) -> Option<NodeId> {
        match self {
            Self::Resolved(id) => Some(*id),
            Self::Unresolved { .. } => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

/// One discovered node. Exactly one exists per address.
#[derive(Debug, Clone)]
pub struct NodeRecord {
    pub address: String,
    pub role: NodeRole,
    pub master: Option<Edge>,
    pub replicas: Vec<Edge>,
    pub watched_masters: Vec<Edge>,
}

impl NodeRecord {
    pub fn new(address: impl Into<String>, role: NodeRole) -> Self {
        Self {
            address: address.into(),
            role,
            master: None,
            replicas: Vec::new(),
            watched_masters: Vec::new(),
        }
    }
}
