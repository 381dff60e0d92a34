//! Test helper utilities: an in-memory deployment answering INFO queries

#![allow(dead_code)]

use redis_topology::{NodeQuery, Result, TopologyError};
use std::collections::HashMap;
use parking_lot::Mutex;

/// Canned INFO replies keyed by address. Addresses without a reply fail.
#[derive(Default)]
pub struct FakeDeployment {
    replies: HashMap<String, String>,
    calls: Mutex<Vec<(String, Option<String>)>>,
}

impl FakeDeployment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node whose INFO reply is `lines` joined with CRLF
    pub fn with_node(mut self, address: &str, lines: &[&str]) -> Self {
        let mut reply = lines.join("\r\n");
        reply.push_str("\r\n");
        self.replies.insert(address.to_string(), reply);
        self
    }

    /// Number of queries issued for `address`
    pub fn calls_for(&self, address: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|(addr, _)| addr == address)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn credentials_seen(&self) -> Vec<Option<String>> {
        self.calls
            .lock()
            .iter()
            .map(|(_, credential)| credential.clone())
            .collect()
    }
}

impl NodeQuery for &FakeDeployment {
    async fn query(&self, address: &str, credential: Option<&str>) -> Result<String> {
        self.calls
            .lock()
            .push((address.to_string(), credential.map(str::to_string)));

        self.replies
            .get(address)
            .cloned()
            .ok_or_else(|| TopologyError::QueryFailed {
                address: address.to_string(),
                reason: "connection refused".to_string(),
            })
    }
}
