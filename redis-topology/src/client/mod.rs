//! Node query layer
//!
//! Discovery only needs one capability from the network: send `INFO` to an
//! address and get the raw reply back. [`NodeQuery`] is that seam, and
//! [`RedisInfoClient`] is the production implementation on top of the
//! `redis` crate.

use crate::core::{Result, TopologyError};
use redis::IntoConnectionInfo;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Fetch the raw INFO reply of a node
pub trait NodeQuery {
    /// Query `address` (`host:port`), authenticating with `credential` if present.
    ///
    /// Any failure (unreachable, auth rejected, timeout) is reported as
    /// [`TopologyError::QueryFailed`].
    fn query(
        &self,
        address: &str,
        credential: Option<&str>,
    ) -> impl Future<Output = Result<String>> + Send;
}

/// INFO client backed by a multiplexed tokio connection per query
#[derive(Debug, Clone)]
pub struct RedisInfoClient {
    timeout: Duration,
}

impl RedisInfoClient {
    /// `timeout` bounds connect + INFO round trip
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl NodeQuery for RedisInfoClient {
    async fn query(&self, address: &str, credential: Option<&str>) -> Result<String> {
        let failed = |reason: String| TopologyError::QueryFailed {
            address: address.to_string(),
            reason,
        };

        let mut info = format!("redis://{}/", address)
            .into_connection_info()
            .map_err(|e| failed(e.to_string()))?;
        if let Some(password) = credential.filter(|p| !p.is_empty()) {
            info.redis.password = Some(password.to_string());
        }

        let client = redis::Client::open(info).map_err(|e| failed(e.to_string()))?;

        debug!("Sending INFO to {}", address);
        let request = async {
            let mut conn = client.get_multiplexed_async_connection().await?;
            let reply: String = redis::cmd("INFO").query_async(&mut conn).await?;
            Ok::<_, redis::RedisError>(reply)
        };

        match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(e)) => Err(failed(e.to_string())),
            Err(_) => Err(failed(format!("timed out after {:?}", self.timeout))),
        }
    }
}
