//! Address decoding for the three ways INFO refers to another node
//!
//! - `master_host` / `master_port` on a replica
//! - `slaveN:ip=10.0.0.2,port=6380,state=online,...` on a master
//! - `masterN:name=mymaster,status=ok,address=10.0.0.1:6379,...` on a sentinel
//!
//! Descriptors are decoded by fixed position and prefix length, not by key.
//! Field order in the descriptor must match the server's.

use crate::core::{Result, TopologyError};

const REPLICA_IP_PREFIX_LEN: usize = "ip=".len();
const REPLICA_PORT_PREFIX_LEN: usize = "port=".len();
const SENTINEL_ADDRESS_PREFIX_LEN: usize = "address=".len();

/// Combine `master_host` and `master_port` into `host:port`
pub fn master_address(host: &str, port: &str) -> String {
    format!("{}:{}", host, port)
}

/// Decode a `slaveN` descriptor into `ip:port`
pub fn replica_address(descriptor: &str) -> Result<String> {
    let mut fragments = descriptor.split(',');
    let ip = strip_fixed_prefix(fragments.next(), REPLICA_IP_PREFIX_LEN, descriptor)?;
    let port = strip_fixed_prefix(fragments.next(), REPLICA_PORT_PREFIX_LEN, descriptor)?;
    Ok(format!("{}:{}", ip, port))
}

/// Decode a sentinel `masterN` descriptor into the watched master's address
pub fn sentinel_master_address(descriptor: &str) -> Result<String> {
    let fragment = descriptor.split(',').nth(2);
    strip_fixed_prefix(fragment, SENTINEL_ADDRESS_PREFIX_LEN, descriptor).map(str::to_string)
}

fn strip_fixed_prefix<'a>(
    fragment: Option<&'a str>,
    prefix_len: usize,
    descriptor: &str,
) -> Result<&'a str> {
    let fragment = fragment.ok_or_else(|| {
        TopologyError::MalformedStatusText(format!("missing fragment in '{}'", descriptor))
    })?;

    fragment.get(prefix_len..).ok_or_else(|| {
        TopologyError::MalformedStatusText(format!(
            "fragment '{}' shorter than {} bytes in '{}'",
            fragment, prefix_len, descriptor
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_master_address() {
        assert_eq!(master_address("10.0.0.1", "6379"), "10.0.0.1:6379");
        assert_eq!(master_address("redis-a", ""), "redis-a:");
    }

    #[test]
    fn test_replica_address() {
        assert_eq!(
            replica_address("ip=127.0.0.1,port=6380,state=online").unwrap(),
            "127.0.0.1:6380"
        );
        assert_eq!(
            replica_address("ip=10.1.2.3,port=7000,state=online,offset=99,lag=1").unwrap(),
            "10.1.2.3:7000"
        );
    }

    #[test]
    fn test_replica_address_is_positional() {
        // Prefixes are skipped by length, not checked by name
        assert_eq!(replica_address("xx=host,yyyy=1").unwrap(), "host:1");
    }

    #[test]
    fn test_replica_address_missing_port_fragment() {
        let err = replica_address("ip=127.0.0.1").unwrap_err();
        assert!(matches!(err, TopologyError::MalformedStatusText(_)));
    }

    #[test]
    fn test_replica_address_short_fragment() {
        assert!(replica_address("ip,port=6380").is_err());
        assert!(replica_address("ip=1.2.3.4,port").is_err());
        assert!(replica_address("").is_err());
    }

    #[test]
    fn test_sentinel_master_address() {
        assert_eq!(
            sentinel_master_address(
                "name=mymaster,status=ok,address=10.0.0.1:6379,slaves=2,sentinels=3"
            )
            .unwrap(),
            "10.0.0.1:6379"
        );
    }

    #[test]
    fn test_sentinel_master_address_malformed() {
        assert!(sentinel_master_address("name=mymaster,status=ok").is_err());
        assert!(sentinel_master_address("name=mymaster,status=ok,addr").is_err());
    }
}
