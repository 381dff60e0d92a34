//! INFO reply parsing
//!
//! The reply is a CRLF-separated list of `field:value` lines grouped under
//! `# Section` headers:
//!
//! ```text
//! # Replication
//! role:master
//! connected_slaves:1
//! slave0:ip=10.0.0.2,port=6379,state=online,offset=1234,lag=0
//! ```

use std::collections::HashMap;

/// Parse an INFO reply into a flat field map.
///
/// Comment lines and lines without a `:` are skipped. A field is split at its
/// first `:`, so values may themselves contain colons. When a field repeats,
/// the last occurrence wins.
pub fn parse_info(raw: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();

    for line in raw.split("\r\n") {
        let trimmed = line.trim();
        if trimmed.starts_with('#') {
            continue;
        }

        let Some((field, value)) = trimmed.split_once(':') else {
            continue;
        };

        fields.insert(field.to_string(), value.to_string());
    }

    fields
}
