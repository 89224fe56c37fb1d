//! Connections manifest (de)serialization.
//!
//! The manifest is an ordered JSON list of 4-key connection objects; it is the
//! only artifact that crosses runs and the input downstream playbook
//! generators consume.

use crate::resolve::Connection;
use rustc_hash::FxHashMap;

pub fn write_manifest(connections: &[Connection]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(connections)
}

pub fn read_manifest(text: &str) -> serde_json::Result<Vec<Connection>> {
    serde_json::from_str(text)
}

/// Reassigns adapter numbers to a manifest whose numbers are absent or stale.
///
/// Counters are keyed by display name since raw cell ids are no longer
/// available at this point. Within each connection the `from` slot is consumed
/// before the `to` slot, matching extraction-time ordering.
pub fn renumber_connections(connections: &mut [Connection]) {
    let mut adapters: FxHashMap<String, u32> = FxHashMap::default();
    let mut next = |name: &str| -> u32 {
        let slot = adapters.entry(name.to_string()).or_insert(0);
        let assigned = *slot;
        *slot += 1;
        assigned
    };

    for conn in connections {
        conn.from_adapter_number = next(&conn.from);
        conn.to_adapter_number = next(&conn.to);
    }
}
