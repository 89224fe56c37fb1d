//! Name disambiguation and adapter/port assignment.
//!
//! All counters live in an explicit [`ResolutionState`] value so one
//! invocation never observes another's state; re-running on the same document
//! reproduces identical names and adapter numbers.

use crate::catalog::DeviceCategory;
use crate::cells::{RawEdge, RawNode};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;

/// A classified device with its display-ready, disambiguated name.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ResolvedDevice {
    pub id: String,
    pub base_name: String,
    pub unique_name: String,
    pub category: DeviceCategory,
}

/// One lab link. `from`/`to` are unique names, or the raw cell id when the
/// endpoint never resolved to a device. Field names match the manifest JSON
/// keys exactly.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Connection {
    pub from: String,
    pub to: String,
    pub from_adapter_number: u32,
    pub to_adapter_number: u32,
}

#[derive(Debug, Clone, Default)]
pub struct ResolutionState {
    /// base name -> occurrences seen so far, in node document order.
    name_counts: FxHashMap<String, u32>,
    /// raw cell id -> resolved device, insertion order = document order.
    devices: IndexMap<String, ResolvedDevice>,
    /// raw cell id -> next free adapter slot. One pool per device, shared by
    /// both edge roles.
    adapter_counts: FxHashMap<String, u32>,
}

impl ResolutionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns base and unique names to the scanned nodes, in order.
    ///
    /// The first occurrence of a base name keeps it verbatim; the n-th gets a
    /// `-{n}` suffix (n starting at 2). Unique names are therefore distinct
    /// across the whole document.
    pub fn resolve_nodes(&mut self, nodes: &[RawNode]) {
        for node in nodes {
            let base_name = base_name(node);
            let count = self.name_counts.entry(base_name.clone()).or_insert(0);
            *count += 1;
            let unique_name = if *count == 1 {
                base_name.clone()
            } else {
                format!("{base_name}-{count}")
            };
            self.devices.insert(
                node.id.clone(),
                ResolvedDevice {
                    id: node.id.clone(),
                    base_name,
                    unique_name,
                    category: node.category,
                },
            );
        }
    }

    /// Turns scanned edges into connections, consuming adapter slots as it
    /// goes.
    ///
    /// The source-side slot is taken strictly before the target-side slot, so
    /// a self-loop consumes two sequential numbers from the same pool.
    /// Endpoints that never resolved keep their raw id as the display name and
    /// still consume adapter slots.
    pub fn resolve_edges(&mut self, edges: &[RawEdge]) -> Vec<Connection> {
        let mut connections = Vec::with_capacity(edges.len());
        for edge in edges {
            let from = self.display_name(&edge.source_id);
            let to = self.display_name(&edge.target_id);
            let from_adapter_number = self.next_adapter(&edge.source_id);
            let to_adapter_number = self.next_adapter(&edge.target_id);
            connections.push(Connection {
                from,
                to,
                from_adapter_number,
                to_adapter_number,
            });
        }
        connections
    }

    pub fn device(&self, id: &str) -> Option<&ResolvedDevice> {
        self.devices.get(id)
    }

    pub fn devices(&self) -> impl Iterator<Item = &ResolvedDevice> {
        self.devices.values()
    }

    pub fn into_devices(self) -> Vec<ResolvedDevice> {
        self.devices.into_values().collect()
    }

    fn display_name(&self, id: &str) -> String {
        match self.devices.get(id) {
            Some(device) => device.unique_name.clone(),
            None => {
                tracing::warn!(id, "edge endpoint never resolved to a device, keeping raw id");
                id.to_string()
            }
        }
    }

    fn next_adapter(&mut self, id: &str) -> u32 {
        let slot = self.adapter_counts.entry(id.to_string()).or_insert(0);
        let assigned = *slot;
        *slot += 1;
        assigned
    }
}

/// Base-name rule: the trimmed label when present, else the last `.`-separated
/// token of the shape identifier in the style string (the substring after
/// `shape=` when present, up to the first `;`).
pub fn base_name(node: &RawNode) -> String {
    match &node.label {
        Some(label) => label.clone(),
        None => base_name_from_style(&node.style),
    }
}

fn base_name_from_style(style: &str) -> String {
    let shape = match style.split_once("shape=") {
        Some((_, rest)) => rest,
        None => style,
    };
    let shape = shape.split(';').next().unwrap_or(shape);
    shape.rsplit('.').next().unwrap_or(shape).to_string()
}
