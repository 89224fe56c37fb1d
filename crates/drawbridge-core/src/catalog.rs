//! Device classification catalog.
//!
//! Classification is substring search over the free-text mxGraph style string.
//! The markers live in one ordered table instead of scattered literals so the
//! mapping can be extended without touching the traversal code; the first
//! matching entry wins.

/// Monitored device families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceCategory {
    Router,
    Switch,
    Computer,
    Server,
    Storage,
    Hub,
}

impl DeviceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceCategory::Router => "router",
            DeviceCategory::Switch => "switch",
            DeviceCategory::Computer => "computer",
            DeviceCategory::Server => "server",
            DeviceCategory::Storage => "storage",
            DeviceCategory::Hub => "hub",
        }
    }
}

impl std::fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Marker {
    pub needle: &'static str,
    pub category: DeviceCategory,
}

/// Ordered `(marker, category)` table evaluated first-match.
///
/// Callers that diagram with a different shape library can build their own
/// catalog and hand it to the engine.
#[derive(Debug, Clone)]
pub struct DeviceCatalog {
    markers: Vec<Marker>,
}

impl DeviceCatalog {
    pub fn new() -> Self {
        Self {
            markers: Vec::new(),
        }
    }

    pub fn add(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    pub fn add_marker(&mut self, needle: &'static str, category: DeviceCategory) {
        self.add(Marker { needle, category });
    }

    /// The draw.io Cisco shape-library markers.
    pub fn default_drawio_cisco() -> Self {
        let mut cat = Self::new();

        cat.add_marker("mxgraph.cisco.routers", DeviceCategory::Router);
        cat.add_marker("mxgraph.cisco.switches", DeviceCategory::Switch);
        cat.add_marker(
            "mxgraph.cisco.computers_and_peripherals",
            DeviceCategory::Computer,
        );
        cat.add_marker("mxgraph.cisco.servers", DeviceCategory::Server);
        cat.add_marker("mxgraph.cisco.storage", DeviceCategory::Storage);
        cat.add_marker("mxgraph.cisco.hubs_and_gateways", DeviceCategory::Hub);

        cat
    }

    /// Classifies a style string; `None` means the cell is decorative or an
    /// unrecognized shape and is not a device.
    pub fn classify(&self, style: &str) -> Option<DeviceCategory> {
        self.markers
            .iter()
            .find(|m| style.contains(m.needle))
            .map(|m| m.category)
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }
}

impl Default for DeviceCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_matches_cisco_markers() {
        let cat = DeviceCatalog::default_drawio_cisco();
        assert_eq!(
            cat.classify("sketch=0;shape=mxgraph.cisco.routers.router;"),
            Some(DeviceCategory::Router)
        );
        assert_eq!(
            cat.classify("shape=mxgraph.cisco.hubs_and_gateways.hub;fillColor=#036897;"),
            Some(DeviceCategory::Hub)
        );
        assert_eq!(cat.classify("rounded=0;whiteSpace=wrap;"), None);
    }

    #[test]
    fn first_matching_marker_wins() {
        let mut cat = DeviceCatalog::new();
        cat.add_marker("mxgraph.cisco", DeviceCategory::Server);
        cat.add_marker("mxgraph.cisco.routers", DeviceCategory::Router);
        assert_eq!(
            cat.classify("shape=mxgraph.cisco.routers.router;"),
            Some(DeviceCategory::Server)
        );
    }
}
