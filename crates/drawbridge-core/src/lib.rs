#![forbid(unsafe_code)]

//! draw.io network-diagram extraction (headless).
//!
//! Design goals:
//! - deterministic outputs: re-running on the same document reproduces
//!   identical names and adapter numbers (idempotent re-import)
//! - explicit state: counters live in values threaded through one invocation,
//!   never in shared mutable state
//! - runtime-agnostic async APIs (no specific executor required)

pub mod catalog;
pub mod cells;
pub mod decode;
pub mod error;
pub mod manifest;
pub mod resolve;

pub use catalog::{DeviceCatalog, DeviceCategory, Marker};
pub use cells::{CellScan, RawEdge, RawNode};
pub use decode::{DecodedDocument, SourceKind, decode_document, detect_source_kind};
pub use error::{Error, ParseLayer, Result};
pub use resolve::{Connection, ResolutionState, ResolvedDevice};

/// Everything one document yields: the detected source kind, the resolved
/// devices in document order, and the connections in edge document order.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Extraction {
    pub kind: SourceKind,
    pub devices: Vec<ResolvedDevice>,
    pub connections: Vec<Connection>,
}

/// Extraction pipeline entry point.
///
/// The engine owns the classification catalog and nothing else; each
/// extraction call carries private counters, so running one engine on
/// independent documents concurrently is safe.
#[derive(Debug, Clone)]
pub struct Engine {
    catalog: DeviceCatalog,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            catalog: DeviceCatalog::default_drawio_cisco(),
        }
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(mut self, catalog: DeviceCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn catalog(&self) -> &DeviceCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut DeviceCatalog {
        &mut self.catalog
    }

    /// Synchronous variant of [`Engine::detect_kind`].
    pub fn detect_kind_sync(&self, text: &str) -> Result<SourceKind> {
        decode::detect_source_kind(text)
    }

    pub async fn detect_kind(&self, text: &str) -> Result<SourceKind> {
        self.detect_kind_sync(text)
    }

    /// Synchronous variant of [`Engine::extract`].
    ///
    /// The work is CPU-bound and performs no I/O, so this is the natural entry
    /// point for synchronous callers.
    pub fn extract_sync(&self, text: &str) -> Result<Extraction> {
        let decoded = decode::decode_document(text)?;
        let scan = cells::scan_cells(&decoded.xml, decoded.layer, &self.catalog)?;

        let mut state = ResolutionState::new();
        state.resolve_nodes(&scan.nodes);
        let connections = state.resolve_edges(&scan.edges);
        let devices = state.into_devices();

        tracing::debug!(
            kind = %decoded.kind,
            devices = devices.len(),
            connections = connections.len(),
            "extraction complete"
        );

        Ok(Extraction {
            kind: decoded.kind,
            devices,
            connections,
        })
    }

    pub async fn extract(&self, text: &str) -> Result<Extraction> {
        self.extract_sync(text)
    }
}

#[cfg(test)]
mod tests;
