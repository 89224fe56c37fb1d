//! mxCell traversal.
//!
//! Nodes and edges are independent passes over the same document-order
//! traversal: node classification never consults edges and vice versa.

use crate::catalog::{DeviceCatalog, DeviceCategory};
use crate::error::{Error, ParseLayer, Result};

/// One classified vertex cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawNode {
    pub id: String,
    pub style: String,
    /// Trimmed `value` attribute; `None` when absent or whitespace-only.
    pub label: Option<String>,
    pub category: DeviceCategory,
}

/// One edge cell with both endpoint attributes present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEdge {
    pub source_id: String,
    pub target_id: String,
}

#[derive(Debug, Clone, Default)]
pub struct CellScan {
    pub nodes: Vec<RawNode>,
    pub edges: Vec<RawEdge>,
}

/// Traverses every `mxCell` element of the decoded diagram XML in document
/// order.
///
/// Vertex cells (`vertex="1"`) that classify against the catalog become
/// [`RawNode`]s; unclassified vertices are decorative shapes and are skipped
/// entirely. Edge cells (`edge="1"`) become [`RawEdge`]s only when both
/// `source` and `target` are present; partial edges are dropped.
pub fn scan_cells(xml: &str, layer: ParseLayer, catalog: &DeviceCatalog) -> Result<CellScan> {
    let doc = roxmltree::Document::parse(xml).map_err(|source| Error::xml(layer, source))?;

    let mut scan = CellScan::default();
    for cell in doc
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "mxCell")
    {
        if cell.attribute("vertex") == Some("1") {
            let style = cell.attribute("style").unwrap_or_default();
            let Some(category) = catalog.classify(style) else {
                tracing::debug!(id = cell.attribute("id").unwrap_or_default(), "skipping unclassified vertex");
                continue;
            };
            let label = cell
                .attribute("value")
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string);
            scan.nodes.push(RawNode {
                id: cell.attribute("id").unwrap_or_default().to_string(),
                style: style.to_string(),
                label,
                category,
            });
        }

        if cell.attribute("edge") == Some("1") {
            match (cell.attribute("source"), cell.attribute("target")) {
                (Some(source), Some(target)) => scan.edges.push(RawEdge {
                    source_id: source.to_string(),
                    target_id: target.to_string(),
                }),
                _ => {
                    tracing::debug!(
                        id = cell.attribute("id").unwrap_or_default(),
                        "dropping edge with missing endpoint"
                    );
                }
            }
        }
    }

    Ok(scan)
}
