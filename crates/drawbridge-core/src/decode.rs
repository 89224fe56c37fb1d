//! Two-stage document decode.
//!
//! Stage 1 parses the transport document and sniffs the source kind from the
//! root element. Stage 2, only for SVG exports, pulls the HTML-escaped mxGraph
//! payload out of the root `content` attribute and returns it as an
//! independent XML document for the cell scan to parse.

use crate::error::{Error, ParseLayer, Result};
use std::borrow::Cow;

/// Accepted input shapes: a plain mxGraph XML export, or an SVG export with
/// the diagram embedded in the root `content` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Xml,
    Svg,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Xml => "xml",
            SourceKind::Svg => "svg",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of the decode stage: the XML text the cell scan should traverse,
/// plus the layer tag a parse failure of that text belongs to.
#[derive(Debug, Clone)]
pub struct DecodedDocument<'a> {
    pub kind: SourceKind,
    pub layer: ParseLayer,
    pub xml: Cow<'a, str>,
}

/// Parses the transport document and reports the source kind without decoding
/// the embedded payload.
pub fn detect_source_kind(text: &str) -> Result<SourceKind> {
    let doc = parse_transport(text)?;
    Ok(kind_of(&doc))
}

/// Runs the full decode: transport parse, then (for SVG) embedded-content
/// extraction and unescape.
///
/// Plain exports are returned borrowed and unchanged. Any root element other
/// than `svg` is treated as the plain variant; the cell scan over an
/// unrecognized document simply finds no devices.
pub fn decode_document(text: &str) -> Result<DecodedDocument<'_>> {
    let doc = parse_transport(text)?;
    match kind_of(&doc) {
        SourceKind::Xml => Ok(DecodedDocument {
            kind: SourceKind::Xml,
            layer: ParseLayer::Transport,
            xml: Cow::Borrowed(text),
        }),
        SourceKind::Svg => {
            let embedded = extract_embedded_diagram(&doc)?;
            tracing::debug!(bytes = embedded.len(), "decoded embedded diagram content");
            Ok(DecodedDocument {
                kind: SourceKind::Svg,
                layer: ParseLayer::Embedded,
                xml: Cow::Owned(embedded),
            })
        }
    }
}

/// Extracts the embedded diagram payload from an already-parsed SVG transport
/// document and undoes the HTML entity escaping.
///
/// A missing or empty `content` attribute is fatal: without it there is no
/// diagram to extract.
pub fn extract_embedded_diagram(doc: &roxmltree::Document<'_>) -> Result<String> {
    let content = doc
        .root_element()
        .attribute("content")
        .filter(|c| !c.is_empty())
        .ok_or(Error::MissingDiagramContent)?;
    Ok(htmlize::unescape(content).into_owned())
}

fn parse_transport(text: &str) -> Result<roxmltree::Document<'_>> {
    roxmltree::Document::parse(text).map_err(|source| Error::xml(ParseLayer::Transport, source))
}

fn kind_of(doc: &roxmltree::Document<'_>) -> SourceKind {
    // Compare the local name only; draw.io SVG exports carry the SVG namespace.
    if doc.root_element().tag_name().name() == "svg" {
        SourceKind::Svg
    } else {
        SourceKind::Xml
    }
}
