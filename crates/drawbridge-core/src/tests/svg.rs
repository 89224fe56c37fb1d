use crate::*;
use futures::executor::block_on;

/// Wraps an mxGraph payload in a draw.io-style SVG export: the payload lands
/// in the root `content` attribute, XML-escaped.
fn svg_export(payload: &str) -> String {
    let escaped = payload
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;");
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="300" height="200" content="{escaped}"><g/></svg>"#
    )
}

const PAYLOAD: &str = r#"<mxfile host="app.diagrams.net"><diagram><mxGraphModel><root>
<mxCell id="0"/><mxCell id="1" parent="0"/>
<mxCell id="r1" value="" style="shape=mxgraph.cisco.routers.router;" vertex="1" parent="1"/>
<mxCell id="r2" value="" style="shape=mxgraph.cisco.routers.router;" vertex="1" parent="1"/>
<mxCell id="e1" edge="1" parent="1" source="r1" target="r2"/>
</root></mxGraphModel></diagram></mxfile>"#;

#[test]
fn svg_export_extracts_like_the_plain_variant() {
    let engine = Engine::new();
    let got = block_on(engine.extract(&svg_export(PAYLOAD))).unwrap();

    assert_eq!(got.kind, SourceKind::Svg);
    let names: Vec<_> = got.devices.iter().map(|d| d.unique_name.as_str()).collect();
    assert_eq!(names, ["router", "router-2"]);
    assert_eq!(got.connections.len(), 1);
    assert_eq!(got.connections[0].from, "router");
    assert_eq!(got.connections[0].to, "router-2");
}

#[test]
fn detect_kind_distinguishes_the_two_variants() {
    let engine = Engine::new();
    assert_eq!(
        block_on(engine.detect_kind(&svg_export(PAYLOAD))).unwrap(),
        SourceKind::Svg
    );
    assert_eq!(
        block_on(engine.detect_kind("<mxGraphModel><root/></mxGraphModel>")).unwrap(),
        SourceKind::Xml
    );
}

#[test]
fn svg_missing_content_attribute_fails_uniformly() {
    let engine = Engine::new();
    let err = block_on(engine.extract(r#"<svg xmlns="http://www.w3.org/2000/svg"><g/></svg>"#))
        .unwrap_err();
    assert!(matches!(err, Error::MissingDiagramContent));
}

#[test]
fn malformed_embedded_payload_names_the_embedded_layer() {
    let engine = Engine::new();
    let err = block_on(engine.extract(&svg_export("<mxGraphModel><root>"))).unwrap_err();
    match err {
        Error::Xml { layer, .. } => assert_eq!(layer, ParseLayer::Embedded),
        other => panic!("expected embedded-layer XML error, got: {other}"),
    }
}

#[test]
fn malformed_transport_document_names_the_transport_layer() {
    let engine = Engine::new();
    let err = block_on(engine.extract("not xml at all")).unwrap_err();
    match err {
        Error::Xml { layer, .. } => assert_eq!(layer, ParseLayer::Transport),
        other => panic!("expected transport-layer XML error, got: {other}"),
    }
}
