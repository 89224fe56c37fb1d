pub type Result<T> = std::result::Result<T, Error>;

/// Which of the two XML parse layers failed.
///
/// Plain mxGraph exports only ever have a transport layer. SVG exports carry a
/// second, HTML-escaped mxGraph document inside the root `content` attribute;
/// that re-parse is the embedded layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseLayer {
    Transport,
    Embedded,
}

impl std::fmt::Display for ParseLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseLayer::Transport => write!(f, "transport"),
            ParseLayer::Embedded => write!(f, "embedded"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{layer} XML layer is not parseable: {source}")]
    Xml {
        layer: ParseLayer,
        #[source]
        source: roxmltree::Error,
    },

    #[error("SVG document has no embedded diagram `content` attribute")]
    MissingDiagramContent,
}

impl Error {
    pub(crate) fn xml(layer: ParseLayer, source: roxmltree::Error) -> Self {
        Self::Xml { layer, source }
    }
}
