use thiserror::Error;

/// Startup and routing failures of the widget host
#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("widget container #{0} not found; add <div id=\"{0}\"></div> to the page")]
    ContainerNotFound(String),

    #[error("invalid location {location:?}: {source}")]
    InvalidLocation {
        location: String,
        #[source]
        source: url::ParseError,
    },
}
