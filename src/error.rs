//! Error type shared by the server, the CoCon client and the display.

use thiserror::Error;

/// Result type for vote monitor operations
pub type MonitorResult<T> = Result<T, MonitorError>;

#[derive(Debug, Error)]
pub enum MonitorError {
    /// A page element the renderer depends on could not be located
    #[error("missing page element: {0}")]
    MissingElement(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(Box<tokio_tungstenite::tungstenite::Error>),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("signal handler: {0}")]
    Signal(#[from] ctrlc::Error),

    /// CoCon answered with something we could not make sense of
    #[error("CoCon protocol error: {0}")]
    Protocol(String),

    /// The snapshot stream ended
    #[error("connection closed: {0}")]
    Closed(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for MonitorError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        MonitorError::WebSocket(Box::new(e))
    }
}
