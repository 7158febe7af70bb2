use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("credential rejected by stream endpoint (HTTP {status})")]
    Unauthorized { status: u16 },

    #[error("stream endpoint returned HTTP {status}")]
    Status { status: u16 },

    #[error("failed to connect to stream endpoint: {0}")]
    Connect(#[source] reqwest::Error),

    #[error("stream body failed: {0}")]
    Body(#[source] reqwest::Error),

    #[error("failed to read event source: {0}")]
    Io(#[from] std::io::Error),

    #[error("event source already consumed")]
    Exhausted,
}

impl TransportError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, TransportError::Unauthorized { .. })
    }
}
