use thiserror::Error;

/// Failures surfaced by the push transport and REST API client.
///
/// None of these are fatal to the hosting process; the stream client
/// degrades to "notifications temporarily inert" on every variant.
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("Failed to connect: {0}")]
    Connect(String),

    #[error("Unexpected HTTP status: {0}")]
    BadStatus(u16),

    #[error("Unexpected content type: {0}")]
    BadContentType(String),

    #[error("Transport body error: {0}")]
    Body(String),

    #[error("No auth token available")]
    MissingToken,

    #[error("Malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub type StreamResult<T> = Result<T, StreamError>;
