//! Error types for MIME message assembly.

use std::io;

/// Result type alias for MIME operations.
pub type Result<T> = std::result::Result<T, Error>;

/// MIME error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A header value could not be encoded for transport.
    #[error("Header encoding failed: {0}")]
    Encoding(String),

    /// Invalid content type.
    #[error("Invalid content type: {0}")]
    InvalidContentType(String),

    /// Base64 decode error.
    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// Attachment content could not be read.
    #[error("Attachment read failed: {0}")]
    Io(#[from] io::Error),
}
