//! Error types for SMTP delivery.

use std::io;

/// Result type alias for SMTP operations.
pub type Result<T> = std::result::Result<T, Error>;

/// SMTP error types, one per step of the delivery sequence.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A value destined for a command or header line contains CR or LF.
    #[error("Header injection: {0:?} contains a line break")]
    HeaderInjection(String),

    /// The address is empty or otherwise unusable for an envelope.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Opening the connection failed.
    #[error("Connection failed: {0}")]
    Connect(#[source] io::Error),

    /// The server rejected the session greeting or EHLO.
    #[error("Greeting rejected: {code} {message}")]
    Greeting {
        /// Reply code from the server.
        code: u16,
        /// Reply text from the server.
        message: String,
    },

    /// STARTTLS negotiation or the TLS handshake failed.
    #[error("TLS upgrade failed: {0}")]
    Tls(String),

    /// The authentication exchange failed.
    #[error("Authentication failed: {code} {message}")]
    Auth {
        /// Reply code from the server.
        code: u16,
        /// Reply text from the server.
        message: String,
    },

    /// The server rejected the envelope sender.
    #[error("Sender rejected: {code} {message}")]
    Envelope {
        /// Reply code from the server.
        code: u16,
        /// Reply text from the server.
        message: String,
    },

    /// The server rejected an envelope recipient.
    #[error("Recipient {address} rejected: {code} {message}")]
    Recipient {
        /// The address the server refused.
        address: String,
        /// Reply code from the server.
        code: u16,
        /// Reply text from the server.
        message: String,
    },

    /// The message payload transfer failed.
    #[error("Message transfer failed: {0}")]
    Transfer(String),

    /// The envelope has no recipients to deliver to.
    #[error("No envelope recipients")]
    NoRecipients,

    /// Malformed or unexpected server reply.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Connection-level I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Returns true if this is a permanent server rejection (5xx).
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        match self {
            Self::Greeting { code, .. }
            | Self::Auth { code, .. }
            | Self::Envelope { code, .. }
            | Self::Recipient { code, .. } => *code >= 500 && *code < 600,
            _ => false,
        }
    }
}
