//! Error type for composing and sending email.

/// Result type alias for email operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Anything that can go wrong between composing a message and the server
/// accepting it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Message assembly failed.
    #[error(transparent)]
    Build(#[from] mailship_mime::Error),

    /// Validation or the SMTP exchange failed.
    #[error(transparent)]
    Smtp(#[from] mailship_smtp::Error),
}
