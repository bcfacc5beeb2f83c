//! Envelope addresses and the line-injection guard.

use crate::error::{Error, Result};

/// Rejects any value that contains a carriage return or line feed.
///
/// Values accepted here are interpolated verbatim into protocol command
/// lines and header lines; an embedded line break would let a caller smuggle
/// extra commands or forged headers into the session.
///
/// # Errors
///
/// Returns [`Error::HeaderInjection`] if the value contains `\r` or `\n`.
pub fn validate_line(value: &str) -> Result<()> {
    if value.contains('\r') || value.contains('\n') {
        return Err(Error::HeaderInjection(value.to_string()));
    }
    Ok(())
}

/// An envelope address, guaranteed free of line breaks.
///
/// No further syntax validation is performed; the receiving server is the
/// authority on what it will accept.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address(String);

impl Address {
    /// Creates a new address from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is empty or contains a line break.
    pub fn new(addr: impl Into<String>) -> Result<Self> {
        let addr = addr.into();
        if addr.is_empty() {
            return Err(Error::InvalidAddress("address cannot be empty".into()));
        }
        validate_line(&addr)?;
        Ok(Self(addr))
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_address() {
        let addr = Address::new("user@example.com").unwrap();
        assert_eq!(addr.as_str(), "user@example.com");
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(Address::new(""), Err(Error::InvalidAddress(_))));
    }

    #[test]
    fn rejects_carriage_return() {
        let err = Address::new("user@example.com\rRCPT TO:<evil@example.com>").unwrap_err();
        assert!(matches!(err, Error::HeaderInjection(_)));
    }

    #[test]
    fn rejects_line_feed() {
        let err = Address::new("user@example.com\nBcc: evil@example.com").unwrap_err();
        assert!(matches!(err, Error::HeaderInjection(_)));
    }

    #[test]
    fn validate_line_is_pure_accept_for_clean_values() {
        assert!(validate_line("subject text, commas; fine").is_ok());
        assert!(validate_line("").is_ok());
    }

    #[test]
    fn guard_does_not_do_syntax_validation() {
        // Everything short of a line break is the server's problem.
        assert!(Address::new("not-an-email").is_ok());
    }
}
