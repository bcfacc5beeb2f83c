//! Authentication credentials.
//!
//! The session driver is mechanism-agnostic: anything that can name a SASL
//! mechanism and answer server challenges can authenticate a session.
//! Implements PLAIN (RFC 4616), LOGIN, and XOAUTH2 (Google/Microsoft).

use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// A source of authentication responses.
///
/// `initial_response` is sent inline with the AUTH command (SASL-IR) when
/// available; `respond` answers each 334 continuation challenge. The
/// challenge arrives already base64-decoded and the returned response is
/// transmitted base64-encoded.
pub trait Credential: Send + Sync {
    /// SASL mechanism name as advertised by servers (e.g. "PLAIN").
    fn mechanism(&self) -> &'static str;

    /// Initial response sent with the AUTH command, already base64-encoded.
    fn initial_response(&self) -> Option<String> {
        None
    }

    /// Produces the base64-encoded response to a server challenge.
    ///
    /// # Errors
    ///
    /// Returns an error if the mechanism cannot answer the challenge.
    fn respond(&self, challenge: &[u8]) -> Result<String>;
}

/// PLAIN credentials: username and password in a single NUL-separated blob.
pub struct Plain {
    username: String,
    password: String,
}

impl Plain {
    /// Creates PLAIN credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Credential for Plain {
    fn mechanism(&self) -> &'static str {
        "PLAIN"
    }

    fn initial_response(&self) -> Option<String> {
        // \0authzid\0authcid\0password with an empty authorization identity
        let blob = format!("\0{}\0{}", self.username, self.password);
        Some(STANDARD.encode(blob.as_bytes()))
    }

    fn respond(&self, _challenge: &[u8]) -> Result<String> {
        Err(Error::Protocol("unexpected challenge for PLAIN".to_string()))
    }
}

/// LOGIN credentials: username and password sent in separate challenge turns.
pub struct Login {
    username: String,
    password: String,
}

impl Login {
    /// Creates LOGIN credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Credential for Login {
    fn mechanism(&self) -> &'static str {
        "LOGIN"
    }

    fn respond(&self, challenge: &[u8]) -> Result<String> {
        let prompt = String::from_utf8_lossy(challenge).to_lowercase();
        if prompt.contains("username") {
            Ok(STANDARD.encode(self.username.as_bytes()))
        } else if prompt.contains("password") {
            Ok(STANDARD.encode(self.password.as_bytes()))
        } else {
            Err(Error::Protocol(format!(
                "unrecognized LOGIN challenge: {prompt:?}"
            )))
        }
    }
}

/// XOAUTH2 credentials: user address plus an OAuth2 access token.
pub struct XOAuth2 {
    user: String,
    token: String,
}

impl XOAuth2 {
    /// Creates XOAUTH2 credentials.
    pub fn new(user: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            token: token.into(),
        }
    }
}

impl Credential for XOAuth2 {
    fn mechanism(&self) -> &'static str {
        "XOAUTH2"
    }

    fn initial_response(&self) -> Option<String> {
        let blob = format!("user={}\x01auth=Bearer {}\x01\x01", self.user, self.token);
        Some(STANDARD.encode(blob.as_bytes()))
    }

    fn respond(&self, _challenge: &[u8]) -> Result<String> {
        // The challenge carries a JSON error; an empty line asks the server
        // to finish the exchange with its final status reply.
        Ok(String::new())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn plain_initial_response_format() {
        let cred = Plain::new("user@example.com", "password123");
        let response = cred.initial_response().unwrap();
        let decoded = STANDARD.decode(&response).unwrap();
        assert_eq!(decoded, b"\0user@example.com\0password123");
    }

    #[test]
    fn plain_rejects_challenges() {
        let cred = Plain::new("u", "p");
        assert!(cred.respond(b"anything").is_err());
    }

    #[test]
    fn login_answers_username_then_password() {
        let cred = Login::new("user", "secret");
        assert!(cred.initial_response().is_none());

        let first = cred.respond(b"Username:").unwrap();
        assert_eq!(STANDARD.decode(&first).unwrap(), b"user");

        let second = cred.respond(b"Password:").unwrap();
        assert_eq!(STANDARD.decode(&second).unwrap(), b"secret");
    }

    #[test]
    fn login_rejects_unknown_prompt() {
        let cred = Login::new("user", "secret");
        assert!(cred.respond(b"Color of your bikeshed:").is_err());
    }

    #[test]
    fn xoauth2_initial_response_format() {
        let cred = XOAuth2::new("user@example.com", "token123");
        let response = cred.initial_response().unwrap();
        let decoded = String::from_utf8(STANDARD.decode(&response).unwrap()).unwrap();
        assert_eq!(decoded, "user=user@example.com\x01auth=Bearer token123\x01\x01");
    }

    #[test]
    fn xoauth2_sends_empty_line_on_challenge() {
        let cred = XOAuth2::new("u", "t");
        assert_eq!(cred.respond(b"{\"status\":\"401\"}").unwrap(), "");
    }

    #[test]
    fn credentials_never_leak_raw_secrets() {
        let response = Plain::new("user@example.com", "hunter2")
            .initial_response()
            .unwrap();
        assert!(!response.contains("user@example.com"));
        assert!(!response.contains("hunter2"));
    }
}
