//! SMTP reply parsing.

use crate::error::{Error, Result};

/// 220 Service ready.
pub const SERVICE_READY: u16 = 220;
/// 221 Service closing transmission channel.
pub const CLOSING: u16 = 221;
/// 235 Authentication succeeded.
pub const AUTH_SUCCEEDED: u16 = 235;
/// 250 Requested mail action okay, completed.
pub const OK: u16 = 250;
/// 334 Continue with authentication.
pub const AUTH_CONTINUE: u16 = 334;
/// 354 Start mail input.
pub const START_DATA: u16 = 354;

/// A complete server reply: one code and one or more text lines.
///
/// Multi-line replies repeat the code with a `-` separator on every line but
/// the last, which uses a space: `250-first`, `250-second`, `250 last`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Three-digit reply code.
    pub code: u16,
    /// Text of each reply line, code and separator stripped.
    pub lines: Vec<String>,
}

impl Reply {
    /// Parses a reply from the raw lines read off the wire.
    ///
    /// # Errors
    ///
    /// Returns an error if the reply is empty or a line is malformed.
    pub fn parse(raw: &[String]) -> Result<Self> {
        let first = raw
            .first()
            .ok_or_else(|| Error::Protocol("empty reply".to_string()))?;
        if first.len() < 3 {
            return Err(Error::Protocol(format!("reply too short: {first:?}")));
        }

        let code = first[..3]
            .parse::<u16>()
            .map_err(|_| Error::Protocol(format!("invalid reply code: {first:?}")))?;

        let mut lines = Vec::with_capacity(raw.len());
        for line in raw {
            match line.len() {
                3 => lines.push(String::new()),
                0..3 => {
                    return Err(Error::Protocol(format!("malformed reply line: {line:?}")));
                }
                _ => lines.push(line[4..].to_string()),
            }
        }

        Ok(Self { code, lines })
    }

    /// Returns true when this line terminates a reply (space separator).
    #[must_use]
    pub fn is_final_line(line: &str) -> bool {
        line.len() == 3 || (line.len() > 3 && line.as_bytes()[3] == b' ')
    }

    /// Returns true for a positive completion reply (2xx).
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.code >= 200 && self.code < 300
    }

    /// Returns true for an intermediate reply (3xx).
    #[must_use]
    pub const fn is_intermediate(&self) -> bool {
        self.code >= 300 && self.code < 400
    }

    /// Returns the reply text joined into a single line.
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join(" / ")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn raw(lines: &[&str]) -> Vec<String> {
        lines.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn parse_single_line() {
        let reply = Reply::parse(&raw(&["250 OK"])).unwrap();
        assert_eq!(reply.code, 250);
        assert_eq!(reply.lines, vec!["OK"]);
        assert!(reply.is_positive());
    }

    #[test]
    fn parse_multi_line() {
        let reply = Reply::parse(&raw(&[
            "250-mail.example.com",
            "250-STARTTLS",
            "250 SIZE 52428800",
        ]))
        .unwrap();
        assert_eq!(reply.code, 250);
        assert_eq!(reply.lines.len(), 3);
        assert_eq!(reply.lines[1], "STARTTLS");
    }

    #[test]
    fn parse_bare_code() {
        let reply = Reply::parse(&raw(&["354"])).unwrap();
        assert_eq!(reply.code, START_DATA);
        assert!(reply.is_intermediate());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Reply::parse(&[]).is_err());
        assert!(Reply::parse(&raw(&["25"])).is_err());
        assert!(Reply::parse(&raw(&["ABC nope"])).is_err());
    }

    #[test]
    fn final_line_detection() {
        assert!(Reply::is_final_line("250 OK"));
        assert!(Reply::is_final_line("354"));
        assert!(!Reply::is_final_line("250-more to come"));
    }

    #[test]
    fn text_joins_lines() {
        let reply = Reply::parse(&raw(&["550-no such user", "550 try later"])).unwrap();
        assert_eq!(reply.text(), "no such user / try later");
        assert!(!reply.is_positive());
    }
}
