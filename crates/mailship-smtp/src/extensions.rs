//! ESMTP extension discovery.

use std::collections::HashSet;

/// An ESMTP extension advertised in an EHLO response.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Extension {
    /// STARTTLS - opportunistic TLS upgrade
    StartTls,
    /// AUTH - authentication, with the advertised mechanism names
    Auth(Vec<String>),
    /// SIZE - maximum message size
    Size(Option<usize>),
    /// 8BITMIME - 8-bit MIME transport
    EightBitMime,
    /// PIPELINING - command pipelining
    Pipelining,
    /// SMTPUTF8 - UTF-8 email addresses
    SmtpUtf8,
    /// Anything the client does not recognize
    Unknown(String),
}

impl Extension {
    /// Parses one EHLO response line into an extension.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let mut words = line.split_whitespace();
        let Some(keyword) = words.next() else {
            return Self::Unknown(line.to_string());
        };

        match keyword.to_uppercase().as_str() {
            "STARTTLS" => Self::StartTls,
            "AUTH" => Self::Auth(words.map(str::to_uppercase).collect()),
            "SIZE" => Self::Size(words.next().and_then(|s| s.parse().ok())),
            "8BITMIME" => Self::EightBitMime,
            "PIPELINING" => Self::Pipelining,
            "SMTPUTF8" => Self::SmtpUtf8,
            _ => Self::Unknown(line.to_string()),
        }
    }
}

/// What the server told us about itself during the greeting exchange.
#[derive(Debug, Clone, Default)]
pub struct ServerInfo {
    /// Name the server identified itself with in its greeting.
    pub hostname: String,
    /// Extensions advertised in the EHLO response.
    pub extensions: HashSet<Extension>,
}

impl ServerInfo {
    /// Checks whether the server advertised a specific extension.
    #[must_use]
    pub fn supports(&self, ext: &Extension) -> bool {
        self.extensions.contains(ext)
    }

    /// Checks whether the server offers a TLS upgrade.
    #[must_use]
    pub fn supports_starttls(&self) -> bool {
        self.supports(&Extension::StartTls)
    }

    /// Checks whether the server offers authentication at all.
    #[must_use]
    pub fn supports_auth(&self) -> bool {
        self.extensions
            .iter()
            .any(|ext| matches!(ext, Extension::Auth(_)))
    }

    /// Returns the advertised authentication mechanism names.
    #[must_use]
    pub fn auth_mechanisms(&self) -> Vec<String> {
        for ext in &self.extensions {
            if let Extension::Auth(mechanisms) = ext {
                return mechanisms.clone();
            }
        }
        Vec::new()
    }

    /// Returns the advertised maximum message size, if any.
    #[must_use]
    pub fn max_message_size(&self) -> Option<usize> {
        for ext in &self.extensions {
            if let Extension::Size(size) = ext {
                return *size;
            }
        }
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_starttls_any_case() {
        assert_eq!(Extension::parse("STARTTLS"), Extension::StartTls);
        assert_eq!(Extension::parse("starttls"), Extension::StartTls);
    }

    #[test]
    fn parse_auth_mechanisms() {
        let ext = Extension::parse("AUTH PLAIN LOGIN XOAUTH2");
        assert_eq!(
            ext,
            Extension::Auth(vec![
                "PLAIN".to_string(),
                "LOGIN".to_string(),
                "XOAUTH2".to_string()
            ])
        );
    }

    #[test]
    fn parse_size() {
        assert_eq!(Extension::parse("SIZE 52428800"), Extension::Size(Some(52_428_800)));
        assert_eq!(Extension::parse("SIZE"), Extension::Size(None));
    }

    #[test]
    fn parse_unknown_keeps_line() {
        assert_eq!(
            Extension::parse("CHUNKING"),
            Extension::Unknown("CHUNKING".to_string())
        );
    }

    #[test]
    fn server_info_lookups() {
        let mut info = ServerInfo {
            hostname: "mail.example.com".to_string(),
            extensions: HashSet::new(),
        };
        info.extensions.insert(Extension::StartTls);
        info.extensions
            .insert(Extension::Auth(vec!["PLAIN".to_string()]));
        info.extensions.insert(Extension::Size(Some(1000)));

        assert!(info.supports_starttls());
        assert!(info.supports_auth());
        assert_eq!(info.auth_mechanisms(), vec!["PLAIN".to_string()]);
        assert_eq!(info.max_message_size(), Some(1000));
    }

    #[test]
    fn server_info_defaults_to_nothing() {
        let info = ServerInfo::default();
        assert!(!info.supports_starttls());
        assert!(!info.supports_auth());
        assert!(info.auth_mechanisms().is_empty());
    }
}
