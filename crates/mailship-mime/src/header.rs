//! Header serialization for outgoing messages.

use std::fmt;

/// An ordered collection of message headers.
///
/// Unlike a parsed header map, an outgoing message cares about emission order
/// (`From` before `To` before `Subject`), so entries are kept as written.
#[derive(Debug, Clone, Default)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    /// Creates an empty header collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Appends a header line.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Returns the first value for a header, case-insensitively.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns an iterator over all header entries in emission order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Returns the number of header entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no headers have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.entries {
            write!(f, "{name}: {value}\r\n")?;
        }
        Ok(())
    }
}

/// Collapses every CR/LF sequence in a free-text header value to one space.
///
/// Header values such as subjects are expected to be a single logical line;
/// embedded line breaks would otherwise terminate the header early and let
/// the remainder be parsed as forged headers. Addresses are rejected outright
/// instead, this normalization applies only to free-text content.
#[must_use]
pub fn sanitize_header_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_break = false;
    for ch in value.chars() {
        if ch == '\r' || ch == '\n' {
            if !in_break {
                out.push(' ');
                in_break = true;
            }
        } else {
            out.push(ch);
            in_break = false;
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn push_and_get_case_insensitive() {
        let mut headers = Headers::new();
        headers.push("Content-Type", "text/plain");
        assert_eq!(headers.get("content-type"), Some("text/plain"));
        assert_eq!(headers.get("CONTENT-TYPE"), Some("text/plain"));
        assert!(headers.get("subject").is_none());
    }

    #[test]
    fn display_preserves_order_with_crlf() {
        let mut headers = Headers::new();
        headers.push("From", "a@example.com");
        headers.push("To", "b@example.com");
        headers.push("Subject", "Hi");
        assert_eq!(
            headers.to_string(),
            "From: a@example.com\r\nTo: b@example.com\r\nSubject: Hi\r\n"
        );
    }

    #[test]
    fn iter_yields_entries_in_order() {
        let mut headers = Headers::new();
        assert!(headers.is_empty());
        headers.push("From", "a@example.com");
        headers.push("To", "b@example.com");

        let entries: Vec<_> = headers.iter().collect();
        assert_eq!(headers.len(), 2);
        assert_eq!(
            entries,
            vec![("From", "a@example.com"), ("To", "b@example.com")]
        );
    }

    #[test]
    fn sanitize_collapses_crlf_run_to_one_space() {
        assert_eq!(sanitize_header_value("a\r\nb"), "a b");
        assert_eq!(sanitize_header_value("a\rb"), "a b");
        assert_eq!(sanitize_header_value("a\nb"), "a b");
        assert_eq!(sanitize_header_value("a\r\n\r\n\nb"), "a b");
    }

    #[test]
    fn sanitize_leaves_clean_values_alone() {
        assert_eq!(sanitize_header_value("plain subject"), "plain subject");
        assert_eq!(sanitize_header_value(""), "");
    }

    proptest! {
        #[test]
        fn sanitize_never_emits_line_breaks(s in any::<String>()) {
            let out = sanitize_header_value(&s);
            prop_assert!(!out.contains('\r'));
            prop_assert!(!out.contains('\n'));
        }
    }
}
