//! Transfer and header encodings.
//!
//! Base64 for attachment bodies, RFC 2047 encoded-words for non-ASCII
//! header text.

use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Maximum line length for base64-encoded bodies (RFC 2045).
const BASE64_LINE_WIDTH: usize = 76;

/// Encodes data as a single base64 string.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decodes base64 data.
///
/// # Errors
///
/// Returns an error if the input is not valid base64.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    STANDARD.decode(data).map_err(Into::into)
}

/// Encodes data as base64 split into CRLF-terminated lines of 76 columns.
///
/// This is the body form required for `Content-Transfer-Encoding: base64`.
#[must_use]
pub fn encode_base64_wrapped(data: &[u8]) -> String {
    let encoded = STANDARD.encode(data);
    let mut out = String::with_capacity(encoded.len() + encoded.len() / BASE64_LINE_WIDTH * 2 + 2);
    let mut rest = encoded.as_str();
    while rest.len() > BASE64_LINE_WIDTH {
        let (line, tail) = rest.split_at(BASE64_LINE_WIDTH);
        out.push_str(line);
        out.push_str("\r\n");
        rest = tail;
    }
    out.push_str(rest);
    out
}

/// Encodes a header value as an RFC 2047 encoded-word when needed.
///
/// Plain ASCII text without encoded-word delimiters passes through verbatim;
/// anything else becomes `=?charset?B?...?=`.
///
/// # Errors
///
/// Returns an error if the charset name itself contains `?`, which cannot be
/// represented inside an encoded-word.
pub fn encode_rfc2047(text: &str, charset: &str) -> Result<String> {
    if charset.contains('?') {
        return Err(Error::Encoding(format!("invalid charset name: {charset:?}")));
    }

    if text.chars().all(|c| c.is_ascii() && c != '=' && c != '?') {
        return Ok(text.to_string());
    }

    let encoded = encode_base64(text.as_bytes());
    Ok(format!("=?{charset}?B?{encoded}?="))
}

/// Decodes an RFC 2047 encoded-word; non-encoded input passes through.
///
/// # Errors
///
/// Returns an error if the encoded-word structure or payload is invalid.
pub fn decode_rfc2047(text: &str) -> Result<String> {
    if !text.starts_with("=?") || !text.ends_with("?=") {
        return Ok(text.to_string());
    }

    let inner = &text[2..text.len() - 2];
    let mut parts = inner.split('?');
    let (Some(_charset), Some(encoding), Some(payload), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(Error::Encoding(format!("malformed encoded-word: {text:?}")));
    };

    if !encoding.eq_ignore_ascii_case("b") {
        return Err(Error::Encoding(format!("unsupported encoding: {encoding:?}")));
    }

    let decoded = decode_base64(payload)?;
    String::from_utf8(decoded).map_err(|e| Error::Encoding(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn base64_roundtrip() {
        let encoded = encode_base64(b"Hello, World!");
        assert_eq!(encoded, "SGVsbG8sIFdvcmxkIQ==");
        assert_eq!(decode_base64(&encoded).unwrap(), b"Hello, World!");
    }

    #[test]
    fn base64_wrapped_lines_fit_width() {
        let data = vec![0xAB_u8; 200];
        let wrapped = encode_base64_wrapped(&data);
        for line in wrapped.split("\r\n") {
            assert!(line.len() <= 76);
        }
        let stripped: String = wrapped.chars().filter(|c| !c.is_whitespace()).collect();
        assert_eq!(decode_base64(&stripped).unwrap(), data);
    }

    #[test]
    fn base64_wrapped_short_input_is_single_line() {
        let wrapped = encode_base64_wrapped(b"tiny");
        assert!(!wrapped.contains("\r\n"));
    }

    #[test]
    fn rfc2047_ascii_passthrough() {
        assert_eq!(encode_rfc2047("Hello", "utf-8").unwrap(), "Hello");
    }

    #[test]
    fn rfc2047_encodes_non_ascii() {
        let encoded = encode_rfc2047("Héllo", "utf-8").unwrap();
        assert!(encoded.starts_with("=?utf-8?B?"));
        assert!(encoded.ends_with("?="));
        assert_eq!(decode_rfc2047(&encoded).unwrap(), "Héllo");
    }

    #[test]
    fn rfc2047_decode_passthrough() {
        assert_eq!(decode_rfc2047("plain").unwrap(), "plain");
    }

    #[test]
    fn rfc2047_decode_rejects_malformed() {
        assert!(decode_rfc2047("=?utf-8?B?=").is_err());
        assert!(decode_rfc2047("=?utf-8?X?AAAA?=").is_err());
    }
}
