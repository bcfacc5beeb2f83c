//! Multipart boundary token generation.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng;

/// Number of random bytes behind each token; 192 bits makes a collision with
/// message content vanishingly unlikely.
const TOKEN_BYTES: usize = 24;

/// Generates a fresh multipart boundary token.
///
/// Tokens are 32 characters from the URL-safe base64 alphabet, all of which
/// are valid RFC 2046 boundary characters. A new token is drawn for every
/// multipart group; tokens are never reused across messages.
#[must_use]
pub fn generate_boundary() -> String {
    let random_bytes: Vec<u8> = (0..TOKEN_BYTES)
        .map(|_| rand::thread_rng().r#gen::<u8>())
        .collect();
    URL_SAFE_NO_PAD.encode(random_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_unique() {
        let a = generate_boundary();
        let b = generate_boundary();
        assert_ne!(a, b);
    }

    #[test]
    fn token_charset_is_boundary_safe() {
        let token = generate_boundary();
        assert_eq!(token.len(), 32);
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }
}
