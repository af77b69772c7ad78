//! Heuristic detection of encrypted message bodies
//!
//! Advisory only. The stored `is_encrypted` flag is the authoritative signal;
//! this check exists for records where the flag cannot be trusted or is
//! missing. It misclassifies in both directions:
//!
//! - a token shorter than the threshold reads as plaintext (impossible for
//!   tokens this crate produces, which are at least 40 characters)
//! - long plaintext that happens to be valid base64, such as
//!   `"SGVsbG9Xb3JsZEFnYWluQW5kQWdhaW4="`, reads as encrypted

use base64::{Engine as _, engine::general_purpose::STANDARD};

/// Text must be strictly longer than this to be considered a token.
pub const LIKELY_TOKEN_MIN_CHARS: usize = 20;

/// Returns true if `text` looks like a [`crate::CipherToken`].
///
/// True iff `text` is longer than [`LIKELY_TOKEN_MIN_CHARS`] and decodes as
/// standard base64. Never panics.
pub fn is_likely_encrypted(text: &str) -> bool {
    if text.chars().count() <= LIKELY_TOKEN_MIN_CHARS {
        return false;
    }

    STANDARD.decode(text).is_ok_and(|decoded| !decoded.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_plaintext() {
        assert!(!is_likely_encrypted("hi"));
        assert!(!is_likely_encrypted(""));
    }

    #[test]
    fn threshold_is_exclusive() {
        // 20 chars of valid base64 is not enough
        assert!(!is_likely_encrypted("AAAAAAAAAAAAAAAAAAAA"));
        // 24 chars of valid base64 is
        assert!(is_likely_encrypted("AAAAAAAAAAAAAAAAAAAAAAAA"));
    }

    #[test]
    fn long_prose_is_plaintext() {
        assert!(!is_likely_encrypted("hello world, this is a longer message"));
    }

    #[test]
    fn real_token_is_detected() {
        assert!(is_likely_encrypted("AAECAwQFBgcICQoLEvS9Pl1dBowbTQHYPnbVQUTKi17Y1w=="));
    }

    #[test]
    fn base64_shaped_plaintext_is_misclassified() {
        // Known limitation, kept for compatibility
        assert!(is_likely_encrypted("SGVsbG9Xb3JsZEFnYWluQW5kQWdhaW4="));
    }

    #[test]
    fn unpadded_text_is_rejected() {
        // 22 chars, valid alphabet but missing padding
        assert!(!is_likely_encrypted("AAAAAAAAAAAAAAAAAAAAAA"));
    }
}
