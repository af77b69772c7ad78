//! Printable token encoding for encrypted message bodies
//!
//! Layout before encoding:
//!
//! ```text
//! +----------------+------------------------------+
//! | IV (12 bytes)  | ciphertext || GCM tag (16)   |
//! +----------------+------------------------------+
//! ```
//!
//! The whole buffer is encoded with the standard base64 alphabet, padded,
//! no line breaks.

use std::fmt;

use base64::{Engine as _, engine::general_purpose::STANDARD};

use super::error::CipherError;

/// AES-GCM nonce size (12 bytes)
pub const IV_LENGTH: usize = 12;

/// AES-GCM authentication tag size (16 bytes)
pub const TAG_LENGTH: usize = 16;

/// An encrypted message body ready to be stored.
///
/// Tokens are produced only by encryption and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CipherToken(String);

impl CipherToken {
    /// Encode `IV || ciphertext` as a token.
    pub fn encode(iv: &[u8; IV_LENGTH], ciphertext: &[u8]) -> Self {
        let mut combined = Vec::with_capacity(IV_LENGTH + ciphertext.len());
        combined.extend_from_slice(iv);
        combined.extend_from_slice(ciphertext);

        Self(STANDARD.encode(combined))
    }

    /// Token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the token, returning its text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CipherToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CipherToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<CipherToken> for String {
    fn from(token: CipherToken) -> Self {
        token.0
    }
}

/// IV and ciphertext recovered from a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenParts {
    /// The 12-byte AES-GCM nonce
    pub iv: [u8; IV_LENGTH],
    /// Ciphertext including the 16-byte tag
    pub ciphertext: Vec<u8>,
}

/// Decode token text and split off the IV.
///
/// # Errors
///
/// - `DecodingError`: not valid standard base64
/// - `MalformedToken`: fewer than `IV_LENGTH` bytes after decoding
pub fn decode_token(text: &str) -> Result<TokenParts, CipherError> {
    let mut bytes = STANDARD.decode(text).map_err(|_| CipherError::DecodingError)?;

    let len = bytes.len();
    if len < IV_LENGTH {
        return Err(CipherError::MalformedToken { len, min: IV_LENGTH });
    }

    let ciphertext = bytes.split_off(IV_LENGTH);
    let iv: [u8; IV_LENGTH] =
        bytes.try_into().map_err(|_| CipherError::MalformedToken { len, min: IV_LENGTH })?;

    Ok(TokenParts { iv, ciphertext })
}
