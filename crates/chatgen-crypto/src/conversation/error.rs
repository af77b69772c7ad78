//! Error types for conversation cipher operations

use thiserror::Error;

/// Errors from conversation cipher operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    /// The crypto backend could not perform a primitive (RNG, KDF or AEAD)
    #[error("crypto unavailable: {reason}")]
    CryptoUnavailable {
        /// What the backend failed to do
        reason: String,
    },

    /// Token is not valid standard base64
    #[error("token is not valid base64")]
    DecodingError,

    /// Decoded token is too short to contain an IV
    #[error("malformed token: {len} bytes, need at least {min}")]
    MalformedToken {
        /// Decoded length
        len: usize,
        /// Minimum decoded length
        min: usize,
    },

    /// AEAD tag verification failed (wrong participant pair or tampering)
    #[error("authentication failed")]
    AuthenticationFailure,

    /// Authenticated plaintext is not valid UTF-8
    #[error("decrypted message is not valid UTF-8")]
    InvalidUtf8,

    /// Cipher configuration rejected at construction
    #[error("invalid cipher config: {reason}")]
    Config {
        /// Reason the config was rejected
        reason: String,
    },
}

impl CipherError {
    /// Short static label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CryptoUnavailable { .. } => "crypto_unavailable",
            Self::DecodingError => "decoding",
            Self::MalformedToken { .. } => "malformed_token",
            Self::AuthenticationFailure => "authentication",
            Self::InvalidUtf8 => "invalid_utf8",
            Self::Config { .. } => "config",
        }
    }

    /// Returns true if the token itself is bad (as opposed to the platform).
    ///
    /// Token errors will fail the same way on every retry. Platform errors
    /// may succeed once the backend recovers.
    pub fn is_token_error(&self) -> bool {
        match self {
            Self::DecodingError
            | Self::MalformedToken { .. }
            | Self::AuthenticationFailure
            | Self::InvalidUtf8 => true,

            Self::CryptoUnavailable { .. } | Self::Config { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_failure_is_token_error() {
        assert!(CipherError::AuthenticationFailure.is_token_error());
        assert!(CipherError::MalformedToken { len: 3, min: 12 }.is_token_error());
    }

    #[test]
    fn crypto_unavailable_is_not_token_error() {
        let err = CipherError::CryptoUnavailable { reason: "no entropy".to_string() };
        assert!(!err.is_token_error());
    }

    #[test]
    fn kinds_are_distinct() {
        let errors = [
            CipherError::CryptoUnavailable { reason: String::new() },
            CipherError::DecodingError,
            CipherError::MalformedToken { len: 0, min: 12 },
            CipherError::AuthenticationFailure,
            CipherError::InvalidUtf8,
            CipherError::Config { reason: String::new() },
        ];

        for (i, a) in errors.iter().enumerate() {
            for b in &errors[i + 1..] {
                assert_ne!(a.kind(), b.kind());
            }
        }
    }

    #[test]
    fn error_display() {
        let err = CipherError::MalformedToken { len: 5, min: 12 };
        assert_eq!(err.to_string(), "malformed token: 5 bytes, need at least 12");
    }
}
