//! Awaitable facade over the conversation cipher.
//!
//! PBKDF2 with 100k iterations is too slow to run on a scheduler thread.
//! Every call here moves the work onto tokio's blocking pool and suspends the
//! caller until it finishes.

use std::sync::Arc;

use chatgen_crypto::{CipherError, CipherToken, ConversationCipher, CryptoBackend, SystemBackend};
use tracing::warn;

/// Shared, cloneable handle that runs cipher operations off the scheduler.
pub struct AsyncCipher<B = SystemBackend> {
    inner: Arc<ConversationCipher<B>>,
}

impl<B> Clone for AsyncCipher<B> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<B: CryptoBackend + 'static> AsyncCipher<B> {
    /// Wrap a cipher.
    pub fn new(cipher: ConversationCipher<B>) -> Self {
        Self { inner: Arc::new(cipher) }
    }

    /// The underlying synchronous cipher.
    pub fn cipher(&self) -> &ConversationCipher<B> {
        &self.inner
    }

    /// Fail-soft encryption. `None` means "send as plaintext".
    pub async fn seal(&self, plaintext: &str, id_a: &str, id_b: &str) -> Option<CipherToken> {
        let cipher = Arc::clone(&self.inner);
        let (plaintext, id_a, id_b) = (plaintext.to_owned(), id_a.to_owned(), id_b.to_owned());

        match tokio::task::spawn_blocking(move || cipher.encrypt(&plaintext, &id_a, &id_b)).await {
            Ok(token) => token,
            Err(err) => {
                warn!(error = %err, "encryption task did not complete");
                None
            },
        }
    }

    /// Decrypt a token. See [`ConversationCipher::decrypt`].
    ///
    /// A blocking task that panics or is cancelled reports
    /// `CryptoUnavailable`.
    pub async fn open(&self, token: &str, id_a: &str, id_b: &str) -> Result<String, CipherError> {
        let cipher = Arc::clone(&self.inner);
        let (token, id_a, id_b) = (token.to_owned(), id_a.to_owned(), id_b.to_owned());

        tokio::task::spawn_blocking(move || cipher.decrypt(&token, &id_a, &id_b)).await.map_err(
            |err| CipherError::CryptoUnavailable {
                reason: format!("decryption task did not complete: {err}"),
            },
        )?
    }
}

impl Default for AsyncCipher<SystemBackend> {
    fn default() -> Self {
        Self::new(ConversationCipher::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cipher() -> AsyncCipher {
        AsyncCipher::default()
    }

    #[tokio::test]
    async fn seal_open_roundtrip() {
        let cipher = cipher();

        let token = cipher.seal("Hello!", "user1", "user2").await.unwrap();
        let opened = cipher.open(token.as_str(), "user2", "user1").await.unwrap();

        assert_eq!(opened, "Hello!");
    }

    #[tokio::test]
    async fn clones_share_key_cache() {
        let cipher = cipher();
        let clone = cipher.clone();

        cipher.seal("x", "a", "b").await.unwrap();
        assert_eq!(clone.cipher().cached_keys(), 1);
    }

    #[tokio::test]
    async fn open_reports_error_kind() {
        let cipher = cipher();
        let result = cipher.open("not-valid-base64!!", "a", "b").await;
        assert_eq!(result, Err(CipherError::DecodingError));
    }
}
