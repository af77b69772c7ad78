//! Conversation cipher: AES-256-GCM under a per-pair PBKDF2 key

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex},
};

use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use zeroize::Zeroize;

use super::{
    config::CipherConfig,
    derivation::{SharedKey, canonicalize, derive_shared_key},
    error::CipherError,
    token::{CipherToken, IV_LENGTH, decode_token},
};
use crate::backend::{CryptoBackend, SystemBackend};

const CACHE_SLOT_SIZE: usize = 32;

/// Cache key for a participant pair.
fn cache_slot(id_a: &str, id_b: &str) -> [u8; CACHE_SLOT_SIZE] {
    let mut canonical = canonicalize(id_a, id_b);
    let slot: [u8; CACHE_SLOT_SIZE] = Sha256::digest(canonical.as_bytes()).into();
    canonical.zeroize();
    slot
}

/// Encrypts and decrypts message bodies for a two-party conversation.
///
/// Both participants derive the same key from their two identifiers, so no
/// key exchange happens. Every encryption draws a fresh random IV from the
/// backend; ciphertext is never deterministic even though the key is.
///
/// Derived keys may be cached per canonical pair, keyed by a SHA-256 digest
/// so identifiers are not held in the clear. The cache is bounded by
/// [`CipherConfig::key_cache_capacity`]. Results are identical with it on or
/// off.
pub struct ConversationCipher<B = SystemBackend> {
    backend: B,
    config: CipherConfig,
    key_cache: Mutex<HashMap<[u8; CACHE_SLOT_SIZE], Arc<SharedKey>>>,
}

impl ConversationCipher<SystemBackend> {
    /// Cipher backed by the OS RNG and RustCrypto primitives.
    pub fn new(config: CipherConfig) -> Self {
        Self::with_backend(SystemBackend::new(), config)
    }
}

impl Default for ConversationCipher<SystemBackend> {
    fn default() -> Self {
        Self::new(CipherConfig::default())
    }
}

impl<B: CryptoBackend> ConversationCipher<B> {
    /// Cipher using a caller-provided backend.
    pub fn with_backend(backend: B, config: CipherConfig) -> Self {
        Self { backend, config, key_cache: Mutex::new(HashMap::new()) }
    }

    /// Key derivation parameters.
    pub fn config(&self) -> &CipherConfig {
        &self.config
    }

    /// The injected crypto backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Derive (or fetch from cache) the key shared by `id_a` and `id_b`.
    ///
    /// Argument order does not matter.
    pub fn derive_shared_key(
        &self,
        id_a: &str,
        id_b: &str,
    ) -> Result<Arc<SharedKey>, CipherError> {
        if !self.config.cache_keys() {
            return derive_shared_key(&self.backend, &self.config, id_a, id_b).map(Arc::new);
        }

        let slot = cache_slot(id_a, id_b);

        // A poisoned cache is skipped, not fatal
        if let Ok(cache) = self.key_cache.lock()
            && let Some(key) = cache.get(&slot)
        {
            debug!("conversation key cache hit");
            return Ok(Arc::clone(key));
        }

        let key = Arc::new(derive_shared_key(&self.backend, &self.config, id_a, id_b)?);
        debug!(iterations = self.config.iterations(), "derived conversation key");

        if let Ok(mut cache) = self.key_cache.lock() {
            if cache.len() >= self.config.key_cache_capacity() {
                debug!(evicted = cache.len(), "conversation key cache full");
                cache.clear();
            }
            cache.insert(slot, Arc::clone(&key));
        }

        Ok(key)
    }

    /// Encrypt `plaintext` for the conversation between `id_a` and `id_b`.
    ///
    /// # Errors
    ///
    /// - `CryptoUnavailable`: RNG, KDF or AEAD failure in the backend
    pub fn try_encrypt(
        &self,
        plaintext: &str,
        id_a: &str,
        id_b: &str,
    ) -> Result<CipherToken, CipherError> {
        let key = self.derive_shared_key(id_a, id_b)?;

        let mut iv = [0u8; IV_LENGTH];
        self.backend.fill_random(&mut iv)?;

        let ciphertext = self.backend.seal(key.bytes(), &iv, plaintext.as_bytes())?;
        Ok(CipherToken::encode(&iv, &ciphertext))
    }

    /// Fail-soft encryption.
    ///
    /// Returns `None` on any failure. Callers must treat `None` as "send as
    /// plaintext or report failure", never as a token.
    pub fn encrypt(&self, plaintext: &str, id_a: &str, id_b: &str) -> Option<CipherToken> {
        match self.try_encrypt(plaintext, id_a, id_b) {
            Ok(token) => Some(token),
            Err(err) => {
                warn!(kind = err.kind(), error = %err, "message encryption failed");
                None
            },
        }
    }

    /// Decrypt a token produced for the conversation between `id_a` and
    /// `id_b`, in either argument order.
    ///
    /// The token is decoded before the key is derived, so malformed input is
    /// rejected without paying for PBKDF2.
    ///
    /// # Errors
    ///
    /// - `DecodingError`: token is not valid base64
    /// - `MalformedToken`: decoded token shorter than the IV
    /// - `AuthenticationFailure`: wrong participant pair or tampered token
    /// - `InvalidUtf8`: authenticated bytes are not UTF-8
    /// - `CryptoUnavailable`: backend failure during key derivation
    pub fn decrypt(&self, token: &str, id_a: &str, id_b: &str) -> Result<String, CipherError> {
        let result = self.open_token(token, id_a, id_b);

        if let Err(err) = &result {
            debug!(kind = err.kind(), "message decryption failed");
        }

        result
    }

    fn open_token(&self, token: &str, id_a: &str, id_b: &str) -> Result<String, CipherError> {
        let parts = decode_token(token)?;
        let key = self.derive_shared_key(id_a, id_b)?;

        let plaintext = self.backend.open(key.bytes(), &parts.iv, &parts.ciphertext)?;
        String::from_utf8(plaintext).map_err(|_| CipherError::InvalidUtf8)
    }

    /// Number of keys currently cached.
    pub fn cached_keys(&self) -> usize {
        self.key_cache.lock().map_or(0, |cache| cache.len())
    }

    /// Drop every cached key.
    pub fn clear_key_cache(&self) {
        if let Ok(mut cache) = self.key_cache.lock() {
            cache.clear();
        }
    }
}

impl<B> fmt::Debug for ConversationCipher<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversationCipher").field("config", &self.config).finish_non_exhaustive()
    }
}
