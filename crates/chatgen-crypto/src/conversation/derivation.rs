//! Conversation key derivation using PBKDF2

use std::fmt;

use zeroize::Zeroize;

use super::{config::CipherConfig, error::CipherError};
use crate::backend::CryptoBackend;

/// Size of a derived conversation key (AES-256)
pub const KEY_SIZE: usize = 32;

/// Canonical form of an unordered participant pair.
///
/// The two identifiers are sorted (byte order, which for UTF-8 is code point
/// order) and concatenated with no separator, so `(a, b)` and `(b, a)` map to
/// the same string.
pub fn canonicalize(id_a: &str, id_b: &str) -> String {
    let (first, second) = if id_a <= id_b { (id_a, id_b) } else { (id_b, id_a) };

    let mut canonical = String::with_capacity(first.len() + second.len());
    canonical.push_str(first);
    canonical.push_str(second);
    canonical
}

/// A 256-bit AES-GCM key shared by the two participants of a conversation.
///
/// There is no public accessor for the key bytes; the key can only be used
/// through [`crate::ConversationCipher`]. Zeroized on drop.
pub struct SharedKey {
    key: [u8; KEY_SIZE],
}

impl SharedKey {
    pub(crate) fn bytes(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }
}

impl fmt::Debug for SharedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedKey(..)")
    }
}

impl Drop for SharedKey {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

/// Derive the shared key for a participant pair.
///
/// # Security
///
/// - Symmetric: `derive_shared_key(a, b) == derive_shared_key(b, a)`
/// - Deterministic: pure function of `(a, b, salt, iterations)`
/// - The key is only as strong as the secrecy of the identifiers; anyone who
///   knows both ids and the salt can recompute it
pub fn derive_shared_key<B: CryptoBackend + ?Sized>(
    backend: &B,
    config: &CipherConfig,
    id_a: &str,
    id_b: &str,
) -> Result<SharedKey, CipherError> {
    let mut canonical = canonicalize(id_a, id_b);
    let result = backend.derive_key(canonical.as_bytes(), config.salt(), config.iterations());
    canonical.zeroize();

    result.map(|key| SharedKey { key })
}
