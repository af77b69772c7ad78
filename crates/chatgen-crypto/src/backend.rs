//! Pluggable crypto backend.
//!
//! The cipher never reaches for a global RNG or platform crypto object. It
//! goes through a [`CryptoBackend`], which lets tests inject fixed IVs and
//! lets embedders route primitives to another provider.

use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit},
};
use hmac::Hmac;
use sha2::Sha256;
use zeroize::Zeroize;

use crate::conversation::{CipherError, IV_LENGTH, KEY_SIZE};

/// Source of randomness and symmetric primitives for the cipher.
///
/// Only [`fill_random`](Self::fill_random) is required. Key derivation and
/// AEAD default to PBKDF2-HMAC-SHA256 and AES-256-GCM from RustCrypto, so a
/// test backend only has to decide where IV bytes come from.
///
/// # Invariants
///
/// - `fill_random()` uses cryptographically secure entropy in production
/// - `derive_key()` is a pure function of its inputs
/// - `open()` never returns bytes whose tag did not verify
pub trait CryptoBackend: Send + Sync {
    /// Fill `buffer` with random bytes.
    fn fill_random(&self, buffer: &mut [u8]) -> Result<(), CipherError>;

    /// Stretch `password` into a 256-bit key with PBKDF2-HMAC-SHA256.
    fn derive_key(
        &self,
        password: &[u8],
        salt: &[u8],
        iterations: u32,
    ) -> Result<[u8; KEY_SIZE], CipherError> {
        let mut key = [0u8; KEY_SIZE];
        if pbkdf2::pbkdf2::<Hmac<Sha256>>(password, salt, iterations, &mut key).is_err() {
            key.zeroize();
            return Err(CipherError::CryptoUnavailable {
                reason: "PBKDF2 rejected key material".to_string(),
            });
        }
        Ok(key)
    }

    /// AES-256-GCM encrypt. Output is ciphertext with the 16-byte tag appended.
    fn seal(
        &self,
        key: &[u8; KEY_SIZE],
        iv: &[u8; IV_LENGTH],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CipherError> {
        let cipher = Aes256Gcm::new(key.into());
        cipher.encrypt(Nonce::from_slice(iv), plaintext).map_err(|_| {
            CipherError::CryptoUnavailable { reason: "AES-GCM encryption failed".to_string() }
        })
    }

    /// AES-256-GCM decrypt and verify the tag.
    ///
    /// # Errors
    ///
    /// - `AuthenticationFailure`: tag mismatch (wrong key or tampered data)
    fn open(
        &self,
        key: &[u8; KEY_SIZE],
        iv: &[u8; IV_LENGTH],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, CipherError> {
        let cipher = Aes256Gcm::new(key.into());
        cipher
            .decrypt(Nonce::from_slice(iv), ciphertext)
            .map_err(|_| CipherError::AuthenticationFailure)
    }
}

/// Production backend using the OS cryptographic RNG.
///
/// Randomness comes from getrandom (e.g. `getrandom(2)` on Linux,
/// `BCryptGenRandom` on Windows). An RNG failure surfaces as
/// `CryptoUnavailable` instead of aborting, so a sender can fall back to
/// plaintext.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBackend;

impl SystemBackend {
    /// Create a new system backend.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CryptoBackend for SystemBackend {
    fn fill_random(&self, buffer: &mut [u8]) -> Result<(), CipherError> {
        getrandom::fill(buffer).map_err(|err| CipherError::CryptoUnavailable {
            reason: format!("OS RNG failed: {err}"),
        })
    }
}
