//! ChatGen Conversation Encryption
//!
//! End-to-end obfuscation of direct-message bodies. Both participants derive
//! the same symmetric key from their two user ids, so the storage backend only
//! ever sees tokens. Pure, synchronous functions; randomness comes from an
//! injected [`CryptoBackend`] so tests can pin IVs.
//!
//! # Key Lifecycle
//!
//! Keys are never stored or transmitted. Each side recomputes the key for a
//! pair on demand, optionally keeping it in an in-memory cache for the life of
//! the [`ConversationCipher`].
//!
//! ```text
//! (idA, idB) ──canonicalize──▶ "idAidB" ──PBKDF2──▶ SharedKey
//!                                                      │
//!                        plaintext ──AES-256-GCM──▶ CipherToken
//! ```
//!
//! # Failure Policy
//!
//! - [`ConversationCipher::encrypt`] is fail-soft and returns `None` so that
//!   sending is never blocked; the caller stores plaintext instead
//! - [`ConversationCipher::decrypt`] returns a distinct [`CipherError`] per
//!   failure; callers may collapse them into one placeholder for display
//! - [`is_likely_encrypted`] is a heuristic, never a correctness boundary
//!
//! # Security
//!
//! This is casual E2E obfuscation. Anyone who knows both user ids and the
//! application salt can derive the key. There is no forward secrecy and no
//! asymmetric key agreement.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod backend;
pub mod conversation;

pub use backend::{CryptoBackend, SystemBackend};
pub use conversation::{
    CipherConfig, CipherError, CipherToken, ConversationCipher, DEFAULT_ITERATIONS,
    DEFAULT_KEY_CACHE_CAPACITY, DEFAULT_SALT, IV_LENGTH, KEY_SIZE, LIKELY_TOKEN_MIN_CHARS,
    MIN_ITERATIONS, SharedKey, TAG_LENGTH, TokenParts, canonicalize, decode_token,
    is_likely_encrypted,
};
