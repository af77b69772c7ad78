//! Conversation encryption: one deterministic key per participant pair
//!
//! # Architecture
//!
//! ```text
//! sort(idA, idB) → concat
//!        │
//!        ▼ PBKDF2-HMAC-SHA256 (fixed salt, ≥100k iterations)
//! SharedKey (256-bit, same on both sides)
//!        │
//!        ▼ AES-256-GCM, fresh 12-byte IV
//! IV || ciphertext || tag
//!        │
//!        ▼ base64
//! CipherToken
//! ```
//!
//! # Security Properties
//!
//! - Confidentiality against the storage backend, not against anyone who
//!   knows both participant ids and the salt
//! - Tamper detection: any modified token fails authentication
//! - No forward secrecy: one key per pair for the lifetime of the salt

pub mod cipher;
pub mod config;
pub mod derivation;
pub mod detect;
pub mod error;
pub mod token;

pub use cipher::ConversationCipher;
pub use config::{
    CipherConfig, DEFAULT_ITERATIONS, DEFAULT_KEY_CACHE_CAPACITY, DEFAULT_SALT, MIN_ITERATIONS,
};
pub use derivation::{KEY_SIZE, SharedKey, canonicalize, derive_shared_key};
pub use detect::{LIKELY_TOKEN_MIN_CHARS, is_likely_encrypted};
pub use error::CipherError;
pub use token::{CipherToken, IV_LENGTH, TAG_LENGTH, TokenParts, decode_token};
