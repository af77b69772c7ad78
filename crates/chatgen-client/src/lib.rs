//! Client
//!
//! Direct-message layer for ChatGen. Sits between the UI and the external
//! document store, sealing message bodies with [`chatgen_crypto`] before they
//! are written and opening them for display.
//!
//! # Components
//!
//! - [`DirectChannel`]: one participant's view of a two-party conversation
//! - [`AsyncCipher`]: runs PBKDF2 and AES-GCM on tokio's blocking pool
//! - [`MessageStore`]: narrow interface to the document store
//! - [`MemoryMessageStore`]: in-process store for tests and tooling
//! - [`Clock`]: injected wall-clock time
//!
//! # Failure Policy
//!
//! Encryption never blocks sending: if sealing fails the body is stored as
//! plaintext with `is_encrypted = false`. Decryption never surfaces garbage:
//! any failure renders as [`DECRYPT_FAILED_PLACEHOLDER`].
//!
//! Only the author of a message may edit or delete it.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod async_cipher;
mod channel;
mod clock;
mod config;
mod error;
mod record;
mod store;

pub use async_cipher::AsyncCipher;
pub use channel::{DECRYPT_FAILED_PLACEHOLDER, DirectChannel};
pub use chatgen_crypto::{CipherConfig, CryptoBackend, SystemBackend};
pub use clock::{Clock, SystemClock};
pub use config::{ChannelConfig, DEFAULT_EDIT_WINDOW, DEFAULT_MAX_MESSAGE_LENGTH};
pub use error::ClientError;
pub use record::{DisplayMessage, MessageId, MessageRecord, NewMessage};
pub use store::{MemoryMessageStore, MessageStore, StoreError};
