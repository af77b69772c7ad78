//! Message store abstraction
//!
//! The document store is an external service. This trait is the narrow
//! surface the conversation layer needs from it; real-time subscription and
//! read receipts stay outside.

mod error;
mod memory;

use async_trait::async_trait;
pub use error::StoreError;
pub use memory::MemoryMessageStore;

use crate::record::{MessageId, MessageRecord, NewMessage};

/// Persistence for direct messages.
///
/// Implementations typically share internal state via `Arc`, so clones access
/// the same underlying store.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Insert a message and return it with its assigned id.
    ///
    /// # Invariants
    ///
    /// - Post: ids are unique and increase in insertion order
    async fn insert(&self, message: NewMessage) -> Result<MessageRecord, StoreError>;

    /// Load a message by id. `None` if it doesn't exist.
    async fn get(&self, id: MessageId) -> Result<Option<MessageRecord>, StoreError>;

    /// Replace a message body after an edit.
    ///
    /// Sets `body`, `is_encrypted` and `edited_at`; everything else is kept.
    async fn update_body(
        &self,
        id: MessageId,
        body: String,
        is_encrypted: bool,
        edited_at: u64,
    ) -> Result<MessageRecord, StoreError>;

    /// Remove a message.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no message has this id
    async fn delete(&self, id: MessageId) -> Result<(), StoreError>;

    /// All messages between `id_a` and `id_b`, oldest first.
    ///
    /// Ordered by `created_at`, ties broken by id.
    async fn conversation(&self, id_a: &str, id_b: &str)
    -> Result<Vec<MessageRecord>, StoreError>;
}
