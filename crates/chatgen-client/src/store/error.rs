//! Message store error types.

use thiserror::Error;

use crate::record::MessageId;

/// Errors that can occur during message store operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Message not found
    #[error("message not found: {id}")]
    NotFound {
        /// Message id that was not found
        id: MessageId,
    },

    /// Backend failure (network, quota, permission, etc.)
    #[error("store backend error: {0}")]
    Backend(String),
}
