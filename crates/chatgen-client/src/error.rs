//! Client error types.

use thiserror::Error;

use crate::{record::MessageId, store::StoreError};

/// Errors from conversation operations.
///
/// Cipher failures never show up here: sealing falls back to plaintext and
/// opening falls back to a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Message is empty after trimming
    #[error("message is empty")]
    EmptyMessage,

    /// Message exceeds the configured length
    #[error("message too long: {len} characters, limit {max}")]
    MessageTooLong {
        /// Length after trimming
        len: usize,
        /// Configured limit
        max: usize,
    },

    /// Message does not exist in this conversation
    #[error("message not found: {id}")]
    NotFound {
        /// Requested message id
        id: MessageId,
    },

    /// Only the author may edit a message
    #[error("message {id} was not sent by this participant")]
    NotSender {
        /// Requested message id
        id: MessageId,
    },

    /// Edit window has passed
    #[error("message {id} is {age_secs}s old, edit window is {window_secs}s")]
    EditWindowExpired {
        /// Requested message id
        id: MessageId,
        /// Age of the message
        age_secs: u64,
        /// Configured window
        window_secs: u64,
    },

    /// Message store failure
    #[error(transparent)]
    Store(#[from] StoreError),
}
