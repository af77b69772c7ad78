//! Conversation configuration.

use std::time::Duration;

/// Longest message accepted, in characters.
pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 1000;

/// How long after sending a message may still be edited.
pub const DEFAULT_EDIT_WINDOW: Duration = Duration::from_secs(15 * 60);

/// Behaviour of a [`crate::DirectChannel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Encrypt outgoing messages.
    ///
    /// Applies to new sends only; edits keep the record's existing mode.
    pub encryption_enabled: bool,

    /// Longest message accepted after trimming, in characters.
    pub max_message_length: usize,

    /// Messages older than this can no longer be edited.
    pub edit_window: Duration,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            encryption_enabled: true,
            max_message_length: DEFAULT_MAX_MESSAGE_LENGTH,
            edit_window: DEFAULT_EDIT_WINDOW,
        }
    }
}
