//! Direct conversation between two participants.
//!
//! Seals bodies before they reach the store and opens them for display.
//! Cipher faults never surface as errors here: a failed seal stores plaintext
//! without the encrypted flag, a failed open shows a placeholder. Flagged
//! bodies that are not tokens at all (older clients flagged edits and failed
//! seals) are shown as stored.

use chatgen_crypto::{CryptoBackend, SystemBackend, is_likely_encrypted};
use tracing::{debug, warn};

use crate::{
    async_cipher::AsyncCipher,
    clock::{Clock, SystemClock},
    config::ChannelConfig,
    error::ClientError,
    record::{DisplayMessage, MessageId, MessageRecord, NewMessage},
    store::MessageStore,
};

/// Shown when a flagged body fails to decrypt.
pub const DECRYPT_FAILED_PLACEHOLDER: &str = "[Unable to decrypt message]";

/// One participant's view of a direct conversation.
///
/// # Invariants
///
/// - A stored record has `is_encrypted = true` only if its body is a token
///   produced for `(local_id, peer_id)`
/// - Only the author may edit, and only within the edit window
/// - Only the author may delete
pub struct DirectChannel<S, C = SystemClock, B = SystemBackend> {
    local_id: String,
    peer_id: String,
    cipher: AsyncCipher<B>,
    store: S,
    clock: C,
    config: ChannelConfig,
}

impl<S, C, B> DirectChannel<S, C, B>
where
    S: MessageStore,
    C: Clock,
    B: CryptoBackend + 'static,
{
    /// Open the conversation between `local_id` and `peer_id`.
    pub fn new(
        local_id: impl Into<String>,
        peer_id: impl Into<String>,
        cipher: AsyncCipher<B>,
        store: S,
        clock: C,
        config: ChannelConfig,
    ) -> Self {
        Self { local_id: local_id.into(), peer_id: peer_id.into(), cipher, store, clock, config }
    }

    /// The local participant.
    pub fn local_id(&self) -> &str {
        &self.local_id
    }

    /// The other participant.
    pub fn peer_id(&self) -> &str {
        &self.peer_id
    }

    /// Current configuration.
    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// Toggle encryption for subsequent sends.
    pub fn set_encryption(&mut self, enabled: bool) {
        debug!(enabled, "conversation encryption toggled");
        self.config.encryption_enabled = enabled;
    }

    /// Send a message to the peer.
    ///
    /// The text is trimmed and validated, then sealed if encryption is
    /// enabled. If sealing fails the plaintext is stored unflagged.
    pub async fn send(&self, text: &str) -> Result<MessageRecord, ClientError> {
        let text = self.validate(text)?;

        let (body, is_encrypted) = if self.config.encryption_enabled {
            self.seal_body(text).await
        } else {
            (text.to_owned(), false)
        };

        let record = self
            .store
            .insert(NewMessage {
                sender_id: self.local_id.clone(),
                recipient_id: self.peer_id.clone(),
                body,
                is_encrypted,
                created_at: self.clock.now_secs(),
            })
            .await?;

        debug!(id = record.id, is_encrypted, "message sent");
        Ok(record)
    }

    /// Replace the text of one of our own messages.
    ///
    /// An encrypted record is re-sealed with a fresh IV; a plaintext record
    /// stays plaintext.
    pub async fn edit(&self, id: MessageId, text: &str) -> Result<MessageRecord, ClientError> {
        let record = self.authored_record(id).await?;

        let now = self.clock.now_secs();
        let age_secs = now.saturating_sub(record.created_at);
        let window_secs = self.config.edit_window.as_secs();
        if age_secs >= window_secs {
            return Err(ClientError::EditWindowExpired { id, age_secs, window_secs });
        }

        let text = self.validate(text)?;
        let (body, is_encrypted) = if record.is_encrypted {
            self.seal_body(text).await
        } else {
            (text.to_owned(), false)
        };

        let updated = self.store.update_body(id, body, is_encrypted, now).await?;

        debug!(id, is_encrypted, "message edited");
        Ok(updated)
    }

    /// Remove one of our own messages.
    ///
    /// There is no time limit; the record disappears from both participants'
    /// history.
    pub async fn delete(&self, id: MessageId) -> Result<(), ClientError> {
        self.authored_record(id).await?;
        self.store.delete(id).await?;

        debug!(id, "message deleted");
        Ok(())
    }

    /// Text to display for a record.
    ///
    /// The stored flag and the token heuristic must both agree before the
    /// body is decrypted. Anything else is shown as stored.
    pub async fn render(&self, record: &MessageRecord) -> String {
        if !record.is_encrypted {
            return record.body.clone();
        }

        if !is_likely_encrypted(&record.body) {
            debug!(id = record.id, "flagged body is not a token, showing as stored");
            return record.body.clone();
        }

        let other = record.counterpart(&self.local_id);
        match self.cipher.open(&record.body, &self.local_id, other).await {
            Ok(text) => text,
            Err(err) => {
                warn!(
                    id = record.id,
                    kind = err.kind(),
                    token_error = err.is_token_error(),
                    "failed to decrypt message"
                );
                DECRYPT_FAILED_PLACEHOLDER.to_string()
            },
        }
    }

    /// The whole conversation, oldest first, ready for display.
    pub async fn history(&self) -> Result<Vec<DisplayMessage>, ClientError> {
        let records = self.store.conversation(&self.local_id, &self.peer_id).await?;

        let mut messages = Vec::with_capacity(records.len());
        for record in records {
            let text = self.render(&record).await;
            messages.push(DisplayMessage {
                id: record.id,
                from_me: record.sender_id == self.local_id,
                sender_id: record.sender_id,
                text,
                is_encrypted: record.is_encrypted,
                created_at: record.created_at,
                edited: record.edited_at.is_some(),
            });
        }

        Ok(messages)
    }

    /// Load a record of this conversation written by the local participant.
    async fn authored_record(&self, id: MessageId) -> Result<MessageRecord, ClientError> {
        let record = self
            .store
            .get(id)
            .await?
            .filter(|record| record.is_between(&self.local_id, &self.peer_id))
            .ok_or(ClientError::NotFound { id })?;

        if record.sender_id != self.local_id {
            return Err(ClientError::NotSender { id });
        }

        Ok(record)
    }

    /// Trim and check length (in characters).
    fn validate<'a>(&self, text: &'a str) -> Result<&'a str, ClientError> {
        let text = text.trim();

        if text.is_empty() {
            return Err(ClientError::EmptyMessage);
        }

        let len = text.chars().count();
        if len > self.config.max_message_length {
            return Err(ClientError::MessageTooLong { len, max: self.config.max_message_length });
        }

        Ok(text)
    }

    async fn seal_body(&self, text: &str) -> (String, bool) {
        match self.cipher.seal(text, &self.local_id, &self.peer_id).await {
            Some(token) => (token.into_string(), true),
            None => {
                warn!("encryption unavailable, storing message as plaintext");
                (text.to_owned(), false)
            },
        }
    }
}
