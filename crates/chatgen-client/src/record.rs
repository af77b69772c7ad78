//! Message records as persisted by the document store.

use serde::{Deserialize, Serialize};

/// Store-assigned message identifier.
pub type MessageId = u64;

/// A direct message as stored.
///
/// `body` is either plaintext or a cipher token. `is_encrypted` is set by the
/// sender only when a token was actually produced, and is the authoritative
/// signal for readers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    /// Store-assigned id, increasing in insertion order.
    pub id: MessageId,
    /// Author of the message.
    pub sender_id: String,
    /// The other participant.
    pub recipient_id: String,
    /// Plaintext or cipher token.
    pub body: String,
    /// Whether `body` is a cipher token.
    pub is_encrypted: bool,
    /// Unix timestamp (seconds) of the original send.
    pub created_at: u64,
    /// Unix timestamp (seconds) of the last edit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_at: Option<u64>,
}

impl MessageRecord {
    /// The participant on the other side of the conversation from `local_id`.
    pub fn counterpart(&self, local_id: &str) -> &str {
        if self.sender_id == local_id { &self.recipient_id } else { &self.sender_id }
    }

    /// Returns true if the record belongs to the conversation between `id_a`
    /// and `id_b`, in either direction.
    pub fn is_between(&self, id_a: &str, id_b: &str) -> bool {
        (self.sender_id == id_a && self.recipient_id == id_b)
            || (self.sender_id == id_b && self.recipient_id == id_a)
    }
}

/// A message about to be inserted; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    /// Author of the message.
    pub sender_id: String,
    /// The other participant.
    pub recipient_id: String,
    /// Plaintext or cipher token.
    pub body: String,
    /// Whether `body` is a cipher token.
    pub is_encrypted: bool,
    /// Unix timestamp (seconds).
    pub created_at: u64,
}

impl NewMessage {
    /// Attach the store-assigned id.
    pub fn into_record(self, id: MessageId) -> MessageRecord {
        MessageRecord {
            id,
            sender_id: self.sender_id,
            recipient_id: self.recipient_id,
            body: self.body,
            is_encrypted: self.is_encrypted,
            created_at: self.created_at,
            edited_at: None,
        }
    }
}

/// A record prepared for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayMessage {
    /// Store-assigned id.
    pub id: MessageId,
    /// Author of the message.
    pub sender_id: String,
    /// Whether the local participant wrote it.
    pub from_me: bool,
    /// Decrypted text, the plaintext body, or a placeholder.
    pub text: String,
    /// Whether the stored body was flagged as encrypted.
    pub is_encrypted: bool,
    /// Unix timestamp (seconds).
    pub created_at: u64,
    /// Whether the message was edited.
    pub edited: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> MessageRecord {
        NewMessage {
            sender_id: "user1".to_string(),
            recipient_id: "user2".to_string(),
            body: "hi".to_string(),
            is_encrypted: false,
            created_at: 1_700_000_000,
        }
        .into_record(7)
    }

    #[test]
    fn counterpart_is_the_other_side() {
        let record = record();
        assert_eq!(record.counterpart("user1"), "user2");
        assert_eq!(record.counterpart("user2"), "user1");
    }

    #[test]
    fn is_between_ignores_direction() {
        let record = record();
        assert!(record.is_between("user1", "user2"));
        assert!(record.is_between("user2", "user1"));
        assert!(!record.is_between("user1", "user3"));
    }

    #[test]
    fn serializes_with_store_field_names() {
        insta::assert_json_snapshot!(record(), @r#"
        {
          "id": 7,
          "senderId": "user1",
          "recipientId": "user2",
          "body": "hi",
          "isEncrypted": false,
          "createdAt": 1700000000
        }
        "#);
    }

    #[test]
    fn edited_at_is_serialized_once_set() {
        let mut record = record();
        record.edited_at = Some(1_700_000_060);

        insta::assert_json_snapshot!(record, @r#"
        {
          "id": 7,
          "senderId": "user1",
          "recipientId": "user2",
          "body": "hi",
          "isEncrypted": false,
          "createdAt": 1700000000,
          "editedAt": 1700000060
        }
        "#);
    }
}
