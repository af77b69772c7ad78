use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{MessageStore, StoreError};
use crate::record::{MessageId, MessageRecord, NewMessage};

/// In-memory message store for tests and local tooling.
///
/// Records live in a `BTreeMap` keyed by id behind an async mutex, so clones
/// share the same records. Nothing is persisted.
#[derive(Clone, Default)]
pub struct MemoryMessageStore {
    inner: Arc<Mutex<MemoryStoreInner>>,
}

#[derive(Default)]
struct MemoryStoreInner {
    next_id: MessageId,
    records: BTreeMap<MessageId, MessageRecord>,
}

impl MemoryMessageStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored messages.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.records.len()
    }

    /// Returns true if nothing has been stored.
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.records.is_empty()
    }

    /// Overwrite a stored body without touching the edit metadata.
    ///
    /// Simulates corruption or tampering on the storage side.
    pub async fn overwrite_body(&self, id: MessageId, body: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        let record = inner.records.get_mut(&id).ok_or(StoreError::NotFound { id })?;
        record.body = body.to_string();
        Ok(())
    }
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    async fn insert(&self, message: NewMessage) -> Result<MessageRecord, StoreError> {
        let mut inner = self.inner.lock().await;

        let id = inner.next_id;
        inner.next_id = id
            .checked_add(1)
            .ok_or_else(|| StoreError::Backend("message id space exhausted".to_string()))?;

        let record = message.into_record(id);
        inner.records.insert(id, record.clone());

        Ok(record)
    }

    async fn get(&self, id: MessageId) -> Result<Option<MessageRecord>, StoreError> {
        Ok(self.inner.lock().await.records.get(&id).cloned())
    }

    async fn update_body(
        &self,
        id: MessageId,
        body: String,
        is_encrypted: bool,
        edited_at: u64,
    ) -> Result<MessageRecord, StoreError> {
        let mut inner = self.inner.lock().await;
        let record = inner.records.get_mut(&id).ok_or(StoreError::NotFound { id })?;

        record.body = body;
        record.is_encrypted = is_encrypted;
        record.edited_at = Some(edited_at);

        Ok(record.clone())
    }

    async fn delete(&self, id: MessageId) -> Result<(), StoreError> {
        self.inner.lock().await.records.remove(&id).map(|_| ()).ok_or(StoreError::NotFound { id })
    }

    async fn conversation(
        &self,
        id_a: &str,
        id_b: &str,
    ) -> Result<Vec<MessageRecord>, StoreError> {
        let inner = self.inner.lock().await;

        // BTreeMap yields id order; the stable sort keeps it for equal timestamps
        let mut records: Vec<MessageRecord> =
            inner.records.values().filter(|r| r.is_between(id_a, id_b)).cloned().collect();
        records.sort_by_key(|r| r.created_at);

        Ok(records)
    }
}
