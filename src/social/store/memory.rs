//! In-process document store.
//!
//! Keeps every collection in a `Vec` guarded by one `RwLock`, so a batch is
//! applied while holding a single write guard and readers never observe half
//! of it.

use crate::social::store::{Document, DocumentStore, Query, StoreError, WriteBatch, WriteOp};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in `collection`.
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let guard = self.collections.read().await;
        Ok(guard
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id))
            .cloned())
    }

    async fn query(&self, query: &Query) -> Result<Vec<Document>, StoreError> {
        let guard = self.collections.read().await;
        let docs: Vec<Document> = guard
            .get(&query.collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| d.matches(&query.filters))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        debug!(
            "[MemoryStore] query {} ({} filters) -> {} documents",
            query.collection,
            query.filters.len(),
            docs.len()
        );
        Ok(docs)
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        batch.validate()?;
        let mut guard = self.collections.write().await;
        let ops = batch.len();
        for op in batch.into_ops() {
            match op {
                WriteOp::Set {
                    collection,
                    id,
                    data,
                } => {
                    let docs = guard.entry(collection).or_default();
                    match docs.iter_mut().find(|d| d.id == id) {
                        Some(existing) => existing.data = data,
                        None => docs.push(Document::new(id, data)),
                    }
                }
                WriteOp::Delete { collection, id } => {
                    if let Some(docs) = guard.get_mut(&collection) {
                        docs.retain(|d| d.id != id);
                    }
                }
            }
        }
        debug!("[MemoryStore] committed batch of {} operations", ops);
        Ok(())
    }
}
