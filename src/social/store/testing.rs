//! Test fixtures: a fault-injecting store wrapper and the shared test logger.

use crate::social::store::{
    Document, DocumentStore, MemoryDocumentStore, Query, StoreError, WriteBatch,
};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

static INIT_LOGGER: Once = Once::new();

pub(crate) fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        use tracing_subscriber::prelude::*;
        use tracing_subscriber::EnvFilter;

        let filter_layer = EnvFilter::new("info,thriveup_social_core=debug,sqlx=warn");
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_file(true)
            .with_line_number(true)
            .with_target(false)
            .with_test_writer();

        // another test binary may already own the global subscriber
        let _ = tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt_layer)
            .try_init();
    });
}

/// Wraps a store, failing reads on chosen collections and counting commits.
pub(crate) struct FlakyStore {
    inner: Arc<dyn DocumentStore>,
    failing: Mutex<HashSet<String>>,
    fail_commits: Mutex<bool>,
    commits: AtomicUsize,
}

impl FlakyStore {
    pub(crate) fn new(inner: Arc<dyn DocumentStore>) -> Self {
        Self {
            inner,
            failing: Mutex::new(HashSet::new()),
            fail_commits: Mutex::new(false),
            commits: AtomicUsize::new(0),
        }
    }

    pub(crate) fn over_memory() -> (Arc<MemoryDocumentStore>, Arc<Self>) {
        let memory = Arc::new(MemoryDocumentStore::new());
        let flaky = Arc::new(Self::new(memory.clone()));
        (memory, flaky)
    }

    pub(crate) fn fail_reads_on(&self, collection: &str) {
        self.failing.lock().unwrap().insert(collection.to_string());
    }

    pub(crate) fn fail_commits(&self) {
        *self.fail_commits.lock().unwrap() = true;
    }

    pub(crate) fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    fn check(&self, collection: &str) -> Result<(), StoreError> {
        if self.failing.lock().unwrap().contains(collection) {
            return Err(StoreError::Remote {
                code: 503,
                message: format!("{} unavailable", collection),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        self.check(collection)?;
        self.inner.get(collection, id).await
    }

    async fn query(&self, query: &Query) -> Result<Vec<Document>, StoreError> {
        self.check(&query.collection)?;
        self.inner.query(query).await
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        if *self.fail_commits.lock().unwrap() {
            return Err(StoreError::Remote {
                code: 500,
                message: "commit rejected".to_string(),
            });
        }
        self.commits.fetch_add(1, Ordering::SeqCst);
        self.inner.commit(batch).await
    }
}
