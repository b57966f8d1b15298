//! Document store port
//!
//! Abstraction over the remote document database the friend graph lives in.
//! Every adapter offers the same three primitives: read one document, run an
//! equality query over a collection, and commit a batch of writes atomically.

pub mod api;
pub mod batch;
pub mod memory;
pub mod sqlite;

#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

pub use api::HttpDocumentStore;
pub use batch::{WriteBatch, WriteOp};
pub use memory::MemoryDocumentStore;
pub use sqlite::SqliteDocumentStore;

/// Collection names used by the social core.
pub mod collections {
    pub const USERS: &str = "users";
    pub const FRIENDS: &str = "friends";
    pub const FRIEND_REQUESTS: &str = "friend_requests";
}

/// Errors raised by a document store adapter.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("remote store error {code}: {message}")]
    Remote { code: i32, message: String },

    #[error("document encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("invalid batch: {0}")]
    InvalidBatch(String),

    #[error("invalid store configuration: {0}")]
    Config(String),
}

/// A stored document: its id plus the top-level JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// Top-level string field, if present and a string.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(Value::as_str)
    }

    /// Whether every filter matches this document.
    pub fn matches(&self, filters: &[FieldFilter]) -> bool {
        filters
            .iter()
            .all(|f| self.get_str(&f.field) == Some(f.value.as_str()))
    }

    /// Decode into a typed model. Malformed documents yield `None`.
    pub fn decode<T: DeserializeOwned>(&self) -> Option<T> {
        match serde_json::from_value(Value::Object(self.data.clone())) {
            Ok(v) => Some(v),
            Err(e) => {
                debug!("[Store] skipping malformed document {}: {}", self.id, e);
                None
            }
        }
    }
}

/// Serialize a model into a document body.
pub fn encode<T: Serialize>(model: &T) -> Result<Map<String, Value>, StoreError> {
    match serde_json::to_value(model)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::InvalidBatch(format!(
            "document body must be an object, got {}",
            other
        ))),
    }
}

/// Fresh document id, the way the hosted store generates them client-side.
pub fn new_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Equality filter on a top-level string field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFilter {
    pub field: String,
    pub value: String,
}

/// Equality query over one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub collection: String,
    #[serde(default)]
    pub filters: Vec<FieldFilter>,
}

impl Query {
    pub fn collection(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            filters: Vec::new(),
        }
    }

    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push(FieldFilter {
            field: field.into(),
            value: value.into(),
        });
        self
    }
}

/// The document store port.
///
/// `commit` must apply every operation of the batch or none of them.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    async fn query(&self, query: &Query) -> Result<Vec<Document>, StoreError>;

    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(id: &str, body: Value) -> Document {
        match body {
            Value::Object(map) => Document::new(id, map),
            _ => Document::new(id, Map::new()),
        }
    }

    #[test]
    fn filters_only_match_string_fields() {
        let d = doc("f1", json!({"userID": "a", "friendID": "b", "n": 1}));
        let q = Query::collection("friends")
            .where_eq("userID", "a")
            .where_eq("friendID", "b");
        assert!(d.matches(&q.filters));
        assert!(!d.matches(&Query::collection("friends").where_eq("n", "1").filters));
        assert!(!d.matches(&Query::collection("friends").where_eq("missing", "").filters));
    }

    #[test]
    fn malformed_document_decodes_to_none() {
        #[derive(Deserialize)]
        struct Strict {
            #[allow(dead_code)]
            name: String,
        }
        let d = doc("u1", json!({"name": 42}));
        assert!(d.decode::<Strict>().is_none());
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(new_document_id(), new_document_id());
    }
}
