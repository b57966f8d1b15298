//! SQLite-backed document store (sqlx).
//!
//! Documents are rows of the `documents` table with their body stored as JSON
//! text. Equality filters are evaluated with `json_extract`, and a batch runs
//! inside one SQL transaction.

use crate::social::db::create_sqlite_pool_with_migration;
use crate::social::store::{Document, DocumentStore, Query, StoreError, WriteBatch, WriteOp};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use sqlx::{sqlite::SqliteRow, Pool, Row, Sqlite};
use tracing::{debug, info, warn};

pub struct SqliteDocumentStore {
    db: Pool<Sqlite>,
}

impl SqliteDocumentStore {
    /// Wrap an existing pool; the schema must already be migrated.
    pub fn new(db: Pool<Sqlite>) -> Self {
        Self { db }
    }

    /// Open (and migrate) the database at `db_url`.
    pub async fn connect(db_url: &str) -> Result<Self, StoreError> {
        let db = create_sqlite_pool_with_migration(db_url).await?;
        Ok(Self::new(db))
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.db
    }

    fn row_to_document(row: SqliteRow) -> Document {
        let id: String = row.get("id");
        let raw: String = row.get("data");
        let data = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => map,
            _ => {
                warn!("[SqliteStore] document {} has an unreadable body", id);
                Map::new()
            }
        };
        Document::new(id, data)
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, data FROM documents
            WHERE collection = ? AND id = ?
            "#,
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Self::row_to_document))
    }

    async fn query(&self, query: &Query) -> Result<Vec<Document>, StoreError> {
        // Rows with a non-JSON body never match a filter; json_extract would
        // raise on them and fail the whole query.
        let mut sql = String::from("SELECT id, data FROM documents WHERE collection = ?");
        for _ in &query.filters {
            sql.push_str(" AND (CASE WHEN json_valid(data) THEN json_extract(data, ?) END) = ?");
        }
        sql.push_str(" ORDER BY rowid");

        let mut q = sqlx::query(&sql).bind(&query.collection);
        for f in &query.filters {
            q = q.bind(format!("$.\"{}\"", f.field)).bind(&f.value);
        }
        let rows = q.fetch_all(&self.db).await?;

        let docs: Vec<Document> = rows.into_iter().map(Self::row_to_document).collect();
        debug!(
            "[SqliteStore] query {} ({} filters) -> {} documents",
            query.collection,
            query.filters.len(),
            docs.len()
        );
        Ok(docs)
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        batch.validate()?;
        let now = Utc::now().timestamp_millis();
        let ops = batch.len();

        let mut tx = self.db.begin().await?;
        for op in batch.into_ops() {
            match op {
                WriteOp::Set {
                    collection,
                    id,
                    data,
                } => {
                    let body = serde_json::to_string(&data)?;
                    sqlx::query(
                        r#"
                        INSERT INTO documents (collection, id, data, update_time)
                        VALUES (?, ?, ?, ?)
                        ON CONFLICT(collection, id) DO UPDATE SET
                            data = excluded.data,
                            update_time = excluded.update_time
                        "#,
                    )
                    .bind(&collection)
                    .bind(&id)
                    .bind(body)
                    .bind(now)
                    .execute(&mut *tx)
                    .await?;
                }
                WriteOp::Delete { collection, id } => {
                    sqlx::query(
                        r#"
                        DELETE FROM documents
                        WHERE collection = ? AND id = ?
                        "#,
                    )
                    .bind(&collection)
                    .bind(&id)
                    .execute(&mut *tx)
                    .await?;
                }
            }
        }
        tx.commit().await?;

        info!("[SqliteStore] committed batch of {} operations", ops);
        Ok(())
    }
}
