//! SQLite helpers: create the connection pool and run the sqlx migrations.
//!
//! Migrations live in the crate's `migrations/` directory and are embedded
//! with `sqlx::migrate!()`.

use crate::social::store::StoreError;
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};
use std::time::Duration;
use tracing::info;

/// Create a SQLite pool and apply every pending migration.
///
/// An in-memory URL gets a single connection that is never recycled,
/// otherwise each pooled connection would see its own empty database.
pub async fn create_sqlite_pool_with_migration(db_url: &str) -> Result<Pool<Sqlite>, StoreError> {
    let options = if db_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };
    let pool = options.connect(db_url).await?;

    sqlx::migrate!().run(&pool).await?;
    info!("[DB] ✅ SQLite ready: {}", db_url);

    Ok(pool)
}
