//! User data access (DAO)

use crate::social::store::{
    collections, encode, Document, DocumentStore, Query, WriteBatch,
};
use crate::social::user::models::User;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

/// User DAO over the document store
#[derive(Clone)]
pub struct UserDao {
    store: Arc<dyn DocumentStore>,
}

impl UserDao {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Documents written without a `uid` field fall back to their document id.
    fn to_user(doc: &Document) -> Option<User> {
        let mut user: User = doc.decode()?;
        if user.uid.is_empty() {
            user.uid = doc.id.clone();
        }
        Some(user)
    }

    pub async fn get_user(&self, uid: &str) -> Result<Option<User>> {
        let doc = self
            .store
            .get(collections::USERS, uid)
            .await
            .with_context(|| format!("failed to read user {}", uid))?;
        Ok(doc.as_ref().and_then(Self::to_user))
    }

    pub async fn get_all_users(&self) -> Result<Vec<User>> {
        let docs = self
            .store
            .query(&Query::collection(collections::USERS))
            .await
            .context("failed to list users")?;
        let users: Vec<User> = docs.iter().filter_map(Self::to_user).collect();
        debug!("[UserDAO] loaded {} users", users.len());
        Ok(users)
    }

    /// Create or overwrite the profile stored under `user.uid`.
    pub async fn upsert_user(&self, user: &User) -> Result<()> {
        anyhow::ensure!(!user.uid.is_empty(), "user uid must not be empty");
        let mut batch = WriteBatch::new();
        batch.set(collections::USERS, user.uid.clone(), encode(user)?);
        self.store
            .commit(batch)
            .await
            .with_context(|| format!("failed to save user {}", user.uid))?;
        info!("[UserDAO] saved user {}", user.uid);
        Ok(())
    }
}
