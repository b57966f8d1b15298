//! Client entry point
//!
//! `ThriveClient` is built once when the application starts and handed to
//! whatever needs the friend graph. It owns the document store, the auth
//! collaborator and the friends service.

use crate::social::auth::{AuthProvider, StaticSession};
use crate::social::friend::{
    EmptyFriendListener, Friend, FriendListener, FriendRequest, FriendsService,
};
use crate::social::store::{
    DocumentStore, HttpDocumentStore, MemoryDocumentStore, SqliteDocumentStore,
};
use crate::social::user::{User, UserDao};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

/// Which document store backs the client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreConfig {
    /// Local SQLite file, e.g. `sqlite://thriveup.db?mode=rwc`
    Sqlite { db_url: String },
    /// Remote document gateway
    Http { api_base_url: String, token: String },
    /// Process memory, lost on exit
    Memory,
}

/// Client configuration
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Signed-in user id; empty when nobody is signed in yet
    pub user_id: String,
    pub store: StoreConfig,
}

impl ClientConfig {
    /// Default configuration: a local SQLite file in the working directory.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            store: StoreConfig::Sqlite {
                db_url: "sqlite://thriveup.db?mode=rwc".to_string(),
            },
        }
    }

    pub fn with_store(mut self, store: StoreConfig) -> Self {
        self.store = store;
        self
    }
}

/// ThriveUp social client
#[derive(Clone)]
pub struct ThriveClient {
    config: ClientConfig,
    store: Arc<dyn DocumentStore>,
    auth: Arc<dyn AuthProvider>,
    friends: Arc<FriendsService>,
}

impl ThriveClient {
    /// Open the configured store and build the client.
    pub async fn new(config: ClientConfig) -> Result<Self> {
        let store: Arc<dyn DocumentStore> = match &config.store {
            StoreConfig::Sqlite { db_url } => Arc::new(
                SqliteDocumentStore::connect(db_url)
                    .await
                    .with_context(|| format!("failed to open SQLite store {}", db_url))?,
            ),
            StoreConfig::Http {
                api_base_url,
                token,
            } => Arc::new(
                HttpDocumentStore::with_token(api_base_url.clone(), token)
                    .context("failed to create HTTP store")?,
            ),
            StoreConfig::Memory => Arc::new(MemoryDocumentStore::new()),
        };
        info!("[Client] store ready: {}", store_kind(&config.store));
        Ok(Self::with_store(config, store))
    }

    /// Build the client over an existing store.
    pub fn with_store(config: ClientConfig, store: Arc<dyn DocumentStore>) -> Self {
        let auth: Arc<dyn AuthProvider> = if config.user_id.is_empty() {
            Arc::new(StaticSession::signed_out())
        } else {
            Arc::new(StaticSession::signed_in(config.user_id.clone()))
        };
        Self {
            friends: Arc::new(FriendsService::with_listener(
                store.clone(),
                Arc::new(EmptyFriendListener),
            )),
            config,
            store,
            auth,
        }
    }

    /// Replace the auth collaborator.
    pub fn set_auth_provider(&mut self, auth: Arc<dyn AuthProvider>) {
        self.auth = auth;
    }

    /// Register a friend listener; the service is rebuilt so later writes
    /// report to it.
    pub fn set_friend_listener(&mut self, listener: Arc<dyn FriendListener>) {
        self.friends = Arc::new(FriendsService::with_listener(self.store.clone(), listener));
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn friends(&self) -> Arc<FriendsService> {
        self.friends.clone()
    }

    pub fn users(&self) -> &UserDao {
        self.friends.users()
    }

    /// Id of the signed-in user, or an error when nobody is signed in.
    pub fn current_user_id(&self) -> Result<String> {
        self.auth
            .current_user_id()
            .filter(|id| !id.is_empty())
            .context("no signed-in user")
    }

    pub async fn my_friends(&self) -> Result<Vec<Friend>> {
        let me = self.current_user_id()?;
        self.friends.fetch_friends(&me).await
    }

    pub async fn my_friend_profiles(&self) -> Result<Vec<User>> {
        let me = self.current_user_id()?;
        self.friends.fetch_friend_profiles(&me).await
    }

    pub async fn my_friend_requests(&self) -> Result<Vec<FriendRequest>> {
        let me = self.current_user_id()?;
        self.friends.fetch_friend_requests(&me).await
    }

    /// Users the signed-in user could send a request to.
    pub async fn discover_users(&self) -> Result<Vec<User>> {
        let me = self.current_user_id()?;
        self.friends
            .fetch_users_excluding_friends_and_requests(&me)
            .await
    }

    pub async fn send_friend_request_to(&self, to: &str) -> Result<FriendRequest> {
        let me = self.current_user_id()?;
        self.friends.send_friend_request(&me, to).await
    }

    pub async fn unsend_friend_request_to(&self, to: &str) -> Result<bool> {
        let me = self.current_user_id()?;
        self.friends.unsend_friend_request(&me, to).await
    }

    pub async fn unfriend(&self, friend_id: &str) -> Result<bool> {
        let me = self.current_user_id()?;
        self.friends.remove_friend(&me, friend_id).await
    }
}

fn store_kind(config: &StoreConfig) -> &'static str {
    match config {
        StoreConfig::Sqlite { .. } => "sqlite",
        StoreConfig::Http { .. } => "http",
        StoreConfig::Memory => "memory",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::social::store::testing::init_test_logger;

    async fn memory_client(user_id: &str) -> ThriveClient {
        init_test_logger();
        ThriveClient::new(ClientConfig::new(user_id).with_store(StoreConfig::Memory))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn signed_out_client_refuses_user_calls() {
        let client = memory_client("").await;
        assert!(client.current_user_id().is_err());
        assert!(client.my_friends().await.is_err());
        assert!(client.send_friend_request_to("b").await.is_err());
    }

    #[tokio::test]
    async fn clients_sharing_a_store_see_each_other() {
        let alice = memory_client("alice").await;
        for uid in ["alice", "bob", "carol"] {
            alice.users().upsert_user(&User::new(uid, uid)).await.unwrap();
        }
        let mut bob = alice.clone();
        bob.set_auth_provider(Arc::new(StaticSession::signed_in("bob")));

        alice.send_friend_request_to("bob").await.unwrap();
        let incoming = bob.my_friend_requests().await.unwrap();
        assert_eq!(incoming.len(), 1);
        assert!(bob.friends().accept_friend_request(&incoming[0].id).await.unwrap());

        let profiles = alice.my_friend_profiles().await.unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].uid, "bob");

        let discover: Vec<String> = bob
            .discover_users()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.uid)
            .collect();
        assert_eq!(discover, vec!["carol"]);

        assert!(bob.unfriend("alice").await.unwrap());
        assert!(alice.my_friends().await.unwrap().is_empty());
        assert!(!alice.unsend_friend_request_to("bob").await.unwrap());
    }

    #[tokio::test]
    async fn sqlite_config_opens_in_memory_database() {
        init_test_logger();
        let config = ClientConfig::new("a").with_store(StoreConfig::Sqlite {
            db_url: "sqlite::memory:".to_string(),
        });
        let client = ThriveClient::new(config).await.unwrap();
        assert!(client.my_friends().await.unwrap().is_empty());
    }
}
