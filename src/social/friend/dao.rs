//! Friend data access (DAO)
//!
//! Typed reads of the `friends` and `friend_requests` collections and helpers
//! that stage writes into a batch. The DAO never commits on its own except via
//! [`FriendDao::commit`], so multi-document changes stay atomic.

use crate::social::friend::models::{Friend, FriendRequest};
use crate::social::store::{
    collections, encode, Document, DocumentStore, Query, WriteBatch,
};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::debug;

/// Friend DAO over the document store
#[derive(Clone)]
pub struct FriendDao {
    store: Arc<dyn DocumentStore>,
}

impl FriendDao {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// The document id is authoritative over any `id` field in the body.
    fn to_friend(doc: &Document) -> Option<Friend> {
        let mut friend: Friend = doc.decode()?;
        friend.id = doc.id.clone();
        Some(friend)
    }

    fn to_request(doc: &Document) -> Option<FriendRequest> {
        let mut request: FriendRequest = doc.decode()?;
        request.id = doc.id.clone();
        Some(request)
    }

    async fn query_friends(&self, query: Query) -> Result<Vec<Friend>> {
        let docs = self
            .store
            .query(&query)
            .await
            .context("failed to query friends")?;
        Ok(docs.iter().filter_map(Self::to_friend).collect())
    }

    async fn query_requests(&self, query: Query) -> Result<Vec<FriendRequest>> {
        let docs = self
            .store
            .query(&query)
            .await
            .context("failed to query friend requests")?;
        Ok(docs.iter().filter_map(Self::to_request).collect())
    }

    /// Read one request. Absent and undecodable documents both yield `None`.
    pub async fn get_request(&self, request_id: &str) -> Result<Option<FriendRequest>> {
        let doc = self
            .store
            .get(collections::FRIEND_REQUESTS, request_id)
            .await
            .with_context(|| format!("failed to read friend request {}", request_id))?;
        Ok(doc.as_ref().and_then(Self::to_request))
    }

    /// Edges owned by `user_id`.
    pub async fn friends_of(&self, user_id: &str) -> Result<Vec<Friend>> {
        let friends = self
            .query_friends(Query::collection(collections::FRIENDS).where_eq("userID", user_id))
            .await?;
        debug!("[FriendDAO] {} owns {} friend edges", user_id, friends.len());
        Ok(friends)
    }

    /// Edges `user_id -> friend_id` (normally zero or one).
    pub async fn edges_between(&self, user_id: &str, friend_id: &str) -> Result<Vec<Friend>> {
        self.query_friends(
            Query::collection(collections::FRIENDS)
                .where_eq("userID", user_id)
                .where_eq("friendID", friend_id),
        )
        .await
    }

    /// Pending requests addressed to `user_id`.
    pub async fn requests_to(&self, user_id: &str) -> Result<Vec<FriendRequest>> {
        let requests = self
            .query_requests(
                Query::collection(collections::FRIEND_REQUESTS).where_eq("toUserID", user_id),
            )
            .await?;
        debug!("[FriendDAO] {} has {} incoming requests", user_id, requests.len());
        Ok(requests)
    }

    /// Pending requests sent by `user_id`.
    pub async fn requests_from(&self, user_id: &str) -> Result<Vec<FriendRequest>> {
        self.query_requests(
            Query::collection(collections::FRIEND_REQUESTS).where_eq("fromUserID", user_id),
        )
        .await
    }

    /// Pending requests from `from` to `to`, oldest first.
    pub async fn requests_between(&self, from: &str, to: &str) -> Result<Vec<FriendRequest>> {
        self.query_requests(
            Query::collection(collections::FRIEND_REQUESTS)
                .where_eq("fromUserID", from)
                .where_eq("toUserID", to),
        )
        .await
    }

    pub fn stage_friend(batch: &mut WriteBatch, friend: &Friend) -> Result<()> {
        batch.set(collections::FRIENDS, friend.id.clone(), encode(friend)?);
        Ok(())
    }

    pub fn stage_friend_delete(batch: &mut WriteBatch, friend_id: &str) {
        batch.delete(collections::FRIENDS, friend_id);
    }

    pub fn stage_request(batch: &mut WriteBatch, request: &FriendRequest) -> Result<()> {
        batch.set(
            collections::FRIEND_REQUESTS,
            request.id.clone(),
            encode(request)?,
        );
        Ok(())
    }

    pub fn stage_request_delete(batch: &mut WriteBatch, request_id: &str) {
        batch.delete(collections::FRIEND_REQUESTS, request_id);
    }

    /// Apply a staged batch atomically.
    pub async fn commit(&self, batch: WriteBatch) -> Result<()> {
        let ops = batch.len();
        self.store
            .commit(batch)
            .await
            .with_context(|| format!("failed to commit batch of {} writes", ops))
    }
}
