//! Friend relationship service
//!
//! Orchestrates friend requests and friend edges on top of the document store.
//! A friendship is two directed edges; accept and remove touch both edges in a
//! single atomic batch so no half-applied friendship is ever visible.

use crate::social::friend::dao::FriendDao;
use crate::social::friend::listener::{EmptyFriendListener, FriendListener};
use crate::social::friend::models::{Friend, FriendRequest};
use crate::social::friend::types::RelationshipStatus;
use crate::social::store::{new_document_id, DocumentStore, WriteBatch};
use crate::social::user::{User, UserDao};
use anyhow::{ensure, Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Friend relationship service
pub struct FriendsService {
    friend_dao: FriendDao,
    user_dao: UserDao,
    listener: Arc<dyn FriendListener>,
}

impl FriendsService {
    /// Create a service with the no-op listener.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_listener(store, Arc::new(EmptyFriendListener))
    }

    pub fn with_listener(store: Arc<dyn DocumentStore>, listener: Arc<dyn FriendListener>) -> Self {
        Self {
            friend_dao: FriendDao::new(store.clone()),
            user_dao: UserDao::new(store),
            listener,
        }
    }

    pub fn users(&self) -> &UserDao {
        &self.user_dao
    }

    fn to_json<T: Serialize + ?Sized>(value: &T) -> Option<String> {
        match serde_json::to_string(value) {
            Ok(json) => Some(json),
            Err(e) => {
                warn!("[FriendSvc] ⚠️ failed to encode listener payload: {}", e);
                None
            }
        }
    }

    /// Create a new pending request under a fresh id.
    ///
    /// Existing requests between the same pair are not checked; each call
    /// creates another request. Empty ids and requests to oneself are refused.
    pub async fn send_friend_request(&self, from: &str, to: &str) -> Result<FriendRequest> {
        ensure!(
            !from.is_empty() && !to.is_empty(),
            "friend request needs both user ids"
        );
        ensure!(from != to, "cannot send a friend request to oneself ({})", from);

        let request = FriendRequest {
            id: new_document_id(),
            from_user_id: from.to_string(),
            to_user_id: to.to_string(),
            create_time: Utc::now().timestamp_millis(),
        };

        let mut batch = WriteBatch::new();
        FriendDao::stage_request(&mut batch, &request)?;
        self.friend_dao
            .commit(batch)
            .await
            .with_context(|| format!("failed to send friend request {} -> {}", from, to))?;
        info!("[FriendSvc] 📝 request {} sent: {} -> {}", request.id, from, to);

        if let Some(json) = Self::to_json(&request) {
            self.listener.on_friend_request_added(json).await;
        }
        Ok(request)
    }

    /// Turn a pending request into a friendship.
    ///
    /// Returns `Ok(false)` without writing anything when the request does not
    /// exist or lacks either endpoint. Otherwise both edges are created and the
    /// request deleted in one batch. An edge that already exists is kept as is,
    /// so the pair never ends up with more than two edges.
    pub async fn accept_friend_request(&self, request_id: &str) -> Result<bool> {
        let request = match self.friend_dao.get_request(request_id).await? {
            Some(r) if r.is_well_formed() => r,
            Some(_) => {
                warn!("[FriendSvc] ⚠️ request {} is malformed, not accepting", request_id);
                return Ok(false);
            }
            None => {
                info!("[FriendSvc] request {} not found", request_id);
                return Ok(false);
            }
        };
        let from = request.from_user_id.as_str();
        let to = request.to_user_id.as_str();

        let (forward, backward) = tokio::try_join!(
            self.friend_dao.edges_between(from, to),
            self.friend_dao.edges_between(to, from),
        )?;

        let now = Utc::now().timestamp_millis();
        let mut added = Vec::with_capacity(2);
        if forward.is_empty() {
            added.push(new_edge(from, to, now));
        }
        if backward.is_empty() {
            added.push(new_edge(to, from, now));
        }

        let mut batch = WriteBatch::new();
        for friend in &added {
            FriendDao::stage_friend(&mut batch, friend)?;
        }
        FriendDao::stage_request_delete(&mut batch, &request.id);
        self.friend_dao
            .commit(batch)
            .await
            .with_context(|| format!("failed to accept friend request {}", request_id))?;
        info!(
            "[FriendSvc] ✅ request {} accepted: {} <-> {} ({} new edges)",
            request.id,
            from,
            to,
            added.len()
        );

        if !added.is_empty() {
            if let Some(json) = Self::to_json(&added) {
                self.listener.on_friend_added(json).await;
            }
        }
        if let Some(json) = Self::to_json(&request) {
            self.listener.on_friend_request_deleted(json).await;
        }
        Ok(true)
    }

    /// Delete both directions of a friendship.
    ///
    /// Both edge lookups must succeed before anything is deleted. Returns
    /// `Ok(false)` when there was no edge in either direction.
    pub async fn remove_friend(&self, user_id: &str, friend_id: &str) -> Result<bool> {
        let (forward, backward) = tokio::try_join!(
            self.friend_dao.edges_between(user_id, friend_id),
            self.friend_dao.edges_between(friend_id, user_id),
        )?;

        let removed: Vec<Friend> = forward.into_iter().chain(backward).collect();
        if removed.is_empty() {
            info!(
                "[FriendSvc] {} and {} are not friends, nothing to remove",
                user_id, friend_id
            );
            return Ok(false);
        }

        let mut batch = WriteBatch::new();
        for friend in &removed {
            FriendDao::stage_friend_delete(&mut batch, &friend.id);
        }
        self.friend_dao
            .commit(batch)
            .await
            .with_context(|| format!("failed to remove friend {} <-> {}", user_id, friend_id))?;
        info!(
            "[FriendSvc] 🗑️ friendship {} <-> {} removed ({} edges)",
            user_id,
            friend_id,
            removed.len()
        );

        if let Some(json) = Self::to_json(&removed) {
            self.listener.on_friend_deleted(json).await;
        }
        Ok(true)
    }

    /// Delete one request outright (rejection).
    ///
    /// An absent id is a no-op: `Ok(false)`, nothing written, no callback.
    pub async fn remove_friend_request(&self, request_id: &str) -> Result<bool> {
        let Some(request) = self.friend_dao.get_request(request_id).await? else {
            info!("[FriendSvc] request {} not found, nothing to remove", request_id);
            return Ok(false);
        };

        let mut batch = WriteBatch::new();
        FriendDao::stage_request_delete(&mut batch, &request.id);
        self.friend_dao
            .commit(batch)
            .await
            .with_context(|| format!("failed to remove friend request {}", request_id))?;
        info!("[FriendSvc] 🗑️ request {} removed", request_id);

        if let Some(json) = Self::to_json(&request) {
            self.listener.on_friend_request_deleted(json).await;
        }
        Ok(true)
    }

    /// Withdraw the pending request `from -> to`.
    ///
    /// Returns `Ok(false)` when no such request exists. If several requests
    /// exist for the pair, only the oldest one is deleted.
    pub async fn unsend_friend_request(&self, from: &str, to: &str) -> Result<bool> {
        let pending = self.friend_dao.requests_between(from, to).await?;
        let Some(request) = pending.into_iter().next() else {
            info!("[FriendSvc] no pending request {} -> {} to unsend", from, to);
            return Ok(false);
        };

        let mut batch = WriteBatch::new();
        FriendDao::stage_request_delete(&mut batch, &request.id);
        self.friend_dao
            .commit(batch)
            .await
            .with_context(|| format!("failed to unsend friend request {} -> {}", from, to))?;
        info!("[FriendSvc] 🗑️ request {} unsent: {} -> {}", request.id, from, to);

        if let Some(json) = Self::to_json(&request) {
            self.listener.on_friend_request_deleted(json).await;
        }
        Ok(true)
    }

    /// Friend edges owned by `user_id`.
    pub async fn fetch_friends(&self, user_id: &str) -> Result<Vec<Friend>> {
        self.friend_dao.friends_of(user_id).await
    }

    /// Pending requests addressed to `user_id`.
    pub async fn fetch_friend_requests(&self, user_id: &str) -> Result<Vec<FriendRequest>> {
        self.friend_dao.requests_to(user_id).await
    }

    /// Pending requests sent by `user_id`.
    pub async fn fetch_sent_friend_requests(&self, user_id: &str) -> Result<Vec<FriendRequest>> {
        self.friend_dao.requests_from(user_id).await
    }

    /// Candidate users for "add friend": everyone except the user, their
    /// friends and the senders of requests pending for them.
    ///
    /// The three reads run concurrently; if any fails the whole call fails.
    pub async fn fetch_users_excluding_friends_and_requests(
        &self,
        user_id: &str,
    ) -> Result<Vec<User>> {
        let (friends, requests, users) = tokio::try_join!(
            self.friend_dao.friends_of(user_id),
            self.friend_dao.requests_to(user_id),
            self.user_dao.get_all_users(),
        )?;

        let mut excluded: HashSet<&str> = HashSet::new();
        excluded.insert(user_id);
        excluded.extend(friends.iter().map(|f| f.friend_id.as_str()));
        excluded.extend(requests.iter().map(|r| r.from_user_id.as_str()));

        let candidates: Vec<User> = users
            .into_iter()
            .filter(|u| !excluded.contains(u.uid.as_str()))
            .collect();
        debug!(
            "[FriendSvc] {} candidate users for {} ({} excluded)",
            candidates.len(),
            user_id,
            excluded.len()
        );
        Ok(candidates)
    }

    /// Profiles of the users `user_id` has friend edges to.
    pub async fn fetch_friend_profiles(&self, user_id: &str) -> Result<Vec<User>> {
        let (friends, users) = tokio::try_join!(
            self.friend_dao.friends_of(user_id),
            self.user_dao.get_all_users(),
        )?;

        let friend_ids: HashSet<&str> = friends.iter().map(|f| f.friend_id.as_str()).collect();
        Ok(users
            .into_iter()
            .filter(|u| friend_ids.contains(u.uid.as_str()))
            .collect())
    }

    /// How `other_id` relates to `user_id`.
    pub async fn relationship_status(
        &self,
        user_id: &str,
        other_id: &str,
    ) -> Result<RelationshipStatus> {
        let (edges, sent, received) = tokio::try_join!(
            self.friend_dao.edges_between(user_id, other_id),
            self.friend_dao.requests_between(user_id, other_id),
            self.friend_dao.requests_between(other_id, user_id),
        )?;

        let status = if !edges.is_empty() {
            RelationshipStatus::Friends
        } else if !sent.is_empty() {
            RelationshipStatus::RequestSent
        } else if !received.is_empty() {
            RelationshipStatus::RequestReceived
        } else {
            RelationshipStatus::None
        };
        Ok(status)
    }
}

fn new_edge(user_id: &str, friend_id: &str, create_time: i64) -> Friend {
    Friend {
        id: new_document_id(),
        user_id: user_id.to_string(),
        friend_id: friend_id.to_string(),
        create_time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::social::store::collections;
    use crate::social::store::testing::{init_test_logger, FlakyStore};
    use crate::social::store::{MemoryDocumentStore, SqliteDocumentStore};
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    async fn seeded(store: Arc<dyn DocumentStore>, uids: &[&str]) -> FriendsService {
        init_test_logger();
        let service = FriendsService::new(store);
        for uid in uids {
            service
                .users()
                .upsert_user(&User::new(*uid, uid.to_uppercase()))
                .await
                .unwrap();
        }
        service
    }

    fn pairs(friends: &[Friend]) -> Vec<(String, String)> {
        let mut v: Vec<_> = friends
            .iter()
            .map(|f| (f.user_id.clone(), f.friend_id.clone()))
            .collect();
        v.sort();
        v
    }

    fn uids(users: &[User]) -> Vec<&str> {
        let mut v: Vec<&str> = users.iter().map(|u| u.uid.as_str()).collect();
        v.sort();
        v
    }

    #[tokio::test]
    async fn request_accept_remove_scenario() {
        let store = Arc::new(MemoryDocumentStore::new());
        let service = seeded(store.clone(), &["a", "b"]).await;

        let r1 = service.send_friend_request("a", "b").await.unwrap();
        assert_eq!(service.fetch_friend_requests("b").await.unwrap(), vec![r1.clone()]);

        assert!(service.accept_friend_request(&r1.id).await.unwrap());
        assert_eq!(store.count(collections::FRIENDS).await, 2);
        assert_eq!(
            pairs(&service.fetch_friends("a").await.unwrap()),
            vec![("a".to_string(), "b".to_string())]
        );
        assert_eq!(
            pairs(&service.fetch_friends("b").await.unwrap()),
            vec![("b".to_string(), "a".to_string())]
        );
        assert!(service.fetch_friend_requests("b").await.unwrap().is_empty());
        assert_eq!(store.count(collections::FRIEND_REQUESTS).await, 0);

        assert!(service.remove_friend("a", "b").await.unwrap());
        assert!(service.fetch_friends("a").await.unwrap().is_empty());
        assert!(service.fetch_friends("b").await.unwrap().is_empty());
        assert_eq!(store.count(collections::FRIENDS).await, 0);
    }

    #[tokio::test]
    async fn scenario_on_sqlite_store() {
        let store = Arc::new(SqliteDocumentStore::connect("sqlite::memory:").await.unwrap());
        let service = seeded(store, &["a", "b", "c"]).await;

        let r1 = service.send_friend_request("a", "b").await.unwrap();
        assert!(service.accept_friend_request(&r1.id).await.unwrap());
        assert_eq!(
            service.relationship_status("a", "b").await.unwrap(),
            RelationshipStatus::Friends
        );
        let profiles = service.fetch_friend_profiles("b").await.unwrap();
        assert_eq!(uids(&profiles), vec!["a"]);

        assert!(service.remove_friend("b", "a").await.unwrap());
        assert_eq!(
            service.relationship_status("a", "b").await.unwrap(),
            RelationshipStatus::None
        );
        let candidates = service
            .fetch_users_excluding_friends_and_requests("a")
            .await
            .unwrap();
        assert_eq!(uids(&candidates), vec!["b", "c"]);
    }

    #[tokio::test]
    async fn accepting_missing_request_writes_nothing() {
        let (memory, flaky) = FlakyStore::over_memory();
        let service = FriendsService::new(flaky.clone());
        init_test_logger();

        assert!(!service.accept_friend_request("nope").await.unwrap());
        assert_eq!(flaky.commits(), 0);
        assert_eq!(memory.count(collections::FRIENDS).await, 0);
    }

    #[tokio::test]
    async fn accepting_malformed_request_writes_nothing() {
        let (memory, flaky) = FlakyStore::over_memory();
        let service = FriendsService::new(flaky.clone());
        let mut batch = WriteBatch::new();
        let broken = FriendRequest {
            id: "r9".to_string(),
            from_user_id: "a".to_string(),
            ..FriendRequest::default()
        };
        FriendDao::stage_request(&mut batch, &broken).unwrap();
        memory.commit(batch).await.unwrap();

        assert!(!service.accept_friend_request("r9").await.unwrap());
        assert_eq!(flaky.commits(), 0);
        assert_eq!(memory.count(collections::FRIEND_REQUESTS).await, 1);
        assert_eq!(memory.count(collections::FRIENDS).await, 0);
    }

    #[test]
    fn unencodable_payload_yields_no_json() {
        init_test_logger();
        let mut bad = std::collections::HashMap::new();
        bad.insert((1, 2), "tuple keys are not valid JSON object keys");
        assert!(FriendsService::to_json(&bad).is_none());
        assert!(FriendsService::to_json(&vec![1, 2]).is_some());
    }

    #[tokio::test]
    async fn send_refuses_self_and_empty_ids() {
        let (memory, flaky) = FlakyStore::over_memory();
        let service = FriendsService::new(flaky.clone());
        init_test_logger();

        assert!(service.send_friend_request("a", "a").await.is_err());
        assert!(service.send_friend_request("a", "").await.is_err());
        assert!(service.send_friend_request("", "b").await.is_err());
        assert_eq!(flaky.commits(), 0);
        assert_eq!(memory.count(collections::FRIEND_REQUESTS).await, 0);
    }

    #[tokio::test]
    async fn accepting_request_to_oneself_writes_nothing() {
        let (memory, flaky) = FlakyStore::over_memory();
        let service = FriendsService::new(flaky.clone());
        let mut batch = WriteBatch::new();
        let looped = FriendRequest {
            id: "r7".to_string(),
            from_user_id: "a".to_string(),
            to_user_id: "a".to_string(),
            create_time: 0,
        };
        FriendDao::stage_request(&mut batch, &looped).unwrap();
        memory.commit(batch).await.unwrap();

        assert!(!service.accept_friend_request("r7").await.unwrap());
        assert_eq!(flaky.commits(), 0);
        assert_eq!(memory.count(collections::FRIENDS).await, 0);
        assert_eq!(memory.count(collections::FRIEND_REQUESTS).await, 1);
    }

    #[tokio::test]
    async fn accepting_twice_fails_the_second_time() {
        let store = Arc::new(MemoryDocumentStore::new());
        let service = seeded(store.clone(), &["a", "b"]).await;
        let r1 = service.send_friend_request("a", "b").await.unwrap();

        assert!(service.accept_friend_request(&r1.id).await.unwrap());
        assert!(!service.accept_friend_request(&r1.id).await.unwrap());
        assert_eq!(store.count(collections::FRIENDS).await, 2);
    }

    #[tokio::test]
    async fn duplicate_requests_still_yield_exactly_two_edges() {
        let store = Arc::new(MemoryDocumentStore::new());
        let service = seeded(store.clone(), &["a", "b"]).await;
        let r1 = service.send_friend_request("a", "b").await.unwrap();
        let r2 = service.send_friend_request("b", "a").await.unwrap();
        let r3 = service.send_friend_request("a", "b").await.unwrap();
        assert_ne!(r1.id, r3.id);

        for r in [&r1, &r2, &r3] {
            assert!(service.accept_friend_request(&r.id).await.unwrap());
        }
        assert_eq!(store.count(collections::FRIENDS).await, 2);
        assert_eq!(store.count(collections::FRIEND_REQUESTS).await, 0);
    }

    #[tokio::test]
    async fn failed_commit_leaves_request_pending() {
        let (memory, flaky) = FlakyStore::over_memory();
        let service = FriendsService::new(flaky.clone());
        let r1 = service.send_friend_request("a", "b").await.unwrap();

        flaky.fail_commits();
        assert!(service.accept_friend_request(&r1.id).await.is_err());
        assert_eq!(memory.count(collections::FRIENDS).await, 0);
        assert_eq!(memory.count(collections::FRIEND_REQUESTS).await, 1);
    }

    #[tokio::test]
    async fn reject_and_unsend_delete_one_request_each() {
        let store = Arc::new(MemoryDocumentStore::new());
        let service = seeded(store.clone(), &["a", "b", "c"]).await;
        let r1 = service.send_friend_request("a", "b").await.unwrap();
        service.send_friend_request("c", "b").await.unwrap();

        assert!(service.remove_friend_request(&r1.id).await.unwrap());
        assert_eq!(store.count(collections::FRIEND_REQUESTS).await, 1);
        assert_eq!(store.count(collections::FRIENDS).await, 0);

        assert!(service.unsend_friend_request("c", "b").await.unwrap());
        assert_eq!(store.count(collections::FRIEND_REQUESTS).await, 0);
        assert_eq!(store.count(collections::FRIENDS).await, 0);

        assert!(!service.unsend_friend_request("c", "b").await.unwrap());
    }

    #[tokio::test]
    async fn unsend_with_duplicates_removes_only_the_oldest() {
        let store = Arc::new(MemoryDocumentStore::new());
        let service = seeded(store.clone(), &["a", "b"]).await;
        let first = service.send_friend_request("a", "b").await.unwrap();
        let second = service.send_friend_request("a", "b").await.unwrap();

        assert!(service.unsend_friend_request("a", "b").await.unwrap());
        assert_eq!(service.fetch_sent_friend_requests("a").await.unwrap(), vec![second]);
        assert!(store.get(collections::FRIEND_REQUESTS, &first.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn remove_with_no_friendship_is_soft_failure() {
        let (_memory, flaky) = FlakyStore::over_memory();
        let service = FriendsService::new(flaky.clone());
        assert!(!service.remove_friend("a", "b").await.unwrap());
        assert_eq!(flaky.commits(), 0);
    }

    #[tokio::test]
    async fn remove_read_failure_deletes_nothing() {
        let (memory, flaky) = FlakyStore::over_memory();
        let service = FriendsService::new(flaky.clone());
        let r1 = service.send_friend_request("a", "b").await.unwrap();
        assert!(service.accept_friend_request(&r1.id).await.unwrap());
        let commits = flaky.commits();

        flaky.fail_reads_on(collections::FRIENDS);
        let err = service.remove_friend("a", "b").await.unwrap_err();
        assert!(format!("{:#}", err).contains("unavailable"));
        assert_eq!(flaky.commits(), commits);
        assert_eq!(memory.count(collections::FRIENDS).await, 2);
    }

    #[tokio::test]
    async fn corrupt_friend_row_does_not_break_reads_on_sqlite() {
        let store = Arc::new(SqliteDocumentStore::connect("sqlite::memory:").await.unwrap());
        let service = seeded(store.clone(), &["a", "b"]).await;
        let r1 = service.send_friend_request("a", "b").await.unwrap();
        assert!(service.accept_friend_request(&r1.id).await.unwrap());

        sqlx::query("INSERT INTO documents (collection, id, data) VALUES ('friends', 'bad', 'oops')")
            .execute(store.pool())
            .await
            .unwrap();

        assert_eq!(
            pairs(&service.fetch_friends("a").await.unwrap()),
            vec![("a".to_string(), "b".to_string())]
        );
        assert!(service.remove_friend("a", "b").await.unwrap());
        assert!(service.fetch_friends("b").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn discovery_excludes_self_friends_and_senders() {
        let store = Arc::new(MemoryDocumentStore::new());
        let service = seeded(store, &["me", "friend", "sender", "invitee", "stranger"]).await;

        let r = service.send_friend_request("friend", "me").await.unwrap();
        assert!(service.accept_friend_request(&r.id).await.unwrap());
        service.send_friend_request("sender", "me").await.unwrap();
        // outgoing requests do not hide the receiver
        service.send_friend_request("me", "invitee").await.unwrap();

        let candidates = service
            .fetch_users_excluding_friends_and_requests("me")
            .await
            .unwrap();
        assert_eq!(uids(&candidates), vec!["invitee", "stranger"]);

        let for_sender = service
            .fetch_users_excluding_friends_and_requests("sender")
            .await
            .unwrap();
        assert_eq!(uids(&for_sender), vec!["friend", "invitee", "me", "stranger"]);
    }

    #[tokio::test]
    async fn discovery_fails_if_any_read_fails() {
        for collection in [
            collections::USERS,
            collections::FRIENDS,
            collections::FRIEND_REQUESTS,
        ] {
            let (memory, flaky) = FlakyStore::over_memory();
            seeded(memory, &["a", "b"]).await;
            let service = FriendsService::new(flaky.clone());
            flaky.fail_reads_on(collection);
            assert!(
                service
                    .fetch_users_excluding_friends_and_requests("a")
                    .await
                    .is_err(),
                "read failure on {} must fail discovery",
                collection
            );
        }
    }

    #[tokio::test]
    async fn relationship_status_tracks_pending_direction() {
        let store = Arc::new(MemoryDocumentStore::new());
        let service = seeded(store, &["a", "b"]).await;
        service.send_friend_request("a", "b").await.unwrap();

        assert_eq!(
            service.relationship_status("a", "b").await.unwrap(),
            RelationshipStatus::RequestSent
        );
        assert_eq!(
            service.relationship_status("b", "a").await.unwrap(),
            RelationshipStatus::RequestReceived
        );
    }

    #[derive(Default)]
    struct RecordingListener {
        events: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl FriendListener for RecordingListener {
        async fn on_friend_added(&self, friends_json: String) {
            let friends: Vec<Friend> = serde_json::from_str(&friends_json).unwrap();
            self.events.lock().await.push(format!("added:{}", friends.len()));
        }

        async fn on_friend_deleted(&self, friends_json: String) {
            let friends: Vec<Friend> = serde_json::from_str(&friends_json).unwrap();
            self.events.lock().await.push(format!("deleted:{}", friends.len()));
        }

        async fn on_friend_request_added(&self, _request_json: String) {
            self.events.lock().await.push("request_added".to_string());
        }

        async fn on_friend_request_deleted(&self, _request_json: String) {
            self.events.lock().await.push("request_deleted".to_string());
        }
    }

    #[tokio::test]
    async fn listener_sees_committed_changes_only() {
        let store = Arc::new(MemoryDocumentStore::new());
        let listener = Arc::new(RecordingListener::default());
        let service = FriendsService::with_listener(store, listener.clone());

        let r1 = service.send_friend_request("a", "b").await.unwrap();
        assert!(!service.accept_friend_request("missing").await.unwrap());
        assert!(service.accept_friend_request(&r1.id).await.unwrap());
        assert!(service.remove_friend("a", "b").await.unwrap());

        assert_eq!(
            *listener.events.lock().await,
            vec!["request_added", "added:2", "request_deleted", "deleted:2"]
        );
    }

    #[tokio::test]
    async fn rejecting_unknown_request_is_silent() {
        let (_memory, flaky) = FlakyStore::over_memory();
        let listener = Arc::new(RecordingListener::default());
        let service = FriendsService::with_listener(flaky.clone(), listener.clone());

        assert!(!service.remove_friend_request("ghost").await.unwrap());
        assert_eq!(flaky.commits(), 0);
        assert!(listener.events.lock().await.is_empty());

        let r1 = service.send_friend_request("a", "b").await.unwrap();
        assert!(service.remove_friend_request(&r1.id).await.unwrap());
        assert_eq!(
            *listener.events.lock().await,
            vec!["request_added", "request_deleted"]
        );
    }
}
