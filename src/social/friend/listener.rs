//! Friend change listener

use async_trait::async_trait;

/// Callbacks fired after a friend-graph write has been committed.
/// Payloads are JSON strings.
#[async_trait]
pub trait FriendListener: Send + Sync {
    /// New friend edges (JSON array of `Friend`)
    async fn on_friend_added(&self, friends_json: String);

    /// Removed friend edges (JSON array of `Friend`)
    async fn on_friend_deleted(&self, friends_json: String);

    /// A request was sent (JSON `FriendRequest`)
    async fn on_friend_request_added(&self, request_json: String);

    /// A request was accepted, rejected or unsent (JSON `FriendRequest`)
    async fn on_friend_request_deleted(&self, request_json: String);
}

/// No-op listener
pub struct EmptyFriendListener;

#[async_trait]
impl FriendListener for EmptyFriendListener {
    async fn on_friend_added(&self, _friends_json: String) {}

    async fn on_friend_deleted(&self, _friends_json: String) {}

    async fn on_friend_request_added(&self, _request_json: String) {}

    async fn on_friend_request_deleted(&self, _request_json: String) {}
}
