pub mod social;

// Re-export the types most callers need
pub use social::{
    client::{ClientConfig, StoreConfig, ThriveClient},
    friend::{Friend, FriendListener, FriendRequest, FriendsService, RelationshipStatus},
    store::{DocumentStore, StoreError},
    user::User,
};
