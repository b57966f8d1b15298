//! Friend relationship module
//!
//! Friend requests and symmetric friend edges kept in the document store.

pub mod dao;
pub mod listener;
pub mod models;
pub mod service;
pub mod types;

pub use dao::FriendDao;
pub use listener::{EmptyFriendListener, FriendListener};
pub use models::{Friend, FriendRequest};
pub use service::FriendsService;
pub use types::RelationshipStatus;
