//! Friend graph models

use serde::{Deserialize, Serialize};

/// One directed friend edge (`userID` has `friendID` as a friend).
/// A friendship is always stored as two edges, one per direction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Friend {
    #[serde(rename = "id")]
    pub id: String,
    #[serde(rename = "userID")]
    pub user_id: String,
    #[serde(rename = "friendID")]
    pub friend_id: String,
    /// Creation time in milliseconds
    #[serde(rename = "createTime")]
    pub create_time: i64,
}

/// A pending, one-directional friend proposal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FriendRequest {
    #[serde(rename = "id")]
    pub id: String,
    #[serde(rename = "fromUserID")]
    pub from_user_id: String,
    #[serde(rename = "toUserID")]
    pub to_user_id: String,
    /// Creation time in milliseconds
    #[serde(rename = "createTime")]
    pub create_time: i64,
}

impl FriendRequest {
    /// Both endpoints are present and name different users.
    pub fn is_well_formed(&self) -> bool {
        !self.from_user_id.is_empty()
            && !self.to_user_id.is_empty()
            && self.from_user_id != self.to_user_id
    }
}
