//! Relationship query results

use serde::{Deserialize, Serialize};

/// How `other` relates to the viewing user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationshipStatus {
    /// The viewer holds a friend edge to `other`.
    Friends,
    /// The viewer has a pending request to `other`.
    RequestSent,
    /// `other` has a pending request to the viewer.
    RequestReceived,
    None,
}
