//! User profile model

use serde::{Deserialize, Serialize};

/// A user profile as stored in `users`. Missing fields decode as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    #[serde(rename = "uid")]
    pub uid: String,
    #[serde(rename = "name")]
    pub name: String,
    #[serde(rename = "description")]
    pub description: String,
    #[serde(rename = "profileImageURL")]
    pub profile_image_url: String,
    #[serde(rename = "contact")]
    pub contact: String,
    #[serde(rename = "techStack")]
    pub tech_stack: String,
    #[serde(rename = "githubUrl")]
    pub github_url: String,
    #[serde(rename = "linkedinUrl")]
    pub linkedin_url: String,
}

impl User {
    pub fn new(uid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}
