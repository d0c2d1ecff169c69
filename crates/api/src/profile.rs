// ABOUTME: Owner profile model returned by the user lookup endpoint.
// ABOUTME: Used to decorate feed entries for display; the feed engine never depends on it.

use serde::{Deserialize, Serialize};

/// Public profile of a video's owner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OwnerProfile {
    #[serde(rename(deserialize = "_id"))]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, rename(deserialize = "fullName"))]
    pub full_name: String,
    #[serde(default, rename(deserialize = "avatar"))]
    pub avatar_url: Option<String>,
}

impl OwnerProfile {
    /// Name to show next to a video: full name, falling back to the username.
    pub fn display_name(&self) -> &str {
        if self.full_name.trim().is_empty() {
            &self.username
        } else {
            &self.full_name
        }
    }
}
