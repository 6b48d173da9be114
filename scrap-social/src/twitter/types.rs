use serde::{Deserialize, Serialize};

/// One status from `1.1/statuses/user_timeline.json`.
///
/// Only the fields the pipeline reads are typed strictly; everything else is
/// optional so schema drift upstream does not break deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tweet {
    pub id: u64,
    pub id_str: String,
    pub text: String,
    /// `"Sat May 01 12:00:00 +0000 2023"`, parsed in [`crate::twitter::extract`].
    pub created_at: String,

    #[serde(default)]
    pub truncated: Option<bool>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub in_reply_to_status_id_str: Option<String>,
    #[serde(default)]
    pub retweet_count: Option<u64>,
    #[serde(default)]
    pub favorite_count: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id_str: String,
    pub screen_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub protected: Option<bool>,
}
