// File: livebot-common/src/models/helix.rs
//
// Subsets of the Helix response objects the bot actually reads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Single record from "Get Streams". Only present while the channel is live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelixStream {
    pub user_id: String,
    pub user_login: String,
    pub user_name: String,
    #[serde(default)]
    pub game_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub viewer_count: u64,
    pub started_at: DateTime<Utc>,
    /// Contains `{width}x{height}` placeholders.
    #[serde(default)]
    pub thumbnail_url: String,
}

/// Single record from "Get Users".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelixUser {
    pub id: String,
    pub login: String,
    pub display_name: String,
}

/// Single record from "Get Channel Information".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelixChannel {
    pub broadcaster_id: String,
    pub broadcaster_login: String,
    pub broadcaster_name: String,
    #[serde(default)]
    pub game_name: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSubCondition {
    #[serde(default)]
    pub broadcaster_user_id: Option<String>,
}

/// An EventSub subscription as listed by `GET /eventsub/subscriptions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSubSubscription {
    pub id: String,
    pub status: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub condition: EventSubCondition,
}

impl EventSubSubscription {
    /// Broadcaster id from the condition, if it is a numeric id.
    pub fn broadcaster_id(&self) -> Option<i64> {
        self.condition
            .broadcaster_user_id
            .as_deref()
            .and_then(|s| s.parse().ok())
    }
}
