use serde::{Deserialize, Serialize};

/// A chat wants to be told when `streamer_login` goes live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub subscription_id: i64,
    pub chat_id: i64,
    pub streamer_id: i64,
    pub streamer_login: String,
}

/// A user inside `chat_id` who wants to be @-mentioned in the live notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
    pub chat_id: i64,
    pub subscription_id: i64,
    pub username: String,
}
