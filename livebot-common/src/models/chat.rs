use serde::{Deserialize, Serialize};

/// A joined Twitch chat. `chat_id` is the broadcaster's user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub chat_id: i64,
    pub chat_name: String,
}
