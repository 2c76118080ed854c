// File: livebot-core/src/platforms/twitch/requests/follow.rs

use serde::Deserialize;

use crate::platforms::twitch::client::TwitchHelixClient;
use crate::Error;

/// Response from `GET /helix/channels/followers`. Only `total` is read; the
/// follower list itself needs moderator scopes and is usually empty for us.
#[derive(Debug, Deserialize)]
pub struct ChannelFollowersResponse {
    pub total: u64,
}

impl TwitchHelixClient {
    pub async fn fetch_follower_count(&self, broadcaster_id: i64) -> Result<u64, Error> {
        let resp: ChannelFollowersResponse = self
            .get_json(&format!("/channels/followers?broadcaster_id={}", broadcaster_id))
            .await?;
        Ok(resp.total)
    }
}
