// File: livebot-core/src/platforms/twitch/requests/channel.rs

use livebot_common::models::HelixChannel;

use super::HelixData;
use crate::platforms::twitch::client::TwitchHelixClient;
use crate::Error;

impl TwitchHelixClient {
    /// `GET /channels?broadcaster_id=`
    pub async fn fetch_channel(&self, broadcaster_id: i64) -> Result<Option<HelixChannel>, Error> {
        let resp: HelixData<HelixChannel> = self
            .get_json(&format!("/channels?broadcaster_id={}", broadcaster_id))
            .await?;
        Ok(resp.data.into_iter().next())
    }
}
