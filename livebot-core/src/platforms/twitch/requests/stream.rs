// File: livebot-core/src/platforms/twitch/requests/stream.rs

use livebot_common::models::HelixStream;

use super::HelixData;
use crate::platforms::twitch::client::TwitchHelixClient;
use crate::Error;

impl TwitchHelixClient {
    /// `GET /streams?user_login=`. An empty list means the user is offline.
    pub async fn fetch_stream(&self, login: &str) -> Result<Option<HelixStream>, Error> {
        let resp: HelixData<HelixStream> = self
            .get_json(&format!("/streams?user_login={}", urlencoding::encode(login)))
            .await?;
        Ok(resp.data.into_iter().next())
    }
}
