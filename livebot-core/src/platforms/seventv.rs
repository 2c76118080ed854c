// File: livebot-core/src/platforms/seventv.rs

use std::sync::Arc;
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use tracing::debug;

use livebot_common::models::{SevenTvEmote, SevenTvUser};
use livebot_common::traits::api::EmoteApi;

use crate::platforms::http::send_json;
use crate::Error;

pub const SEVENTV_BASE_URL: &str = "https://7tv.io/v3";

pub struct SevenTvClient {
    http: Arc<ReqwestClient>,
    base_url: String,
}

impl SevenTvClient {
    pub fn new(http: Arc<ReqwestClient>) -> Self {
        Self {
            http,
            base_url: SEVENTV_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl EmoteApi for SevenTvClient {
    /// `GET /users/twitch/{id}`; 404 means the user never linked a 7TV profile.
    async fn get_channel_emotes(&self, twitch_user_id: i64) -> Result<Option<Vec<SevenTvEmote>>, Error> {
        let url = format!("{}/users/twitch/{}", self.base_url, twitch_user_id);
        match send_json::<SevenTvUser>(self.http.get(&url), &url).await {
            Ok(user) => Ok(Some(user.into_emotes())),
            Err(Error::Api(api)) if api.is_status(404) => {
                debug!("No 7TV profile for {}", twitch_user_id);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
