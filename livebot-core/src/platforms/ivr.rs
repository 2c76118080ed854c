// File: livebot-core/src/platforms/ivr.rs
//
// api.ivr.fi mirrors public Twitch user data, including ban state that
// Helix only exposes to the channel's own moderators.

use std::sync::Arc;
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;

use livebot_common::models::BanStatus;
use livebot_common::traits::api::BanLookupApi;

use crate::platforms::http::send_json;
use crate::Error;

pub const IVR_BASE_URL: &str = "https://api.ivr.fi/v2";

pub struct IvrClient {
    http: Arc<ReqwestClient>,
    base_url: String,
}

impl IvrClient {
    pub fn new(http: Arc<ReqwestClient>) -> Self {
        Self {
            http,
            base_url: IVR_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl BanLookupApi for IvrClient {
    /// `GET /twitch/user?login=` answers with an array, empty for unknown logins.
    async fn get_ban_status(&self, login: &str) -> Result<Option<BanStatus>, Error> {
        let url = format!(
            "{}/twitch/user?login={}",
            self.base_url,
            urlencoding::encode(&login.to_lowercase())
        );
        let users: Vec<BanStatus> = send_json(self.http.get(&url), &url).await?;
        Ok(users.into_iter().next())
    }
}
