// File: livebot-core/src/platforms/twitch/client.rs

use std::sync::Arc;
use async_trait::async_trait;
use dashmap::DashMap;
use reqwest::Client as ReqwestClient;
use serde::de::DeserializeOwned;
use tracing::debug;

use livebot_common::models::{HelixChannel, HelixStream};
use livebot_common::traits::api::HelixApi;

use crate::platforms::http::send_json;
use crate::Error;

pub const HELIX_BASE_URL: &str = "https://api.twitch.tv/helix";

/// Helix calls made with the bot's user token. Request helpers live in
/// `requests::*` as extra `impl` blocks.
pub struct TwitchHelixClient {
    http: Arc<ReqwestClient>,
    bearer_token: String,
    client_id: String,
    base_url: String,
    /// login -> user id. Logins are reusable on Twitch but ids never change,
    /// so stale entries only matter after a rename.
    login_ids: DashMap<String, i64>,
}

impl TwitchHelixClient {
    pub fn new(http: Arc<ReqwestClient>, bearer_token: &str, client_id: &str) -> Self {
        Self {
            http,
            bearer_token: bearer_token.trim_start_matches("oauth:").to_string(),
            client_id: client_id.to_string(),
            base_url: HELIX_BASE_URL.to_string(),
            login_ids: DashMap::new(),
        }
    }

    /// Points the client somewhere other than api.twitch.tv (tests, proxies).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn bearer_token(&self) -> &str {
        &self.bearer_token
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn http_client(&self) -> Arc<ReqwestClient> {
        self.http.clone()
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<T, Error> {
        let url = format!("{}{}", self.base_url, path_and_query);
        let req = self
            .http
            .get(&url)
            .header("Client-Id", &self.client_id)
            .header("Authorization", format!("Bearer {}", self.bearer_token));
        send_json(req, &url).await
    }

    pub(crate) fn cached_id(&self, login: &str) -> Option<i64> {
        self.login_ids.get(login).map(|id| *id)
    }

    pub(crate) fn cache_id(&self, login: &str, id: i64) {
        debug!("Caching id {} for {}", id, login);
        self.login_ids.insert(login.to_string(), id);
    }
}

#[async_trait]
impl HelixApi for TwitchHelixClient {
    async fn get_stream(&self, login: &str) -> Result<Option<HelixStream>, Error> {
        self.fetch_stream(login).await
    }

    async fn login_to_id(&self, login: &str) -> Result<Option<i64>, Error> {
        let login = login.to_lowercase();
        if let Some(id) = self.cached_id(&login) {
            return Ok(Some(id));
        }
        let Some(user) = self.fetch_user(&login).await? else {
            return Ok(None);
        };
        let id: i64 = user.id.parse()?;
        self.cache_id(&login, id);
        Ok(Some(id))
    }

    async fn get_channel(&self, broadcaster_id: i64) -> Result<Option<HelixChannel>, Error> {
        self.fetch_channel(broadcaster_id).await
    }

    async fn get_follower_count(&self, broadcaster_id: i64) -> Result<u64, Error> {
        self.fetch_follower_count(broadcaster_id).await
    }
}
