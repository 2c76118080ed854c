// File: livebot-core/src/platforms/twitch_eventsub/client.rs
//
// `stream.online` webhook subscriptions, managed with an app access token.

use std::sync::Arc;
use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use livebot_common::models::EventSubSubscription;
use livebot_common::traits::api::EventSubApi;

use crate::platforms::http::{send_expect_status, send_json};
use crate::platforms::twitch::client::HELIX_BASE_URL;
use crate::Error;

pub const STREAM_ONLINE: &str = "stream.online";

#[derive(Debug, Default, Deserialize)]
struct Pagination {
    #[serde(default)]
    cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubscriptionPage {
    data: Vec<EventSubSubscription>,
    #[serde(default)]
    pagination: Pagination,
}

pub struct TwitchEventSubClient {
    http: Arc<ReqwestClient>,
    client_id: String,
    app_token: String,
    base_url: String,
    callback_url: String,
    secret: String,
}

impl TwitchEventSubClient {
    pub fn new(
        http: Arc<ReqwestClient>,
        client_id: &str,
        app_token: &str,
        callback_url: &str,
        secret: &str,
    ) -> Self {
        Self {
            http,
            client_id: client_id.to_string(),
            app_token: app_token.to_string(),
            base_url: HELIX_BASE_URL.to_string(),
            callback_url: callback_url.to_string(),
            secret: secret.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn authorized(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("Client-Id", &self.client_id)
            .header("Authorization", format!("Bearer {}", self.app_token))
    }

    /// Every `stream.online` subscription regardless of status, following
    /// pagination cursors until Twitch stops returning one.
    async fn fetch_all(&self) -> Result<Vec<EventSubSubscription>, Error> {
        let mut all = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut url = format!("{}/eventsub/subscriptions?type={}", self.base_url, STREAM_ONLINE);
            if let Some(c) = cursor.as_deref() {
                url.push_str("&after=");
                url.push_str(&urlencoding::encode(c));
            }
            let page: SubscriptionPage = send_json(self.authorized(self.http.get(&url)), &url).await?;
            all.extend(page.data);

            match page.pagination.cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => break,
            }
        }

        debug!("Fetched {} {} subscriptions", all.len(), STREAM_ONLINE);
        Ok(all)
    }
}

#[async_trait]
impl EventSubApi for TwitchEventSubClient {
    async fn subscribe_stream_online(&self, broadcaster_id: i64) -> Result<(), Error> {
        let url = format!("{}/eventsub/subscriptions", self.base_url);
        let body = json!({
            "type": STREAM_ONLINE,
            "version": "1",
            "condition": { "broadcaster_user_id": broadcaster_id.to_string() },
            "transport": {
                "method": "webhook",
                "callback": self.callback_url,
                "secret": self.secret,
            }
        });
        debug!("Subscribing to {} for {}", STREAM_ONLINE, broadcaster_id);

        let req = self.authorized(self.http.post(&url)).json(&body);
        let status = send_expect_status(req, &url, &[StatusCode::CONFLICT]).await?;
        if status == StatusCode::CONFLICT {
            debug!("{} subscription for {} already exists", STREAM_ONLINE, broadcaster_id);
        } else {
            info!("Subscribed to {} for {}", STREAM_ONLINE, broadcaster_id);
        }
        Ok(())
    }

    async fn unsubscribe_stream_online(&self, broadcaster_id: i64) -> Result<(), Error> {
        let matching: Vec<EventSubSubscription> = self
            .fetch_all()
            .await?
            .into_iter()
            .filter(|s| s.broadcaster_id() == Some(broadcaster_id))
            .collect();

        if matching.is_empty() {
            debug!("No {} subscription to remove for {}", STREAM_ONLINE, broadcaster_id);
            return Ok(());
        }

        for sub in matching {
            let url = format!(
                "{}/eventsub/subscriptions?id={}",
                self.base_url,
                urlencoding::encode(&sub.id)
            );
            let req = self.authorized(self.http.delete(&url));
            send_expect_status(req, &url, &[StatusCode::NOT_FOUND]).await?;
            info!("Unsubscribed {} ({}) for {}", STREAM_ONLINE, sub.id, broadcaster_id);
        }
        Ok(())
    }

    async fn list_stream_online_subscriptions(&self) -> Result<Vec<EventSubSubscription>, Error> {
        Ok(self
            .fetch_all()
            .await?
            .into_iter()
            .filter(|s| s.status == "enabled")
            .collect())
    }
}
