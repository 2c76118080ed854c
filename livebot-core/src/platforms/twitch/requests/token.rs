// File: livebot-core/src/platforms/twitch/requests/token.rs
//
// OAuth helpers used once at startup: validating the bot's user token and
// fetching an app access token for EventSub.

use reqwest::Client as ReqwestClient;
use serde::Deserialize;
use tracing::{debug, info};

use crate::platforms::http::send_json;
use crate::platforms::twitch::client::TwitchHelixClient;
use crate::Error;

pub const OAUTH_BASE_URL: &str = "https://id.twitch.tv/oauth2";

/// Response from `GET /oauth2/validate`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenValidation {
    pub client_id: String,
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
    pub expires_in: i64,
}

/// Response from the client-credentials grant.
#[derive(Debug, Clone, Deserialize)]
pub struct AppAccessToken {
    pub access_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

impl TwitchHelixClient {
    /// Validates this client's bearer token against `oauth_base`. A revoked or
    /// expired token comes back as an `Error::Api` with status 401.
    pub async fn validate_token(&self, oauth_base: &str) -> Result<TokenValidation, Error> {
        let url = format!("{}/validate", oauth_base.trim_end_matches('/'));
        let req = self
            .http_client()
            .get(&url)
            .header("Authorization", format!("OAuth {}", self.bearer_token()));
        let validation: TokenValidation = send_json(req, &url).await?;

        if validation.client_id != self.client_id() {
            return Err(Error::Config(format!(
                "helix_token was issued for client id {}, not the configured {}",
                validation.client_id,
                self.client_id()
            )));
        }
        info!(
            "Token for {} is valid, expires in {}s",
            validation.login.as_deref().unwrap_or("<app>"),
            validation.expires_in
        );
        Ok(validation)
    }
}

pub async fn fetch_app_access_token(
    http: &ReqwestClient,
    oauth_base: &str,
    client_id: &str,
    client_secret: &str,
) -> Result<AppAccessToken, Error> {
    let url = format!("{}/token", oauth_base.trim_end_matches('/'));
    let full = format!(
        "{}?client_id={}&client_secret={}&grant_type=client_credentials",
        url,
        urlencoding::encode(client_id),
        urlencoding::encode(client_secret)
    );
    // `url` (without the secret) is what ends up in errors and logs.
    let token: AppAccessToken = send_json(http.post(&full), &url).await?;
    debug!("Fetched app access token, expires in {}s", token.expires_in);
    Ok(token)
}
