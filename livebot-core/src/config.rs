// File: livebot-core/src/config.rs

use std::path::Path;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Error;

/// Twitch has a 500 character limit; leave room for the channel's own prefixing.
pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 450;

fn default_prefix() -> String {
    "#".to_string()
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_max_message_length() -> usize {
    DEFAULT_MAX_MESSAGE_LENGTH
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityConfig {
    pub bot_username: String,
    pub helix_token: String,
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventSubConfig {
    pub webhook_url: String,
    pub webhook_secret: String,
}

/// Contents of `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Logins with the Admin role everywhere.
    #[serde(default)]
    pub admins: Vec<String>,
    /// Joined (and stored) when the database has no chats yet.
    #[serde(default)]
    pub initial_channel: Option<String>,
    pub database_url: String,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,
    pub identity: IdentityConfig,
    #[serde(default)]
    pub eventsub: EventSubConfig,
}

impl BotConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        debug!("Loading config from {}", path.display());
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, Error> {
        let mut cfg: BotConfig = toml::from_str(raw)?;
        cfg.normalize();
        cfg.validate()?;
        Ok(cfg)
    }

    fn normalize(&mut self) {
        for admin in self.admins.iter_mut() {
            *admin = admin.trim().to_lowercase();
        }
        if let Some(ch) = self.initial_channel.as_mut() {
            *ch = ch.trim().to_lowercase();
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.prefix.is_empty() || self.prefix.chars().any(char::is_whitespace) {
            return Err(Error::Config(format!(
                "prefix must be non-empty and contain no whitespace (got {:?})",
                self.prefix
            )));
        }
        if self.database_url.trim().is_empty() {
            return Err(Error::Config("database_url is required".into()));
        }
        if self.identity.bot_username.trim().is_empty() {
            return Err(Error::Config("identity.bot_username is required".into()));
        }
        if self.identity.helix_token.trim().is_empty() || self.identity.client_id.trim().is_empty() {
            return Err(Error::Config("identity.helix_token and identity.client_id are required".into()));
        }
        if self.max_message_length == 0 {
            return Err(Error::Config("max_message_length must be positive".into()));
        }
        if !self.eventsub.webhook_url.is_empty() {
            let url = url::Url::parse(&self.eventsub.webhook_url)
                .map_err(|e| Error::Config(format!("eventsub.webhook_url: {}", e)))?;
            if url.scheme() != "https" {
                return Err(Error::Config("eventsub.webhook_url must use https".into()));
            }
            let secret_len = self.eventsub.webhook_secret.len();
            if !(10..=100).contains(&secret_len) {
                return Err(Error::Config(format!(
                    "eventsub.webhook_secret must be 10-100 characters (got {})",
                    secret_len
                )));
            }
        }
        Ok(())
    }
}
