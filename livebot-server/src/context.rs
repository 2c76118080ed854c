//! livebot-server/src/context.rs
//!
//! Everything the running bot needs, built in startup order. Any failure in
//! here aborts startup.

use std::sync::Arc;
use std::time::Instant;
use anyhow::{bail, Context};
use reqwest::Client as ReqwestClient;
use tokio::sync::mpsc;
use tracing::{info, warn};

use livebot_common::models::Chat;
use livebot_common::traits::api::{ChatSender, HelixApi};
use livebot_common::traits::repository_traits::ChatRepository;
use livebot_core::config::BotConfig;
use livebot_core::platforms::ivr::IvrClient;
use livebot_core::platforms::seventv::SevenTvClient;
use livebot_core::platforms::twitch::requests::token::{fetch_app_access_token, OAUTH_BASE_URL};
use livebot_core::platforms::twitch::TwitchHelixClient;
use livebot_core::platforms::twitch_eventsub::TwitchEventSubClient;
use livebot_core::platforms::twitch_irc::TwitchIrcPlatform;
use livebot_core::repositories::postgres::{
    PostgresChatRepository, PostgresCustomCommandRepository, PostgresSubscriptionRepository,
};
use livebot_core::services::builtin_commands::builtin_commands;
use livebot_core::services::{BotState, CommandRegistry, RawChatMessage};
use livebot_core::Database;

use crate::Args;

pub struct ServerContext {
    pub db: Database,
    pub state: Arc<BotState>,
    pub registry: CommandRegistry,
    pub irc: Arc<TwitchIrcPlatform>,
    pub chat_rx: mpsc::Receiver<RawChatMessage>,
}

fn load_config(args: &Args) -> anyhow::Result<BotConfig> {
    let mut config = BotConfig::from_file(&args.config)
        .with_context(|| format!("loading config from {}", args.config))?;

    if let Some(addr) = &args.bind_addr {
        config.bind_addr = addr.clone();
    }
    if let Some(url) = &args.database_url {
        config.database_url = url.clone();
    }
    config.validate()?;

    if config.eventsub.webhook_url.is_empty() {
        bail!("eventsub.webhook_url is required for live notifications");
    }
    Ok(config)
}

impl ServerContext {
    pub async fn new(args: &Args) -> anyhow::Result<Self> {
        let started_at = Instant::now();

        // 1) Config
        let config = load_config(args)?;
        info!(
            "Loaded config: prefix={}, admins={}, bind_addr={}",
            config.prefix,
            config.admins.len(),
            config.bind_addr
        );

        // 2) Database
        let db = Database::new(&config.database_url)
            .await
            .context("connecting to Postgres")?;
        db.migrate().await.context("running migrations")?;

        let chats = Arc::new(PostgresChatRepository::new(db.pool().clone()));
        let subscriptions = Arc::new(PostgresSubscriptionRepository::new(db.pool().clone()));
        let custom_commands = Arc::new(PostgresCustomCommandRepository::new(db.pool().clone()));

        // 3) Twitch credentials
        let identity = &config.identity;
        let http = Arc::new(ReqwestClient::new());
        let helix = Arc::new(TwitchHelixClient::new(http.clone(), &identity.helix_token, &identity.client_id));
        helix
            .validate_token(OAUTH_BASE_URL)
            .await
            .context("validating identity.helix_token")?;

        let app_token = fetch_app_access_token(&http, OAUTH_BASE_URL, &identity.client_id, &identity.client_secret)
            .await
            .context("fetching an app access token")?;
        let eventsub = Arc::new(TwitchEventSubClient::new(
            http.clone(),
            &identity.client_id,
            &app_token.access_token,
            &config.eventsub.webhook_url,
            &config.eventsub.webhook_secret,
        ));

        // 4) Commands
        let registry = CommandRegistry::new(builtin_commands()).context("building the command registry")?;
        info!("Registered {} built-in commands", registry.len());

        // 5) Chat connection and channels
        let (irc, chat_rx) = TwitchIrcPlatform::connect(&identity.bot_username, &identity.helix_token)
            .await
            .context("connecting to Twitch IRC")?;

        let mut joined = chats.list_chats().await?;
        if joined.is_empty() {
            joined.push(seed_initial_chat(&config, helix.as_ref(), chats.as_ref()).await?);
        }
        for chat in &joined {
            if let Err(e) = irc.join(&chat.chat_name).await {
                warn!("Could not join #{}: {}", chat.chat_name, e);
            }
        }
        info!("Joined {} chats", joined.len());

        let state = Arc::new(BotState {
            config,
            started_at,
            chats,
            subscriptions,
            custom_commands,
            helix,
            eventsub,
            bans: Arc::new(IvrClient::new(http.clone())),
            emotes: Arc::new(SevenTvClient::new(http)),
            chat: irc.clone(),
        });

        Ok(Self {
            db,
            state,
            registry,
            irc,
            chat_rx,
        })
    }
}

/// With no chats stored, the configured `initial_channel` becomes the first one.
async fn seed_initial_chat(
    config: &BotConfig,
    helix: &(dyn HelixApi + Send + Sync),
    chats: &(dyn ChatRepository + Send + Sync),
) -> anyhow::Result<Chat> {
    let Some(channel) = config.initial_channel.clone() else {
        bail!("no chats are stored and initial_channel is not set");
    };
    let Some(chat_id) = helix.login_to_id(&channel).await? else {
        bail!("initial_channel {} does not exist", channel);
    };

    let chat = Chat {
        chat_id,
        chat_name: channel,
    };
    chats.insert_chat(&chat).await?;
    info!("Stored initial chat #{} ({})", chat.chat_name, chat.chat_id);
    Ok(chat)
}
