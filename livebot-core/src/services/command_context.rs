// File: livebot-core/src/services/command_context.rs

use std::sync::Arc;
use std::time::Instant;
use async_trait::async_trait;

use livebot_common::error::CommandError;
use livebot_common::traits::api::{BanLookupApi, ChatSender, EmoteApi, EventSubApi, HelixApi};
use livebot_common::traits::repository_traits::{
    ChatRepository, CustomCommandRepository, SubscriptionRepository,
};

use crate::config::BotConfig;
use crate::services::command_registry::CommandRegistry;
use crate::services::invocation::Invocation;

/// Everything a command handler is allowed to touch.
pub struct BotState {
    pub config: BotConfig,
    pub started_at: Instant,
    pub chats: Arc<dyn ChatRepository + Send + Sync>,
    pub subscriptions: Arc<dyn SubscriptionRepository + Send + Sync>,
    pub custom_commands: Arc<dyn CustomCommandRepository + Send + Sync>,
    pub helix: Arc<dyn HelixApi + Send + Sync>,
    pub eventsub: Arc<dyn EventSubApi + Send + Sync>,
    pub bans: Arc<dyn BanLookupApi + Send + Sync>,
    pub emotes: Arc<dyn EmoteApi + Send + Sync>,
    pub chat: Arc<dyn ChatSender + Send + Sync>,
}

/// Context passed to built-in command handlers.
pub struct CommandContext<'a> {
    pub state: &'a BotState,
    /// Read-only; `help` and `cmd` need to see the other commands.
    pub registry: &'a CommandRegistry,
}

impl CommandContext<'_> {
    pub fn prefix(&self) -> &str {
        &self.state.config.prefix
    }
}

/// A built-in command body. Usage problems are returned as `Ok` replies;
/// `Err` is reserved for failures the dispatcher has to classify.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn run(&self, ctx: &CommandContext<'_>, inv: &Invocation) -> Result<String, CommandError>;
}
