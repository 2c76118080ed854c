// File: livebot-core/src/services/dispatcher.rs

use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use livebot_common::error::CommandError;

use crate::services::command_context::{BotState, CommandContext};
use crate::services::command_registry::{CommandDefinition, CommandRegistry};
use crate::services::cooldown::{CooldownKey, CooldownTracker};
use crate::services::invocation::{Invocation, RawChatMessage};

/// Per-sender cooldown for custom (per-chat text) commands.
pub const STATIC_COMMAND_COOLDOWN: Duration = Duration::from_secs(1);

/// The only text a user ever sees when a third-party API fails.
pub const API_FAILURE_REPLY: &str = ":( 3rd party API failure.";

/// What `Dispatcher::handle_message` did with a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    NotACommand,
    ParseFailed,
    /// Built-in found, sender's role too low.
    Unauthorized { command: String },
    OnCooldown { command: String },
    Replied { command: String },
    UpstreamFailure { command: String },
    InternalFailure { command: String },
    EmptyReply { command: String },
    StaticReplied { name: String },
    StaticOnCooldown { name: String },
    /// Custom command lookup failed.
    StoreFailure,
    /// Neither a built-in nor a custom command.
    Unknown,
}

/// Owns the registry and cooldowns; one instance serves every chat.
pub struct Dispatcher {
    state: Arc<BotState>,
    registry: Arc<CommandRegistry>,
    cooldowns: CooldownTracker,
}

impl Dispatcher {
    pub fn new(state: Arc<BotState>, registry: CommandRegistry) -> Self {
        debug!("Initializing Dispatcher");
        Self {
            state,
            registry: Arc::new(registry),
            cooldowns: CooldownTracker::new(),
        }
    }

    pub fn state(&self) -> &Arc<BotState> {
        &self.state
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn cooldowns(&self) -> &CooldownTracker {
        &self.cooldowns
    }

    pub async fn handle_message(&self, raw: &RawChatMessage) -> DispatchOutcome {
        // 1) Parse
        let inv = match Invocation::parse(raw, &self.state.config.prefix, &self.state.config.admins) {
            Ok(Some(inv)) => inv,
            Ok(None) => return DispatchOutcome::NotACommand,
            Err(e) => {
                error!("Could not parse message from {} in #{}: {}", raw.user_login, raw.channel_name, e);
                return DispatchOutcome::ParseFailed;
            }
        };

        // 2) Built-in commands
        if let Some(def) = self.registry.resolve(&inv.invocation) {
            return self.run_builtin(def, &inv).await;
        }

        // 3) Custom commands for this chat
        self.run_static(&inv).await
    }

    async fn run_builtin(&self, def: &CommandDefinition, inv: &Invocation) -> DispatchOutcome {
        let command = def.name.clone();

        if !inv.role.satisfies(def.min_role) {
            debug!(
                "{} ({}) lacks role {} for '{}'",
                inv.sender_login, inv.role, def.min_role, def.name
            );
            return DispatchOutcome::Unauthorized { command };
        }

        if !self
            .cooldowns
            .try_acquire(inv.sender_id, CooldownKey::Builtin(def.name.clone()), def.cooldown)
        {
            debug!("'{}' is on cooldown for {}", def.name, inv.sender_login);
            return DispatchOutcome::OnCooldown { command };
        }

        let ctx = CommandContext {
            state: &self.state,
            registry: &self.registry,
        };
        let started = Instant::now();
        let result = def.handler.run(&ctx, inv).await;
        info!(
            "{} ran '{}' in #{} ({:?})",
            inv.sender_login,
            inv.message,
            inv.channel_name,
            started.elapsed()
        );

        match result {
            Err(CommandError::Upstream(api)) => {
                error!("'{}' failed on a third-party API: {}", def.name, api);
                self.reply(inv, API_FAILURE_REPLY).await;
                DispatchOutcome::UpstreamFailure { command }
            }
            Err(CommandError::Internal(e)) => {
                error!("'{}' failed: {}", def.name, e);
                DispatchOutcome::InternalFailure { command }
            }
            Ok(reply) if reply.is_empty() => {
                warn!("'{}' returned an empty reply for '{}'", def.name, inv.message);
                DispatchOutcome::EmptyReply { command }
            }
            Ok(reply) => {
                self.reply(inv, &reply).await;
                DispatchOutcome::Replied { command }
            }
        }
    }

    async fn run_static(&self, inv: &Invocation) -> DispatchOutcome {
        let found = match self
            .state
            .custom_commands
            .get_command(inv.channel_id, &inv.invocation)
            .await
        {
            Ok(found) => found,
            Err(e) => {
                error!("Could not look up custom command '{}' in #{}: {}", inv.invocation, inv.channel_name, e);
                return DispatchOutcome::StoreFailure;
            }
        };

        let Some(cmd) = found else {
            return DispatchOutcome::Unknown;
        };

        let name = inv.invocation.clone();
        if !self
            .cooldowns
            .try_acquire(inv.sender_id, CooldownKey::Static(name.clone()), STATIC_COMMAND_COOLDOWN)
        {
            debug!("Custom command '{}' is on cooldown for {}", name, inv.sender_login);
            return DispatchOutcome::StaticOnCooldown { name };
        }

        debug!("Custom command '{}' in #{}", name, inv.channel_name);
        self.reply(inv, &cmd.reply).await;
        DispatchOutcome::StaticReplied { name }
    }

    async fn reply(&self, inv: &Invocation, text: &str) {
        let message = format!("@{}, {}", inv.sender_login, text);
        if let Err(e) = self.state.chat.send(&inv.channel_name, &message).await {
            error!("Could not send reply to #{}: {}", inv.channel_name, e);
        }
    }
}
