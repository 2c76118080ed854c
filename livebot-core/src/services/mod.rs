// File: livebot-core/src/services/mod.rs

pub mod builtin_commands;
pub mod command_context;
pub mod command_registry;
pub mod cooldown;
pub mod dispatcher;
pub mod eventsub_sync;
pub mod invocation;
pub mod live_notifications;

pub use command_context::{BotState, CommandContext, CommandHandler};
pub use command_registry::{CommandDefinition, CommandRegistry};
pub use cooldown::{CooldownKey, CooldownTracker};
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use eventsub_sync::{sync_stream_online_subscriptions, SyncReport};
pub use invocation::{Invocation, RawChatMessage};
pub use live_notifications::{FanoutReport, LiveNotifier, StreamOnlineEvent};
