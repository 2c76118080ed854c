// File: livebot-core/src/platforms/twitch_eventsub/mod.rs

pub mod client;
pub mod webhook;

pub use client::TwitchEventSubClient;
pub use webhook::{start_webhook_server, webhook_router, EventSubWebhookState};
