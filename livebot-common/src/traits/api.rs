// ================================================================
// File: livebot-common/src/traits/api.rs
// ================================================================
//
// Collaborator seams the core talks to. Production implementations live in
// `livebot-core::platforms`; tests use the in-memory fakes from
// `livebot_core::test_utils`.

use async_trait::async_trait;
use crate::error::Error;
use crate::models::{BanStatus, EventSubSubscription, HelixChannel, HelixStream, SevenTvEmote};

/// Outbound chat connection. Best effort: `Ok` means "queued", not "delivered".
#[async_trait]
pub trait ChatSender: Send + Sync {
    async fn join(&self, channel: &str) -> Result<(), Error>;
    async fn leave(&self, channel: &str) -> Result<(), Error>;
    async fn send(&self, channel: &str, text: &str) -> Result<(), Error>;
}

/// Read-only Helix calls used by commands and the live fan-out.
///
/// Non-success statuses and transport failures come back as `Error::Api`.
#[async_trait]
pub trait HelixApi: Send + Sync {
    /// `Ok(None)` when the user is offline.
    async fn get_stream(&self, login: &str) -> Result<Option<HelixStream>, Error>;
    /// Cached login -> numeric user id.
    async fn login_to_id(&self, login: &str) -> Result<Option<i64>, Error>;
    async fn get_channel(&self, broadcaster_id: i64) -> Result<Option<HelixChannel>, Error>;
    async fn get_follower_count(&self, broadcaster_id: i64) -> Result<u64, Error>;
}

/// Management of `stream.online` EventSub webhook subscriptions.
#[async_trait]
pub trait EventSubApi: Send + Sync {
    /// Succeeds when the subscription already exists.
    async fn subscribe_stream_online(&self, broadcaster_id: i64) -> Result<(), Error>;
    /// Succeeds when there is nothing to remove.
    async fn unsubscribe_stream_online(&self, broadcaster_id: i64) -> Result<(), Error>;
    /// Enabled `stream.online` subscriptions.
    async fn list_stream_online_subscriptions(&self) -> Result<Vec<EventSubSubscription>, Error>;
}

/// Ban lookups against a third-party mirror of Twitch user data.
#[async_trait]
pub trait BanLookupApi: Send + Sync {
    /// `Ok(None)` when the user does not exist.
    async fn get_ban_status(&self, login: &str) -> Result<Option<BanStatus>, Error>;
}

/// Third-party emote provider keyed by Twitch user id.
#[async_trait]
pub trait EmoteApi: Send + Sync {
    /// `Ok(None)` when the user has no 7TV profile; an empty list when the
    /// profile has no emotes.
    async fn get_channel_emotes(&self, twitch_user_id: i64) -> Result<Option<Vec<SevenTvEmote>>, Error>;
}
