// File: livebot-core/src/services/live_notifications.rs

use std::collections::BTreeMap;
use std::sync::Arc;
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use livebot_common::models::HelixStream;
use livebot_common::traits::api::{ChatSender, HelixApi};
use livebot_common::traits::repository_traits::SubscriptionRepository;

use crate::Error;

/// Payload of a `stream.online` EventSub notification (the fields we use).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamOnlineEvent {
    pub broadcaster_user_id: String,
    pub broadcaster_user_login: String,
}

/// Totals for one fan-out, mostly for logs and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FanoutReport {
    pub chats: usize,
    pub messages_sent: usize,
    pub send_failures: usize,
}

/// Appends ` @user` mentions to `base`, starting a new message whenever the
/// next mention would push the current one past `max_len` characters.
pub fn pack_mentions(base: &str, users: &[String], max_len: usize) -> Vec<String> {
    let mut messages = Vec::new();
    let mut current = base.to_string();
    let mut current_len = current.chars().count();

    for user in users {
        let mention_len = user.chars().count() + 1;
        if current_len + 1 + mention_len > max_len {
            messages.push(std::mem::take(&mut current));
            current = format!("@{}", user);
            current_len = mention_len;
        } else {
            current.push_str(" @");
            current.push_str(user);
            current_len += 1 + mention_len;
        }
    }
    messages.push(current);
    messages
}

/// The announcement line, richer when stream metadata is available.
pub fn live_announcement(login: &str, stream: Option<&HelixStream>) -> String {
    match stream {
        Some(s) if !s.game_name.is_empty() => format!(
            "https://twitch.tv/{} just went live playing {}! \"{}\"",
            login, s.game_name, s.title
        ),
        Some(s) => format!("https://twitch.tv/{} just went live! \"{}\"", login, s.title),
        None => format!("https://twitch.tv/{} just went live!", login),
    }
}

pub struct LiveNotifier {
    subscriptions: Arc<dyn SubscriptionRepository + Send + Sync>,
    helix: Arc<dyn HelixApi + Send + Sync>,
    chat: Arc<dyn ChatSender + Send + Sync>,
    max_message_len: usize,
}

impl LiveNotifier {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository + Send + Sync>,
        helix: Arc<dyn HelixApi + Send + Sync>,
        chat: Arc<dyn ChatSender + Send + Sync>,
        max_message_len: usize,
    ) -> Self {
        Self {
            subscriptions,
            helix,
            chat,
            max_message_len,
        }
    }

    /// Store failures abort the whole fan-out; send failures only affect
    /// the chat they happened in.
    pub async fn on_stream_online(&self, event: &StreamOnlineEvent) -> Result<FanoutReport, Error> {
        let login = event.broadcaster_user_login.as_str();
        let streamer_id: i64 = event.broadcaster_user_id.parse().map_err(|e| {
            Error::Parse(format!("broadcaster_user_id '{}': {}", event.broadcaster_user_id, e))
        })?;
        info!("{} ({}) went live", login, streamer_id);

        // 1) Chats that asked for this streamer
        let chats = self.subscriptions.subscribed_chats(streamer_id).await?;
        if chats.is_empty() {
            info!("No chats are subscribed to {}", login);
            return Ok(FanoutReport::default());
        }

        // 2) Who to ping, per chat. A chat can be notified with nobody to mention.
        let mut audience: BTreeMap<String, Vec<String>> = self
            .subscriptions
            .subscribers_by_streamer(streamer_id)
            .await?
            .into_iter()
            .collect();
        for chat in &chats {
            audience.entry(chat.chat_name.clone()).or_default();
        }

        // 3) Stream metadata is best effort
        let stream = match self.helix.get_stream(login).await {
            Ok(Some(stream)) => Some(stream),
            Ok(None) => {
                warn!("{} went live but Helix reports them offline", login);
                None
            }
            Err(e) => {
                warn!("Could not get stream info for {}: {}", login, e);
                None
            }
        };
        let base = live_announcement(login, stream.as_ref());

        // 4) Send, each chat independently
        let sends = audience.iter().map(|(chat_name, users)| {
            let messages = pack_mentions(&base, users, self.max_message_len);
            async move {
                let mut sent = 0;
                let mut failed = 0;
                for message in messages {
                    match self.chat.send(chat_name, &message).await {
                        Ok(()) => sent += 1,
                        Err(e) => {
                            error!("Could not send live notification to #{}: {}", chat_name, e);
                            failed += 1;
                        }
                    }
                }
                debug!("Notified #{} about {} ({} messages)", chat_name, login, sent);
                (sent, failed)
            }
        });

        let mut report = FanoutReport {
            chats: audience.len(),
            ..Default::default()
        };
        for (sent, failed) in join_all(sends).await {
            report.messages_sent += sent;
            report.send_failures += failed;
        }
        Ok(report)
    }
}
