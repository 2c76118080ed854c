//! src/platforms/twitch_irc/runtime.rs

use std::sync::Arc;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use livebot_common::traits::api::ChatSender;

use super::client::TwitchIrcClient;
use crate::services::invocation::RawChatMessage;
use crate::Error;

/// Capacity of the chat line queue between the IRC reader and the dispatcher.
const CHAT_QUEUE_CAPACITY: usize = 1000;

/// The chat connection as the rest of the bot sees it: a [`ChatSender`] plus
/// a stream of [`RawChatMessage`]s.
pub struct TwitchIrcPlatform {
    client: TwitchIrcClient,
    read_loop_handle: JoinHandle<()>,
}

impl TwitchIrcPlatform {
    pub async fn connect(
        username: &str,
        oauth_token: &str,
    ) -> Result<(Arc<Self>, mpsc::Receiver<RawChatMessage>), Error> {
        if username.is_empty() {
            return Err(Error::Platform("Twitch IRC username is empty".into()));
        }

        let mut client = TwitchIrcClient::connect(username, oauth_token).await?;
        let mut irc_incoming = client
            .incoming
            .take()
            .ok_or_else(|| Error::Platform("No incoming channel in TwitchIrcClient".into()))?;

        let (tx_evt, rx_evt) = mpsc::channel::<RawChatMessage>(CHAT_QUEUE_CAPACITY);
        let read_loop_handle = tokio::spawn(async move {
            while let Some(line) = irc_incoming.recv().await {
                match line.to_chat_message() {
                    Some(msg) => {
                        if tx_evt.send(msg).await.is_err() {
                            break;
                        }
                    }
                    None => debug!("(TwitchIrcPlatform) ignoring {}", line.command),
                }
            }
            info!("(TwitchIrcPlatform) read loop ended.");
        });

        Ok((Arc::new(Self { client, read_loop_handle }), rx_evt))
    }

    pub fn disconnect(&self) {
        self.client.shutdown();
        self.read_loop_handle.abort();
    }
}

#[async_trait]
impl ChatSender for TwitchIrcPlatform {
    async fn join(&self, channel: &str) -> Result<(), Error> {
        info!("Joining #{}", channel);
        self.client.join_channel(channel)
    }

    async fn leave(&self, channel: &str) -> Result<(), Error> {
        info!("Leaving #{}", channel);
        self.client.part_channel(channel)
    }

    async fn send(&self, channel: &str, text: &str) -> Result<(), Error> {
        self.client.send_privmsg(channel, text)
    }
}
