use std::collections::HashMap;
use async_trait::async_trait;
use crate::error::Error;
use crate::models::{Chat, CustomCommand, Subscription};

#[async_trait]
pub trait ChatRepository: Send + Sync {
    async fn list_chats(&self) -> Result<Vec<Chat>, Error>;
    async fn get_chat_by_name(&self, chat_name: &str) -> Result<Option<Chat>, Error>;
    async fn insert_chat(&self, chat: &Chat) -> Result<(), Error>;
    /// Cascades to the chat's subscriptions, subscribers and custom commands.
    async fn delete_chat(&self, chat_id: i64) -> Result<(), Error>;
    /// Cheap round trip to the backing store.
    async fn ping(&self) -> Result<(), Error>;
}

#[async_trait]
pub trait CustomCommandRepository: Send + Sync {
    async fn get_command(&self, chat_id: i64, name: &str) -> Result<Option<CustomCommand>, Error>;
    async fn create_command(&self, cmd: &CustomCommand) -> Result<(), Error>;
    async fn update_command(&self, chat_id: i64, name: &str, reply: &str) -> Result<(), Error>;
    async fn delete_command(&self, chat_id: i64, name: &str) -> Result<(), Error>;
}

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Chats with a subscription to `streamer_id`.
    async fn subscribed_chats(&self, streamer_id: i64) -> Result<Vec<Chat>, Error>;

    /// `chat name -> subscriber usernames` for every subscription to `streamer_id`.
    /// Chats with a subscription but no subscribers are absent.
    async fn subscribers_by_streamer(&self, streamer_id: i64) -> Result<HashMap<String, Vec<String>>, Error>;

    async fn get_subscription(&self, chat_id: i64, streamer_id: i64) -> Result<Option<Subscription>, Error>;
    async fn get_subscription_by_login(&self, chat_id: i64, streamer_login: &str) -> Result<Option<Subscription>, Error>;
    async fn create_subscription(&self, chat_id: i64, streamer_id: i64, streamer_login: &str) -> Result<Subscription, Error>;
    /// Cascades to the subscription's subscribers.
    async fn delete_subscription(&self, chat_id: i64, streamer_id: i64) -> Result<(), Error>;

    /// Whether any chat still has a subscription to `streamer_id`.
    async fn is_streamer_subscribed(&self, streamer_id: i64) -> Result<bool, Error>;
    /// Distinct streamer ids across all subscriptions.
    async fn subscribed_streamer_ids(&self) -> Result<Vec<i64>, Error>;

    async fn is_user_subscribed(&self, subscription_id: i64, username: &str) -> Result<bool, Error>;
    /// The subscriber row takes its chat from the subscription itself.
    async fn add_subscriber(&self, subscription: &Subscription, username: &str) -> Result<(), Error>;
    async fn delete_subscriber(&self, subscription_id: i64, username: &str) -> Result<(), Error>;
}
