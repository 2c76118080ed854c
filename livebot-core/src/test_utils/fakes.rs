// File: livebot-core/src/test_utils/fakes.rs
//
// In-memory stand-ins for every collaborator seam. Shared between unit tests
// and the integration tests under `tests/`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU16, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use async_trait::async_trait;
use dashmap::DashMap;

use livebot_common::error::{ApiError, CommandError};
use livebot_common::models::helix::EventSubCondition;
use livebot_common::models::{
    BanStatus, Chat, CustomCommand, EventSubSubscription, HelixChannel, HelixStream, HelixUser,
    SevenTvEmote, Subscriber, Subscription,
};
use livebot_common::traits::api::{BanLookupApi, ChatSender, EmoteApi, EventSubApi, HelixApi};
use livebot_common::traits::repository_traits::{
    ChatRepository, CustomCommandRepository, SubscriptionRepository,
};

use crate::config::{BotConfig, EventSubConfig, IdentityConfig, DEFAULT_MAX_MESSAGE_LENGTH};
use crate::services::command_context::{BotState, CommandContext, CommandHandler};
use crate::services::invocation::Invocation;
use crate::Error;

fn store_down() -> Error {
    Error::Platform("in-memory store is marked as failing".into())
}

// --------------------------------------------------------------------------------
// Repositories
// --------------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryChatRepository {
    pub chats: DashMap<i64, Chat>,
}

impl InMemoryChatRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chat(self, chat_id: i64, chat_name: &str) -> Self {
        self.chats.insert(
            chat_id,
            Chat {
                chat_id,
                chat_name: chat_name.to_string(),
            },
        );
        self
    }
}

#[async_trait]
impl ChatRepository for InMemoryChatRepository {
    async fn list_chats(&self) -> Result<Vec<Chat>, Error> {
        let mut all: Vec<Chat> = self.chats.iter().map(|c| c.value().clone()).collect();
        all.sort_by(|a, b| a.chat_name.cmp(&b.chat_name));
        Ok(all)
    }

    async fn get_chat_by_name(&self, chat_name: &str) -> Result<Option<Chat>, Error> {
        Ok(self
            .chats
            .iter()
            .find(|c| c.chat_name == chat_name)
            .map(|c| c.value().clone()))
    }

    async fn insert_chat(&self, chat: &Chat) -> Result<(), Error> {
        self.chats.insert(chat.chat_id, chat.clone());
        Ok(())
    }

    async fn delete_chat(&self, chat_id: i64) -> Result<(), Error> {
        self.chats.remove(&chat_id);
        Ok(())
    }

    async fn ping(&self) -> Result<(), Error> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryCustomCommandRepository {
    pub commands: DashMap<(i64, String), CustomCommand>,
    failing: AtomicBool,
}

impl InMemoryCustomCommandRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_command(self, chat_id: i64, name: &str, reply: &str) -> Self {
        self.commands.insert(
            (chat_id, name.to_string()),
            CustomCommand {
                chat_id,
                name: name.to_string(),
                reply: reply.to_string(),
            },
        );
        self
    }

    /// Makes every call fail until switched back.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), Error> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(store_down());
        }
        Ok(())
    }
}

#[async_trait]
impl CustomCommandRepository for InMemoryCustomCommandRepository {
    async fn get_command(&self, chat_id: i64, name: &str) -> Result<Option<CustomCommand>, Error> {
        self.check()?;
        Ok(self
            .commands
            .get(&(chat_id, name.to_string()))
            .map(|c| c.value().clone()))
    }

    async fn create_command(&self, cmd: &CustomCommand) -> Result<(), Error> {
        self.check()?;
        self.commands
            .insert((cmd.chat_id, cmd.name.clone()), cmd.clone());
        Ok(())
    }

    async fn update_command(&self, chat_id: i64, name: &str, reply: &str) -> Result<(), Error> {
        self.check()?;
        if let Some(mut cmd) = self.commands.get_mut(&(chat_id, name.to_string())) {
            cmd.reply = reply.to_string();
        }
        Ok(())
    }

    async fn delete_command(&self, chat_id: i64, name: &str) -> Result<(), Error> {
        self.check()?;
        self.commands.remove(&(chat_id, name.to_string()));
        Ok(())
    }
}

/// Subscriptions need chat names, so this fake reads them from a chat repo.
pub struct InMemorySubscriptionRepository {
    chats: Arc<InMemoryChatRepository>,
    pub subscriptions: DashMap<i64, Subscription>,
    pub subscribers: DashMap<(i64, String), Subscriber>,
    next_id: AtomicI64,
}

impl InMemorySubscriptionRepository {
    pub fn new(chats: Arc<InMemoryChatRepository>) -> Self {
        Self {
            chats,
            subscriptions: DashMap::new(),
            subscribers: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    fn find(&self, pred: impl Fn(&Subscription) -> bool) -> Option<Subscription> {
        self.subscriptions
            .iter()
            .find(|s| pred(s.value()))
            .map(|s| s.value().clone())
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn subscribed_chats(&self, streamer_id: i64) -> Result<Vec<Chat>, Error> {
        let mut chats: Vec<Chat> = self
            .subscriptions
            .iter()
            .filter(|s| s.streamer_id == streamer_id)
            .filter_map(|s| self.chats.chats.get(&s.chat_id).map(|c| c.value().clone()))
            .collect();
        chats.sort_by(|a, b| a.chat_name.cmp(&b.chat_name));
        Ok(chats)
    }

    async fn subscribers_by_streamer(&self, streamer_id: i64) -> Result<HashMap<String, Vec<String>>, Error> {
        let mut out: HashMap<String, Vec<String>> = HashMap::new();
        for sub in self.subscribers.iter() {
            let Some(subscription) = self.subscriptions.get(&sub.subscription_id) else {
                continue;
            };
            if subscription.streamer_id != streamer_id {
                continue;
            }
            let Some(chat) = self.chats.chats.get(&sub.chat_id) else {
                continue;
            };
            out.entry(chat.chat_name.clone())
                .or_default()
                .push(sub.username.clone());
        }
        for users in out.values_mut() {
            users.sort();
        }
        Ok(out)
    }

    async fn get_subscription(&self, chat_id: i64, streamer_id: i64) -> Result<Option<Subscription>, Error> {
        Ok(self.find(|s| s.chat_id == chat_id && s.streamer_id == streamer_id))
    }

    async fn get_subscription_by_login(&self, chat_id: i64, streamer_login: &str) -> Result<Option<Subscription>, Error> {
        Ok(self.find(|s| s.chat_id == chat_id && s.streamer_login == streamer_login))
    }

    async fn create_subscription(&self, chat_id: i64, streamer_id: i64, streamer_login: &str) -> Result<Subscription, Error> {
        if let Some(existing) = self.find(|s| s.chat_id == chat_id && s.streamer_id == streamer_id) {
            return Ok(existing);
        }
        let subscription = Subscription {
            subscription_id: self.next_id.fetch_add(1, Ordering::SeqCst),
            chat_id,
            streamer_id,
            streamer_login: streamer_login.to_string(),
        };
        self.subscriptions
            .insert(subscription.subscription_id, subscription.clone());
        Ok(subscription)
    }

    async fn delete_subscription(&self, chat_id: i64, streamer_id: i64) -> Result<(), Error> {
        if let Some(sub) = self.find(|s| s.chat_id == chat_id && s.streamer_id == streamer_id) {
            self.subscriptions.remove(&sub.subscription_id);
            self.subscribers
                .retain(|(sub_id, _), _| *sub_id != sub.subscription_id);
        }
        Ok(())
    }

    async fn is_streamer_subscribed(&self, streamer_id: i64) -> Result<bool, Error> {
        Ok(self.subscriptions.iter().any(|s| s.streamer_id == streamer_id))
    }

    async fn subscribed_streamer_ids(&self) -> Result<Vec<i64>, Error> {
        let mut ids: Vec<i64> = self.subscriptions.iter().map(|s| s.streamer_id).collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }

    async fn is_user_subscribed(&self, subscription_id: i64, username: &str) -> Result<bool, Error> {
        Ok(self
            .subscribers
            .contains_key(&(subscription_id, username.to_string())))
    }

    async fn add_subscriber(&self, subscription: &Subscription, username: &str) -> Result<(), Error> {
        self.subscribers.insert(
            (subscription.subscription_id, username.to_string()),
            Subscriber {
                chat_id: subscription.chat_id,
                subscription_id: subscription.subscription_id,
                username: username.to_string(),
            },
        );
        Ok(())
    }

    async fn delete_subscriber(&self, subscription_id: i64, username: &str) -> Result<(), Error> {
        self.subscribers
            .remove(&(subscription_id, username.to_string()));
        Ok(())
    }
}

// --------------------------------------------------------------------------------
// Third-party APIs
// --------------------------------------------------------------------------------

/// Helix backed by maps. `fail_with(status)` turns every call into an
/// `Error::Api` carrying that status.
#[derive(Default)]
pub struct FakeHelixApi {
    pub users: DashMap<String, HelixUser>,
    pub streams: DashMap<String, HelixStream>,
    pub channels: DashMap<i64, HelixChannel>,
    pub followers: DashMap<i64, u64>,
    failure_status: AtomicU16,
    pub calls: AtomicUsize,
}

impl FakeHelixApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, login: &str, id: i64) -> Self {
        self.users.insert(
            login.to_string(),
            HelixUser {
                id: id.to_string(),
                login: login.to_string(),
                display_name: login.to_string(),
            },
        );
        self
    }

    pub fn with_stream(self, stream: HelixStream) -> Self {
        self.streams.insert(stream.user_login.clone(), stream);
        self
    }

    pub fn with_channel(self, channel: HelixChannel) -> Self {
        if let Ok(id) = channel.broadcaster_id.parse::<i64>() {
            self.channels.insert(id, channel);
        }
        self
    }

    pub fn with_followers(self, broadcaster_id: i64, total: u64) -> Self {
        self.followers.insert(broadcaster_id, total);
        self
    }

    pub fn fail_with(&self, status: u16) {
        self.failure_status.store(status, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn check(&self, path: &str) -> Result<(), Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.failure_status.load(Ordering::SeqCst) {
            0 => Ok(()),
            status => Err(Error::Api(ApiError::status(format!("fake-helix{}", path), status))),
        }
    }
}

#[async_trait]
impl HelixApi for FakeHelixApi {
    async fn get_stream(&self, login: &str) -> Result<Option<HelixStream>, Error> {
        self.check("/streams")?;
        Ok(self.streams.get(login).map(|s| s.value().clone()))
    }

    async fn login_to_id(&self, login: &str) -> Result<Option<i64>, Error> {
        self.check("/users")?;
        match self.users.get(&login.to_lowercase()) {
            Some(user) => Ok(Some(user.id.parse()?)),
            None => Ok(None),
        }
    }

    async fn get_channel(&self, broadcaster_id: i64) -> Result<Option<HelixChannel>, Error> {
        self.check("/channels")?;
        Ok(self.channels.get(&broadcaster_id).map(|c| c.value().clone()))
    }

    async fn get_follower_count(&self, broadcaster_id: i64) -> Result<u64, Error> {
        self.check("/channels/followers")?;
        Ok(self.followers.get(&broadcaster_id).map(|f| *f).unwrap_or(0))
    }
}

/// Tracks which broadcasters have an active `stream.online` subscription.
#[derive(Default)]
pub struct FakeEventSubApi {
    pub active: DashMap<i64, String>,
    pub subscribe_calls: AtomicUsize,
    pub unsubscribe_calls: AtomicUsize,
}

impl FakeEventSubApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_active(self, broadcaster_id: i64) -> Self {
        self.active
            .insert(broadcaster_id, format!("sub-{}", broadcaster_id));
        self
    }

    pub fn is_active(&self, broadcaster_id: i64) -> bool {
        self.active.contains_key(&broadcaster_id)
    }
}

#[async_trait]
impl EventSubApi for FakeEventSubApi {
    async fn subscribe_stream_online(&self, broadcaster_id: i64) -> Result<(), Error> {
        self.subscribe_calls.fetch_add(1, Ordering::SeqCst);
        self.active
            .entry(broadcaster_id)
            .or_insert_with(|| format!("sub-{}", broadcaster_id));
        Ok(())
    }

    async fn unsubscribe_stream_online(&self, broadcaster_id: i64) -> Result<(), Error> {
        self.unsubscribe_calls.fetch_add(1, Ordering::SeqCst);
        self.active.remove(&broadcaster_id);
        Ok(())
    }

    async fn list_stream_online_subscriptions(&self) -> Result<Vec<EventSubSubscription>, Error> {
        let mut subs: Vec<EventSubSubscription> = self
            .active
            .iter()
            .map(|e| EventSubSubscription {
                id: e.value().clone(),
                status: "enabled".to_string(),
                kind: "stream.online".to_string(),
                condition: EventSubCondition {
                    broadcaster_user_id: Some(e.key().to_string()),
                },
            })
            .collect();
        subs.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(subs)
    }
}

#[derive(Default)]
pub struct FakeBanLookup {
    pub users: DashMap<String, BanStatus>,
}

impl FakeBanLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, login: &str, banned: bool, reason: Option<&str>) -> Self {
        self.users.insert(
            login.to_string(),
            BanStatus {
                display_name: login.to_string(),
                banned,
                ban_reason: reason.map(str::to_string),
            },
        );
        self
    }
}

#[async_trait]
impl BanLookupApi for FakeBanLookup {
    async fn get_ban_status(&self, login: &str) -> Result<Option<BanStatus>, Error> {
        Ok(self.users.get(&login.to_lowercase()).map(|u| u.value().clone()))
    }
}

/// 7TV profiles keyed by Twitch user id. Unknown ids have no profile.
#[derive(Default)]
pub struct FakeEmoteApi {
    pub profiles: DashMap<i64, Vec<SevenTvEmote>>,
    failure_status: AtomicU16,
    requested: Mutex<Vec<i64>>,
}

impl FakeEmoteApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// `emotes` are `(name, unix millis added)`.
    pub fn with_profile(self, twitch_user_id: i64, emotes: &[(&str, i64)]) -> Self {
        self.profiles.insert(
            twitch_user_id,
            emotes
                .iter()
                .map(|(name, timestamp)| SevenTvEmote {
                    name: name.to_string(),
                    timestamp: *timestamp,
                })
                .collect(),
        );
        self
    }

    pub fn fail_with(&self, status: u16) {
        self.failure_status.store(status, Ordering::SeqCst);
    }

    pub fn requested(&self) -> Vec<i64> {
        self.requested.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl EmoteApi for FakeEmoteApi {
    async fn get_channel_emotes(&self, twitch_user_id: i64) -> Result<Option<Vec<SevenTvEmote>>, Error> {
        self.requested
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(twitch_user_id);
        match self.failure_status.load(Ordering::SeqCst) {
            0 => Ok(self.profiles.get(&twitch_user_id).map(|p| p.value().clone())),
            status => Err(Error::Api(ApiError::status(
                format!("fake-7tv/users/twitch/{}", twitch_user_id),
                status,
            ))),
        }
    }
}

// --------------------------------------------------------------------------------
// Chat
// --------------------------------------------------------------------------------

/// Records everything instead of talking to IRC.
#[derive(Default)]
pub struct RecordingChatSender {
    sent: Mutex<Vec<(String, String)>>,
    joined: Mutex<Vec<String>>,
    left: Mutex<Vec<String>>,
    fail_sends: AtomicBool,
}

impl RecordingChatSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    /// `(channel, text)` pairs in send order.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn sent_to(&self, channel: &str) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|(c, _)| c == channel)
            .map(|(_, text)| text)
            .collect()
    }

    pub fn joined(&self) -> Vec<String> {
        self.joined.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn left(&self) -> Vec<String> {
        self.left.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl ChatSender for RecordingChatSender {
    async fn join(&self, channel: &str) -> Result<(), Error> {
        self.joined
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(channel.to_string());
        Ok(())
    }

    async fn leave(&self, channel: &str) -> Result<(), Error> {
        self.left
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(channel.to_string());
        Ok(())
    }

    async fn send(&self, channel: &str, text: &str) -> Result<(), Error> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(Error::Platform("chat connection is closed".into()));
        }
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((channel.to_string(), text.to_string()));
        Ok(())
    }
}

// --------------------------------------------------------------------------------
// Handlers
// --------------------------------------------------------------------------------

/// Always answers with the same text and counts its runs.
pub struct StaticReplyHandler {
    reply: String,
    calls: AtomicUsize,
}

impl StaticReplyHandler {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CommandHandler for StaticReplyHandler {
    async fn run(&self, _ctx: &CommandContext<'_>, _inv: &Invocation) -> Result<String, CommandError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }
}

/// Fails every run, either upstream (with an HTTP status) or internally.
pub struct FailingHandler {
    upstream_status: Option<u16>,
    calls: AtomicUsize,
}

impl FailingHandler {
    pub fn upstream(status: u16) -> Self {
        Self {
            upstream_status: Some(status),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn internal() -> Self {
        Self {
            upstream_status: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CommandHandler for FailingHandler {
    async fn run(&self, _ctx: &CommandContext<'_>, _inv: &Invocation) -> Result<String, CommandError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.upstream_status {
            Some(status) => Err(CommandError::Upstream(ApiError::status("fake-upstream", status))),
            None => Err(CommandError::Internal(Error::NotFound("fake internal failure".into()))),
        }
    }
}

// --------------------------------------------------------------------------------
// Wiring
// --------------------------------------------------------------------------------

pub fn test_config() -> BotConfig {
    BotConfig {
        prefix: "#".to_string(),
        admins: vec!["admin".to_string()],
        initial_channel: None,
        database_url: "postgres://unused".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        max_message_length: DEFAULT_MAX_MESSAGE_LENGTH,
        identity: IdentityConfig {
            bot_username: "livebot".to_string(),
            helix_token: "token".to_string(),
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
        },
        eventsub: EventSubConfig::default(),
    }
}

/// Every fake, kept around so tests can inspect them after the fact.
pub struct TestBot {
    pub config: BotConfig,
    pub chats: Arc<InMemoryChatRepository>,
    pub subscriptions: Arc<InMemorySubscriptionRepository>,
    pub custom_commands: Arc<InMemoryCustomCommandRepository>,
    pub helix: Arc<FakeHelixApi>,
    pub eventsub: Arc<FakeEventSubApi>,
    pub bans: Arc<FakeBanLookup>,
    pub emotes: Arc<FakeEmoteApi>,
    pub chat: Arc<RecordingChatSender>,
}

impl Default for TestBot {
    fn default() -> Self {
        Self::new()
    }
}

impl TestBot {
    pub fn new() -> Self {
        Self::with_chats(InMemoryChatRepository::new())
    }

    pub fn with_chats(chats: InMemoryChatRepository) -> Self {
        let chats = Arc::new(chats);
        Self {
            config: test_config(),
            subscriptions: Arc::new(InMemorySubscriptionRepository::new(chats.clone())),
            chats,
            custom_commands: Arc::new(InMemoryCustomCommandRepository::new()),
            helix: Arc::new(FakeHelixApi::new()),
            eventsub: Arc::new(FakeEventSubApi::new()),
            bans: Arc::new(FakeBanLookup::new()),
            emotes: Arc::new(FakeEmoteApi::new()),
            chat: Arc::new(RecordingChatSender::new()),
        }
    }

    pub fn helix(mut self, helix: FakeHelixApi) -> Self {
        self.helix = Arc::new(helix);
        self
    }

    pub fn custom_commands(mut self, store: InMemoryCustomCommandRepository) -> Self {
        self.custom_commands = Arc::new(store);
        self
    }

    pub fn bans(mut self, bans: FakeBanLookup) -> Self {
        self.bans = Arc::new(bans);
        self
    }

    pub fn emotes(mut self, emotes: FakeEmoteApi) -> Self {
        self.emotes = Arc::new(emotes);
        self
    }

    pub fn state(&self) -> Arc<BotState> {
        self.state_with_helix(self.helix.clone())
    }

    /// Same wiring, but with a caller-supplied Helix (e.g. a mockall mock).
    pub fn state_with_helix(&self, helix: Arc<dyn HelixApi + Send + Sync>) -> Arc<BotState> {
        Arc::new(BotState {
            config: self.config.clone(),
            started_at: Instant::now(),
            chats: self.chats.clone(),
            subscriptions: self.subscriptions.clone(),
            custom_commands: self.custom_commands.clone(),
            helix,
            eventsub: self.eventsub.clone(),
            bans: self.bans.clone(),
            emotes: self.emotes.clone(),
            chat: self.chat.clone(),
        })
    }
}
