// tests/builtin_command_tests.rs
//
// Built-in commands driven through the dispatcher against in-memory fakes.

use std::time::Duration;
use chrono::Utc;

use livebot_common::models::{HelixChannel, HelixStream};
use livebot_core::services::builtin_commands::builtin_commands;
use livebot_core::services::{CommandRegistry, DispatchOutcome, Dispatcher, RawChatMessage};
use livebot_core::test_utils::fakes::{FakeBanLookup, FakeEmoteApi, FakeHelixApi, InMemoryChatRepository, TestBot};

const CHAT_ID: i64 = 1000;
const CHAT: &str = "chat_a";
const FORSEN_ID: i64 = 22484632;

fn raw(text: &str, login: &str, user_id: i64, is_mod: bool) -> RawChatMessage {
    RawChatMessage {
        text: text.to_string(),
        user_id: user_id.to_string(),
        user_login: login.to_string(),
        display_name: login.to_string(),
        is_mod,
        channel_id: CHAT_ID.to_string(),
        channel_name: CHAT.to_string(),
    }
}

fn viewer(text: &str) -> RawChatMessage {
    raw(text, "viewer", 42, false)
}

fn moderator(text: &str) -> RawChatMessage {
    raw(text, "moddy", 7, true)
}

fn admin(text: &str) -> RawChatMessage {
    raw(text, "admin", 1, false)
}

fn broadcaster(text: &str) -> RawChatMessage {
    raw(text, CHAT, CHAT_ID, false)
}

fn forsen_stream() -> HelixStream {
    HelixStream {
        user_id: FORSEN_ID.to_string(),
        user_login: "forsen".into(),
        user_name: "forsen".into(),
        game_name: "Minecraft".into(),
        title: "speedrun".into(),
        viewer_count: 10,
        started_at: Utc::now() - chrono::Duration::minutes(125),
        thumbnail_url: "https://static-cdn.jtvnw.net/previews-ttv/live_user_forsen-{width}x{height}.jpg".into(),
    }
}

fn helix() -> FakeHelixApi {
    FakeHelixApi::new()
        .with_user("forsen", FORSEN_ID)
        .with_user("xqc", 71092938)
        .with_user(CHAT, CHAT_ID)
        .with_stream(forsen_stream())
        .with_followers(FORSEN_ID, 1234)
        .with_channel(HelixChannel {
            broadcaster_id: CHAT_ID.to_string(),
            broadcaster_login: CHAT.into(),
            broadcaster_name: "Chat_A".into(),
            game_name: "Just Chatting".into(),
            title: "hello chat".into(),
        })
}

fn bot() -> TestBot {
    TestBot::with_chats(InMemoryChatRepository::new().with_chat(CHAT_ID, CHAT)).helix(helix())
}

fn dispatcher(bot: &TestBot) -> Dispatcher {
    Dispatcher::new(bot.state(), CommandRegistry::new(builtin_commands()).unwrap())
}

/// Runs one line and returns the reply it produced, if any.
async fn say(bot: &TestBot, d: &Dispatcher, msg: RawChatMessage) -> Option<String> {
    let before = bot.chat.sent().len();
    d.handle_message(&msg).await;
    let sent = bot.chat.sent();
    (sent.len() > before).then(|| sent[sent.len() - 1].1.clone())
}

#[tokio::test]
async fn help_describes_commands_by_name_or_alias() {
    let bot = bot();
    let d = dispatcher(&bot);

    let expected = "@viewer, Live: Sends information about a livestream. Aliases: [live, stream]. Usage: \"#live <channel>\".";
    assert_eq!(say(&bot, &d, viewer("#help live")).await.as_deref(), Some(expected));
    assert_eq!(
        say(&bot, &d, raw("#usage STREAM", "other", 43, false)).await.as_deref(),
        Some("@other, Live: Sends information about a livestream. Aliases: [live, stream]. Usage: \"#live <channel>\".")
    );
    assert_eq!(
        say(&bot, &d, raw("#help nope", "third", 44, false)).await.as_deref(),
        Some("@third, Command name/alias not found.")
    );
}

#[tokio::test]
async fn id_for_self_and_others() {
    let bot = bot();
    let d = dispatcher(&bot);

    assert_eq!(say(&bot, &d, viewer("#id")).await.as_deref(), Some("@viewer, Your ID is 42"));
    assert_eq!(
        say(&bot, &d, moderator("#userid Forsen")).await.as_deref(),
        Some("@moddy, ID of Forsen is 22484632")
    );
    assert_eq!(
        say(&bot, &d, admin("#id ghost")).await.as_deref(),
        Some("@admin, User ghost not found.")
    );
}

#[tokio::test]
async fn followers_and_title() {
    let bot = bot();
    let d = dispatcher(&bot);

    assert_eq!(
        say(&bot, &d, viewer("#followers forsen")).await.as_deref(),
        Some("@viewer, forsen has 1234 followers.")
    );
    assert_eq!(
        say(&bot, &d, viewer("#title")).await.as_deref(),
        Some("@viewer, Title of Chat_A is: hello chat")
    );

    // xqc exists but Helix has no channel record for them
    let outcome = d.handle_message(&moderator("#title xqc")).await;
    assert_eq!(outcome, DispatchOutcome::UpstreamFailure { command: "title".into() });
    assert_eq!(
        bot.chat.sent_to(CHAT).last().map(String::as_str),
        Some("@moddy, :( 3rd party API failure.")
    );
}

#[tokio::test]
async fn live_and_thumbnail() {
    let bot = bot();
    let d = dispatcher(&bot);

    assert_eq!(
        say(&bot, &d, viewer("#live forsen")).await.as_deref(),
        Some("@viewer, https://twitch.tv/forsen has been live for 2h 5m playing \"Minecraft\" with 10 viewers. speedrun")
    );
    assert_eq!(
        say(&bot, &d, viewer("#thumbnail forsen")).await.as_deref(),
        Some("@viewer, https://static-cdn.jtvnw.net/previews-ttv/live_user_forsen-1920x1080.jpg")
    );
    assert_eq!(
        say(&bot, &d, moderator("#stream xqc")).await.as_deref(),
        Some("@moddy, xqc is offline.")
    );
    assert_eq!(
        say(&bot, &d, admin("#live")).await.as_deref(),
        Some("@admin, Missing argument: #live <channel>.")
    );
}

#[tokio::test]
async fn banned_lookup() {
    let bot = bot().bans(
        FakeBanLookup::new()
            .with_user("baduser", true, Some("TOS_INDEFINITE"))
            .with_user("gooduser", false, None),
    );
    let d = dispatcher(&bot);

    assert_eq!(
        say(&bot, &d, viewer("#banned baduser")).await.as_deref(),
        Some("@viewer, baduser is BANNED: TOS_INDEFINITE BOP")
    );
    assert_eq!(
        say(&bot, &d, moderator("#banned gooduser")).await.as_deref(),
        Some("@moddy, gooduser is not banned.")
    );
    assert_eq!(
        say(&bot, &d, admin("#banned ghost")).await.as_deref(),
        Some("@admin, User ghost not found.")
    );
}

fn added_ago(age: chrono::Duration) -> i64 {
    (Utc::now() - age).timestamp_millis()
}

fn seventv() -> FakeEmoteApi {
    FakeEmoteApi::new()
        .with_profile(
            CHAT_ID,
            &[
                ("buh", added_ago(chrono::Duration::days(2))),
                ("forsenE", added_ago(chrono::Duration::weeks(3))),
                ("Clap", added_ago(chrono::Duration::hours(5))),
                ("catJAM", added_ago(chrono::Duration::days(400))),
                ("EZ", added_ago(chrono::Duration::minutes(40))),
                ("peepoHappy", added_ago(chrono::Duration::days(1))),
                ("Okayge", added_ago(chrono::Duration::days(60))),
            ],
        )
        .with_profile(FORSEN_ID, &[("forsenPls", added_ago(chrono::Duration::hours(3)))])
        .with_profile(71092938, &[])
}

#[tokio::test]
async fn latest_emotes_default_to_the_current_chat() {
    let bot = bot().emotes(seventv());
    let d = dispatcher(&bot);

    assert_eq!(
        say(&bot, &d, viewer("#latestemotes")).await.as_deref(),
        Some("@viewer, EZ (40 minutes ago) Clap (5 hours ago) peepoHappy (1 day ago) buh (2 days ago) forsenE (3 weeks ago)")
    );
    assert_eq!(
        say(&bot, &d, moderator("#le Forsen")).await.as_deref(),
        Some("@moddy, forsenPls (3 hours ago)")
    );
    assert_eq!(bot.emotes.requested(), vec![CHAT_ID, FORSEN_ID]);
}

#[tokio::test]
async fn random_emotes_come_from_the_channel_set() {
    let bot = bot().emotes(seventv());
    let d = dispatcher(&bot);

    let reply = say(&bot, &d, viewer("#re")).await.unwrap();
    let listed = reply.strip_prefix("@viewer, ").unwrap();
    let names: Vec<&str> = listed
        .split(" ago)")
        .filter_map(|entry| entry.trim().split(' ').next())
        .filter(|name| !name.is_empty())
        .collect();
    assert_eq!(names.len(), 5, "{}", reply);
    let known = ["buh", "forsenE", "Clap", "catJAM", "EZ", "peepoHappy", "Okayge"];
    assert!(names.iter().all(|n| known.contains(n)), "{}", reply);

    assert_eq!(
        say(&bot, &d, moderator("#randomemotes forsen")).await.as_deref(),
        Some("@moddy, forsenPls (3 hours ago)")
    );
}

#[tokio::test]
async fn emote_commands_explain_missing_sets() {
    let bot = bot().emotes(seventv());
    let d = dispatcher(&bot);

    assert_eq!(
        say(&bot, &d, viewer("#latestemotes xqc")).await.as_deref(),
        Some("@viewer, This channel does not have any 7tv emotes.")
    );
    assert_eq!(
        say(&bot, &d, moderator("#re ghostchat")).await.as_deref(),
        Some("@moddy, User ghostchat not found.")
    );

    // a Twitch user who never linked 7TV
    let bot = TestBot::with_chats(InMemoryChatRepository::new().with_chat(CHAT_ID, CHAT))
        .helix(helix().with_user("nolink", 555))
        .emotes(seventv());
    let d = dispatcher(&bot);
    assert_eq!(
        say(&bot, &d, admin("#randomemotes nolink")).await.as_deref(),
        Some("@admin, User does not have a 7TV profile.")
    );
}

#[tokio::test]
async fn emote_lookup_failure_apologizes() {
    let bot = bot().emotes(seventv());
    bot.emotes.fail_with(500);
    let d = dispatcher(&bot);

    let outcome = d.handle_message(&viewer("#latestemotes")).await;
    assert_eq!(outcome, DispatchOutcome::UpstreamFailure { command: "latestemotes".into() });
    assert_eq!(
        bot.chat.sent_to(CHAT).last().map(String::as_str),
        Some("@viewer, :( 3rd party API failure.")
    );
}

#[tokio::test(start_paused = true)]
async fn notify_and_subscribe_round_trip() {
    let bot = bot();
    let d = dispatcher(&bot);
    let cooldown = Duration::from_secs(3);

    // viewers cannot manage notifications
    assert_eq!(say(&bot, &d, viewer("#notify add forsen")).await, None);

    assert_eq!(
        say(&bot, &d, moderator("#notify add forsen")).await.as_deref(),
        Some("@moddy, Added forsen to notifications! Use #subscribe to be pinged when they go live.")
    );
    assert!(bot.eventsub.is_active(FORSEN_ID));

    tokio::time::advance(cooldown).await;
    assert_eq!(
        say(&bot, &d, moderator("#notif add FORSEN")).await.as_deref(),
        Some("@moddy, Channel is already added to live notifications. Use #subscribe to be pinged when they go live.")
    );

    assert_eq!(
        say(&bot, &d, viewer("#subscribe forsen")).await.as_deref(),
        Some("@viewer, Subscribed to forsen. You will be notified when they go live.")
    );
    tokio::time::advance(cooldown).await;
    assert_eq!(
        say(&bot, &d, viewer("#subscribe forsen")).await.as_deref(),
        Some("@viewer, Unsubscribed from forsen. You will no longer be notified when they go live.")
    );
    tokio::time::advance(cooldown).await;
    assert_eq!(
        say(&bot, &d, viewer("#subscribe xqc")).await.as_deref(),
        Some("@viewer, This chat is not subscribed to xqc. Moderators can use #notify to add/remove channels.")
    );

    tokio::time::advance(cooldown).await;
    assert_eq!(
        say(&bot, &d, moderator("#livenotif remove forsen")).await.as_deref(),
        Some("@moddy, Removed forsen from live notifications.")
    );
    assert!(!bot.eventsub.is_active(FORSEN_ID));

    tokio::time::advance(cooldown).await;
    assert_eq!(
        say(&bot, &d, moderator("#notify remove forsen")).await.as_deref(),
        Some("@moddy, Channel is not added to live notifications.")
    );
}

#[tokio::test(start_paused = true)]
async fn cmd_manages_custom_commands() {
    let bot = bot();
    let d = dispatcher(&bot);
    let cooldown = Duration::from_secs(1);

    assert_eq!(
        say(&bot, &d, moderator("#cmd add Discord join our discord")).await.as_deref(),
        Some("@moddy, Added command \"discord\".")
    );
    assert_eq!(
        say(&bot, &d, viewer("#discord")).await.as_deref(),
        Some("@viewer, join our discord")
    );

    tokio::time::advance(cooldown).await;
    assert_eq!(
        say(&bot, &d, moderator("#cmd add uptime lol")).await.as_deref(),
        Some("@moddy, Command name conflicts with an existing command.")
    );
    tokio::time::advance(cooldown).await;
    assert_eq!(
        say(&bot, &d, moderator("#cmd add discord again")).await.as_deref(),
        Some("@moddy, discord is already a command.")
    );
    tokio::time::advance(cooldown).await;
    let long_name = "x".repeat(101);
    assert_eq!(
        say(&bot, &d, moderator(&format!("#cmd add {} hi", long_name))).await.as_deref(),
        Some("@moddy, Command name is too long! (max 100 characters).")
    );

    tokio::time::advance(cooldown).await;
    assert_eq!(
        say(&bot, &d, moderator("#command edit discord new link")).await.as_deref(),
        Some("@moddy, Edited command \"discord\".")
    );
    tokio::time::advance(cooldown).await;
    assert_eq!(
        say(&bot, &d, viewer("#discord")).await.as_deref(),
        Some("@viewer, new link")
    );

    tokio::time::advance(cooldown).await;
    assert_eq!(
        say(&bot, &d, moderator("#cmd remove discord")).await.as_deref(),
        Some("@moddy, Removed command \"discord\".")
    );
    tokio::time::advance(cooldown).await;
    assert_eq!(say(&bot, &d, viewer("#discord")).await, None);
    assert_eq!(
        say(&bot, &d, moderator("#cmd remove discord")).await.as_deref(),
        Some("@moddy, discord is not a command.")
    );
}

#[tokio::test(start_paused = true)]
async fn join_and_part() {
    let bot = bot();
    let d = dispatcher(&bot);

    assert_eq!(
        say(&bot, &d, broadcaster("#join xqc")).await.as_deref(),
        Some("@chat_a, Only bot admins can join new chats.")
    );
    assert_eq!(
        say(&bot, &d, admin("#join xqc")).await.as_deref(),
        Some("@admin, Joining chat xqc.")
    );
    assert_eq!(bot.chat.joined(), vec!["xqc".to_string()]);
    assert!(bot.chats.chats.contains_key(&71092938));

    tokio::time::advance(Duration::from_secs(1)).await;
    assert_eq!(
        say(&bot, &d, admin("#part xqc")).await.as_deref(),
        Some("@admin, Leaving chat xqc.")
    );
    assert_eq!(bot.chat.left(), vec!["xqc".to_string()]);
    assert!(!bot.chats.chats.contains_key(&71092938));

    tokio::time::advance(Duration::from_secs(1)).await;
    assert_eq!(
        say(&bot, &d, broadcaster("#part")).await.as_deref(),
        Some("@chat_a, This command will part this chat and DELETE all commands and live notifications PERMANENTLY. Use #part DELETEME to confirm.")
    );
    tokio::time::advance(Duration::from_secs(1)).await;
    assert_eq!(
        say(&bot, &d, broadcaster("#part DELETEME")).await.as_deref(),
        Some("@chat_a, Parting channel. Until we meet again. :)")
    );
    assert!(!bot.chats.chats.contains_key(&CHAT_ID));

    // the bot leaves once the farewell had time to go out
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(bot.chat.left(), vec!["xqc".to_string(), CHAT.to_string()]);
}

#[tokio::test]
async fn ping_reports_uptime() {
    let bot = bot();
    let d = dispatcher(&bot);

    let reply = say(&bot, &d, viewer("#uptime")).await.unwrap();
    assert!(reply.starts_with("@viewer, Pong! Bot has been up for "), "{}", reply);
    assert!(reply.contains("Database ping is"), "{}", reply);
}
