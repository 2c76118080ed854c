// tests/repository_tests.rs
//
// Needs a disposable Postgres: TEST_DATABASE_URL=postgres://... cargo test -- --ignored
// Everything lives in one test because each setup truncates the tables.

use livebot_common::models::{Chat, CustomCommand};
use livebot_core::repositories::postgres::{
    PostgresChatRepository, PostgresCustomCommandRepository, PostgresSubscriptionRepository,
};
use livebot_core::repositories::{ChatRepository, CustomCommandRepository, SubscriptionRepository};
use livebot_core::test_utils::helpers::setup_test_database;
use livebot_core::Error;

#[tokio::test]
#[ignore]
async fn postgres_repositories() -> Result<(), Error> {
    let db = setup_test_database().await?;
    let chats = PostgresChatRepository::new(db.pool().clone());
    let commands = PostgresCustomCommandRepository::new(db.pool().clone());
    let subs = PostgresSubscriptionRepository::new(db.pool().clone());

    // Chats
    chats.ping().await?;
    chats.insert_chat(&Chat { chat_id: 1, chat_name: "chat_a".into() }).await?;
    chats.insert_chat(&Chat { chat_id: 2, chat_name: "chat_b".into() }).await?;
    assert_eq!(chats.list_chats().await?.len(), 2);
    assert_eq!(chats.get_chat_by_name("chat_b").await?.map(|c| c.chat_id), Some(2));
    assert!(chats.get_chat_by_name("nope").await?.is_none());

    // Custom commands
    let cmd = CustomCommand { chat_id: 1, name: "discord".into(), reply: "join us".into() };
    commands.create_command(&cmd).await?;
    assert_eq!(commands.get_command(1, "discord").await?, Some(cmd.clone()));
    assert!(commands.get_command(2, "discord").await?.is_none());
    commands.update_command(1, "discord", "new link").await?;
    assert_eq!(commands.get_command(1, "discord").await?.map(|c| c.reply), Some("new link".into()));
    commands.delete_command(1, "discord").await?;
    assert!(commands.get_command(1, "discord").await?.is_none());

    // Subscriptions and subscribers
    let sub_a = subs.create_subscription(1, 100, "forsen").await?;
    let sub_b = subs.create_subscription(2, 100, "forsen").await?;
    subs.create_subscription(2, 200, "xqc").await?;
    assert_eq!(subs.subscribed_streamer_ids().await?, vec![100, 200]);
    assert_eq!(
        subs.get_subscription_by_login(1, "forsen").await?.map(|s| s.subscription_id),
        Some(sub_a.subscription_id)
    );

    subs.add_subscriber(&sub_a, "alice").await?;
    subs.add_subscriber(&sub_a, "alice").await?;
    subs.add_subscriber(&sub_a, "bob").await?;
    assert!(subs.is_user_subscribed(sub_a.subscription_id, "alice").await?);
    assert!(!subs.is_user_subscribed(sub_b.subscription_id, "alice").await?);

    let chat_names: Vec<String> = subs
        .subscribed_chats(100)
        .await?
        .into_iter()
        .map(|c| c.chat_name)
        .collect();
    assert_eq!(chat_names, vec!["chat_a", "chat_b"]);

    let by_chat = subs.subscribers_by_streamer(100).await?;
    assert_eq!(by_chat.get("chat_a"), Some(&vec!["alice".to_string(), "bob".to_string()]));
    assert!(by_chat.get("chat_b").is_none());

    subs.delete_subscriber(sub_a.subscription_id, "alice").await?;
    assert!(!subs.is_user_subscribed(sub_a.subscription_id, "alice").await?);

    // Deleting a chat cascades to its subscriptions
    chats.delete_chat(1).await?;
    assert!(subs.get_subscription(1, 100).await?.is_none());
    assert!(subs.is_streamer_subscribed(100).await?);
    subs.delete_subscription(2, 100).await?;
    assert!(!subs.is_streamer_subscribed(100).await?);

    Ok(())
}
