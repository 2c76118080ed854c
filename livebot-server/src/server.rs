//! livebot-server/src/server.rs
//!
//! Wires the context into the running bot: EventSub sync, the webhook
//! listener and the chat loop.

use std::net::SocketAddr;
use std::sync::Arc;
use anyhow::Context;
use tracing::{debug, error, info, warn};

use livebot_core::platforms::twitch_eventsub::{start_webhook_server, EventSubWebhookState};
use livebot_core::services::{sync_stream_online_subscriptions, Dispatcher, LiveNotifier};

use crate::context::ServerContext;
use crate::Args;

pub async fn run_server(args: Args) -> anyhow::Result<()> {
    let ServerContext {
        db,
        state,
        registry,
        irc,
        mut chat_rx,
    } = ServerContext::new(&args).await?;

    // 1) Make Twitch's webhook subscriptions match the database
    if let Err(e) = sync_stream_online_subscriptions(state.eventsub.as_ref(), state.subscriptions.as_ref()).await {
        warn!("EventSub sync failed, live notifications may be incomplete: {}", e);
    }

    // 2) Webhook listener
    let notifier = Arc::new(LiveNotifier::new(
        state.subscriptions.clone(),
        state.helix.clone(),
        state.chat.clone(),
        state.config.max_message_length,
    ));
    let addr: SocketAddr = state
        .config
        .bind_addr
        .parse()
        .with_context(|| format!("invalid bind_addr {}", state.config.bind_addr))?;
    let (webhook_shutdown, webhook_task) = start_webhook_server(addr, EventSubWebhookState::new(notifier)).await?;

    // 3) Chat loop, one task per line
    let dispatcher = Arc::new(Dispatcher::new(state.clone(), registry));
    let chat_loop = tokio::spawn(async move {
        while let Some(msg) = chat_rx.recv().await {
            let d = dispatcher.clone();
            tokio::spawn(async move {
                let outcome = d.handle_message(&msg).await;
                debug!("#{} {}: {:?}", msg.channel_name, msg.user_login, outcome);
            });
        }
    });

    info!("livebot is running. Press Ctrl-C to stop.");
    let result = tokio::select! {
        res = tokio::signal::ctrl_c() => {
            res.context("listening for Ctrl-C")?;
            info!("Ctrl-C received, shutting down.");
            Ok(())
        }
        _ = chat_loop => {
            error!("Chat connection closed.");
            Err(anyhow::anyhow!("chat connection closed"))
        }
    };

    // 4) Shutdown
    let _ = webhook_shutdown.send(());
    if let Err(e) = webhook_task.await {
        error!("Webhook task ended abnormally: {}", e);
    }
    irc.disconnect();
    db.pool().close().await;
    info!("Shutdown complete.");

    result
}
