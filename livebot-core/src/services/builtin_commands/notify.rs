use async_trait::async_trait;
use tracing::info;

use livebot_common::error::CommandError;

use crate::services::command_context::{CommandContext, CommandHandler};
use crate::services::invocation::Invocation;

pub struct NotifyCommand;

#[async_trait]
impl CommandHandler for NotifyCommand {
    async fn run(&self, ctx: &CommandContext<'_>, inv: &Invocation) -> Result<String, CommandError> {
        let usage = format!("Usage: {} <add|remove> <channel>.", inv.command);
        let Some(subcommand) = inv.parameters.first().map(|s| s.to_lowercase()) else {
            return Ok(format!("No subcommand provided. {}", usage));
        };
        let Some(channel) = inv.parameters.get(1).map(|c| c.to_lowercase()) else {
            return Ok(format!("No channel provided. {}", usage));
        };
        if subcommand != "add" && subcommand != "remove" {
            return Ok(format!("Invalid subcommand. {}", usage));
        }

        let Some(streamer_id) = ctx.state.helix.login_to_id(&channel).await? else {
            return Ok(format!("User {} not found.", channel));
        };
        let subs = &ctx.state.subscriptions;

        if subcommand == "add" {
            if subs.get_subscription(inv.channel_id, streamer_id).await?.is_some() {
                return Ok(format!(
                    "Channel is already added to live notifications. Use {}subscribe to be pinged when they go live.",
                    ctx.prefix()
                ));
            }
            subs.create_subscription(inv.channel_id, streamer_id, &channel).await?;
            ctx.state.eventsub.subscribe_stream_online(streamer_id).await?;
            info!("#{} now gets live notifications for {}", inv.channel_name, channel);
            return Ok(format!(
                "Added {} to notifications! Use {}subscribe to be pinged when they go live.",
                channel,
                ctx.prefix()
            ));
        }

        if subs.get_subscription(inv.channel_id, streamer_id).await?.is_none() {
            return Ok("Channel is not added to live notifications.".to_string());
        }
        subs.delete_subscription(inv.channel_id, streamer_id).await?;

        // Last chat gone: stop receiving the webhook for this streamer.
        if !subs.is_streamer_subscribed(streamer_id).await? {
            ctx.state.eventsub.unsubscribe_stream_online(streamer_id).await?;
        }
        info!("#{} no longer gets live notifications for {}", inv.channel_name, channel);
        Ok(format!("Removed {} from live notifications.", channel))
    }
}
