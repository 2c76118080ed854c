use async_trait::async_trait;

use livebot_common::error::CommandError;

use crate::services::command_context::{CommandContext, CommandHandler};
use crate::services::invocation::Invocation;

/// Toggles the sender's @-mention on an existing chat subscription.
pub struct SubscribeCommand;

#[async_trait]
impl CommandHandler for SubscribeCommand {
    async fn run(&self, ctx: &CommandContext<'_>, inv: &Invocation) -> Result<String, CommandError> {
        let Some(channel) = inv.parameters.first().map(|c| c.to_lowercase()) else {
            return Ok(format!("Missing channel. Usage: {} <channel>", inv.command));
        };
        let subs = &ctx.state.subscriptions;

        let Some(subscription) = subs.get_subscription_by_login(inv.channel_id, &channel).await? else {
            return Ok(format!(
                "This chat is not subscribed to {}. Moderators can use {}notify to add/remove channels.",
                channel,
                ctx.prefix()
            ));
        };

        if subs
            .is_user_subscribed(subscription.subscription_id, &inv.sender_login)
            .await?
        {
            subs.delete_subscriber(subscription.subscription_id, &inv.sender_login).await?;
            Ok(format!(
                "Unsubscribed from {}. You will no longer be notified when they go live.",
                channel
            ))
        } else {
            subs.add_subscriber(&subscription, &inv.sender_login).await?;
            Ok(format!(
                "Subscribed to {}. You will be notified when they go live.",
                channel
            ))
        }
    }
}
