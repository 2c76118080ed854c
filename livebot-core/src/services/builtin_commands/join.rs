use std::time::Duration;
use async_trait::async_trait;
use tracing::{error, info};

use livebot_common::error::CommandError;
use livebot_common::models::Chat;

use crate::services::command_context::{CommandContext, CommandHandler};
use crate::services::invocation::Invocation;

/// Gives the farewell reply a head start before the bot leaves the channel.
const PART_DELAY: Duration = Duration::from_secs(2);

/// `join` (admins) and `part` (broadcaster of the chat, or admins for any chat).
pub struct JoinCommand;

#[async_trait]
impl CommandHandler for JoinCommand {
    async fn run(&self, ctx: &CommandContext<'_>, inv: &Invocation) -> Result<String, CommandError> {
        match inv.invocation.as_str() {
            "join" => join(ctx, inv).await,
            _ => part(ctx, inv).await,
        }
    }
}

async fn join(ctx: &CommandContext<'_>, inv: &Invocation) -> Result<String, CommandError> {
    if !inv.is_admin {
        return Ok("Only bot admins can join new chats.".to_string());
    }
    let Some(channel) = inv.parameters.first().map(|c| c.to_lowercase()) else {
        return Ok(format!("Missing channel. Usage: {} <channel>", inv.command));
    };

    if ctx.state.chats.get_chat_by_name(&channel).await?.is_some() {
        return Ok("Chat is already joined.".to_string());
    }
    let Some(chat_id) = ctx.state.helix.login_to_id(&channel).await? else {
        return Ok(format!("User {} not found.", channel));
    };

    ctx.state
        .chats
        .insert_chat(&Chat {
            chat_id,
            chat_name: channel.clone(),
        })
        .await?;
    ctx.state.chat.join(&channel).await?;
    info!("{} added chat #{}", inv.sender_login, channel);
    Ok(format!("Joining chat {}.", channel))
}

async fn part(ctx: &CommandContext<'_>, inv: &Invocation) -> Result<String, CommandError> {
    if inv.is_broadcaster {
        if inv.parameters.first().map(String::as_str) != Some("DELETEME") {
            return Ok(format!(
                "This command will part this chat and DELETE all commands and live notifications PERMANENTLY. Use {} DELETEME to confirm.",
                inv.command
            ));
        }
        ctx.state.chats.delete_chat(inv.channel_id).await?;
        info!("#{} removed the bot", inv.channel_name);

        let chat = ctx.state.chat.clone();
        let channel = inv.channel_name.clone();
        tokio::spawn(async move {
            tokio::time::sleep(PART_DELAY).await;
            if let Err(e) = chat.leave(&channel).await {
                error!("Could not leave #{}: {}", channel, e);
            }
        });
        return Ok("Parting channel. Until we meet again. :)".to_string());
    }

    if !inv.is_admin {
        return Ok("Only the broadcaster or a bot admin can part this chat.".to_string());
    }
    let Some(channel) = inv.parameters.first().map(|c| c.to_lowercase()) else {
        return Ok(format!("Missing channel. Usage: {} <channel>", inv.command));
    };
    let Some(chat) = ctx.state.chats.get_chat_by_name(&channel).await? else {
        return Ok("Chat not found.".to_string());
    };

    ctx.state.chats.delete_chat(chat.chat_id).await?;
    ctx.state.chat.leave(&channel).await?;
    info!("{} removed chat #{}", inv.sender_login, channel);
    Ok(format!("Leaving chat {}.", channel))
}
