use async_trait::async_trait;

use livebot_common::error::CommandError;
use livebot_common::models::custom_command::{
    CustomCommand, MAX_CUSTOM_COMMAND_NAME_LEN, MAX_CUSTOM_COMMAND_REPLY_LEN,
};

use crate::services::command_context::{CommandContext, CommandHandler};
use crate::services::invocation::Invocation;

/// `cmd add|remove|edit`: manages the per-chat text commands.
pub struct CustomCommandsCommand;

#[async_trait]
impl CommandHandler for CustomCommandsCommand {
    async fn run(&self, ctx: &CommandContext<'_>, inv: &Invocation) -> Result<String, CommandError> {
        let Some(subcommand) = inv.parameters.first().map(|s| s.to_lowercase()) else {
            return Ok(format!(
                "Missing subcommand: Usage: {} <add|remove|edit> [args].",
                inv.command
            ));
        };
        let name = inv.parameters.get(1).map(|n| n.to_lowercase());
        let reply = (inv.parameters.len() > 2).then(|| inv.parameters[2..].join(" "));
        let store = &ctx.state.custom_commands;

        match subcommand.as_str() {
            "add" => {
                let Some(name) = name else {
                    return Ok(format!("Missing command name: Usage: {} add <name> <reply>.", inv.command));
                };
                let Some(reply) = reply else {
                    return Ok(format!("Missing command reply: Usage: {} add <name> <reply>.", inv.command));
                };
                if name.chars().count() > MAX_CUSTOM_COMMAND_NAME_LEN {
                    return Ok(format!(
                        "Command name is too long! (max {} characters).",
                        MAX_CUSTOM_COMMAND_NAME_LEN
                    ));
                }
                if reply.chars().count() > MAX_CUSTOM_COMMAND_REPLY_LEN {
                    return Ok(format!(
                        "Command reply is too long! (max {} characters).",
                        MAX_CUSTOM_COMMAND_REPLY_LEN
                    ));
                }
                if ctx.registry.resolve(&name).is_some() {
                    return Ok("Command name conflicts with an existing command.".to_string());
                }
                if store.get_command(inv.channel_id, &name).await?.is_some() {
                    return Ok(format!("{} is already a command.", name));
                }
                store
                    .create_command(&CustomCommand {
                        chat_id: inv.channel_id,
                        name: name.clone(),
                        reply,
                    })
                    .await?;
                Ok(format!("Added command \"{}\".", name))
            }
            "remove" => {
                let Some(name) = name else {
                    return Ok(format!("Missing command name: Usage: {} remove <name>.", inv.command));
                };
                if store.get_command(inv.channel_id, &name).await?.is_none() {
                    return Ok(format!("{} is not a command.", name));
                }
                store.delete_command(inv.channel_id, &name).await?;
                Ok(format!("Removed command \"{}\".", name))
            }
            "edit" => {
                let Some(name) = name else {
                    return Ok(format!("Missing command name: Usage: {} edit <name> <reply>.", inv.command));
                };
                let Some(reply) = reply else {
                    return Ok(format!("Missing command reply: Usage: {} edit <name> <reply>.", inv.command));
                };
                if reply.chars().count() > MAX_CUSTOM_COMMAND_REPLY_LEN {
                    return Ok(format!(
                        "Command reply is too long! (max {} characters).",
                        MAX_CUSTOM_COMMAND_REPLY_LEN
                    ));
                }
                if store.get_command(inv.channel_id, &name).await?.is_none() {
                    return Ok(format!("{} is not a command.", name));
                }
                store.update_command(inv.channel_id, &name, &reply).await?;
                Ok(format!("Edited command \"{}\".", name))
            }
            _ => Ok(format!(
                "Invalid subcommand: Usage: {} <add|remove|edit> [args].",
                inv.command
            )),
        }
    }
}
