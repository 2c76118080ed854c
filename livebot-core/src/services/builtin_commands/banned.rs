use async_trait::async_trait;

use livebot_common::error::CommandError;

use crate::services::command_context::{CommandContext, CommandHandler};
use crate::services::invocation::Invocation;

pub struct BannedCommand;

#[async_trait]
impl CommandHandler for BannedCommand {
    async fn run(&self, ctx: &CommandContext<'_>, inv: &Invocation) -> Result<String, CommandError> {
        let Some(login) = inv.parameters.first() else {
            return Ok(format!("Missing username. Usage: {} <user>", inv.command));
        };

        let Some(status) = ctx.state.bans.get_ban_status(login).await? else {
            return Ok(format!("User {} not found.", login));
        };

        if status.banned {
            Ok(format!(
                "{} is BANNED: {} BOP",
                status.display_name,
                status.ban_reason.unwrap_or_default()
            ))
        } else {
            Ok(format!("{} is not banned.", status.display_name))
        }
    }
}
