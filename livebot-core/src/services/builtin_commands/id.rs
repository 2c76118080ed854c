use async_trait::async_trait;

use livebot_common::error::CommandError;

use crate::services::command_context::{CommandContext, CommandHandler};
use crate::services::invocation::Invocation;

pub struct IdCommand;

#[async_trait]
impl CommandHandler for IdCommand {
    async fn run(&self, ctx: &CommandContext<'_>, inv: &Invocation) -> Result<String, CommandError> {
        let Some(login) = inv.parameters.first() else {
            return Ok(format!("Your ID is {}", inv.sender_id));
        };

        match ctx.state.helix.login_to_id(&login.to_lowercase()).await? {
            Some(id) => Ok(format!("ID of {} is {}", login, id)),
            None => Ok(format!("User {} not found.", login)),
        }
    }
}
