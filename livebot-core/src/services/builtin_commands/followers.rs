use async_trait::async_trait;

use livebot_common::error::CommandError;

use crate::services::command_context::{CommandContext, CommandHandler};
use crate::services::invocation::Invocation;

pub struct FollowersCommand;

#[async_trait]
impl CommandHandler for FollowersCommand {
    async fn run(&self, ctx: &CommandContext<'_>, inv: &Invocation) -> Result<String, CommandError> {
        let (login, user_id) = match inv.parameters.first() {
            None => (inv.sender_login.clone(), inv.sender_id),
            Some(param) => {
                let login = param.to_lowercase();
                match ctx.state.helix.login_to_id(&login).await? {
                    Some(id) => (login, id),
                    None => return Ok(format!("User {} not found.", login)),
                }
            }
        };

        let total = ctx.state.helix.get_follower_count(user_id).await?;
        Ok(format!("{} has {} followers.", login, total))
    }
}
