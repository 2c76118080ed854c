use async_trait::async_trait;

use livebot_common::error::{ApiError, CommandError};

use crate::platforms::twitch::client::HELIX_BASE_URL;
use crate::services::command_context::{CommandContext, CommandHandler};
use crate::services::invocation::Invocation;

pub struct TitleCommand;

#[async_trait]
impl CommandHandler for TitleCommand {
    async fn run(&self, ctx: &CommandContext<'_>, inv: &Invocation) -> Result<String, CommandError> {
        let broadcaster_id = match inv.parameters.first() {
            None => inv.channel_id,
            Some(param) => {
                let login = param.to_lowercase();
                match ctx.state.helix.login_to_id(&login).await? {
                    Some(id) => id,
                    None => return Ok(format!("User {} not found.", login)),
                }
            }
        };

        // Helix answers 200 with an empty `data` for ids it knows nothing about
        let Some(channel) = ctx.state.helix.get_channel(broadcaster_id).await? else {
            let mut api = ApiError::status(
                format!("{}/channels?broadcaster_id={}", HELIX_BASE_URL, broadcaster_id),
                200,
            );
            api.message = Some("no channel information returned".to_string());
            return Err(CommandError::Upstream(api));
        };

        Ok(format!("Title of {} is: {}", channel.broadcaster_name, channel.title))
    }
}
