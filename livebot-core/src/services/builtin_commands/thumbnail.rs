use async_trait::async_trait;

use livebot_common::error::CommandError;

use crate::services::builtin_commands::live::{lookup_stream, StreamLookup};
use crate::services::command_context::{CommandContext, CommandHandler};
use crate::services::invocation::Invocation;

const THUMBNAIL_SIZE_PLACEHOLDER: &str = "{width}x{height}";
const THUMBNAIL_SIZE: &str = "1920x1080";

pub struct ThumbnailCommand;

#[async_trait]
impl CommandHandler for ThumbnailCommand {
    async fn run(&self, ctx: &CommandContext<'_>, inv: &Invocation) -> Result<String, CommandError> {
        let Some(channel) = inv.parameters.first().map(|c| c.to_lowercase()) else {
            return Ok(format!("Missing channel. Usage: {} <channel>", inv.command));
        };

        match lookup_stream(ctx.state.helix.as_ref(), &channel).await? {
            StreamLookup::Live(stream) => Ok(stream
                .thumbnail_url
                .replacen(THUMBNAIL_SIZE_PLACEHOLDER, THUMBNAIL_SIZE, 1)),
            StreamLookup::Offline => Ok(format!("{} is offline.", channel)),
            StreamLookup::NoSuchUser => Ok(format!("User {} not found.", channel)),
        }
    }
}
