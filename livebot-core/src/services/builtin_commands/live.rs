use async_trait::async_trait;
use chrono::Utc;

use livebot_common::error::CommandError;
use livebot_common::models::HelixStream;
use livebot_common::traits::api::HelixApi;

use crate::services::command_context::{CommandContext, CommandHandler};
use crate::services::invocation::Invocation;
use crate::utils::time::hours_minutes;
use crate::Error;

pub struct LiveCommand;

/// Outcome of looking up a stream by login, shared with `thumbnail`.
pub(crate) enum StreamLookup {
    Live(HelixStream),
    Offline,
    /// Helix answers 400 for logins that do not exist.
    NoSuchUser,
}

pub(crate) async fn lookup_stream(
    helix: &(dyn HelixApi + Send + Sync),
    login: &str,
) -> Result<StreamLookup, CommandError> {
    match helix.get_stream(login).await {
        Ok(Some(stream)) => Ok(StreamLookup::Live(stream)),
        Ok(None) => Ok(StreamLookup::Offline),
        Err(Error::Api(api)) if api.is_status(400) => Ok(StreamLookup::NoSuchUser),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl CommandHandler for LiveCommand {
    async fn run(&self, ctx: &CommandContext<'_>, inv: &Invocation) -> Result<String, CommandError> {
        let Some(channel) = inv.parameters.first().map(|c| c.to_lowercase()) else {
            return Ok(format!("Missing argument: {} <channel>.", inv.command));
        };

        let stream = match lookup_stream(ctx.state.helix.as_ref(), &channel).await? {
            StreamLookup::Live(stream) => stream,
            StreamLookup::Offline => return Ok(format!("{} is offline.", channel)),
            StreamLookup::NoSuchUser => return Ok(format!("User {} not found.", channel)),
        };

        let (hours, minutes) = hours_minutes(Utc::now() - stream.started_at);
        Ok(format!(
            "https://twitch.tv/{} has been live for {}h {}m playing \"{}\" with {} viewers. {}",
            stream.user_login, hours, minutes, stream.game_name, stream.viewer_count, stream.title
        ))
    }
}
