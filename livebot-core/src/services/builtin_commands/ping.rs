use std::time::Instant;
use async_trait::async_trait;

use livebot_common::error::CommandError;

use crate::services::command_context::{CommandContext, CommandHandler};
use crate::services::invocation::Invocation;
use crate::utils::time::pretty_duration;

pub struct PingCommand;

#[async_trait]
impl CommandHandler for PingCommand {
    async fn run(&self, ctx: &CommandContext<'_>, _inv: &Invocation) -> Result<String, CommandError> {
        let uptime = pretty_duration(ctx.state.started_at.elapsed());

        let db_start = Instant::now();
        ctx.state.chats.ping().await?;
        let db_ping = pretty_duration(db_start.elapsed());

        Ok(format!(
            "Pong! Bot has been up for {}. Database ping is {}.",
            uptime, db_ping
        ))
    }
}
