use async_trait::async_trait;

use livebot_common::error::CommandError;

use crate::services::command_context::{CommandContext, CommandHandler};
use crate::services::invocation::Invocation;
use crate::utils::text::capitalize_first;

pub struct HelpCommand;

#[async_trait]
impl CommandHandler for HelpCommand {
    async fn run(&self, ctx: &CommandContext<'_>, inv: &Invocation) -> Result<String, CommandError> {
        let wanted = inv
            .parameters
            .first()
            .map(|p| p.to_lowercase())
            .unwrap_or_else(|| "help".to_string());

        let Some(def) = ctx
            .registry
            .by_name(&wanted)
            .or_else(|| ctx.registry.resolve(&wanted))
        else {
            return Ok("Command name/alias not found.".to_string());
        };

        Ok(format!(
            "{}: {} Aliases: [{}]. Usage: \"{}{}\".",
            capitalize_first(&def.name),
            def.description,
            def.aliases.join(", "),
            ctx.prefix(),
            def.usage
        ))
    }
}
