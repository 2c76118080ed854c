// File: livebot-core/src/services/builtin_commands/emotes.rs
//
// `randomemotes` and `latestemotes`: five emotes from a channel's 7TV set,
// each with how long ago it was added.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;

use livebot_common::error::CommandError;
use livebot_common::models::SevenTvEmote;

use crate::services::command_context::{CommandContext, CommandHandler};
use crate::services::invocation::Invocation;
use crate::utils::time::pretty_duration;

/// How many emotes one reply lists.
pub const EMOTES_PER_REPLY: usize = 5;

const NO_PROFILE_REPLY: &str = "User does not have a 7TV profile.";
const NO_EMOTES_REPLY: &str = "This channel does not have any 7tv emotes.";

pub struct RandomEmotesCommand;
pub struct LatestEmotesCommand;

enum EmoteLookup {
    Found(Vec<SevenTvEmote>),
    /// Nothing to list; reply with this instead.
    Reply(String),
}

/// Emotes of the channel named in the first parameter, or of the current chat.
async fn channel_emotes(ctx: &CommandContext<'_>, inv: &Invocation) -> Result<EmoteLookup, CommandError> {
    let user_id = match inv.parameters.first() {
        None => inv.channel_id,
        Some(param) => {
            let login = param.to_lowercase();
            match ctx.state.helix.login_to_id(&login).await? {
                Some(id) => id,
                None => return Ok(EmoteLookup::Reply(format!("User {} not found.", login))),
            }
        }
    };

    match ctx.state.emotes.get_channel_emotes(user_id).await? {
        None => Ok(EmoteLookup::Reply(NO_PROFILE_REPLY.to_string())),
        Some(emotes) if emotes.is_empty() => Ok(EmoteLookup::Reply(NO_EMOTES_REPLY.to_string())),
        Some(emotes) => Ok(EmoteLookup::Found(emotes)),
    }
}

/// `name (3 days ago)` entries separated by spaces. Timestamps in the
/// future (clock skew) read as `just now`.
pub fn format_emotes(emotes: &[SevenTvEmote], now: DateTime<Utc>) -> String {
    emotes
        .iter()
        .map(|e| {
            let added = DateTime::<Utc>::from_timestamp_millis(e.timestamp).unwrap_or(now);
            match (now - added).to_std() {
                Ok(age) if !age.is_zero() => format!("{} ({} ago)", e.name, pretty_duration(age)),
                _ => format!("{} (just now)", e.name),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Up to `n` emotes in random order.
pub fn pick_random(mut emotes: Vec<SevenTvEmote>, n: usize) -> Vec<SevenTvEmote> {
    emotes.shuffle(&mut rand::rng());
    emotes.truncate(n);
    emotes
}

/// Up to `n` emotes, most recently added first.
pub fn pick_latest(mut emotes: Vec<SevenTvEmote>, n: usize) -> Vec<SevenTvEmote> {
    emotes.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    emotes.truncate(n);
    emotes
}

#[async_trait]
impl CommandHandler for RandomEmotesCommand {
    async fn run(&self, ctx: &CommandContext<'_>, inv: &Invocation) -> Result<String, CommandError> {
        let emotes = match channel_emotes(ctx, inv).await? {
            EmoteLookup::Found(emotes) => emotes,
            EmoteLookup::Reply(reply) => return Ok(reply),
        };
        Ok(format_emotes(&pick_random(emotes, EMOTES_PER_REPLY), Utc::now()))
    }
}

#[async_trait]
impl CommandHandler for LatestEmotesCommand {
    async fn run(&self, ctx: &CommandContext<'_>, inv: &Invocation) -> Result<String, CommandError> {
        let emotes = match channel_emotes(ctx, inv).await? {
            EmoteLookup::Found(emotes) => emotes,
            EmoteLookup::Reply(reply) => return Ok(reply),
        };
        Ok(format_emotes(&pick_latest(emotes, EMOTES_PER_REPLY), Utc::now()))
    }
}
