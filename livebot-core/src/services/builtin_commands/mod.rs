// File: livebot-core/src/services/builtin_commands/mod.rs

use std::sync::Arc;
use std::time::Duration;

use livebot_common::models::Role;

use crate::services::command_registry::CommandDefinition;

pub mod banned;
pub mod custom_commands;
pub mod emotes;
pub mod followers;
pub mod help;
pub mod id;
pub mod join;
pub mod live;
pub mod notify;
pub mod ping;
pub mod subscribe;
pub mod thumbnail;
pub mod title;

/// Every built-in command, ready for `CommandRegistry::new`.
pub fn builtin_commands() -> Vec<CommandDefinition> {
    let one = Duration::from_secs(1);
    let three = Duration::from_secs(3);

    vec![
        CommandDefinition::new(
            "banned",
            &["banned"],
            Role::Generic,
            three,
            "Checks if a user is banned on Twitch.",
            "banned <user>",
            Arc::new(banned::BannedCommand),
        ),
        CommandDefinition::new(
            "cmd",
            &["cmd", "command"],
            Role::Mod,
            one,
            "Add, remove or edit custom commands in this chat.",
            "cmd <add|remove|edit> <name> [reply]",
            Arc::new(custom_commands::CustomCommandsCommand),
        ),
        CommandDefinition::new(
            "followers",
            &["followers", "followcount"],
            Role::Generic,
            three,
            "Show the number of followers for a user. Defaults to the sender.",
            "followers [user]",
            Arc::new(followers::FollowersCommand),
        ),
        CommandDefinition::new(
            "help",
            &["help", "usage"],
            Role::Generic,
            one,
            "Shows a help message for a specific command.",
            "help [command]",
            Arc::new(help::HelpCommand),
        ),
        CommandDefinition::new(
            "id",
            &["id", "userid"],
            Role::Generic,
            one,
            "Gets the Twitch user ID for you or another user.",
            "id [user]",
            Arc::new(id::IdCommand),
        ),
        CommandDefinition::new(
            "join",
            &["join", "part"],
            Role::Broadcaster,
            one,
            "Join/part channels. Broadcaster required to part, admin required to add.",
            "<join|part> <channel>",
            Arc::new(join::JoinCommand),
        ),
        CommandDefinition::new(
            "latestemotes",
            &["latestemotes", "le"],
            Role::Generic,
            three,
            "Posts the 5 most recent 7TV emotes added to a channel. Defaults to the current chat.",
            "latestemotes [channel]",
            Arc::new(emotes::LatestEmotesCommand),
        ),
        CommandDefinition::new(
            "live",
            &["live", "stream"],
            Role::Generic,
            three,
            "Sends information about a livestream.",
            "live <channel>",
            Arc::new(live::LiveCommand),
        ),
        CommandDefinition::new(
            "notify",
            &["notify", "notif", "livenotif"],
            Role::Mod,
            three,
            "Add/remove channels from live notifications.",
            "notify <add|remove> <channel>",
            Arc::new(notify::NotifyCommand),
        ),
        CommandDefinition::new(
            "ping",
            &["ping", "uptime"],
            Role::Generic,
            one,
            "Returns uptime and other information.",
            "ping",
            Arc::new(ping::PingCommand),
        ),
        CommandDefinition::new(
            "randomemotes",
            &["randomemotes", "re"],
            Role::Generic,
            three,
            "Posts 5 random 7TV emotes. Defaults to the current chat.",
            "randomemotes [channel]",
            Arc::new(emotes::RandomEmotesCommand),
        ),
        CommandDefinition::new(
            "subscribe",
            &["subscribe"],
            Role::Generic,
            one,
            "Subscribe/unsubscribe from live notifications.",
            "subscribe <channel>",
            Arc::new(subscribe::SubscribeCommand),
        ),
        CommandDefinition::new(
            "thumbnail",
            &["thumbnail"],
            Role::Generic,
            three,
            "Get the thumbnail of a stream.",
            "thumbnail <channel>",
            Arc::new(thumbnail::ThumbnailCommand),
        ),
        CommandDefinition::new(
            "title",
            &["title"],
            Role::Generic,
            three,
            "Gets the title of a channel. Defaults to current chat.",
            "title [channel]",
            Arc::new(title::TitleCommand),
        ),
    ]
}
