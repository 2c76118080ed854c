// File: livebot-core/src/services/invocation.rs

use livebot_common::models::Role;

use crate::Error;

/// A PRIVMSG as it comes off the chat connection, before any interpretation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawChatMessage {
    pub text: String,
    pub user_id: String,
    pub user_login: String,
    pub display_name: String,
    /// `mod=1` tag.
    pub is_mod: bool,
    pub channel_id: String,
    pub channel_name: String,
}

/// One parsed attempt to run a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub sender_id: i64,
    pub sender_login: String,
    pub sender_display_name: String,
    pub channel_id: i64,
    pub channel_name: String,
    pub message: String,
    /// Whitespace-split message.
    pub arguments: Vec<String>,
    /// `arguments` minus the first token, case preserved.
    pub parameters: Vec<String>,
    /// First token, prefix kept, lower-cased. Used when echoing usage.
    pub command: String,
    /// First token, prefix stripped, lower-cased. Used for lookup.
    pub invocation: String,
    pub is_mod: bool,
    pub is_broadcaster: bool,
    pub is_admin: bool,
    pub role: Role,
}

impl Invocation {
    /// `Ok(None)` when the line is not meant for the bot.
    pub fn parse(raw: &RawChatMessage, prefix: &str, admins: &[String]) -> Result<Option<Self>, Error> {
        if prefix.is_empty() || !raw.text.starts_with(prefix) {
            return Ok(None);
        }

        let arguments: Vec<String> = raw.text.split_whitespace().map(str::to_string).collect();
        let Some(first) = arguments.first() else {
            return Ok(None);
        };
        let invocation = first.strip_prefix(prefix).unwrap_or(first).to_lowercase();
        if invocation.is_empty() {
            return Ok(None);
        }

        let sender_id: i64 = raw
            .user_id
            .parse()
            .map_err(|e| Error::Parse(format!("sender id '{}': {}", raw.user_id, e)))?;
        let channel_id: i64 = raw
            .channel_id
            .parse()
            .map_err(|e| Error::Parse(format!("channel id '{}': {}", raw.channel_id, e)))?;

        let is_broadcaster = sender_id == channel_id;
        let is_admin = admins.iter().any(|a| a.eq_ignore_ascii_case(&raw.user_login));
        let role = Role::from_facts(raw.is_mod, is_broadcaster, is_admin);

        Ok(Some(Self {
            sender_id,
            sender_login: raw.user_login.clone(),
            sender_display_name: raw.display_name.clone(),
            channel_id,
            channel_name: raw.channel_name.clone(),
            message: raw.text.clone(),
            command: first.to_lowercase(),
            invocation,
            parameters: arguments[1..].to_vec(),
            arguments,
            is_mod: raw.is_mod,
            is_broadcaster,
            is_admin,
            role,
        }))
    }
}
