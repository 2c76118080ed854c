// File: livebot-core/src/services/command_registry.rs

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use livebot_common::models::Role;

use crate::services::command_context::CommandHandler;
use crate::Error;

/// Static metadata plus the handler for one built-in command.
#[derive(Clone)]
pub struct CommandDefinition {
    pub name: String,
    pub aliases: Vec<String>,
    pub min_role: Role,
    pub cooldown: Duration,
    pub description: String,
    /// Shown after the prefix, e.g. `live <channel>`.
    pub usage: String,
    pub handler: Arc<dyn CommandHandler>,
}

impl CommandDefinition {
    pub fn new(
        name: &str,
        aliases: &[&str],
        min_role: Role,
        cooldown: Duration,
        description: &str,
        usage: &str,
        handler: Arc<dyn CommandHandler>,
    ) -> Self {
        Self {
            name: name.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            min_role,
            cooldown,
            description: description.to_string(),
            usage: usage.to_string(),
            handler,
        }
    }
}

impl fmt::Debug for CommandDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDefinition")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("min_role", &self.min_role)
            .field("cooldown", &self.cooldown)
            .finish_non_exhaustive()
    }
}

/// Alias -> command table, fixed after construction.
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    /// Sorted by canonical name.
    commands: Vec<CommandDefinition>,
    by_alias: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
}

impl CommandRegistry {
    /// Fails on a duplicate canonical name, a duplicate alias, or an alias
    /// that could never match (upper-case or whitespace).
    pub fn new(mut definitions: Vec<CommandDefinition>) -> Result<Self, Error> {
        definitions.sort_by(|a, b| a.name.cmp(&b.name));

        let mut by_alias = HashMap::new();
        let mut by_name = HashMap::new();

        for (idx, def) in definitions.iter().enumerate() {
            if by_name.insert(def.name.clone(), idx).is_some() {
                return Err(Error::Config(format!("duplicate command name '{}'", def.name)));
            }
            for alias in &def.aliases {
                if alias.is_empty()
                    || alias.chars().any(char::is_whitespace)
                    || alias.to_lowercase() != *alias
                {
                    return Err(Error::Config(format!(
                        "alias '{}' of command '{}' must be lower-case and contain no whitespace",
                        alias, def.name
                    )));
                }
                if let Some(prev) = by_alias.insert(alias.clone(), idx) {
                    return Err(Error::Config(format!(
                        "alias '{}' is registered by both '{}' and '{}'",
                        alias, definitions[prev].name, def.name
                    )));
                }
            }
        }

        debug!("CommandRegistry built with {} commands, {} aliases", definitions.len(), by_alias.len());
        Ok(Self {
            commands: definitions,
            by_alias,
            by_name,
        })
    }

    /// Exact alias match; callers pass the already lower-cased invocation.
    pub fn resolve(&self, alias: &str) -> Option<&CommandDefinition> {
        self.by_alias.get(alias).map(|&i| &self.commands[i])
    }

    pub fn by_name(&self, name: &str) -> Option<&CommandDefinition> {
        self.by_name.get(name).map(|&i| &self.commands[i])
    }

    pub fn all(&self) -> Vec<&CommandDefinition> {
        self.commands.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
