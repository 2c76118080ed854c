use std::fmt;
use serde::{Deserialize, Serialize};

/// Privilege level of a chat user, ordered from least to most privileged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    #[default]
    Generic,
    Mod,
    Broadcaster,
    Admin,
}

impl Role {
    /// Highest role whose fact holds. Admin wins over Broadcaster when both apply.
    pub fn from_facts(is_mod: bool, is_broadcaster: bool, is_admin: bool) -> Self {
        if is_admin {
            Role::Admin
        } else if is_broadcaster {
            Role::Broadcaster
        } else if is_mod {
            Role::Mod
        } else {
            Role::Generic
        }
    }

    pub fn satisfies(self, minimum: Role) -> bool {
        self >= minimum
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Generic => "None",
            Role::Mod => "Mod",
            Role::Broadcaster => "Broadcaster",
            Role::Admin => "Admin",
        };
        f.write_str(s)
    }
}
