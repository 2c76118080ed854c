use serde::{Deserialize, Serialize};

/// One emote of a user's active 7TV emote set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SevenTvEmote {
    pub name: String,
    /// When the emote was added to the set, in Unix milliseconds.
    #[serde(default)]
    pub timestamp: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SevenTvEmoteSet {
    #[serde(default)]
    pub emotes: Vec<SevenTvEmote>,
}

/// Subset of the `GET /v3/users/twitch/{id}` response. `emote_set` is null
/// for profiles that never picked a set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SevenTvUser {
    #[serde(default)]
    pub emote_set: Option<SevenTvEmoteSet>,
}

impl SevenTvUser {
    pub fn into_emotes(self) -> Vec<SevenTvEmote> {
        self.emote_set.map(|set| set.emotes).unwrap_or_default()
    }
}
