use serde::{Deserialize, Serialize};

/// Subset of the api.ivr.fi `/v2/twitch/user` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BanStatus {
    pub display_name: String,
    #[serde(default)]
    pub banned: bool,
    #[serde(default)]
    pub ban_reason: Option<String>,
}
