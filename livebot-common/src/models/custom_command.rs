use serde::{Deserialize, Serialize};

pub const MAX_CUSTOM_COMMAND_NAME_LEN: usize = 100;
pub const MAX_CUSTOM_COMMAND_REPLY_LEN: usize = 400;

/// A per-chat text command (e.g. `#discord`) that just echoes `reply`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomCommand {
    pub chat_id: i64,
    pub name: String,
    pub reply: String,
}
