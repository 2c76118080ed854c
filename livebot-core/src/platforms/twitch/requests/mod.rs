// File: livebot-core/src/platforms/twitch/requests/mod.rs

use serde::Deserialize;

pub mod channel;
pub mod follow;
pub mod stream;
pub mod token;
pub mod user;

/// The `{"data": [...]}` envelope most Helix endpoints use.
#[derive(Debug, Deserialize)]
pub struct HelixData<T> {
    pub data: Vec<T>,
}
