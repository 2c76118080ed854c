// File: livebot-core/src/platforms/mod.rs

pub mod http;
pub mod ivr;
pub mod seventv;
pub mod twitch;
pub mod twitch_eventsub;
pub mod twitch_irc;
