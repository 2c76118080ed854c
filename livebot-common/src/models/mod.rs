// File: livebot-common/src/models/mod.rs
pub mod chat;
pub mod custom_command;
pub mod helix;
pub mod ivr;
pub mod role;
pub mod seventv;
pub mod subscription;

pub use chat::Chat;
pub use custom_command::CustomCommand;
pub use helix::{EventSubSubscription, HelixChannel, HelixStream, HelixUser};
pub use ivr::BanStatus;
pub use role::Role;
pub use seventv::{SevenTvEmote, SevenTvEmoteSet, SevenTvUser};
pub use subscription::{Subscriber, Subscription};
