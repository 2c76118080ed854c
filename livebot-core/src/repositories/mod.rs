// src/repositories/mod.rs

pub mod postgres;

pub use livebot_common::traits::repository_traits::{
    ChatRepository, CustomCommandRepository, SubscriptionRepository,
};
