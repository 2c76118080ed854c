// src/repositories/postgres/mod.rs

pub mod chats;
pub mod custom_commands;
pub mod subscriptions;

pub use chats::PostgresChatRepository;
pub use custom_commands::PostgresCustomCommandRepository;
pub use subscriptions::PostgresSubscriptionRepository;
