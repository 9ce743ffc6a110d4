//! Notification adapters.
//!
//! Implements the `port::Notifier` trait for the chat backends. Every backend
//! renders through [`render`] so alerts read the same everywhere.

pub mod discord;
pub mod render;

#[cfg(feature = "telegram")]
pub mod telegram;

pub use discord::{DiscordConfig, DiscordNotifier};
