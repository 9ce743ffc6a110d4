//! Telegram alert delivery.
//!
//! Provides Telegram bot integration for real-time trade alerts.

mod format;

pub mod notifier;

pub use format::{escape_markdown, format_alert_message};
pub use notifier::{TelegramConfig, TelegramNotifier};
