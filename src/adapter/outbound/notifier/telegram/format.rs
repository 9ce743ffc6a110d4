//! Message formatting for Telegram notifications.

use crate::adapter::outbound::notifier::render::{RenderedAlert, Tone};

/// Format a rendered alert as a `MarkdownV2` message.
///
/// ```text
/// 🟢 [*whale*](https://polymarket.com/@whale)
/// [Will it rain? \(3 fills\)](https://polymarket.com/event/weather)
///
/// 📈 1,500\.00 YES @ 60¢ \= $900\.00
/// ```
#[must_use]
pub fn format_alert_message(alert: &RenderedAlert) -> String {
    let marker = match alert.tone {
        Tone::Buy => "🟢",
        Tone::Sell => "🔴",
        Tone::Exit => "🟠",
    };

    let mut msg = format!(
        "{marker} [*{}*]({})\n[{}]({})\n",
        escape_markdown(&alert.author_name),
        escape_link_url(&alert.author_url),
        escape_markdown(&alert.title_with_fills()),
        escape_link_url(&alert.url),
    );

    for line in &alert.lines {
        msg.push('\n');
        msg.push_str(&escape_markdown(line));
    }

    msg
}

/// Escape special characters for Telegram `MarkdownV2`.
pub fn escape_markdown(text: &str) -> String {
    let special_chars = [
        '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
        '\\',
    ];
    let mut result = String::with_capacity(text.len() * 2);

    for c in text.chars() {
        if special_chars.contains(&c) {
            result.push('\\');
        }
        result.push(c);
    }

    result
}

/// Escape the target of an inline link, where only `)` and `\` are special.
pub fn escape_link_url(url: &str) -> String {
    let mut result = String::with_capacity(url.len());
    for c in url.chars() {
        if c == ')' || c == '\\' {
            result.push('\\');
        }
        result.push(c);
    }
    result
}
