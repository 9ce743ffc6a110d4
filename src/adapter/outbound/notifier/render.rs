//! Alert rendering shared by every chat sink.
//!
//! Produces the plain-text lines of an alert; sinks add their own markup.
//!
//! ```text
//! 📉 1,250.00 YES @ 62¢ = $775.00 (25% of position)
//! 📍 Will it rain? YES: 3,750.00 @ 48¢ ($2,325.00) ▲ +$525.00 (+29.2%)
//! ```

use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::{ConsolidatedTrade, PositionSnapshot, Side};

/// Embed colour category of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Buy,
    Sell,
    /// A sell that closed the traded position.
    Exit,
}

impl Tone {
    #[must_use]
    pub const fn color(self) -> u32 {
        match self {
            Self::Buy => 0x00ff00,
            Self::Sell => 0xff0000,
            Self::Exit => 0xffa500,
        }
    }
}

/// A rendered alert, independent of the delivery channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedAlert {
    pub author_name: String,
    pub author_url: String,
    /// Market title.
    pub title: String,
    pub url: String,
    pub lines: Vec<String>,
    pub tone: Tone,
    pub fill_count: usize,
}

impl RenderedAlert {
    #[must_use]
    pub fn description(&self) -> String {
        self.lines.join("\n")
    }

    /// Market title followed by the fill-count suffix.
    #[must_use]
    pub fn title_with_fills(&self) -> String {
        format!("{}{}", self.title, fill_suffix(self.fill_count))
    }
}

/// Render a consolidated trade.
#[must_use]
pub fn render(trade: &ConsolidatedTrade) -> RenderedAlert {
    let latest = &trade.latest;
    let outcome = latest.outcome.to_uppercase();
    let traded = trade.traded_position();
    let is_sell = trade.side() == Side::Sell;
    let is_full_exit = is_sell && traded.is_some_and(|p| p.size.is_zero());

    let share_of_position = match traded {
        Some(position) if is_sell && !is_full_exit => {
            let before = trade.shares + position.size;
            let pct = trade.shares / before * Decimal::ONE_HUNDRED;
            format!(" ({}% of position)", fixed(pct, 0))
        }
        _ => String::new(),
    };

    let icon = if is_sell { "📉" } else { "📈" };
    let mut lines = vec![format!(
        "{icon} {} {outcome} @ {} = ${}{share_of_position}",
        format_amount(trade.shares),
        format_cents(trade.price),
        format_amount(trade.amount),
    )];

    if is_full_exit {
        lines.push(format!(
            "💰 Closed {outcome} position (was {} shares)",
            format_amount(trade.shares)
        ));
        lines.extend(
            trade
                .positions()
                .iter()
                .filter(|p| p.condition_id != latest.condition_id && p.size > Decimal::ZERO)
                .map(position_line),
        );
    } else {
        lines.extend(
            trade
                .positions()
                .iter()
                .filter(|p| p.size > Decimal::ZERO)
                .map(position_line),
        );
    }

    let tone = match (is_full_exit, trade.side()) {
        (true, _) => Tone::Exit,
        (false, Side::Buy) => Tone::Buy,
        (false, Side::Sell) => Tone::Sell,
    };

    RenderedAlert {
        author_name: latest.trader_name.clone(),
        author_url: latest.trader_profile_url.clone(),
        title: latest.market.clone(),
        url: latest.market_url.clone(),
        lines,
        tone,
        fill_count: trade.fill_count,
    }
}

/// `📍 {title} {OUTCOME}: {size} @ {avg}¢ (${value}){pnl}`
#[must_use]
pub fn position_line(position: &PositionSnapshot) -> String {
    format!(
        "📍 {} {}: {} @ {} (${}){}",
        position.title,
        position.outcome.to_uppercase(),
        format_amount(position.size),
        format_cents(position.avg_price),
        format_amount(position.current_value),
        pnl_suffix(position),
    )
}

/// Unrealized profit against cost basis, or empty when there is no basis.
#[must_use]
pub fn pnl_suffix(position: &PositionSnapshot) -> String {
    let cost = position.size * position.avg_price;
    if position.size.is_zero() || cost.is_zero() {
        return String::new();
    }

    let pnl = position.current_value - cost;
    let pct = pnl / cost * Decimal::ONE_HUNDRED;

    if pnl >= Decimal::ZERO {
        format!(" ▲ +${} (+{}%)", format_amount(pnl), fixed(pct, 1))
    } else {
        format!(" ▼ ${} ({}%)", format_amount(pnl.abs()), fixed(pct, 1))
    }
}

/// ` (N fills)` for consolidated alerts, empty for a single fill.
#[must_use]
pub fn fill_suffix(fill_count: usize) -> String {
    if fill_count > 1 {
        format!(" ({fill_count} fills)")
    } else {
        String::new()
    }
}

/// Two decimals with thousands separators: `1234.5` -> `1,234.50`.
#[must_use]
pub fn format_amount(value: Decimal) -> String {
    let text = fixed(value, 2);
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{sign}{grouped}.{frac_part}")
}

/// A 0-1 price as whole cents: `0.615` -> `62¢`.
#[must_use]
pub fn format_cents(price: Decimal) -> String {
    format!("{}¢", fixed(price * Decimal::ONE_HUNDRED, 0))
}

fn fixed(value: Decimal, dp: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded.to_string()
}
