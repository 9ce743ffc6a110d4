//! `GET /activity` records.
//!
//! Example record:
//! ```json
//! {"type":"TRADE","side":"BUY","size":"120.5","usdcSize":"60.25","price":"0.5",
//!  "conditionId":"0xabc","title":"Will it rain?","slug":"will-it-rain",
//!  "eventSlug":"weather","outcome":"Yes","transactionHash":"0xdef","timestamp":1700000000}
//! ```

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::domain::Side;
use crate::port::ActivityRecord;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDto {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub side: Option<String>,
    pub size: Option<Decimal>,
    pub usdc_size: Option<Decimal>,
    pub price: Option<Decimal>,
    pub condition_id: Option<String>,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub event_slug: Option<String>,
    pub outcome: Option<String>,
    pub transaction_hash: Option<String>,
    pub timestamp: Option<i64>,
}

impl ActivityDto {
    /// Convert to an [`ActivityRecord`].
    ///
    /// Returns `None` for records that cannot be alerted: a side other than
    /// `BUY`/`SELL`, no transaction hash, a size or USDC amount that is
    /// missing or not positive, or a price outside `(0, 1]`.
    #[must_use]
    pub fn into_record(self) -> Option<ActivityRecord> {
        let side = match self.side.as_deref().map(str::to_ascii_uppercase).as_deref() {
            Some("BUY") => Side::Buy,
            Some("SELL") => Side::Sell,
            other => {
                debug!(
                    side = ?other,
                    tx = ?self.transaction_hash,
                    "Skipping record without trade side"
                );
                return None;
            }
        };

        let Some(transaction_hash) = self.transaction_hash.filter(|hash| !hash.is_empty()) else {
            debug!(condition = ?self.condition_id, "Skipping record without transaction hash");
            return None;
        };

        let (Some(size), Some(usdc_size), Some(price)) = (self.size, self.usdc_size, self.price)
        else {
            debug!(tx = %transaction_hash, "Skipping record without size or price");
            return None;
        };
        if size <= Decimal::ZERO || usdc_size <= Decimal::ZERO {
            debug!(
                tx = %transaction_hash,
                %size,
                %usdc_size,
                "Skipping record with non-positive size"
            );
            return None;
        }
        if price <= Decimal::ZERO || price > Decimal::ONE {
            debug!(tx = %transaction_hash, %price, "Skipping record with price out of range");
            return None;
        }

        Some(ActivityRecord {
            kind: self.kind.unwrap_or_default(),
            side,
            size,
            usdc_size,
            price,
            condition_id: self.condition_id.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            slug: self.slug.unwrap_or_default(),
            event_slug: self.event_slug.unwrap_or_default(),
            outcome: self.outcome.unwrap_or_default(),
            transaction_hash,
            timestamp: self.timestamp.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_string_and_number_fields() {
        let json = r#"[
            {"type":"TRADE","side":"BUY","size":"120.5","usdcSize":60.25,"price":"0.5",
             "conditionId":"0xabc","title":"Will it rain?","slug":"will-it-rain",
             "eventSlug":"weather","outcome":"Yes","transactionHash":"0xdef","timestamp":1700000000}
        ]"#;

        let dtos: Vec<ActivityDto> = serde_json::from_str(json).unwrap();
        let record = dtos.into_iter().next().unwrap().into_record().unwrap();

        assert!(record.is_trade());
        assert_eq!(record.side, Side::Buy);
        assert_eq!(record.size, dec!(120.5));
        assert_eq!(record.usdc_size, dec!(60.25));
        assert_eq!(record.event_slug, "weather");
        assert_eq!(record.timestamp, 1_700_000_000);
    }

    fn record(json: &str) -> Option<ActivityRecord> {
        serde_json::from_str::<ActivityDto>(json).unwrap().into_record()
    }

    #[test]
    fn null_descriptive_fields_default() {
        let record = record(
            r#"{"type":"TRADE","side":"sell","size":4,"usdcSize":2,"price":0.5,
                "transactionHash":"0x1","eventSlug":null}"#,
        )
        .unwrap();

        assert_eq!(record.side, Side::Sell);
        assert_eq!(record.event_slug, "");
        assert_eq!(record.outcome, "");
        assert_eq!(record.size, dec!(4));
    }

    #[test]
    fn records_without_amounts_are_skipped() {
        assert!(record(r#"{"type":"TRADE","side":"BUY","conditionId":"0xc","transactionHash":"0xt"}"#).is_none());
        assert!(record(r#"{"side":"BUY","size":10,"price":0.5,"transactionHash":"0xt"}"#).is_none());
    }

    #[test]
    fn records_with_non_positive_size_are_skipped() {
        assert!(record(r#"{"side":"BUY","size":0,"usdcSize":1,"price":0.5,"transactionHash":"0xt"}"#).is_none());
        assert!(record(r#"{"side":"SELL","size":-5,"usdcSize":2,"price":0.4,"transactionHash":"0xt"}"#).is_none());
        assert!(record(r#"{"side":"BUY","size":5,"usdcSize":"-2","price":0.4,"transactionHash":"0xt"}"#).is_none());
    }

    #[test]
    fn records_with_price_out_of_range_are_skipped() {
        assert!(record(r#"{"side":"BUY","size":5,"usdcSize":2,"price":0,"transactionHash":"0xt"}"#).is_none());
        assert!(record(r#"{"side":"BUY","size":5,"usdcSize":2,"price":"1.2","transactionHash":"0xt"}"#).is_none());
        assert!(record(r#"{"side":"BUY","size":5,"usdcSize":5,"price":1,"transactionHash":"0xt"}"#).is_some());
    }

    #[test]
    fn records_without_side_or_hash_are_skipped() {
        let no_side: ActivityDto =
            serde_json::from_str(r#"{"type":"REDEEM","transactionHash":"0x1"}"#).unwrap();
        let no_hash: ActivityDto =
            serde_json::from_str(r#"{"type":"TRADE","side":"BUY"}"#).unwrap();

        assert!(no_side.into_record().is_none());
        assert!(no_hash.into_record().is_none());
    }
}
