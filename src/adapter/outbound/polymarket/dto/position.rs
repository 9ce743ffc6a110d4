//! `GET /positions` records.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::PositionSnapshot;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionDto {
    pub condition_id: Option<String>,
    pub event_slug: Option<String>,
    pub title: Option<String>,
    pub size: Option<Decimal>,
    pub avg_price: Option<Decimal>,
    pub current_value: Option<Decimal>,
    pub outcome: Option<String>,
}

impl From<PositionDto> for PositionSnapshot {
    fn from(dto: PositionDto) -> Self {
        Self {
            outcome: dto.outcome.unwrap_or_default(),
            size: dto.size.unwrap_or_default(),
            avg_price: dto.avg_price.unwrap_or_default(),
            current_value: dto.current_value.unwrap_or_default(),
            condition_id: dto.condition_id.unwrap_or_default(),
            event_slug: dto.event_slug.unwrap_or_default(),
            title: dto.title.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn converts_numeric_fields() {
        let json = r#"{"conditionId":"0xabc","eventSlug":"weather","title":"Will it rain?",
                       "size":250,"avgPrice":0.42,"currentValue":"130.5","outcome":"No"}"#;

        let snapshot: PositionSnapshot = serde_json::from_str::<PositionDto>(json).unwrap().into();

        assert_eq!(snapshot.size, dec!(250));
        assert_eq!(snapshot.avg_price, dec!(0.42));
        assert_eq!(snapshot.current_value, dec!(130.5));
        assert_eq!(snapshot.outcome, "No");
    }
}
