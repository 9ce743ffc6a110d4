//! Polymarket Data API response types.
//!
//! Numeric fields arrive as either JSON strings or numbers and may be null;
//! every field is optional here and defaulted during conversion.

pub mod activity;
pub mod position;

pub use activity::ActivityDto;
pub use position::PositionDto;
