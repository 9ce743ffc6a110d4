//! Polymarket Data API integration.

pub mod client;
pub mod dto;
pub mod settings;

pub use client::DataApiClient;
pub use settings::DataApiConfig;
