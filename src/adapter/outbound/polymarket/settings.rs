//! Polymarket Data API configuration.

use serde::Deserialize;

/// Settings for the public Data API client.
#[derive(Debug, Clone, Deserialize)]
pub struct DataApiConfig {
    /// Base URL of the Data API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Positions requested per page.
    #[serde(default = "default_position_page_size")]
    pub position_page_size: usize,
}

fn default_base_url() -> String {
    "https://data-api.polymarket.com".into()
}

const fn default_timeout_ms() -> u64 {
    10_000
}

const fn default_position_page_size() -> usize {
    100
}

impl Default for DataApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            position_page_size: default_position_page_size(),
        }
    }
}
