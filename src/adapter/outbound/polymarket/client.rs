//! Polymarket Data API client.
//!
//! Read-only access to the public Data API (`data-api.polymarket.com`):
//! a trader's trade activity and their paginated positions. No
//! authentication is needed.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::dto::{ActivityDto, PositionDto};
use super::settings::DataApiConfig;
use crate::domain::PositionSnapshot;
use crate::error::Result;
use crate::port::{ActivityGateway, ActivityRecord, TRADE_ACTIVITY};

/// HTTP client for the Polymarket Data API.
pub struct DataApiClient {
    http: HttpClient,
    base_url: String,
}

impl DataApiClient {
    /// Create a client with reqwest defaults and no request timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: HttpClient::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn from_config(config: &DataApiConfig) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<T>().await?)
    }

    /// Fetch raw activity records for `address`.
    ///
    /// Records are decoded one by one; a record that does not decode is
    /// skipped so the rest of the response still gets through.
    pub async fn get_activity(&self, address: &str) -> Result<Vec<ActivityDto>> {
        let values: Vec<Value> = self
            .get_json(
                "/activity",
                &[
                    ("user", address.to_string()),
                    ("type", TRADE_ACTIVITY.to_string()),
                ],
            )
            .await?;

        Ok(values
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<ActivityDto>(value) {
                Ok(dto) => Some(dto),
                Err(err) => {
                    debug!(address, error = %err, "Skipping undecodable activity record");
                    None
                }
            })
            .collect())
    }

    /// Fetch one raw page of positions for `address`.
    pub async fn get_positions(
        &self,
        address: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<PositionDto>> {
        self.get_json(
            "/positions",
            &[
                ("user", address.to_string()),
                ("limit", limit.to_string()),
                ("offset", offset.to_string()),
            ],
        )
        .await
    }
}

#[async_trait]
impl ActivityGateway for DataApiClient {
    async fn fetch_activity(&self, address: &str) -> Result<Vec<ActivityRecord>> {
        let dtos = self.get_activity(address).await?;
        let total = dtos.len();
        let records: Vec<ActivityRecord> =
            dtos.into_iter().filter_map(ActivityDto::into_record).collect();

        debug!(address, total, usable = records.len(), "Fetched activity");
        Ok(records)
    }

    async fn fetch_positions(
        &self,
        address: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<PositionSnapshot>> {
        let page = self.get_positions(address, limit, offset).await?;
        debug!(address, limit, offset, count = page.len(), "Fetched positions page");
        Ok(page.into_iter().map(PositionSnapshot::from).collect())
    }

    fn gateway_name(&self) -> &'static str {
        "polymarket-data-api"
    }
}
