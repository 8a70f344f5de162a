use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::{ForecastEntry, Location},
    error::ForecastItemError,
    protocol::{ForecastItem, ForecastResponse},
};

use crate::error::ForecastError;

#[async_trait]
pub trait ForecastSource: Send + Sync {
    async fn fetch_forecast(&self, location: Location) -> Result<ForecastResponse, ForecastError>;
}

/// Client for the upstream forecast endpoint.
pub struct ForecastClient {
    http: Client,
    endpoint: String,
    app_id: String,
}

impl ForecastClient {
    pub fn new(http: Client, endpoint: impl Into<String>, app_id: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            app_id: app_id.into(),
        }
    }
}

#[async_trait]
impl ForecastSource for ForecastClient {
    async fn fetch_forecast(&self, location: Location) -> Result<ForecastResponse, ForecastError> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("appid", self.app_id.clone()),
                ("lat", location.latitude.to_string()),
                ("lon", location.longitude.to_string()),
            ])
            .send()
            .await
            .map_err(ForecastError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ForecastError::Status { status });
        }

        response.json().await.map_err(ForecastError::Decode)
    }
}

/// Converts the last `count` upstream items, keeping upstream order. Items
/// before the retained tail are never inspected.
pub fn select_recent(
    items: &[ForecastItem],
    count: usize,
) -> Result<Vec<ForecastEntry>, ForecastItemError> {
    let start = items.len().saturating_sub(count);
    items[start..].iter().map(ForecastEntry::try_from).collect()
}
