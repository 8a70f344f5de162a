use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a widget run stopped before mounting anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbortReason {
    MissingSessionCookie,
    GroupExcluded,
    MissingCoordinates,
    ForecastUnavailable,
    MissingForecastList,
    MalformedForecast,
    MissingAnchor,
}

impl AbortReason {
    pub fn message(self) -> &'static str {
        match self {
            AbortReason::MissingSessionCookie => "user id not found in cookies",
            AbortReason::GroupExcluded => "weather is not displayed for this group",
            AbortReason::MissingCoordinates => "coordinates not found",
            AbortReason::ForecastUnavailable => "failed to fetch weather data",
            AbortReason::MissingForecastList => "no weather data received",
            AbortReason::MalformedForecast => "weather data could not be read",
            AbortReason::MissingAnchor => "target element for weather link not found",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForecastItemError {
    #[error("forecast item has no dt_txt")]
    MissingTimestamp,
    #[error("forecast item timestamp {raw:?} is not `YYYY-MM-DD HH:MM:SS`")]
    InvalidTimestamp { raw: String },
    #[error("forecast item has no weather description")]
    MissingDescription,
    #[error("forecast item has no temperature")]
    MissingTemperature,
}
