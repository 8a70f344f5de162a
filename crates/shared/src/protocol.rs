use chrono::{NaiveDateTime, SecondsFormat};
use serde::{de::IgnoredAny, Deserialize, Deserializer, Serialize};

use crate::{
    domain::{ForecastEntry, TestGroup, TrackingEvent},
    error::ForecastItemError,
};

pub const FORECAST_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Body of the upstream forecast endpoint. Only `list` is read.
///
/// Items decode leniently: a field that is absent, null or of the wrong type
/// becomes `None`, and an item that is not an object becomes an empty item.
/// A bad item therefore only fails the run when it is among the retained
/// entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastResponse {
    #[serde(default, deserialize_with = "lenient_items")]
    pub list: Option<Vec<ForecastItem>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastItem {
    #[serde(default, deserialize_with = "lenient")]
    pub dt_txt: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub weather: Option<Vec<WeatherCondition>>,
    #[serde(default, deserialize_with = "lenient")]
    pub main: Option<MainReadings>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherCondition {
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MainReadings {
    #[serde(default, deserialize_with = "lenient")]
    pub temp: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Value(T),
    Other(IgnoredAny),
}

impl<T> Lenient<T> {
    fn into_option(self) -> Option<T> {
        match self {
            Lenient::Value(value) => Some(value),
            Lenient::Other(_) => None,
        }
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Lenient::<T>::deserialize(deserializer)?.into_option())
}

fn lenient_items<'de, D>(deserializer: D) -> Result<Option<Vec<ForecastItem>>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Option<Vec<Lenient<ForecastItem>>> = Option::deserialize(deserializer)?;
    Ok(items.map(|items| {
        items
            .into_iter()
            .map(|item| item.into_option().unwrap_or_default())
            .collect()
    }))
}

impl TryFrom<&ForecastItem> for ForecastEntry {
    type Error = ForecastItemError;

    fn try_from(item: &ForecastItem) -> Result<Self, Self::Error> {
        let raw = item
            .dt_txt
            .as_deref()
            .ok_or(ForecastItemError::MissingTimestamp)?;
        let timestamp = NaiveDateTime::parse_from_str(raw, FORECAST_TIMESTAMP_FORMAT).map_err(
            |_| ForecastItemError::InvalidTimestamp {
                raw: raw.to_string(),
            },
        )?;
        let description = item
            .weather
            .as_ref()
            .and_then(|conditions| conditions.first())
            .and_then(|condition| condition.description.clone())
            .ok_or(ForecastItemError::MissingDescription)?;
        let temperature = item
            .main
            .as_ref()
            .and_then(|main| main.temp)
            .ok_or(ForecastItemError::MissingTemperature)?;

        Ok(ForecastEntry {
            timestamp,
            description,
            temperature,
        })
    }
}

/// JSON body posted to the tracking endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingPayload {
    pub user_group: TestGroup,
    pub action: String,
    pub timestamp: String,
}

impl From<&TrackingEvent> for TrackingPayload {
    fn from(event: &TrackingEvent) -> Self {
        Self {
            user_group: event.group,
            action: event.action.0.clone(),
            timestamp: event.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;
    use crate::domain::ActionName;

    #[test]
    fn converts_complete_item() {
        let item: ForecastItem = serde_json::from_value(json!({
            "dt": 1700000000,
            "dt_txt": "2024-03-01 18:00:00",
            "weather": [{ "id": 500, "description": "light rain" }],
            "main": { "temp": 11.26, "humidity": 80 }
        }))
        .expect("item");

        let entry = ForecastEntry::try_from(&item).expect("entry");
        assert_eq!(entry.timestamp.format("%H:%M").to_string(), "18:00");
        assert_eq!(entry.description, "light rain");
        assert!((entry.temperature - 11.26).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_items_missing_fields() {
        let no_weather: ForecastItem = serde_json::from_value(json!({
            "dt_txt": "2024-03-01 18:00:00",
            "weather": [],
            "main": { "temp": 1.0 }
        }))
        .expect("item");
        assert_eq!(
            ForecastEntry::try_from(&no_weather),
            Err(ForecastItemError::MissingDescription)
        );

        let bad_time: ForecastItem = serde_json::from_value(json!({
            "dt_txt": "18:00",
            "weather": [{ "description": "clear sky" }],
            "main": { "temp": 1.0 }
        }))
        .expect("item");
        assert!(matches!(
            ForecastEntry::try_from(&bad_time),
            Err(ForecastItemError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn wrongly_typed_fields_decode_as_missing() {
        let body: ForecastResponse = serde_json::from_value(json!({
            "list": [
                { "weather": null, "main": { "temp": "n/a" } },
                "not an item",
                null,
                { "dt_txt": 42, "weather": [5], "main": [] },
                {
                    "dt_txt": "2024-03-01 18:00:00",
                    "weather": [{ "description": "light rain" }],
                    "main": { "temp": 11.5 }
                }
            ]
        }))
        .expect("body");

        let items = body.list.expect("list");
        assert_eq!(items.len(), 5);
        for item in &items[..4] {
            assert!(ForecastEntry::try_from(item).is_err());
        }
        assert_eq!(
            ForecastEntry::try_from(&items[0]),
            Err(ForecastItemError::MissingTimestamp)
        );
        let entry = ForecastEntry::try_from(&items[4]).expect("entry");
        assert_eq!(entry.description, "light rain");
    }

    #[test]
    fn missing_list_deserializes_to_none() {
        let body: ForecastResponse = serde_json::from_value(json!({ "cod": "200" })).expect("body");
        assert!(body.list.is_none());

        let body: ForecastResponse = serde_json::from_value(json!({ "list": null })).expect("body");
        assert!(body.list.is_none());
    }

    #[test]
    fn tracking_payload_uses_camel_case_and_millisecond_timestamp() {
        let event = TrackingEvent {
            group: TestGroup::A,
            action: ActionName::new("weather_info_click"),
            timestamp: Utc
                .with_ymd_and_hms(2024, 3, 1, 9, 30, 0)
                .single()
                .expect("timestamp"),
        };

        let value = serde_json::to_value(TrackingPayload::from(&event)).expect("json");
        assert_eq!(
            value,
            json!({
                "userGroup": "A",
                "action": "weather_info_click",
                "timestamp": "2024-03-01T09:30:00.000Z"
            })
        );
    }
}
