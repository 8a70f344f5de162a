//! Markup for the toggle link, the forecast cards and their stylesheet.

use chrono::NaiveDateTime;
use shared::domain::ForecastEntry;

pub const TEMPERATURE_UNIT: &str = "°C";
pub const LINK_ID: &str = "weather-info-link";
pub const LINK_TARGET: &str = "#place-weather";
pub const LINK_LABEL: &str = "Weather Information";

pub const STYLESHEET: &str = r#"
.weather-info {
    display: flex;
    justify-content: center;
    gap: 40px;
    flex-wrap: wrap;
}
.weather-card {
    background-color: rgb(237 236 233);
    text-align: center;
    padding: 5px;
    border: 1px solid #ccc;
    border-radius: 8px;
    width: 80px;
    box-sizing: border-box;
    margin: 2px;
}
.weather-time {
    font-size: 18px;
    font-weight: bold;
}
.weather-icon {
    font-size: 24px;
    margin: 10px 0;
}
.weather-info {
    font-size: 16px;
    margin: 10px 0;
}
.weather-temp {
    font-size: 18px;
    font-weight: bold;
}
"#;

/// Icon for a weather description. Case-sensitive, first match wins.
pub fn weather_icon(description: &str) -> &'static str {
    if description.contains("rain") {
        "⛈️"
    } else if description.contains("cloud") {
        "☁️"
    } else if description.contains("sun") {
        "🌞"
    } else {
        "🌈"
    }
}

pub fn format_time(timestamp: &NaiveDateTime) -> String {
    timestamp.format("%H:%M").to_string()
}

pub fn format_temperature(celsius: f64) -> String {
    format!("{}{TEMPERATURE_UNIT}", to_fixed_1(celsius))
}

/// One-decimal rendering with JavaScript `toFixed(1)` rounding: nearest to
/// the exact binary value, ties away from zero.
fn to_fixed_1(value: f64) -> String {
    if value == 0.0 {
        return "0.0".to_string();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();

    // A tie at one decimal means `magnitude` is an odd multiple of 1/4.
    // Scaling by 4 is exact, so the check is too.
    let quarters = magnitude * 4.0;
    if quarters < (1u64 << 53) as f64 && quarters.fract() == 0.0 && (quarters as u64) % 2 == 1 {
        let tenths = (5 * (quarters as u64) + 1) / 2;
        return format!("{sign}{}.{}", tenths / 10, tenths % 10);
    }

    // Off ties the formatter already rounds the exact value to nearest.
    format!("{sign}{magnitude:.1}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherCard {
    pub time: String,
    pub icon: &'static str,
    pub description: String,
    pub temperature: String,
}

impl From<&ForecastEntry> for WeatherCard {
    fn from(entry: &ForecastEntry) -> Self {
        Self {
            time: format_time(&entry.timestamp),
            icon: weather_icon(&entry.description),
            description: entry.description.clone(),
            temperature: format_temperature(entry.temperature),
        }
    }
}

impl WeatherCard {
    pub fn to_html(&self) -> String {
        format!(
            concat!(
                r#"<div class="weather-card">"#,
                r#"<div class="weather-time">{}</div>"#,
                r#"<div class="weather-icon">{}</div>"#,
                r#"<div class="weather-info">{}</div>"#,
                r#"<div class="weather-temp">{}</div>"#,
                "</div>"
            ),
            self.time,
            self.icon,
            escape_html(&self.description),
            self.temperature
        )
    }
}

pub fn render_cards(cards: &[WeatherCard]) -> String {
    cards.iter().map(WeatherCard::to_html).collect()
}

/// Inner markup of the list item carrying the toggle link.
pub fn render_link() -> String {
    format!(
        concat!(
            r#"<a href="{target}" id="{id}" class="Linkstyle__StyledLink-sc-1dp2vo7-3 bSoROX has-endIcon">"#,
            r#"<span class="Linkstyle__LabelText-sc-1dp2vo7-0 kBebOv">{label}</span>"#,
            r#"<span class="Linkstyle__LabelIcon-sc-1dp2vo7-1 ecwYtg">"#,
            r#"<span class="Iconstyle__SVGWrapper-sc-461blh-0 eoSxjx">"#,
            r#"<svg xmlns="http://www.w3.org/2000/svg" preserveAspectRatio="xMidYMid meet" aria-hidden="true" focusable="false" viewBox="0 0 16 16" width="100%" height="100%">"#,
            r#"<g><path d="M10.86,12.37L1.5,3.01L3.01,1.5l9.36,9.36V1.72h2.13V14.5H1.72v-2.13H10.86z"></path></g>"#,
            "</svg></span></span></a>"
        ),
        target = LINK_TARGET,
        id = LINK_ID,
        label = LINK_LABEL
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_follows_first_matching_keyword() {
        assert_eq!(weather_icon("light rain"), "⛈️");
        assert_eq!(weather_icon("rain and clouds"), "⛈️");
        assert_eq!(weather_icon("overcast clouds"), "☁️");
        assert_eq!(weather_icon("sunny"), "🌞");
        assert_eq!(weather_icon("clear sky"), "🌈");
        assert_eq!(weather_icon("Rain"), "🌈");
    }

    #[test]
    fn formats_time_and_temperature() {
        let timestamp =
            NaiveDateTime::parse_from_str("2024-03-01 06:05:59", "%Y-%m-%d %H:%M:%S")
                .expect("timestamp");
        assert_eq!(format_time(&timestamp), "06:05");
        assert_eq!(format_temperature(7.26), "7.3°C");
        assert_eq!(format_temperature(-2.0), "-2.0°C");
        assert_eq!(format_temperature(15.0), "15.0°C");
    }

    #[test]
    fn temperature_ties_round_away_from_zero() {
        assert_eq!(format_temperature(4.25), "4.3°C");
        assert_eq!(format_temperature(-0.25), "-0.3°C");
        assert_eq!(format_temperature(11.75), "11.8°C");
        assert_eq!(format_temperature(0.75), "0.8°C");
        assert_eq!(format_temperature(-12.25), "-12.3°C");
    }

    #[test]
    fn temperature_off_ties_use_the_exact_value() {
        assert_eq!(format_temperature(0.35), "0.3°C");
        assert_eq!(format_temperature(1.45), "1.4°C");
        assert_eq!(format_temperature(2.5), "2.5°C");
        assert_eq!(format_temperature(-0.04), "-0.0°C");
        assert_eq!(format_temperature(-0.0), "0.0°C");
        assert_eq!(format_temperature(0.0), "0.0°C");
    }

    #[test]
    fn card_markup_escapes_description() {
        let card = WeatherCard {
            time: "12:00".to_string(),
            icon: "🌈",
            description: "<b>odd</b> & \"windy\"".to_string(),
            temperature: "1.0°C".to_string(),
        };
        let html = card.to_html();
        assert!(html.contains(
            r#"<div class="weather-info">&lt;b&gt;odd&lt;/b&gt; &amp; &quot;windy&quot;</div>"#
        ));
        assert!(html.starts_with(r#"<div class="weather-card">"#));
    }

    #[test]
    fn link_targets_the_panel_anchor() {
        let link = render_link();
        assert!(link.contains(r##"href="#place-weather""##));
        assert!(link.contains(r#"id="weather-info-link""#));
        assert!(link.contains(">Weather Information<"));
    }
}
