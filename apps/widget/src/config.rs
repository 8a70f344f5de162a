use std::{fs, path::Path};

use anyhow::Context;
use widget_core::WidgetConfig;

pub const DEFAULT_CONFIG_FILE: &str = "widget.toml";

/// Builds the widget settings: defaults, then the TOML file, then `WIDGET__*`
/// environment overrides.
///
/// An explicit `path` must exist; the default `widget.toml` is optional.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<WidgetConfig> {
    let mut settings = match path {
        Some(path) => read_settings_file(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            read_settings_file(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => WidgetConfig::default(),
    };

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    settings.validate()?;
    Ok(settings)
}

fn read_settings_file(path: &Path) -> anyhow::Result<WidgetConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config '{}'", path.display()))?;
    parse_settings(&raw).with_context(|| format!("failed to parse config '{}'", path.display()))
}

fn parse_settings(raw: &str) -> anyhow::Result<WidgetConfig> {
    Ok(toml::from_str(raw)?)
}

fn apply_env_overrides(settings: &mut WidgetConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("WIDGET__COOKIE_NAME") {
        settings.cookie_name = v;
    }
    if let Some(v) = lookup("WIDGET__FORECAST_ENDPOINT") {
        settings.forecast_endpoint = v;
    }
    if let Some(v) = lookup("WIDGET__APP_ID") {
        settings.app_id = v;
    }
    if let Some(v) = lookup("WIDGET__TRACKING_ENDPOINT") {
        settings.tracking_endpoint = v;
    }
    if let Some(v) = lookup("WIDGET__ANCHOR_SELECTOR") {
        settings.anchor_selector = v;
    }
    if let Some(v) = lookup("WIDGET__FORECAST_ENTRIES") {
        if let Ok(parsed) = v.parse::<usize>() {
            settings.forecast_entries = parsed;
        }
    }
    if let Some(v) = lookup("WIDGET__TRACK_ACTION") {
        settings.track_action = v;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
