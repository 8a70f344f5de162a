use super::{apply_env_overrides, load_settings, parse_settings};

use std::{
    collections::HashMap,
    env, fs,
    path::Path,
    time::{SystemTime, UNIX_EPOCH},
};

use widget_core::WidgetConfig;

#[test]
fn partial_file_keeps_defaults_for_missing_keys() {
    let settings = parse_settings(
        "tracking_endpoint = \"https://collector.example.com/events\"\nforecast_entries = 5\n",
    )
    .expect("parse");
    assert_eq!(
        settings.tracking_endpoint,
        "https://collector.example.com/events"
    );
    assert_eq!(settings.forecast_entries, 5);
    assert_eq!(settings.cookie_name, WidgetConfig::default().cookie_name);
}

#[test]
fn env_overrides_win_and_bad_numbers_are_ignored() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("WIDGET__APP_ID", "override-key"),
        ("WIDGET__FORECAST_ENTRIES", "many"),
        ("WIDGET__TRACK_ACTION", "panel_toggle"),
    ]);
    let mut settings = WidgetConfig::default();
    apply_env_overrides(&mut settings, |key| env.get(key).map(|v| v.to_string()));

    assert_eq!(settings.app_id, "override-key");
    assert_eq!(settings.forecast_entries, 3);
    assert_eq!(settings.track_action, "panel_toggle");
}

#[test]
fn explicit_missing_file_is_an_error() {
    let err = load_settings(Some(Path::new("/nonexistent/widget.toml")))
        .expect_err("must fail")
        .to_string();
    assert!(err.contains("failed to read config"), "unexpected error: {err}");
}

#[test]
fn invalid_endpoint_in_file_is_rejected() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("weather_widget_config_{suffix}.toml"));
    fs::write(&path, "forecast_endpoint = \"::not a url::\"\n").expect("write config");

    let result = load_settings(Some(&path));
    fs::remove_file(&path).expect("cleanup");
    assert!(result.is_err());
}
