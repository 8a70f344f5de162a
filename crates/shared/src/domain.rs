use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! string_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_newtype!(SessionId);
string_newtype!(ActionName);

/// Experiment arm a session is bucketed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestGroup {
    A,
    B,
}

impl TestGroup {
    pub fn as_str(self) -> &'static str {
        match self {
            TestGroup::A => "A",
            TestGroup::B => "B",
        }
    }
}

impl fmt::Display for TestGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub timestamp: NaiveDateTime,
    pub description: String,
    pub temperature: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelVisibility {
    #[default]
    Hidden,
    Shown,
}

impl PanelVisibility {
    pub fn toggled(self) -> Self {
        match self {
            PanelVisibility::Hidden => PanelVisibility::Shown,
            PanelVisibility::Shown => PanelVisibility::Hidden,
        }
    }

    pub fn is_shown(self) -> bool {
        matches!(self, PanelVisibility::Shown)
    }

    /// Value of the panel's CSS `display` property in this state.
    pub fn css_display(self) -> &'static str {
        match self {
            PanelVisibility::Hidden => "none",
            PanelVisibility::Shown => "flex",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackingEvent {
    pub group: TestGroup,
    pub action: ActionName,
    pub timestamp: DateTime<Utc>,
}

impl TrackingEvent {
    pub fn now(group: TestGroup, action: ActionName) -> Self {
        Self {
            group,
            action,
            timestamp: Utc::now(),
        }
    }
}
