//! Adapters between the widget and the page it is mounted into.
//!
//! The host page is third-party and its shape is undocumented: embedded data
//! is read through [`LocationProvider`] and the insertion point is found
//! through [`AnchorElementLocator`].

use std::{fmt, str::FromStr, sync::Arc};

use serde_json::Value;
use shared::domain::{Location, PanelVisibility};

use crate::error::SelectorError;

/// JSON pointer to the coordinates inside the page's embedded Next.js data.
pub const NEXT_DATA_LOCATION_POINTER: &str =
    "/props/pageProps/appContext/place/data/location/latitudeLongitude";

pub trait LocationProvider: Send + Sync {
    fn location(&self) -> Option<Location>;
}

/// Reads coordinates from a page's embedded `__NEXT_DATA__` document.
pub struct NextDataLocation {
    data: Value,
}

impl NextDataLocation {
    pub fn new(data: Value) -> Self {
        Self { data }
    }
}

impl LocationProvider for NextDataLocation {
    fn location(&self) -> Option<Location> {
        location_from_next_data(&self.data)
    }
}

pub fn location_from_next_data(data: &Value) -> Option<Location> {
    let coordinates = data.pointer(NEXT_DATA_LOCATION_POINTER)?;
    Some(Location {
        latitude: coordinate(coordinates.get("latitude")?)?,
        longitude: coordinate(coordinates.get("longitude")?)?,
    })
}

fn coordinate(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Class-chain selector (`.a.b`) for the container holding the link list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorSelector {
    classes: Vec<String>,
}

impl AnchorSelector {
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn matches<S: AsRef<str>>(&self, element_classes: &[S]) -> bool {
        self.classes
            .iter()
            .all(|wanted| element_classes.iter().any(|class| class.as_ref() == wanted))
    }
}

impl FromStr for AnchorSelector {
    type Err = SelectorError;

    fn from_str(selector: &str) -> Result<Self, Self::Err> {
        let selector = selector.trim();
        if selector.is_empty() {
            return Err(SelectorError::Empty);
        }
        let unsupported = || SelectorError::Unsupported {
            selector: selector.to_string(),
        };

        let rest = selector.strip_prefix('.').ok_or_else(unsupported)?;
        let classes: Vec<String> = rest.split('.').map(str::to_string).collect();
        if classes
            .iter()
            .any(|class| class.is_empty() || class.contains(char::is_whitespace))
        {
            return Err(unsupported());
        }

        Ok(Self { classes })
    }
}

impl fmt::Display for AnchorSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for class in &self.classes {
            write!(f, ".{class}")?;
        }
        Ok(())
    }
}

pub trait AnchorElementLocator: Send + Sync {
    /// Finds the `ul` inside the first container matching `selector`. Returns
    /// `None` when either the container or its list is missing.
    fn locate(&self, selector: &AnchorSelector) -> Option<Arc<dyn LinkListAnchor>>;
}

pub trait LinkListAnchor: Send + Sync {
    /// Appends an `li` with the given inner markup to the list.
    fn append_list_item(&self, html: &str);

    /// Appends a `weather-info` panel holding `html` to the list's parent.
    fn append_panel(&self, html: &str, visibility: PanelVisibility) -> Arc<dyn PanelElement>;
}

pub trait PanelElement: Send + Sync {
    fn set_visibility(&self, visibility: PanelVisibility);
}

pub trait StyleSink: Send + Sync {
    fn inject_styles(&self, css: &str);
}
