use std::{fmt, sync::Arc};

use anyhow::{anyhow, bail, Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::{
    domain::{ActionName, PanelVisibility, TestGroup, TrackingEvent},
    error::AbortReason,
};
use tokio::{runtime::Handle, task::JoinHandle};
use tracing::{error, info};
use url::Url;

pub mod bucketing;
pub mod cookie;
pub mod error;
pub mod forecast;
pub mod memory_page;
pub mod page;
pub mod presentation;
pub mod tracking;

use bucketing::assign_group;
use cookie::{session_id, CookieSource};
use forecast::{select_recent, ForecastClient, ForecastSource};
use page::{AnchorElementLocator, AnchorSelector, LocationProvider, PanelElement, StyleSink};
use presentation::{render_cards, render_link, WeatherCard, STYLESHEET};
use tracking::{spawn_beacon, BeaconSink, TrackingClient};

pub const DEFAULT_COOKIE_NAME: &str = "__uzmaj3";
pub const DEFAULT_FORECAST_ENDPOINT: &str =
    "https://europe-west1-amigo-actions.cloudfunctions.net/recruitment-mock-weather-endpoint/forecast";
pub const DEFAULT_APP_ID: &str = "a2ef86c41a";
pub const DEFAULT_TRACKING_ENDPOINT: &str = "https://our-api-endpoint.com";
pub const DEFAULT_ANCHOR_SELECTOR: &str = ".Placestyle__StyledPlaceSummaryLinks-sc-7yy3d-8.bBhRRC";
pub const DEFAULT_FORECAST_ENTRIES: usize = 3;
pub const DEFAULT_TRACK_ACTION: &str = "weather_info_click";

/// Group that gets the widget; every other group aborts at the gate.
const DISPLAY_GROUP: TestGroup = TestGroup::A;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub cookie_name: String,
    pub forecast_endpoint: String,
    pub app_id: String,
    pub tracking_endpoint: String,
    pub anchor_selector: String,
    pub forecast_entries: usize,
    pub track_action: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_COOKIE_NAME.into(),
            forecast_endpoint: DEFAULT_FORECAST_ENDPOINT.into(),
            app_id: DEFAULT_APP_ID.into(),
            tracking_endpoint: DEFAULT_TRACKING_ENDPOINT.into(),
            anchor_selector: DEFAULT_ANCHOR_SELECTOR.into(),
            forecast_entries: DEFAULT_FORECAST_ENTRIES,
            track_action: DEFAULT_TRACK_ACTION.into(),
        }
    }
}

impl WidgetConfig {
    pub fn validate(&self) -> Result<()> {
        if self.cookie_name.trim().is_empty() {
            bail!("cookie_name must not be empty");
        }
        Url::parse(&self.forecast_endpoint)
            .with_context(|| format!("invalid forecast_endpoint '{}'", self.forecast_endpoint))?;
        Url::parse(&self.tracking_endpoint)
            .with_context(|| format!("invalid tracking_endpoint '{}'", self.tracking_endpoint))?;
        self.selector()?;
        if self.forecast_entries == 0 {
            bail!("forecast_entries must be at least 1");
        }
        if self.track_action.trim().is_empty() {
            bail!("track_action must not be empty");
        }
        Ok(())
    }

    pub fn selector(&self) -> Result<AnchorSelector> {
        self.anchor_selector
            .parse()
            .map_err(|err| anyhow!("invalid anchor_selector: {err}"))
    }
}

/// The adapters a widget run reads from and writes into.
#[derive(Clone)]
pub struct HostPage {
    pub cookies: Arc<dyn CookieSource>,
    pub location: Arc<dyn LocationProvider>,
    pub anchors: Arc<dyn AnchorElementLocator>,
    pub styles: Option<Arc<dyn StyleSink>>,
}

impl HostPage {
    pub fn from_page<P>(page: Arc<P>) -> Self
    where
        P: CookieSource + LocationProvider + AnchorElementLocator + StyleSink + 'static,
    {
        Self {
            cookies: page.clone(),
            location: page.clone(),
            anchors: page.clone(),
            styles: Some(page),
        }
    }
}

#[derive(Debug)]
pub enum RunOutcome {
    Mounted(MountedWidget),
    Aborted(AbortReason),
}

impl RunOutcome {
    pub fn abort_reason(&self) -> Option<AbortReason> {
        match self {
            RunOutcome::Mounted(_) => None,
            RunOutcome::Aborted(reason) => Some(*reason),
        }
    }

    pub fn into_mounted(self) -> Option<MountedWidget> {
        match self {
            RunOutcome::Mounted(widget) => Some(widget),
            RunOutcome::Aborted(_) => None,
        }
    }
}

pub struct WeatherWidget {
    config: WidgetConfig,
    selector: AnchorSelector,
    page: HostPage,
    forecast: Arc<dyn ForecastSource>,
    beacons: Arc<dyn BeaconSink>,
}

impl WeatherWidget {
    pub fn new(config: WidgetConfig, page: HostPage) -> Result<Self> {
        let http = Client::new();
        let forecast = Arc::new(ForecastClient::new(
            http.clone(),
            config.forecast_endpoint.clone(),
            config.app_id.clone(),
        ));
        let beacons = Arc::new(TrackingClient::new(http, config.tracking_endpoint.clone()));
        Self::new_with_dependencies(config, page, forecast, beacons)
    }

    pub fn new_with_dependencies(
        config: WidgetConfig,
        page: HostPage,
        forecast: Arc<dyn ForecastSource>,
        beacons: Arc<dyn BeaconSink>,
    ) -> Result<Self> {
        config.validate()?;
        let selector = config.selector()?;
        Ok(Self {
            config,
            selector,
            page,
            forecast,
            beacons,
        })
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    /// Runs the flow once. Every failure ends the run with an abort reason
    /// and leaves the page as it was.
    pub async fn run(&self) -> RunOutcome {
        match self.mount().await {
            Ok(widget) => RunOutcome::Mounted(widget),
            Err(reason) => RunOutcome::Aborted(reason),
        }
    }

    async fn mount(&self) -> Result<MountedWidget, AbortReason> {
        let session = session_id(self.page.cookies.as_ref(), &self.config.cookie_name)
            .ok_or_else(|| abort(AbortReason::MissingSessionCookie))?;

        let group = assign_group(&session);
        if group != DISPLAY_GROUP {
            info!(group = %group, "widget: weather is not displayed for this group");
            return Err(AbortReason::GroupExcluded);
        }

        let location = self
            .page
            .location
            .location()
            .ok_or_else(|| abort(AbortReason::MissingCoordinates))?;

        let response = self.forecast.fetch_forecast(location).await.map_err(|err| {
            error!(
                latitude = location.latitude,
                longitude = location.longitude,
                "widget: error fetching weather data: {err}"
            );
            AbortReason::ForecastUnavailable
        })?;
        let items = response
            .list
            .ok_or_else(|| abort(AbortReason::MissingForecastList))?;
        let entries = select_recent(&items, self.config.forecast_entries).map_err(|err| {
            error!("widget: unreadable forecast item: {err}");
            AbortReason::MalformedForecast
        })?;

        let anchor = self.page.anchors.locate(&self.selector).ok_or_else(|| {
            error!(selector = %self.selector, "widget: {}", AbortReason::MissingAnchor.message());
            AbortReason::MissingAnchor
        })?;

        let cards: Vec<WeatherCard> = entries.iter().map(WeatherCard::from).collect();
        anchor.append_list_item(&render_link());
        let panel = anchor.append_panel(&render_cards(&cards), PanelVisibility::Hidden);
        if let Some(styles) = &self.page.styles {
            styles.inject_styles(STYLESHEET);
        }

        info!(group = %group, cards = cards.len(), "widget: weather panel mounted");
        Ok(MountedWidget {
            group,
            cards,
            visibility: PanelVisibility::Hidden,
            panel,
            action: ActionName::new(self.config.track_action.clone()),
            beacons: Arc::clone(&self.beacons),
            runtime: Handle::current(),
        })
    }
}

fn abort(reason: AbortReason) -> AbortReason {
    error!("widget: {}", reason.message());
    reason
}

/// A mounted panel and its toggle link.
pub struct MountedWidget {
    group: TestGroup,
    cards: Vec<WeatherCard>,
    visibility: PanelVisibility,
    panel: Arc<dyn PanelElement>,
    action: ActionName,
    beacons: Arc<dyn BeaconSink>,
    runtime: Handle,
}

impl MountedWidget {
    pub fn group(&self) -> TestGroup {
        self.group
    }

    pub fn cards(&self) -> &[WeatherCard] {
        &self.cards
    }

    pub fn visibility(&self) -> PanelVisibility {
        self.visibility
    }

    /// Handles a click on the toggle link: flips the panel, then fires the
    /// tracking beacon. The flip never waits on, or depends on, the beacon.
    ///
    /// The beacon runs on the runtime that mounted the widget, so this may be
    /// called from outside any runtime context.
    pub fn toggle(&mut self) -> JoinHandle<()> {
        self.visibility = self.visibility.toggled();
        self.panel.set_visibility(self.visibility);
        spawn_beacon(
            &self.runtime,
            Arc::clone(&self.beacons),
            TrackingEvent::now(self.group, self.action.clone()),
        )
    }
}

impl fmt::Debug for MountedWidget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountedWidget")
            .field("group", &self.group)
            .field("cards", &self.cards)
            .field("visibility", &self.visibility)
            .field("action", &self.action)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
