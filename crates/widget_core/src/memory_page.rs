//! In-memory host page used by the CLI and the tests.

use std::{
    fmt::Write as _,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use serde_json::Value;
use shared::domain::{Location, PanelVisibility};

use crate::{
    cookie::CookieSource,
    page::{
        location_from_next_data, AnchorElementLocator, AnchorSelector, LinkListAnchor,
        LocationProvider, PanelElement, StyleSink,
    },
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainerNode {
    pub classes: Vec<String>,
    /// Items of the child `ul`, or `None` when the container has no list.
    pub list_items: Option<Vec<String>>,
    pub panels: Vec<PanelNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelNode {
    pub html: String,
    pub visibility: PanelVisibility,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageSnapshot {
    pub containers: Vec<ContainerNode>,
    pub styles: Vec<String>,
}

impl PageSnapshot {
    pub fn is_untouched(&self) -> bool {
        self.styles.is_empty()
            && self.containers.iter().all(|container| {
                container.panels.is_empty()
                    && container
                        .list_items
                        .as_ref()
                        .map_or(true, |items| items.is_empty())
            })
    }
}

#[derive(Default)]
pub struct InMemoryPage {
    cookie: Option<String>,
    next_data: Option<Value>,
    state: Arc<Mutex<PageSnapshot>>,
}

impl InMemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cookie(mut self, header: impl Into<String>) -> Self {
        self.cookie = Some(header.into());
        self
    }

    pub fn with_next_data(mut self, data: Value) -> Self {
        self.next_data = Some(data);
        self
    }

    pub fn with_container(self, classes: &[&str], has_list: bool) -> Self {
        lock(&self.state).containers.push(ContainerNode {
            classes: classes.iter().map(|class| class.to_string()).collect(),
            list_items: has_list.then(Vec::new),
            panels: Vec::new(),
        });
        self
    }

    /// Adds a container with an empty list that `selector` will match.
    pub fn with_anchor_for(self, selector: &AnchorSelector) -> Self {
        let classes: Vec<&str> = selector.classes().iter().map(String::as_str).collect();
        self.with_container(&classes, true)
    }

    pub fn snapshot(&self) -> PageSnapshot {
        lock(&self.state).clone()
    }

    pub fn render_markup(&self) -> String {
        let state = lock(&self.state);
        let mut out = String::new();
        for css in &state.styles {
            let _ = writeln!(out, "<style>{css}</style>");
        }
        for container in &state.containers {
            let _ = writeln!(out, "<div class=\"{}\">", container.classes.join(" "));
            if let Some(items) = &container.list_items {
                out.push_str("<ul>\n");
                for item in items {
                    let _ = writeln!(out, "<li>{item}</li>");
                }
                out.push_str("</ul>\n");
            }
            for panel in &container.panels {
                let _ = writeln!(
                    out,
                    "<div class=\"weather-info\" style=\"display: {}\">{}</div>",
                    panel.visibility.css_display(),
                    panel.html
                );
            }
            out.push_str("</div>\n");
        }
        out
    }
}

fn lock(state: &Mutex<PageSnapshot>) -> MutexGuard<'_, PageSnapshot> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl CookieSource for InMemoryPage {
    fn cookie_header(&self) -> Option<String> {
        self.cookie.clone()
    }
}

impl LocationProvider for InMemoryPage {
    fn location(&self) -> Option<Location> {
        location_from_next_data(self.next_data.as_ref()?)
    }
}

impl AnchorElementLocator for InMemoryPage {
    fn locate(&self, selector: &AnchorSelector) -> Option<Arc<dyn LinkListAnchor>> {
        let state = lock(&self.state);
        let container = state
            .containers
            .iter()
            .position(|container| selector.matches(container.classes.as_slice()))?;
        state.containers[container].list_items.as_ref()?;

        Some(Arc::new(InMemoryAnchor {
            state: Arc::clone(&self.state),
            container,
        }))
    }
}

impl StyleSink for InMemoryPage {
    fn inject_styles(&self, css: &str) {
        lock(&self.state).styles.push(css.to_string());
    }
}

struct InMemoryAnchor {
    state: Arc<Mutex<PageSnapshot>>,
    container: usize,
}

impl LinkListAnchor for InMemoryAnchor {
    fn append_list_item(&self, html: &str) {
        let mut state = lock(&self.state);
        if let Some(items) = state.containers[self.container].list_items.as_mut() {
            items.push(html.to_string());
        }
    }

    fn append_panel(&self, html: &str, visibility: PanelVisibility) -> Arc<dyn PanelElement> {
        let mut state = lock(&self.state);
        let panels = &mut state.containers[self.container].panels;
        panels.push(PanelNode {
            html: html.to_string(),
            visibility,
        });

        Arc::new(InMemoryPanel {
            state: Arc::clone(&self.state),
            container: self.container,
            index: panels.len() - 1,
        })
    }
}

struct InMemoryPanel {
    state: Arc<Mutex<PageSnapshot>>,
    container: usize,
    index: usize,
}

impl PanelElement for InMemoryPanel {
    fn set_visibility(&self, visibility: PanelVisibility) {
        let mut state = lock(&self.state);
        if let Some(panel) = state.containers[self.container].panels.get_mut(self.index) {
            panel.visibility = visibility;
        }
    }
}
