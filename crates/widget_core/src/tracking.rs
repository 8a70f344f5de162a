use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use shared::{domain::TrackingEvent, protocol::TrackingPayload};
use tokio::{runtime::Handle, task::JoinHandle};
use tracing::warn;

use crate::error::TrackingError;

#[async_trait]
pub trait BeaconSink: Send + Sync {
    async fn send_event(&self, event: &TrackingEvent) -> Result<(), TrackingError>;
}

pub struct TrackingClient {
    http: Client,
    endpoint: String,
}

impl TrackingClient {
    pub fn new(http: Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl BeaconSink for TrackingClient {
    async fn send_event(&self, event: &TrackingEvent) -> Result<(), TrackingError> {
        let status = self
            .http
            .post(&self.endpoint)
            .json(&TrackingPayload::from(event))
            .send()
            .await?
            .status();
        if !status.is_success() {
            return Err(TrackingError::Status { status });
        }
        Ok(())
    }
}

/// Sends `event` on a detached task of `runtime`.
///
/// Delivery is best effort: a failure is logged once and never retried, and
/// nothing is reported back to the caller. The handle only lets callers wait
/// for the attempt to finish.
pub fn spawn_beacon(
    runtime: &Handle,
    sink: Arc<dyn BeaconSink>,
    event: TrackingEvent,
) -> JoinHandle<()> {
    runtime.spawn(async move {
        if let Err(err) = sink.send_event(&event).await {
            warn!(
                group = %event.group,
                action = %event.action,
                "tracking: failed to track click: {err}"
            );
        }
    })
}
