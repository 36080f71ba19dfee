//! HTTP-dispatching notifier client
//!
//! POSTs each event as JSON to `{notifier_url}/events`. Bounded by a
//! request timeout; any timeout, connection error, or non-2xx response
//! is surfaced as `NotifierError` for the caller to log.

use std::time::Duration;

use reqwest::Client;

use crate::{NotificationEvent, NotifierClient, NotifierError};

pub struct HttpNotifierClient {
    client: Client,
    base_url: String,
}

impl HttpNotifierClient {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build notifier HTTP client");

        Self { client, base_url }
    }
}

#[async_trait::async_trait]
impl NotifierClient for HttpNotifierClient {
    async fn notify(&self, event: NotificationEvent) -> Result<(), NotifierError> {
        let url = format!("{}/events", self.base_url.trim_end_matches('/'));
        let event_name = event.name();

        let response = self
            .client
            .post(&url)
            .json(&event)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, event = event_name, "notifier dispatch failed");
                NotifierError::Delivery(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::warn!(event = event_name, status = %status, "notifier rejected event");
            return Err(NotifierError::Rejected(status.to_string()));
        }

        tracing::debug!(event = event_name, "notifier dispatch succeeded");
        Ok(())
    }
}
