//! Notifier interface
//!
//! Dispatches structured project events (invitations, archival,
//! deletion) to an external notification system. Failure to dispatch
//! is never fatal to the mutation that triggered it — callers log and
//! move on; see `NotifierClient::notify` doc comment.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub mod http;
pub mod logging;

#[derive(Error, Debug)]
pub enum NotifierError {
    #[error("notifier configuration error: {0}")]
    Configuration(String),

    #[error("notifier request timed out or failed to connect: {0}")]
    Delivery(String),

    #[error("notifier responded with non-success status: {0}")]
    Rejected(String),
}

/// Structured events the Project service fires through the notifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum NotificationEvent {
    /// A member was invited to a project; carries enough context for the
    /// notifier to render and deliver an invitation message.
    ProjectInvitation {
        project_id: Uuid,
        project_name: String,
        invite_id: Uuid,
        invitation_code: String,
        inviter_user_id: Uuid,
        invited_email: Option<String>,
        invited_user_id: Option<Uuid>,
        role: String,
    },
    /// A project transitioned to `archived`. Fired asynchronously;
    /// nothing downstream currently consumes it to auto-archive tasks.
    ProjectArchived {
        project_id: Uuid,
        actor_user_id: Uuid,
    },
    /// A project was soft-deleted.
    ProjectDeleted {
        project_id: Uuid,
        actor_user_id: Uuid,
    },
}

impl NotificationEvent {
    pub fn name(&self) -> &'static str {
        match self {
            NotificationEvent::ProjectInvitation { .. } => "projectInvitation",
            NotificationEvent::ProjectArchived { .. } => "projectArchived",
            NotificationEvent::ProjectDeleted { .. } => "projectDeleted",
        }
    }
}

/// Notifier client trait. Implementations must never let a slow or
/// unreachable downstream system block the caller for long: bound every
/// outbound request with a timeout.
#[async_trait::async_trait]
pub trait NotifierClient: Send + Sync {
    /// Dispatch an event. Implementations should treat delivery failure
    /// as non-fatal from the caller's perspective; `notify` still
    /// returns `Err` so the caller can log it, but must never be used to
    /// fail the primary mutation.
    async fn notify(&self, event: NotificationEvent) -> Result<(), NotifierError>;
}

#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// Base URL of the notifier interface; `None` selects the logging mock.
    pub notifier_url: Option<String>,
    pub request_timeout: Duration,
}

impl NotifierConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let notifier_url = std::env::var("NOTIFIER_URL").ok();
        let request_timeout_secs: u64 = std::env::var("NOTIFIER_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        Self {
            notifier_url,
            request_timeout: Duration::from_secs(request_timeout_secs),
        }
    }
}

pub struct NotifierClientFactory;

impl NotifierClientFactory {
    /// Build a notifier client from config. With no `NOTIFIER_URL` set,
    /// falls back to a logging-only implementation so local development
    /// and tests don't require a live notifier.
    pub fn create(config: NotifierConfig) -> Box<dyn NotifierClient> {
        match config.notifier_url {
            Some(url) => {
                tracing::info!(url = %url, "Creating HTTP notifier client");
                Box::new(http::HttpNotifierClient::new(url, config.request_timeout))
            }
            None => {
                tracing::info!("No NOTIFIER_URL configured, using logging notifier client");
                Box::new(logging::LoggingNotifierClient::new())
            }
        }
    }
}
