//! Logging-only notifier client
//!
//! Used when no `NOTIFIER_URL` is configured, consistent with the email
//! crate's mock-for-missing-provider pattern.

use crate::{NotificationEvent, NotifierClient, NotifierError};

#[derive(Debug, Clone, Default)]
pub struct LoggingNotifierClient;

impl LoggingNotifierClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl NotifierClient for LoggingNotifierClient {
    async fn notify(&self, event: NotificationEvent) -> Result<(), NotifierError> {
        tracing::info!(event = event.name(), payload = ?event, "notifier event (logging only)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_logging_client_always_succeeds() {
        let client = LoggingNotifierClient::new();
        let event = NotificationEvent::ProjectArchived {
            project_id: Uuid::new_v4(),
            actor_user_id: Uuid::new_v4(),
        };

        assert!(client.notify(event).await.is_ok());
    }
}
