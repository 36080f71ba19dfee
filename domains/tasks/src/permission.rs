//! Cross-service permission bridge
//!
//! The Task service has no membership data of its own; every
//! authorization decision asks the Project service's internal endpoint
//! for the caller's role, then caches the answer briefly so a burst of
//! requests against the same project doesn't hammer the network. A
//! failure to reach the Project service fails closed: callers get
//! `Error::Internal`, never a default role.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use framecast_common::Error;
use reqwest::Client;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectRole {
    Admin,
    Member,
    Viewer,
}

impl ProjectRole {
    pub fn rank(&self) -> u8 {
        match self {
            Self::Admin => 3,
            Self::Member => 2,
            Self::Viewer => 1,
        }
    }

    pub fn has_at_least(&self, other: ProjectRole) -> bool {
        self.rank() >= other.rank()
    }
}

#[derive(Debug, Deserialize)]
struct PermissionResponse {
    role: Option<ProjectRole>,
}

/// Minimal client-side view of the shared success envelope; only `data`
/// is needed here.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
}

#[async_trait::async_trait]
pub trait ProjectPermissionClient: Send + Sync {
    /// Resolve the caller's role on a project, or `None` if they have no
    /// active membership. Forwards `bearer_token` so the Project service
    /// authenticates the lookup as the same caller.
    async fn get_role(
        &self,
        project_id: Uuid,
        user_id: Uuid,
        bearer_token: &str,
    ) -> Result<Option<ProjectRole>, Error>;
}

struct CacheEntry {
    role: Option<ProjectRole>,
    fetched_at: Instant,
}

pub struct HttpProjectPermissionClient {
    client: Client,
    base_url: String,
    ttl: Duration,
    cache: Mutex<HashMap<(Uuid, Uuid), CacheEntry>>,
}

impl HttpProjectPermissionClient {
    pub fn new(base_url: String, timeout: Duration, ttl: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build permission client");

        Self {
            client,
            base_url,
            ttl,
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn cached(&self, key: (Uuid, Uuid)) -> Option<Option<ProjectRole>> {
        let cache = self.cache.lock().expect("permission cache poisoned");
        cache.get(&key).and_then(|entry| {
            if entry.fetched_at.elapsed() < self.ttl {
                Some(entry.role)
            } else {
                None
            }
        })
    }

    fn store(&self, key: (Uuid, Uuid), role: Option<ProjectRole>) {
        let mut cache = self.cache.lock().expect("permission cache poisoned");
        cache.insert(
            key,
            CacheEntry {
                role,
                fetched_at: Instant::now(),
            },
        );
    }
}

#[async_trait::async_trait]
impl ProjectPermissionClient for HttpProjectPermissionClient {
    async fn get_role(
        &self,
        project_id: Uuid,
        user_id: Uuid,
        bearer_token: &str,
    ) -> Result<Option<ProjectRole>, Error> {
        let key = (project_id, user_id);
        if let Some(role) = self.cached(key) {
            return Ok(role);
        }

        let url = format!(
            "{}/internal/projects/{}/permissions",
            self.base_url.trim_end_matches('/'),
            project_id
        );

        let response = self
            .client
            .get(&url)
            .query(&[("userId", user_id.to_string())])
            .bearer_auth(bearer_token)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, project_id = %project_id, "permission lookup failed");
                Error::Internal("failed to reach project service".to_string())
            })?;

        if !response.status().is_success() {
            tracing::warn!(
                project_id = %project_id,
                status = %response.status(),
                "project service rejected permission lookup"
            );
            return Err(Error::Internal(
                "project service rejected permission lookup".to_string(),
            ));
        }

        let body: Envelope<PermissionResponse> = response.json().await.map_err(|e| {
                tracing::warn!(error = %e, project_id = %project_id, "malformed permission response");
                Error::Internal("malformed permission response".to_string())
            })?;

        let role = body.data.and_then(|d| d.role);
        self.store(key, role);
        Ok(role)
    }
}
