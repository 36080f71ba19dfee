//! Application composition roots
//!
//! Project and Task are independently deployable services; each gets its
//! own router-construction function and its own binary in `src/bin/`.
//! They share `framecast-common` (config, errors, response envelope) and
//! `framecast-auth` (bearer-token validation), but own separate domain
//! crates and separate `PgPool`s.

use std::sync::Arc;

use axum::Router;
use framecast_auth::{AuthBackend, AuthConfig};
use framecast_common::Config;
use framecast_notifier::{NotifierClientFactory, NotifierConfig};
use framecast_projects::{ProjectsRepositories, ProjectsState};
use framecast_tasks::{HttpProjectPermissionClient, TasksRepositories, TasksState};
use sqlx::PgPool;
use std::time::Duration;

fn auth_backend(config: &Config) -> AuthBackend {
    AuthBackend::new(AuthConfig {
        secret: config.auth_secret.clone(),
        issuer: None,
        audience: None,
    })
}

/// Build the Project service's router.
pub async fn create_project_app(config: Config, pool: PgPool) -> Result<Router, anyhow::Error> {
    let repos = ProjectsRepositories::new(pool);
    let auth = auth_backend(&config);

    let notifier = NotifierClientFactory::create(NotifierConfig {
        notifier_url: config.notifier_url.clone(),
        request_timeout: Duration::from_secs(5),
    });

    let state = ProjectsState {
        repos,
        auth,
        notifier: Arc::from(notifier),
    };

    let app = Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(framecast_projects::routes().with_state(state));

    Ok(app)
}

/// Build the Task service's router.
pub async fn create_task_app(config: Config, pool: PgPool) -> Result<Router, anyhow::Error> {
    let repos = TasksRepositories::new(pool);
    let auth = auth_backend(&config);

    let project_service_url = config
        .project_service_url
        .clone()
        .ok_or_else(|| anyhow::anyhow!("PROJECT_SERVICE_URL is required by the Task service"))?;

    let permissions = Arc::new(HttpProjectPermissionClient::new(
        project_service_url,
        Duration::from_secs(5),
        Duration::from_secs(config.permission_cache_ttl_secs),
    ));

    let state = TasksState {
        repos,
        auth,
        permissions,
    };

    let app = Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(framecast_tasks::routes().with_state(state));

    Ok(app)
}

async fn health_check() -> &'static str {
    "OK"
}
