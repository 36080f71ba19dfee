use axum::extract::FromRef;
use framecast_auth::AuthBackend;
use framecast_notifier::NotifierClient;
use std::sync::Arc;

use crate::repository::ProjectsRepositories;

#[derive(Clone)]
pub struct ProjectsState {
    pub repos: ProjectsRepositories,
    pub auth: AuthBackend,
    pub notifier: Arc<dyn NotifierClient>,
}

impl FromRef<ProjectsState> for AuthBackend {
    fn from_ref(state: &ProjectsState) -> Self {
        state.auth.clone()
    }
}
