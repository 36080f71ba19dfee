use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::{
    header::{AUTHORIZATION, COOKIE},
    request::Parts,
};
use framecast_auth::{extract_bearer_token, extract_cookie_token, AuthBackend};
use framecast_common::{Error, Result};
use uuid::Uuid;

use crate::permission::{ProjectPermissionClient, ProjectRole};
use crate::repository::TasksRepositories;

#[derive(Clone)]
pub struct TasksState {
    pub repos: TasksRepositories,
    pub auth: AuthBackend,
    pub permissions: Arc<dyn ProjectPermissionClient>,
}

impl FromRef<TasksState> for AuthBackend {
    fn from_ref(state: &TasksState) -> Self {
        state.auth.clone()
    }
}

/// Looks up the caller's role on `project_id` through the permission
/// bridge and rejects with `Forbidden` unless it meets `minimum`.
pub async fn require_role(
    state: &TasksState,
    project_id: Uuid,
    user_id: Uuid,
    bearer_token: &str,
    minimum: ProjectRole,
) -> Result<ProjectRole> {
    let role = state
        .permissions
        .get_role(project_id, user_id, bearer_token)
        .await?
        .ok_or_else(|| Error::Forbidden("not a member of this project".to_string()))?;

    if !role.has_at_least(minimum) {
        return Err(Error::Forbidden(
            "insufficient project role for this action".to_string(),
        ));
    }
    Ok(role)
}

/// The raw bearer token, forwarded to the Project service's internal
/// permission endpoint so the lookup runs as the same caller. Reading
/// the header here doesn't consume it, so `AuthUser` can extract from
/// the same request. Falls back to the `token` cookie when the
/// `Authorization` header is absent, mirroring `AuthUser`.
pub struct RawBearerToken(pub String);

impl<S> FromRequestParts<S> for RawBearerToken
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = match parts.headers.get(AUTHORIZATION) {
            Some(header) => extract_bearer_token(header)
                .map_err(|_| Error::Unauthorized("invalid authorization header".to_string()))?,
            None => parts
                .headers
                .get(COOKIE)
                .and_then(extract_cookie_token)
                .ok_or_else(|| Error::Unauthorized("missing authorization header".to_string()))?,
        };

        Ok(RawBearerToken(token))
    }
}
