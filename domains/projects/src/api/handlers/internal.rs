//! Internal, service-to-service endpoints
//!
//! Consumed by the Task service's permission bridge. Not exposed to
//! end users; callers are expected to be on a private network segment.

use axum::extract::{Path, Query, State};
use framecast_common::{ApiResponse, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::super::middleware::ProjectsState;
use crate::domain::entities::MemberRole;

#[derive(Debug, Deserialize)]
pub struct PermissionQuery {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionResponse {
    pub is_member: bool,
    pub role: Option<MemberRole>,
}

/// **GET /internal/projects/:id/permissions?userId=**
pub async fn get_permission(
    State(state): State<ProjectsState>,
    Path(project_id): Path<Uuid>,
    Query(query): Query<PermissionQuery>,
) -> Result<ApiResponse<PermissionResponse>> {
    let role = match state.repos.projects.find(project_id).await? {
        Some(project) => project.role_of(query.user_id),
        None => None,
    };

    Ok(ApiResponse::ok(PermissionResponse {
        is_member: role.is_some(),
        role,
    }))
}
