//! Task activity log handlers

use axum::extract::{Path, Query, State};
use chrono::{DateTime, Utc};
use framecast_auth::AuthUser;
use framecast_common::{ApiResponse, Error, Pagination, PaginationQuery, Result};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::{TaskActivity, TaskActivityAction, TaskStatus};
use crate::permission::ProjectRole;

use super::super::middleware::{require_role, RawBearerToken, TasksState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskActivityResponse {
    pub id: Uuid,
    pub task_id: Uuid,
    pub actor_user_id: Uuid,
    pub action: TaskActivityAction,
    pub from_status: Option<TaskStatus>,
    pub to_status: Option<TaskStatus>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl From<&TaskActivity> for TaskActivityResponse {
    fn from(activity: &TaskActivity) -> Self {
        Self {
            id: activity.id,
            task_id: activity.task_id,
            actor_user_id: activity.actor_user_id,
            action: activity.action,
            from_status: activity.from_status,
            to_status: activity.to_status,
            metadata: activity.metadata.0.clone(),
            created_at: activity.created_at,
        }
    }
}

/// **GET /v1/tasks/:id/activity**
pub async fn list_task_activity(
    AuthUser(auth): AuthUser,
    RawBearerToken(token): RawBearerToken,
    State(state): State<TasksState>,
    Path(task_id): Path<Uuid>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<ApiResponse<Vec<TaskActivityResponse>>> {
    let task = state
        .repos
        .tasks
        .find(task_id)
        .await?
        .ok_or_else(|| Error::NotFound("task not found".to_string()))?;

    require_role(&state, task.project_id, auth.user_id, &token, ProjectRole::Viewer).await?;

    let (page, limit, offset) = pagination.resolve(50)?;

    let total = state.repos.activity.count_for_task(task_id).await?;
    let activity = state
        .repos
        .activity
        .list_for_task(task_id, limit as i64, offset)
        .await?;

    let data = activity.iter().map(TaskActivityResponse::from).collect::<Vec<_>>();
    Ok(ApiResponse::ok(data).with_pagination(Pagination::new(page, limit, total)))
}
