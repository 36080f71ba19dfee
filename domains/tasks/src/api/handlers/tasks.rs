//! Task CRUD and lifecycle handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use framecast_auth::AuthUser;
use framecast_common::{ApiResponse, Error, Pagination, PaginationQuery, Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::domain::entities::{
    validate_labels, Patch, Task, TaskActivity, TaskActivityAction, TaskPriority, TaskStatus,
};
use crate::domain::state::TaskEvent;
use crate::permission::ProjectRole;
use crate::repository::{TaskListFilter, TaskSort};
use crate::repository::transactions::{
    insert_activity_tx, lock_task_for_update_tx, soft_delete_task_tx, update_task_fields_tx,
    update_task_status_tx,
};

use super::super::middleware::{require_role, RawBearerToken, TasksState};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    pub assignee_id: Option<Uuid>,
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(length(max = 10), custom(function = "validate_label_lengths"))]
    pub labels: Vec<String>,
}

/// `updateTaskFields`'s permitted field set. Assignment is a dedicated
/// operation (`assignTask`), not part of this patch.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Patch<String>,
    pub priority: Option<TaskPriority>,
    #[serde(default)]
    pub due_date: Patch<DateTime<Utc>>,
    pub labels: Option<Vec<String>>,
}

fn validate_label_lengths(labels: &[String]) -> std::result::Result<(), validator::ValidationError> {
    if labels.iter().any(|label| label.len() > 50) {
        return Err(validator::ValidationError::new("label_too_long"));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    pub event: TaskEventInput,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskEventInput {
    Start,
    Block,
    Unblock,
    Complete,
    Reopen,
    Archive,
}

impl From<TaskEventInput> for TaskEvent {
    fn from(value: TaskEventInput) -> Self {
        match value {
            TaskEventInput::Start => TaskEvent::Start,
            TaskEventInput::Block => TaskEvent::Block,
            TaskEventInput::Unblock => TaskEvent::Unblock,
            TaskEventInput::Complete => TaskEvent::Complete,
            TaskEventInput::Reopen => TaskEvent::Reopen,
            TaskEventInput::Archive => TaskEvent::Archive,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignTaskRequest {
    pub assignee_id: Option<Uuid>,
}

/// Parses a comma-separated list of tokens into `T` by delegating to `T`'s
/// own `Deserialize` impl (so `status=backlog,done` respects the same
/// `snake_case`/`lowercase` renames the wire format already uses elsewhere).
fn parse_comma_list<T: for<'de> Deserialize<'de>>(raw: &str) -> Result<Vec<T>> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            serde_json::from_value(serde_json::Value::String(token.to_string()))
                .map_err(|_| Error::Validation(format!("invalid filter value: {token}")))
        })
        .collect()
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListTasksQuery {
    pub status: Option<String>,
    pub assignee_id: Option<String>,
    pub priority: Option<String>,
    pub label: Option<String>,
    pub search: Option<String>,
    pub due_date_from: Option<DateTime<Utc>>,
    pub due_date_to: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_deleted: bool,
    pub sort: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationQuery,
}

impl ListTasksQuery {
    fn into_filter(self) -> Result<TaskListFilter> {
        Ok(TaskListFilter {
            status: self.status.as_deref().map(parse_comma_list).transpose()?,
            assignee_id: self
                .assignee_id
                .as_deref()
                .map(parse_comma_list)
                .transpose()?,
            priority: self.priority.as_deref().map(parse_comma_list).transpose()?,
            label: self.label.map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect()
            }),
            search: self.search,
            due_date_from: self.due_date_from,
            due_date_to: self.due_date_to,
            is_deleted: self.is_deleted,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assignee_id: Option<Uuid>,
    pub created_by: Uuid,
    pub due_date: Option<DateTime<Utc>>,
    pub labels: Vec<String>,
    pub watchers: Vec<Uuid>,
    pub is_deleted: bool,
    pub last_status_change_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Task> for TaskResponse {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            project_id: task.project_id,
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            priority: task.priority,
            assignee_id: task.assignee_id,
            created_by: task.created_by,
            due_date: task.due_date,
            labels: task.labels.clone(),
            watchers: task.watchers.clone(),
            is_deleted: task.is_deleted,
            last_status_change_at: task.last_status_change_at,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

/// **POST /v1/projects/:projectId/tasks**
pub async fn create_task(
    AuthUser(auth): AuthUser,
    RawBearerToken(token): RawBearerToken,
    State(state): State<TasksState>,
    Path(project_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<CreateTaskRequest>,
) -> Result<ApiResponse<TaskResponse>> {
    require_role(&state, project_id, auth.user_id, &token, ProjectRole::Admin).await?;

    if let Some(assignee_id) = request.assignee_id {
        let assignee_role = state
            .permissions
            .get_role(project_id, assignee_id, &token)
            .await?;
        if assignee_role.is_none() {
            return Err(Error::AssigneeNotProjectMember(
                "assignee is not a member of this project".to_string(),
            ));
        }
    }

    let task = Task::new(
        project_id,
        auth.user_id,
        request.title,
        request.description,
        request.priority.unwrap_or_default(),
        request.assignee_id,
        request.due_date,
        request.labels,
    )?;

    let created = state.repos.tasks.create(task).await?;

    let activity = TaskActivity::new(
        created.id,
        created.project_id,
        auth.user_id,
        TaskActivityAction::Create,
        None,
        Some(created.status),
        json!({ "title": created.title }),
    );
    state.repos.activity.append(&activity).await?;

    Ok(ApiResponse::created(TaskResponse::from(&created)))
}

/// **GET /v1/projects/:projectId/tasks**
pub async fn list_tasks(
    AuthUser(auth): AuthUser,
    RawBearerToken(token): RawBearerToken,
    State(state): State<TasksState>,
    Path(project_id): Path<Uuid>,
    Query(query): Query<ListTasksQuery>,
) -> Result<ApiResponse<Vec<TaskResponse>>> {
    require_role(&state, project_id, auth.user_id, &token, ProjectRole::Viewer).await?;

    let (page, limit, offset) = query.pagination.resolve(20)?;
    let sort = query
        .sort
        .as_deref()
        .map(TaskSort::parse)
        .unwrap_or_default();
    let filter = query.into_filter()?;

    let total = state.repos.tasks.count_for_project(project_id, &filter).await?;
    let tasks = state
        .repos
        .tasks
        .list_for_project(project_id, &filter, sort, limit as i64, offset)
        .await?;

    let data = tasks.iter().map(TaskResponse::from).collect::<Vec<_>>();
    Ok(ApiResponse::ok(data).with_pagination(Pagination::new(page, limit, total)))
}

/// **GET /v1/tasks/:id**
pub async fn get_task(
    AuthUser(auth): AuthUser,
    RawBearerToken(token): RawBearerToken,
    State(state): State<TasksState>,
    Path(task_id): Path<Uuid>,
) -> Result<ApiResponse<TaskResponse>> {
    let task = state
        .repos
        .tasks
        .find(task_id)
        .await?
        .filter(|task| !task.is_deleted)
        .ok_or_else(|| Error::NotFound("task not found".to_string()))?;

    require_role(&state, task.project_id, auth.user_id, &token, ProjectRole::Viewer).await?;

    Ok(ApiResponse::ok(TaskResponse::from(&task)))
}

/// **PATCH /v1/tasks/:id**
pub async fn update_task(
    AuthUser(auth): AuthUser,
    RawBearerToken(token): RawBearerToken,
    State(state): State<TasksState>,
    Path(task_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateTaskRequest>,
) -> Result<ApiResponse<TaskResponse>> {
    let mut tx = state.repos.begin().await.map_err(Error::Database)?;

    let mut task = lock_task_for_update_tx(&mut tx, task_id)
        .await?
        .ok_or_else(|| Error::NotFound("task not found".to_string()))?;

    require_role(&state, task.project_id, auth.user_id, &token, ProjectRole::Admin).await?;

    let mut changed_fields: Vec<&'static str> = Vec::new();
    let mut before = json!({});
    let mut after = json!({});

    if let Some(title) = request.title {
        let trimmed = title.trim().to_string();
        if trimmed.is_empty() || trimmed.len() > 200 {
            return Err(Error::Validation(
                "title must be between 1 and 200 characters".to_string(),
            ));
        }
        if trimmed != task.title {
            before["title"] = json!(task.title);
            after["title"] = json!(trimmed);
            changed_fields.push("title");
            task.title = trimmed;
        }
    }

    if !request.description.is_absent() {
        let mut next = task.description.clone();
        request.description.apply_to(&mut next);
        if next != task.description {
            before["description"] = json!(task.description);
            after["description"] = json!(next);
            changed_fields.push("description");
            task.description = next;
        }
    }

    if let Some(priority) = request.priority {
        if priority != task.priority {
            before["priority"] = json!(task.priority);
            after["priority"] = json!(priority);
            changed_fields.push("priority");
            task.priority = priority;
        }
    }

    if !request.due_date.is_absent() {
        let mut next = task.due_date;
        request.due_date.apply_to(&mut next);
        if next != task.due_date {
            before["dueDate"] = json!(task.due_date);
            after["dueDate"] = json!(next);
            changed_fields.push("dueDate");
            task.due_date = next;
        }
    }

    if let Some(labels) = request.labels {
        validate_labels(&labels)?;
        if labels != task.labels {
            before["labels"] = json!(task.labels);
            after["labels"] = json!(labels);
            changed_fields.push("labels");
            task.labels = labels;
        }
    }

    if !changed_fields.is_empty() {
        task.updated_at = Utc::now();
        update_task_fields_tx(&mut tx, &task).await?;

        let activity = TaskActivity::new(
            task.id,
            task.project_id,
            auth.user_id,
            TaskActivityAction::Edit,
            None,
            None,
            json!({ "changedFields": changed_fields, "from": before, "to": after }),
        );
        insert_activity_tx(&mut tx, &activity).await?;
    }

    tx.commit().await.map_err(Error::Database)?;

    Ok(ApiResponse::ok(TaskResponse::from(&task)))
}

/// **POST /v1/tasks/:id/status**
pub async fn change_status(
    AuthUser(auth): AuthUser,
    RawBearerToken(token): RawBearerToken,
    State(state): State<TasksState>,
    Path(task_id): Path<Uuid>,
    Json(request): Json<ChangeStatusRequest>,
) -> Result<ApiResponse<TaskResponse>> {
    let mut tx = state.repos.begin().await.map_err(Error::Database)?;

    let mut task = lock_task_for_update_tx(&mut tx, task_id)
        .await?
        .ok_or_else(|| Error::NotFound("task not found".to_string()))?;

    let role = require_role(&state, task.project_id, auth.user_id, &token, ProjectRole::Viewer).await?;
    let is_assignee = task.assignee_id == Some(auth.user_id);
    if role != ProjectRole::Admin && !(role == ProjectRole::Member && is_assignee) {
        return Err(Error::Forbidden(
            "only project admins or the task's assignee can change its status".to_string(),
        ));
    }

    let from_status = task.status;
    task.apply_transition(request.event.into())?;

    update_task_status_tx(&mut tx, task_id, task.status).await?;

    let activity = TaskActivity::new(
        task.id,
        task.project_id,
        auth.user_id,
        TaskActivityAction::UpdateStatus,
        Some(from_status),
        Some(task.status),
        json!({}),
    );
    insert_activity_tx(&mut tx, &activity).await?;

    tx.commit().await.map_err(Error::Database)?;

    Ok(ApiResponse::ok(TaskResponse::from(&task)))
}

/// **POST /v1/tasks/:id/assign**
pub async fn assign_task(
    AuthUser(auth): AuthUser,
    RawBearerToken(token): RawBearerToken,
    State(state): State<TasksState>,
    Path(task_id): Path<Uuid>,
    Json(request): Json<AssignTaskRequest>,
) -> Result<ApiResponse<TaskResponse>> {
    let mut tx = state.repos.begin().await.map_err(Error::Database)?;

    let mut task = lock_task_for_update_tx(&mut tx, task_id)
        .await?
        .ok_or_else(|| Error::NotFound("task not found".to_string()))?;

    require_role(&state, task.project_id, auth.user_id, &token, ProjectRole::Admin).await?;

    if let Some(assignee_id) = request.assignee_id {
        let assignee_role = state
            .permissions
            .get_role(task.project_id, assignee_id, &token)
            .await?;
        if assignee_role.is_none() {
            return Err(Error::AssigneeNotProjectMember(
                "assignee is not a member of this project".to_string(),
            ));
        }
    }

    let action = if request.assignee_id.is_some() {
        TaskActivityAction::Assign
    } else {
        TaskActivityAction::Unassign
    };

    let from_assignee_id = task.assignee_id;
    task.assignee_id = request.assignee_id;
    if let Some(assignee_id) = request.assignee_id {
        task.add_watcher(assignee_id);
    }
    task.updated_at = Utc::now();
    update_task_fields_tx(&mut tx, &task).await?;

    let activity = TaskActivity::new(
        task.id,
        task.project_id,
        auth.user_id,
        action,
        None,
        None,
        json!({ "fromAssigneeId": from_assignee_id, "assigneeId": request.assignee_id }),
    );
    insert_activity_tx(&mut tx, &activity).await?;

    tx.commit().await.map_err(Error::Database)?;

    Ok(ApiResponse::ok(TaskResponse::from(&task)))
}

/// **DELETE /v1/tasks/:id** — sets the `isDeleted` tombstone; does not
/// transition `status`, which is orthogonal to deletion.
pub async fn delete_task(
    AuthUser(auth): AuthUser,
    RawBearerToken(token): RawBearerToken,
    State(state): State<TasksState>,
    Path(task_id): Path<Uuid>,
) -> Result<StatusCode> {
    let mut tx = state.repos.begin().await.map_err(Error::Database)?;

    let task = lock_task_for_update_tx(&mut tx, task_id)
        .await?
        .ok_or_else(|| Error::NotFound("task not found".to_string()))?;

    require_role(&state, task.project_id, auth.user_id, &token, ProjectRole::Admin).await?;

    soft_delete_task_tx(&mut tx, task_id).await?;

    let activity = TaskActivity::new(
        task.id,
        task.project_id,
        auth.user_id,
        TaskActivityAction::Delete,
        None,
        None,
        json!({}),
    );
    insert_activity_tx(&mut tx, &activity).await?;

    tx.commit().await.map_err(Error::Database)?;

    Ok(StatusCode::NO_CONTENT)
}
