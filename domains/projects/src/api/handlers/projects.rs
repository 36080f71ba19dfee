//! Project CRUD handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use framecast_auth::AuthUser;
use framecast_common::{ApiResponse, Error, Pagination, PaginationQuery, Result, ValidatedJson};
use framecast_notifier::NotificationEvent;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::entities::{
    generate_invitation_code, MemberRole, Project, ProjectMetadata, ProjectSettings, ProjectStatus,
};
use crate::domain::state::ProjectEvent;

use super::super::middleware::ProjectsState;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettingsInput {
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub allow_member_invite: bool,
    #[validate(range(min = 1))]
    pub max_members: Option<i32>,
}

impl From<ProjectSettingsInput> for ProjectSettings {
    fn from(value: ProjectSettingsInput) -> Self {
        Self {
            is_public: value.is_public,
            allow_member_invite: value.allow_member_invite,
            max_members: value.max_members,
        }
    }
}

/// createProject's wire shape is flat (`isPublic`/`allowMemberInvite`/
/// `maxMembers` alongside `name`/`description`), not a nested `settings`
/// object — `updateProject` is the one that patches settings as a subobject.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    #[validate(length(min = 3, max = 100))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub allow_member_invite: bool,
    #[validate(range(min = 1))]
    pub max_members: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    #[validate(length(min = 3, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    /// Only `active`/`archived` are accepted here — deletion stays on its
    /// own endpoint since it's a one-way, creator-only operation distinct
    /// from the reversible archive/unarchive toggle.
    pub status: Option<ProjectStatus>,
    #[validate(nested)]
    pub settings: Option<ProjectSettingsInput>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub role: MemberRole,
    pub status: crate::domain::entities::MemberStatus,
    pub joined_at: chrono::DateTime<chrono::Utc>,
    pub invited_by: Option<Uuid>,
    pub invitation_sent_at: Option<chrono::DateTime<chrono::Utc>>,
    pub last_active: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<&crate::domain::entities::Member> for MemberResponse {
    fn from(m: &crate::domain::entities::Member) -> Self {
        Self {
            user_id: m.user_id,
            email: m.email.clone(),
            role: m.role,
            status: m.status,
            joined_at: m.joined_at,
            invited_by: m.invited_by,
            invitation_sent_at: m.invitation_sent_at,
            last_active: m.last_active,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_by: Uuid,
    pub status: crate::domain::entities::ProjectStatus,
    pub invitation_code: String,
    pub settings: ProjectSettings,
    pub metadata: ProjectMetadata,
    pub members: Vec<MemberResponse>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<&Project> for ProjectResponse {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id,
            name: project.name.clone(),
            description: project.description.clone(),
            created_by: project.created_by,
            status: project.status,
            invitation_code: project.invitation_code.clone(),
            settings: project.settings.0.clone(),
            metadata: project.metadata(),
            members: project.members.0.iter().map(MemberResponse::from).collect(),
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

/// **POST /v1/projects**
pub async fn create_project(
    AuthUser(auth): AuthUser,
    State(state): State<ProjectsState>,
    ValidatedJson(request): ValidatedJson<CreateProjectRequest>,
) -> Result<ApiResponse<ProjectResponse>> {
    let settings = ProjectSettings {
        is_public: request.is_public,
        allow_member_invite: request.allow_member_invite,
        max_members: request.max_members,
    };

    let project = Project::new(
        auth.user_id,
        auth.email.clone(),
        request.name,
        request.description,
        settings,
        generate_invitation_code(),
    )?;

    let created = state.repos.projects.create(project).await?;

    Ok(ApiResponse::created(ProjectResponse::from(&created)))
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListProjectsQuery {
    pub status: Option<crate::domain::entities::ProjectStatus>,
    pub role: Option<MemberRole>,
    pub search: Option<String>,
    pub sort: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationQuery,
}

/// **GET /v1/projects**
pub async fn list_user_projects(
    AuthUser(auth): AuthUser,
    State(state): State<ProjectsState>,
    Query(query): Query<ListProjectsQuery>,
) -> Result<ApiResponse<Vec<ProjectResponse>>> {
    let (page, limit, offset) = query.pagination.resolve(20)?;
    let sort = query
        .sort
        .as_deref()
        .map(crate::repository::ProjectSort::parse)
        .unwrap_or_default();
    let filter = crate::repository::ProjectListFilter {
        status: query.status,
        role: query.role,
        search: query.search,
    };

    let total = state.repos.projects.count_for_user(auth.user_id, &filter).await?;
    let projects = state
        .repos
        .projects
        .list_for_user(auth.user_id, &filter, sort, limit as i64, offset)
        .await?;

    let data = projects.iter().map(ProjectResponse::from).collect::<Vec<_>>();
    Ok(ApiResponse::ok(data).with_pagination(Pagination::new(page, limit, total)))
}

/// **GET /v1/projects/:id**
pub async fn get_project(
    AuthUser(auth): AuthUser,
    State(state): State<ProjectsState>,
    Path(project_id): Path<Uuid>,
) -> Result<ApiResponse<ProjectResponse>> {
    let project = state
        .repos
        .projects
        .find(project_id)
        .await?
        .ok_or_else(|| Error::NotFound("project not found".to_string()))?;

    if !project.is_active_member(auth.user_id) {
        return Err(Error::Forbidden(
            "not a member of this project".to_string(),
        ));
    }

    Ok(ApiResponse::ok(ProjectResponse::from(&project)))
}

/// **PATCH /v1/projects/:id**
pub async fn update_project(
    AuthUser(auth): AuthUser,
    State(state): State<ProjectsState>,
    Path(project_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateProjectRequest>,
) -> Result<ApiResponse<ProjectResponse>> {
    let mut tx = state.repos.begin().await.map_err(Error::Database)?;

    let mut project = crate::repository::transactions::lock_project_for_update_tx(&mut tx, project_id)
        .await?
        .ok_or_else(|| Error::NotFound("project not found".to_string()))?;

    if !project.member_has_at_least(auth.user_id, MemberRole::Admin) {
        return Err(Error::Forbidden(
            "only project admins can update project settings".to_string(),
        ));
    }

    if let Some(name) = request.name {
        let trimmed = name.trim().to_string();
        if trimmed.len() < 3 || trimmed.len() > 100 {
            return Err(Error::Validation(
                "name must be between 3 and 100 characters".to_string(),
            ));
        }
        project.name = trimmed;
    }
    if let Some(description) = request.description {
        if description.len() > 500 {
            return Err(Error::Validation(
                "description must be at most 500 characters".to_string(),
            ));
        }
        project.description = Some(description);
    }
    if let Some(settings) = request.settings {
        let settings = ProjectSettings::from(settings);
        settings.validate()?;
        project.settings = sqlx::types::Json(settings);
    }

    let status_event = match request.status {
        Some(ProjectStatus::Archived) => Some(ProjectEvent::Archive),
        Some(ProjectStatus::Active) => Some(ProjectEvent::Unarchive),
        Some(ProjectStatus::Deleted) => {
            return Err(Error::Validation(
                "use DELETE /v1/projects/:id to delete a project".to_string(),
            ));
        }
        None => None,
    };
    if let Some(event) = status_event {
        project.apply_transition(event)?;
        crate::repository::transactions::update_project_status_tx(
            &mut tx,
            project_id,
            project.status,
        )
        .await?;
    }

    crate::repository::transactions::update_project_fields_tx(
        &mut tx,
        project_id,
        &project.name,
        project.description.as_deref(),
        &project.settings.0,
    )
    .await?;

    tx.commit().await.map_err(Error::Database)?;

    if status_event == Some(ProjectEvent::Archive) {
        if let Err(e) = state
            .notifier
            .notify(NotificationEvent::ProjectArchived {
                project_id,
                actor_user_id: auth.user_id,
            })
            .await
        {
            tracing::warn!(error = %e, project_id = %project_id, "failed to dispatch projectArchived notification");
        }
    }

    Ok(ApiResponse::ok(ProjectResponse::from(&project)))
}

/// **DELETE /v1/projects/:id** — soft delete.
pub async fn delete_project(
    AuthUser(auth): AuthUser,
    State(state): State<ProjectsState>,
    Path(project_id): Path<Uuid>,
) -> Result<StatusCode> {
    let mut tx = state.repos.begin().await.map_err(Error::Database)?;

    let mut project = crate::repository::transactions::lock_project_for_update_tx(&mut tx, project_id)
        .await?
        .ok_or_else(|| Error::NotFound("project not found".to_string()))?;

    if auth.user_id != project.created_by {
        return Err(Error::Forbidden(
            "only the project creator can delete a project".to_string(),
        ));
    }

    project.apply_transition(ProjectEvent::Delete)?;

    crate::repository::transactions::update_project_status_tx(&mut tx, project_id, project.status)
        .await?;

    tx.commit().await.map_err(Error::Database)?;

    if let Err(e) = state
        .notifier
        .notify(NotificationEvent::ProjectDeleted {
            project_id,
            actor_user_id: auth.user_id,
        })
        .await
    {
        tracing::warn!(error = %e, project_id = %project_id, "failed to dispatch projectDeleted notification");
    }

    Ok(StatusCode::NO_CONTENT)
}

