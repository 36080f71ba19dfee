//! Membership handlers: invite, join-by-code, role changes, removal

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use framecast_auth::AuthUser;
use framecast_common::{ApiResponse, Error, Result, ValidatedJson};
use framecast_notifier::NotificationEvent;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::domain::entities::{Member, MemberRole, MemberStatus};
use crate::repository::transactions::{
    lock_project_by_code_for_update_tx, lock_project_for_update_tx, update_project_members_tx,
};

use super::super::middleware::ProjectsState;
use super::projects::{MemberResponse, ProjectResponse};

#[derive(Debug, Deserialize, Validate)]
pub struct InviteMemberRequest {
    pub user_id: Uuid,
    #[validate(email)]
    pub email: Option<String>,
    pub role: MemberRole,
}

#[derive(Debug, Deserialize, Validate)]
pub struct JoinByCodeRequest {
    #[validate(length(equal = 8))]
    pub invitation_code: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMemberRoleRequest {
    pub role: MemberRole,
}

/// **POST /v1/projects/:id/members**
pub async fn invite_member(
    AuthUser(auth): AuthUser,
    State(state): State<ProjectsState>,
    Path(project_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<InviteMemberRequest>,
) -> Result<ApiResponse<MemberResponse>> {
    let mut tx = state.repos.begin().await.map_err(Error::Database)?;

    let mut project = lock_project_for_update_tx(&mut tx, project_id)
        .await?
        .ok_or_else(|| Error::NotFound("project not found".to_string()))?;

    let inviter_role = project
        .role_of(auth.user_id)
        .ok_or_else(|| Error::Forbidden("not a member of this project".to_string()))?;

    let can_invite = inviter_role == MemberRole::Admin
        || (inviter_role == MemberRole::Member && project.settings.0.allow_member_invite);
    if !can_invite {
        return Err(Error::Forbidden(
            "not permitted to invite members to this project".to_string(),
        ));
    }

    if project.at_member_capacity() {
        return Err(Error::Validation(
            "project has reached its member capacity".to_string(),
        ));
    }

    if let Some(existing) = project.find_member_mut(request.user_id) {
        match existing.status {
            MemberStatus::Active => {
                return Err(Error::DuplicateResource(
                    "user is already a member of this project".to_string(),
                ));
            }
            MemberStatus::Invited => {
                return Err(Error::DuplicateResource(
                    "user is already invited to this project".to_string(),
                ));
            }
            MemberStatus::Removed => {
                existing.status = MemberStatus::Invited;
                existing.role = request.role;
                existing.invited_by = Some(auth.user_id);
                existing.invitation_sent_at = Some(chrono::Utc::now());
                if request.email.is_some() {
                    existing.email = request.email.clone();
                }
            }
        }
    } else {
        project.members.0.push(Member::new_invited(
            request.user_id,
            request.email.clone(),
            request.role,
            auth.user_id,
        ));
    }

    update_project_members_tx(&mut tx, project_id, &project.members.0).await?;
    tx.commit().await.map_err(Error::Database)?;

    let invited = project
        .find_member(request.user_id)
        .expect("member was just inserted or updated")
        .clone();

    if let Err(e) = state
        .notifier
        .notify(NotificationEvent::ProjectInvitation {
            project_id,
            project_name: project.name.clone(),
            invite_id: Uuid::new_v4(),
            invitation_code: project.invitation_code.clone(),
            inviter_user_id: auth.user_id,
            invited_email: invited.email.clone(),
            invited_user_id: Some(invited.user_id),
            role: invited.role.to_string(),
        })
        .await
    {
        tracing::warn!(error = %e, project_id = %project_id, "failed to dispatch projectInvitation notification");
    }

    Ok(ApiResponse::created(MemberResponse::from(&invited)))
}

/// **POST /v1/projects/join**
pub async fn join_by_code(
    AuthUser(auth): AuthUser,
    State(state): State<ProjectsState>,
    ValidatedJson(request): ValidatedJson<JoinByCodeRequest>,
) -> Result<ApiResponse<ProjectResponse>> {
    let mut tx = state.repos.begin().await.map_err(Error::Database)?;

    let mut project = lock_project_by_code_for_update_tx(&mut tx, &request.invitation_code)
        .await?
        .ok_or_else(|| Error::NotFound("invalid invitation code".to_string()))?;

    if project.is_active_member(auth.user_id) {
        return Err(Error::DuplicateResource(
            "already a member of this project".to_string(),
        ));
    }

    if project.at_member_capacity() {
        return Err(Error::Validation(
            "project has reached its member capacity".to_string(),
        ));
    }

    match project.find_member_mut(auth.user_id) {
        Some(existing) => {
            existing.status = MemberStatus::Active;
            existing.joined_at = chrono::Utc::now();
            existing.last_active = Some(chrono::Utc::now());
        }
        None => {
            let mut member = Member::new_invited(auth.user_id, auth.email.clone(), MemberRole::Member, project.created_by);
            member.status = MemberStatus::Active;
            member.last_active = Some(chrono::Utc::now());
            project.members.0.push(member);
        }
    }

    update_project_members_tx(&mut tx, project.id, &project.members.0).await?;
    tx.commit().await.map_err(Error::Database)?;

    Ok(ApiResponse::ok(ProjectResponse::from(&project)))
}

/// **GET /v1/projects/:id/members**
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListMembersQuery {
    pub status: Option<MemberStatus>,
}

pub async fn list_members(
    AuthUser(auth): AuthUser,
    State(state): State<ProjectsState>,
    Path(project_id): Path<Uuid>,
    Query(query): Query<ListMembersQuery>,
) -> Result<ApiResponse<Vec<MemberResponse>>> {
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

    let mut members: Vec<&Member> = project
        .members
        .0
        .iter()
        .filter(|m| query.status.is_none_or(|status| m.status == status))
        .collect();
    members.sort_by(|a, b| {
        (b.role == MemberRole::Admin)
            .cmp(&(a.role == MemberRole::Admin))
            .then(a.joined_at.cmp(&b.joined_at))
    });

    Ok(ApiResponse::ok(members.into_iter().map(MemberResponse::from).collect()))
}

/// **PATCH /v1/projects/:id/members/:userId**
pub async fn update_member_role(
    AuthUser(auth): AuthUser,
    State(state): State<ProjectsState>,
    Path((project_id, target_user_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(request): ValidatedJson<UpdateMemberRoleRequest>,
) -> Result<ApiResponse<MemberResponse>> {
    let mut tx = state.repos.begin().await.map_err(Error::Database)?;

    let mut project = lock_project_for_update_tx(&mut tx, project_id)
        .await?
        .ok_or_else(|| Error::NotFound("project not found".to_string()))?;

    if !project.member_has_at_least(auth.user_id, MemberRole::Admin) {
        return Err(Error::Forbidden(
            "only project admins can change member roles".to_string(),
        ));
    }

    project
        .find_member(target_user_id)
        .ok_or_else(|| Error::NotFound("member not found".to_string()))?;
    if target_user_id == project.created_by && request.role != MemberRole::Admin {
        return Err(Error::Validation(
            "project creator's role cannot be changed away from admin".to_string(),
        ));
    }

    let member = project
        .find_member_mut(target_user_id)
        .ok_or_else(|| Error::NotFound("member not found".to_string()))?;
    member.role = request.role;
    let updated = member.clone();

    update_project_members_tx(&mut tx, project_id, &project.members.0).await?;
    tx.commit().await.map_err(Error::Database)?;

    Ok(ApiResponse::ok(MemberResponse::from(&updated)))
}

/// **DELETE /v1/projects/:id/members/:userId**
pub async fn remove_member(
    AuthUser(auth): AuthUser,
    State(state): State<ProjectsState>,
    Path((project_id, target_user_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode> {
    let mut tx = state.repos.begin().await.map_err(Error::Database)?;

    let mut project = lock_project_for_update_tx(&mut tx, project_id)
        .await?
        .ok_or_else(|| Error::NotFound("project not found".to_string()))?;

    if target_user_id != auth.user_id && !project.member_has_at_least(auth.user_id, MemberRole::Admin) {
        return Err(Error::Forbidden(
            "only project admins can remove other members".to_string(),
        ));
    }

    project
        .find_member(target_user_id)
        .ok_or_else(|| Error::NotFound("member not found".to_string()))?;
    if target_user_id == project.created_by {
        return Err(Error::Validation(
            "project creator cannot be removed".to_string(),
        ));
    }

    let member = project
        .find_member_mut(target_user_id)
        .ok_or_else(|| Error::NotFound("member not found".to_string()))?;
    member.status = MemberStatus::Removed;

    update_project_members_tx(&mut tx, project_id, &project.members.0).await?;
    tx.commit().await.map_err(Error::Database)?;

    Ok(StatusCode::NO_CONTENT)
}

/// **POST /v1/projects/:id/leave**
pub async fn leave_project(
    AuthUser(auth): AuthUser,
    State(state): State<ProjectsState>,
    Path(project_id): Path<Uuid>,
) -> Result<StatusCode> {
    let mut tx = state.repos.begin().await.map_err(Error::Database)?;

    let mut project = lock_project_for_update_tx(&mut tx, project_id)
        .await?
        .ok_or_else(|| Error::NotFound("project not found".to_string()))?;

    project
        .find_member(auth.user_id)
        .ok_or_else(|| Error::Forbidden("not a member of this project".to_string()))?;
    if auth.user_id == project.created_by {
        return Err(Error::Validation("project creator cannot leave".to_string()));
    }

    let member = project
        .find_member_mut(auth.user_id)
        .ok_or_else(|| Error::Forbidden("not a member of this project".to_string()))?;
    member.status = MemberStatus::Removed;

    update_project_members_tx(&mut tx, project_id, &project.members.0).await?;
    tx.commit().await.map_err(Error::Database)?;

    Ok(StatusCode::NO_CONTENT)
}
