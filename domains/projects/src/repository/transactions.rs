//! Transaction-scoped queries
//!
//! Every mutation that depends on the current `members` array (invite,
//! role change, remove, join-by-code) locks the project row with
//! `FOR UPDATE` before reading it, then writes the updated array back in
//! the same transaction. This mirrors the row-locking pattern used for
//! team membership mutations.

use chrono::Utc;
use framecast_common::RepositoryError;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::domain::entities::{Member, Project, ProjectSettings, ProjectStatus};

pub async fn lock_project_for_update_tx(
    tx: &mut Transaction<'_, Postgres>,
    project_id: Uuid,
) -> Result<Option<Project>, RepositoryError> {
    sqlx::query_as::<_, Project>(
        r#"
        SELECT id, name, description, created_by, status, invitation_code,
               settings, total_tasks, completed_tasks, members, created_at, updated_at
        FROM projects
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(project_id)
    .fetch_optional(&mut **tx)
    .await
    .map_err(RepositoryError::Connection)
}

/// Looks up by invitation code case-insensitively, restricted to active
/// projects (joinByCode does not resurrect archived/deleted projects).
pub async fn lock_project_by_code_for_update_tx(
    tx: &mut Transaction<'_, Postgres>,
    invitation_code: &str,
) -> Result<Option<Project>, RepositoryError> {
    sqlx::query_as::<_, Project>(
        r#"
        SELECT id, name, description, created_by, status, invitation_code,
               settings, total_tasks, completed_tasks, members, created_at, updated_at
        FROM projects
        WHERE upper(invitation_code) = upper($1) AND status = 'active'
        FOR UPDATE
        "#,
    )
    .bind(invitation_code)
    .fetch_optional(&mut **tx)
    .await
    .map_err(RepositoryError::Connection)
}

pub async fn invitation_code_exists_tx(
    tx: &mut Transaction<'_, Postgres>,
    code: &str,
) -> Result<bool, RepositoryError> {
    let row: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM projects WHERE invitation_code = $1")
        .bind(code)
        .fetch_optional(&mut **tx)
        .await
        .map_err(RepositoryError::Connection)?;

    Ok(row.is_some())
}

pub async fn insert_project_tx(
    tx: &mut Transaction<'_, Postgres>,
    project: &Project,
) -> Result<(), RepositoryError> {
    sqlx::query(
        r#"
        INSERT INTO projects (
            id, name, description, created_by, status, invitation_code,
            settings, total_tasks, completed_tasks, members, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        "#,
    )
    .bind(project.id)
    .bind(&project.name)
    .bind(&project.description)
    .bind(project.created_by)
    .bind(project.status)
    .bind(&project.invitation_code)
    .bind(&project.settings)
    .bind(project.total_tasks)
    .bind(project.completed_tasks)
    .bind(&project.members)
    .bind(project.created_at)
    .bind(project.updated_at)
    .execute(&mut **tx)
    .await
    .map_err(RepositoryError::Connection)?;

    Ok(())
}

pub async fn update_project_members_tx(
    tx: &mut Transaction<'_, Postgres>,
    project_id: Uuid,
    members: &[Member],
) -> Result<(), RepositoryError> {
    let json = sqlx::types::Json(members.to_vec());
    let result = sqlx::query(
        r#"
        UPDATE projects
        SET members = $2, updated_at = $3
        WHERE id = $1
        "#,
    )
    .bind(project_id)
    .bind(json)
    .bind(Utc::now())
    .execute(&mut **tx)
    .await
    .map_err(RepositoryError::Connection)?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

pub async fn update_project_status_tx(
    tx: &mut Transaction<'_, Postgres>,
    project_id: Uuid,
    status: ProjectStatus,
) -> Result<(), RepositoryError> {
    let result = sqlx::query(
        r#"
        UPDATE projects
        SET status = $2, updated_at = $3
        WHERE id = $1
        "#,
    )
    .bind(project_id)
    .bind(status)
    .bind(Utc::now())
    .execute(&mut **tx)
    .await
    .map_err(RepositoryError::Connection)?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn update_project_fields_tx(
    tx: &mut Transaction<'_, Postgres>,
    project_id: Uuid,
    name: &str,
    description: Option<&str>,
    settings: &ProjectSettings,
) -> Result<(), RepositoryError> {
    let result = sqlx::query(
        r#"
        UPDATE projects
        SET name = $2, description = $3, settings = $4, updated_at = $5
        WHERE id = $1
        "#,
    )
    .bind(project_id)
    .bind(name)
    .bind(description)
    .bind(sqlx::types::Json(settings))
    .bind(Utc::now())
    .execute(&mut **tx)
    .await
    .map_err(RepositoryError::Connection)?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}
