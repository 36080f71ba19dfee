//! Transaction-scoped queries for task mutations that must observe a
//! consistent row, mirroring the project domain's locking pattern.

use framecast_common::RepositoryError;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::domain::entities::{Task, TaskActivity, TaskStatus};

pub async fn lock_task_for_update_tx(
    tx: &mut Transaction<'_, Postgres>,
    task_id: Uuid,
) -> Result<Option<Task>, RepositoryError> {
    sqlx::query_as::<_, Task>(
        r#"
        SELECT id, project_id, title, description, status, priority,
               assignee_id, created_by, due_date, labels, watchers, is_deleted,
               last_status_change_at, created_at, updated_at
        FROM tasks
        WHERE id = $1 AND is_deleted = false
        FOR UPDATE
        "#,
    )
    .bind(task_id)
    .fetch_optional(&mut **tx)
    .await
    .map_err(RepositoryError::Connection)
}

pub async fn insert_task_tx(
    tx: &mut Transaction<'_, Postgres>,
    task: &Task,
) -> Result<(), RepositoryError> {
    sqlx::query(
        r#"
        INSERT INTO tasks (
            id, project_id, title, description, status, priority,
            assignee_id, created_by, due_date, labels, watchers, is_deleted,
            last_status_change_at, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        "#,
    )
    .bind(task.id)
    .bind(task.project_id)
    .bind(&task.title)
    .bind(&task.description)
    .bind(task.status)
    .bind(task.priority)
    .bind(task.assignee_id)
    .bind(task.created_by)
    .bind(task.due_date)
    .bind(&task.labels)
    .bind(&task.watchers)
    .bind(task.is_deleted)
    .bind(task.last_status_change_at)
    .bind(task.created_at)
    .bind(task.updated_at)
    .execute(&mut **tx)
    .await
    .map_err(RepositoryError::Connection)?;

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn update_task_fields_tx(
    tx: &mut Transaction<'_, Postgres>,
    task: &Task,
) -> Result<(), RepositoryError> {
    let result = sqlx::query(
        r#"
        UPDATE tasks
        SET title = $2, description = $3, priority = $4, assignee_id = $5,
            due_date = $6, labels = $7, watchers = $8, updated_at = $9
        WHERE id = $1
        "#,
    )
    .bind(task.id)
    .bind(&task.title)
    .bind(&task.description)
    .bind(task.priority)
    .bind(task.assignee_id)
    .bind(task.due_date)
    .bind(&task.labels)
    .bind(&task.watchers)
    .bind(task.updated_at)
    .execute(&mut **tx)
    .await
    .map_err(RepositoryError::Connection)?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

pub async fn update_task_status_tx(
    tx: &mut Transaction<'_, Postgres>,
    task_id: Uuid,
    status: TaskStatus,
) -> Result<(), RepositoryError> {
    let result = sqlx::query(
        r#"
        UPDATE tasks
        SET status = $2, last_status_change_at = now(), updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(task_id)
    .bind(status)
    .execute(&mut **tx)
    .await
    .map_err(RepositoryError::Connection)?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

/// Sets the soft-delete tombstone without touching `status` — deletion is
/// orthogonal to the state machine (§4.2 `softDeleteTask`).
pub async fn soft_delete_task_tx(
    tx: &mut Transaction<'_, Postgres>,
    task_id: Uuid,
) -> Result<(), RepositoryError> {
    let result = sqlx::query(
        r#"
        UPDATE tasks
        SET is_deleted = true, updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(task_id)
    .execute(&mut **tx)
    .await
    .map_err(RepositoryError::Connection)?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

pub async fn insert_activity_tx(
    tx: &mut Transaction<'_, Postgres>,
    activity: &TaskActivity,
) -> Result<(), RepositoryError> {
    sqlx::query(
        r#"
        INSERT INTO task_activities (
            id, task_id, project_id, actor_user_id, action, from_status, to_status, metadata, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(activity.id)
    .bind(activity.task_id)
    .bind(activity.project_id)
    .bind(activity.actor_user_id)
    .bind(activity.action)
    .bind(activity.from_status)
    .bind(activity.to_status)
    .bind(&activity.metadata)
    .bind(activity.created_at)
    .execute(&mut **tx)
    .await
    .map_err(RepositoryError::Connection)?;

    Ok(())
}
