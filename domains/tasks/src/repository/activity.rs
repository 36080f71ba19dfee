use framecast_common::RepositoryError;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::TaskActivity;

use super::transactions::insert_activity_tx;

#[derive(Clone)]
pub struct TaskActivityRepository {
    pool: PgPool,
}

impl TaskActivityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Appends a single activity entry outside of any caller-owned
    /// transaction. Status-change activity recorded alongside a task
    /// mutation should instead call `insert_activity_tx` within that
    /// mutation's own transaction, so the log entry and the state change
    /// commit atomically.
    pub async fn append(&self, activity: &TaskActivity) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(RepositoryError::Connection)?;
        insert_activity_tx(&mut tx, activity).await?;
        tx.commit().await.map_err(RepositoryError::Connection)?;
        Ok(())
    }

    /// Newest-first activity feed for a task.
    pub async fn list_for_task(
        &self,
        task_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TaskActivity>, RepositoryError> {
        sqlx::query_as::<_, TaskActivity>(
            r#"
            SELECT id, task_id, project_id, actor_user_id, action, from_status, to_status, metadata, created_at
            FROM task_activities
            WHERE task_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(task_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::Connection)
    }

    /// Total count backing `list_for_task`'s pagination metadata.
    pub async fn count_for_task(&self, task_id: Uuid) -> Result<i64, RepositoryError> {
        sqlx::query_scalar::<_, i64>(
            "SELECT count(*) FROM task_activities WHERE task_id = $1",
        )
        .bind(task_id)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::Connection)
    }
}
