use chrono::{DateTime, Utc};
use framecast_common::RepositoryError;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{Task, TaskPriority, TaskStatus};

use super::transactions::insert_task_tx;

#[derive(Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

/// Filters backing `listTasks`. Every `Option<Vec<_>>` field is a
/// "single or set" match (empty/absent means unfiltered); `is_deleted`
/// defaults to `false` per the operation's documented default.
#[derive(Debug, Clone, Default)]
pub struct TaskListFilter {
    pub status: Option<Vec<TaskStatus>>,
    pub assignee_id: Option<Vec<Uuid>>,
    pub priority: Option<Vec<TaskPriority>>,
    pub label: Option<Vec<String>>,
    pub search: Option<String>,
    pub due_date_from: Option<DateTime<Utc>>,
    pub due_date_to: Option<DateTime<Utc>>,
    pub is_deleted: bool,
}

/// Sort key for `listTasks`, defaulting to `-createdAt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskSort {
    CreatedAtDesc,
    CreatedAtAsc,
    UpdatedAtDesc,
    UpdatedAtAsc,
    TitleDesc,
    TitleAsc,
    StatusDesc,
    StatusAsc,
    PriorityDesc,
    PriorityAsc,
    DueDateDesc,
    DueDateAsc,
}

impl Default for TaskSort {
    fn default() -> Self {
        Self::CreatedAtDesc
    }
}

impl TaskSort {
    /// Parses the `sort` query parameter's `±field` syntax. Unknown values
    /// fall back to the default rather than erroring, since `sort` is
    /// advisory.
    pub fn parse(raw: &str) -> Self {
        let (descending, field) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw.strip_prefix('+').unwrap_or(raw)),
        };
        match (field, descending) {
            ("createdAt", false) => Self::CreatedAtAsc,
            ("createdAt", true) => Self::CreatedAtDesc,
            ("updatedAt", false) => Self::UpdatedAtAsc,
            ("updatedAt", true) => Self::UpdatedAtDesc,
            ("title", false) => Self::TitleAsc,
            ("title", true) => Self::TitleDesc,
            ("status", false) => Self::StatusAsc,
            ("status", true) => Self::StatusDesc,
            ("priority", false) => Self::PriorityAsc,
            ("priority", true) => Self::PriorityDesc,
            ("dueDate", false) => Self::DueDateAsc,
            ("dueDate", true) => Self::DueDateDesc,
            _ => Self::default(),
        }
    }

    fn sql(self) -> &'static str {
        match self {
            Self::CreatedAtDesc => "created_at DESC",
            Self::CreatedAtAsc => "created_at ASC",
            Self::UpdatedAtDesc => "updated_at DESC",
            Self::UpdatedAtAsc => "updated_at ASC",
            Self::TitleDesc => "title DESC",
            Self::TitleAsc => "title ASC",
            Self::StatusDesc => "status DESC",
            Self::StatusAsc => "status ASC",
            Self::PriorityDesc => "priority DESC",
            Self::PriorityAsc => "priority ASC",
            Self::DueDateDesc => "due_date DESC NULLS LAST",
            Self::DueDateAsc => "due_date ASC NULLS LAST",
        }
    }
}

const TASK_COLUMNS: &str = r#"id, project_id, title, description, status, priority,
       assignee_id, created_by, due_date, labels, watchers, is_deleted,
       last_status_change_at, created_at, updated_at"#;

/// Shared `WHERE` body for `list_for_project`/`count_for_project`. `label`
/// uses array overlap (`&&`, "matches any"); `search` ranks title above
/// description via `setweight`, the Postgres idiom for field-weighted
/// full-text search.
const TASK_FILTER_CLAUSE: &str = r#"
    project_id = $1
    AND is_deleted = $2
    AND ($3::task_status[] IS NULL OR status = ANY($3))
    AND ($4::uuid[] IS NULL OR assignee_id = ANY($4))
    AND ($5::task_priority[] IS NULL OR priority = ANY($5))
    AND ($6::text[] IS NULL OR labels && $6)
    AND ($7::text IS NULL OR (
        setweight(to_tsvector('english', title), 'A') ||
        setweight(to_tsvector('english', coalesce(description, '')), 'B')
    ) @@ plainto_tsquery('english', $7))
    AND ($8::timestamptz IS NULL OR due_date >= $8)
    AND ($9::timestamptz IS NULL OR due_date <= $9)
"#;

impl TaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, task: Task) -> Result<Task, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(RepositoryError::Connection)?;
        insert_task_tx(&mut tx, &task).await?;
        tx.commit().await.map_err(RepositoryError::Connection)?;
        Ok(task)
    }

    /// Looks a task up regardless of its `is_deleted` tombstone — callers
    /// that need to gate on "not deleted" (e.g. `getTask`) check the flag
    /// themselves; `listTaskActivity` deliberately does not, since activity
    /// outlives a soft-deleted task.
    pub async fn find(&self, id: Uuid) -> Result<Option<Task>, RepositoryError> {
        sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::Connection)
    }

    pub async fn list_for_project(
        &self,
        project_id: Uuid,
        filter: &TaskListFilter,
        sort: TaskSort,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Task>, RepositoryError> {
        let query = format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE {TASK_FILTER_CLAUSE} ORDER BY {} LIMIT $10 OFFSET $11",
            sort.sql()
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .bind(filter.is_deleted)
            .bind(filter.status.as_deref())
            .bind(filter.assignee_id.as_deref())
            .bind(filter.priority.as_deref())
            .bind(filter.label.as_deref())
            .bind(filter.search.as_deref())
            .bind(filter.due_date_from)
            .bind(filter.due_date_to)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(RepositoryError::Connection)
    }

    /// Total count backing `list_for_project`'s pagination metadata.
    pub async fn count_for_project(
        &self,
        project_id: Uuid,
        filter: &TaskListFilter,
    ) -> Result<i64, RepositoryError> {
        let query = format!("SELECT count(*) FROM tasks WHERE {TASK_FILTER_CLAUSE}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(project_id)
            .bind(filter.is_deleted)
            .bind(filter.status.as_deref())
            .bind(filter.assignee_id.as_deref())
            .bind(filter.priority.as_deref())
            .bind(filter.label.as_deref())
            .bind(filter.search.as_deref())
            .bind(filter.due_date_from)
            .bind(filter.due_date_to)
            .fetch_one(&self.pool)
            .await
            .map_err(RepositoryError::Connection)
    }
}
