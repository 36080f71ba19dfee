//! Task and activity log domain entities

use chrono::{DateTime, Utc};
use framecast_common::Error;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::state::{TaskEvent, TaskState, TaskStateMachine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Backlog,
    InProgress,
    Blocked,
    Done,
    Archived,
}

impl From<TaskStatus> for TaskState {
    fn from(value: TaskStatus) -> Self {
        match value {
            TaskStatus::Backlog => TaskState::Backlog,
            TaskStatus::InProgress => TaskState::InProgress,
            TaskStatus::Blocked => TaskState::Blocked,
            TaskStatus::Done => TaskState::Done,
            TaskStatus::Archived => TaskState::Archived,
        }
    }
}

impl From<TaskState> for TaskStatus {
    fn from(value: TaskState) -> Self {
        match value {
            TaskState::Backlog => TaskStatus::Backlog,
            TaskState::InProgress => TaskStatus::InProgress,
            TaskState::Blocked => TaskStatus::Blocked,
            TaskState::Done => TaskStatus::Done,
            TaskState::Archived => TaskStatus::Archived,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", TaskState::from(*self))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl Default for TaskPriority {
    fn default() -> Self {
        Self::Medium
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Task {
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

impl Task {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        project_id: Uuid,
        created_by: Uuid,
        title: String,
        description: Option<String>,
        priority: TaskPriority,
        assignee_id: Option<Uuid>,
        due_date: Option<DateTime<Utc>>,
        labels: Vec<String>,
    ) -> Result<Self, Error> {
        let title = title.trim().to_string();
        if title.is_empty() || title.len() > 200 {
            return Err(Error::Validation(
                "title must be between 1 and 200 characters".to_string(),
            ));
        }
        if let Some(ref desc) = description {
            if desc.len() > 2000 {
                return Err(Error::Validation(
                    "description must be at most 2000 characters".to_string(),
                ));
            }
        }
        validate_labels(&labels)?;

        let mut watchers = vec![created_by];
        if let Some(assignee_id) = assignee_id {
            if assignee_id != created_by {
                watchers.push(assignee_id);
            }
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            project_id,
            title,
            description,
            status: TaskStatus::Backlog,
            priority,
            assignee_id,
            created_by,
            due_date,
            labels,
            watchers,
            is_deleted: false,
            last_status_change_at: now,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply_transition(&mut self, event: TaskEvent) -> Result<(), Error> {
        let next = TaskStateMachine::transition(self.status.into(), event)?;
        self.status = next.into();
        let now = Utc::now();
        self.last_status_change_at = now;
        self.updated_at = now;
        Ok(())
    }

    pub fn is_archived(&self) -> bool {
        self.status == TaskStatus::Archived
    }

    /// Adds `user_id` to the watcher set if not already present. Creator and
    /// current assignee are always members of this set (§4.2's `assignTask`
    /// and `createTask`).
    pub fn add_watcher(&mut self, user_id: Uuid) {
        if !self.watchers.contains(&user_id) {
            self.watchers.push(user_id);
        }
    }
}

/// Enforces the label set size and per-label length invariants shared by
/// task creation and the `labels` field patch.
pub fn validate_labels(labels: &[String]) -> Result<(), Error> {
    if labels.len() > 10 {
        return Err(Error::Validation("at most 10 labels are allowed".to_string()));
    }
    if labels.iter().any(|label| label.len() > 50) {
        return Err(Error::Validation(
            "each label must be at most 50 characters".to_string(),
        ));
    }
    Ok(())
}

/// A single entry in a task's append-only activity log.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TaskActivity {
    pub id: Uuid,
    pub task_id: Uuid,
    pub project_id: Uuid,
    pub actor_user_id: Uuid,
    pub action: TaskActivityAction,
    pub from_status: Option<TaskStatus>,
    pub to_status: Option<TaskStatus>,
    pub metadata: sqlx::types::Json<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_activity_action", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskActivityAction {
    Create,
    UpdateStatus,
    Assign,
    Unassign,
    Edit,
    Delete,
}

impl TaskActivity {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        task_id: Uuid,
        project_id: Uuid,
        actor_user_id: Uuid,
        action: TaskActivityAction,
        from_status: Option<TaskStatus>,
        to_status: Option<TaskStatus>,
        metadata: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            task_id,
            project_id,
            actor_user_id,
            action,
            from_status,
            to_status,
            metadata: sqlx::types::Json(metadata),
            created_at: Utc::now(),
        }
    }
}

/// A field update that can be explicitly cleared, as distinct from being
/// left unset. `Absent` means the request omitted the field entirely;
/// `Clear` means the client sent `null`; `Set` carries a new value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Patch<T> {
    #[default]
    Absent,
    Clear,
    Set(T),
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    /// Applies this patch to `target`, leaving it untouched when `Absent`.
    pub fn apply_to(self, target: &mut Option<T>) {
        match self {
            Patch::Absent => {}
            Patch::Clear => *target = None,
            Patch::Set(value) => *target = Some(value),
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(|opt| match opt {
            Some(value) => Patch::Set(value),
            None => Patch::Clear,
        })
    }
}
