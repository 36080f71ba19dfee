//! Tasks domain: tasks, activity log, cross-service permission bridge

pub mod api;
pub mod domain;
pub mod permission;
pub mod repository;

pub use api::{routes, TasksState};
pub use domain::entities::{
    Patch, Task, TaskActivity, TaskActivityAction, TaskPriority, TaskStatus,
};
pub use domain::state::{StateError, TaskEvent, TaskState, TaskStateMachine};
pub use permission::{HttpProjectPermissionClient, ProjectPermissionClient, ProjectRole};
pub use repository::TasksRepositories;
