use axum::{routing::get, Router};

use super::handlers::{activity, tasks};
use super::middleware::TasksState;

fn task_routes() -> Router<TasksState> {
    Router::new()
        .route(
            "/v1/projects/{projectId}/tasks",
            get(tasks::list_tasks).post(tasks::create_task),
        )
        .route(
            "/v1/tasks/{id}",
            get(tasks::get_task)
                .patch(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route("/v1/tasks/{id}/status", axum::routing::post(tasks::change_status))
        .route("/v1/tasks/{id}/assign", axum::routing::post(tasks::assign_task))
        .route("/v1/tasks/{id}/activity", get(activity::list_task_activity))
}

pub fn routes() -> Router<TasksState> {
    Router::new().merge(task_routes())
}
