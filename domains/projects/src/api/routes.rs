use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{internal, members, projects};
use super::middleware::ProjectsState;

fn project_routes() -> Router<ProjectsState> {
    Router::new()
        .route(
            "/v1/projects",
            post(projects::create_project).get(projects::list_user_projects),
        )
        .route(
            "/v1/projects/{id}",
            get(projects::get_project)
                .patch(projects::update_project)
                .delete(projects::delete_project),
        )
        .route("/v1/projects/{id}/leave", post(members::leave_project))
}

fn member_routes() -> Router<ProjectsState> {
    Router::new()
        .route("/v1/projects/join", post(members::join_by_code))
        .route(
            "/v1/projects/{id}/members",
            post(members::invite_member).get(members::list_members),
        )
        .route(
            "/v1/projects/{id}/members/{userId}",
            axum::routing::patch(members::update_member_role).delete(members::remove_member),
        )
}

fn internal_routes() -> Router<ProjectsState> {
    Router::new().route(
        "/internal/projects/{id}/permissions",
        get(internal::get_permission),
    )
}

pub fn routes() -> Router<ProjectsState> {
    Router::new()
        .merge(project_routes())
        .merge(member_routes())
        .merge(internal_routes())
}
