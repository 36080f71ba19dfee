//! Task service endpoint integration tests, exercised against a real
//! Project service instance over HTTP so the permission bridge (§4.4) is
//! covered end to end rather than mocked.
//!
//! Requires a reachable Postgres instance (`TEST_DATABASE_URL` or
//! `DATABASE_URL`); every test here is `#[ignore]` by convention.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use crate::common::{create_test_jwt, TestHarness};

fn auth_request(method: Method, uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Creates a project via the Project service and returns (id, invitation code).
async fn create_project(harness: &TestHarness, token: &str, name: &str) -> (String, String) {
    let request = auth_request(Method::POST, "/v1/projects", token, json!({ "name": name }));
    let created = body_json(harness.project_router.clone().oneshot(request).await.unwrap()).await;
    let created = &created["data"];
    (
        created["id"].as_str().unwrap().to_string(),
        created["invitationCode"].as_str().unwrap().to_string(),
    )
}

async fn invite(harness: &TestHarness, admin_token: &str, project_id: &str, user_id: Uuid, role: &str) {
    let request = auth_request(
        Method::POST,
        &format!("/v1/projects/{project_id}/members"),
        admin_token,
        json!({ "userId": user_id, "role": role }),
    );
    let response = harness.project_router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

async fn join(harness: &TestHarness, token: &str, invitation_code: &str) {
    let request = auth_request(
        Method::POST,
        "/v1/projects/join",
        token,
        json!({ "invitationCode": invitation_code }),
    );
    let response = harness.project_router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

/// End-to-end scenario 1: create, assign, transition to done, with an
/// ordered activity log.
#[tokio::test]
#[ignore = "requires a reachable Postgres instance"]
async fn test_create_transition_complete_flow() {
    let harness = TestHarness::new().await.unwrap();
    let admin_id = Uuid::new_v4();
    let admin_token = create_test_jwt(admin_id, "admin@example.com");
    let member_id = Uuid::new_v4();
    let member_token = create_test_jwt(member_id, "member@example.com");

    let (project_id, invitation_code) = create_project(&harness, &admin_token, "Alpha").await;
    invite(&harness, &admin_token, &project_id, member_id, "member").await;
    join(&harness, &member_token, &invitation_code).await;

    let create_request = auth_request(
        Method::POST,
        &format!("/v1/projects/{project_id}/tasks"),
        &admin_token,
        json!({ "title": "T1", "assigneeId": member_id }),
    );
    let response = harness.task_router.clone().oneshot(create_request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let task = body_json(response).await;
    let task = &task["data"];
    let task_id = task["id"].as_str().unwrap().to_string();
    assert_eq!(task["status"], "backlog");

    let start_request = auth_request(
        Method::POST,
        &format!("/v1/tasks/{task_id}/status"),
        &member_token,
        json!({ "event": "start" }),
    );
    let response = harness.task_router.clone().oneshot(start_request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "in_progress");

    let complete_request = auth_request(
        Method::POST,
        &format!("/v1/tasks/{task_id}/status"),
        &member_token,
        json!({ "event": "complete" }),
    );
    let response = harness.task_router.clone().oneshot(complete_request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "done");

    let activity_request = Request::builder()
        .method(Method::GET)
        .uri(format!("/v1/tasks/{task_id}/activity"))
        .header("authorization", format!("Bearer {admin_token}"))
        .body(Body::empty())
        .unwrap();
    let response = harness.task_router.clone().oneshot(activity_request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let activity = body_json(response).await;
    let actions: Vec<&str> = activity["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["action"].as_str().unwrap())
        .collect();
    // newest first
    assert_eq!(actions, vec!["update_status", "update_status", "create"]);
}

/// End-to-end scenario 2: a direct backlog -> done transition is rejected
/// and leaves no trace.
#[tokio::test]
#[ignore = "requires a reachable Postgres instance"]
async fn test_invalid_transition_rejected() {
    let harness = TestHarness::new().await.unwrap();
    let admin_token = create_test_jwt(Uuid::new_v4(), "admin@example.com");
    let (project_id, _) = create_project(&harness, &admin_token, "Alpha").await;

    let create_request = auth_request(
        Method::POST,
        &format!("/v1/projects/{project_id}/tasks"),
        &admin_token,
        json!({ "title": "T1" }),
    );
    let task = body_json(harness.task_router.clone().oneshot(create_request).await.unwrap()).await;
    let task_id = task["data"]["id"].as_str().unwrap().to_string();

    let request = auth_request(
        Method::POST,
        &format!("/v1/tasks/{task_id}/status"),
        &admin_token,
        json!({ "event": "complete" }),
    );
    let response = harness.task_router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "INVALID_STATUS_TRANSITION");
}

/// End-to-end scenario 3: assigning a non-member is rejected.
#[tokio::test]
#[ignore = "requires a reachable Postgres instance"]
async fn test_assign_non_member_rejected() {
    let harness = TestHarness::new().await.unwrap();
    let admin_token = create_test_jwt(Uuid::new_v4(), "admin@example.com");
    let (project_id, _) = create_project(&harness, &admin_token, "Alpha").await;
    let stranger_id = Uuid::new_v4();

    let request = auth_request(
        Method::POST,
        &format!("/v1/projects/{project_id}/tasks"),
        &admin_token,
        json!({ "title": "T2", "assigneeId": stranger_id }),
    );
    let response = harness.task_router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "ASSIGNEE_NOT_PROJECT_MEMBER");
}

/// End-to-end scenario 4: a viewer cannot change task status.
#[tokio::test]
#[ignore = "requires a reachable Postgres instance"]
async fn test_viewer_cannot_change_status() {
    let harness = TestHarness::new().await.unwrap();
    let admin_token = create_test_jwt(Uuid::new_v4(), "admin@example.com");
    let viewer_id = Uuid::new_v4();
    let viewer_token = create_test_jwt(viewer_id, "viewer@example.com");

    let (project_id, invitation_code) = create_project(&harness, &admin_token, "Alpha").await;
    invite(&harness, &admin_token, &project_id, viewer_id, "viewer").await;
    join(&harness, &viewer_token, &invitation_code).await;

    let create_request = auth_request(
        Method::POST,
        &format!("/v1/projects/{project_id}/tasks"),
        &admin_token,
        json!({ "title": "T1" }),
    );
    let task = body_json(harness.task_router.clone().oneshot(create_request).await.unwrap()).await;
    let task_id = task["data"]["id"].as_str().unwrap().to_string();

    let request = auth_request(
        Method::POST,
        &format!("/v1/tasks/{task_id}/status"),
        &viewer_token,
        json!({ "event": "archive" }),
    );
    let response = harness.task_router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let get_request = Request::builder()
        .method(Method::GET)
        .uri(format!("/v1/tasks/{task_id}"))
        .header("authorization", format!("Bearer {admin_token}"))
        .body(Body::empty())
        .unwrap();
    let response = harness.task_router.clone().oneshot(get_request).await.unwrap();
    let task = body_json(response).await;
    assert_eq!(task["data"]["status"], "backlog");
}

/// End-to-end scenario 5: a non-assignee member cannot change status, but
/// the assignee can even without admin rights.
#[tokio::test]
#[ignore = "requires a reachable Postgres instance"]
async fn test_member_change_status_requires_being_assignee() {
    let harness = TestHarness::new().await.unwrap();
    let admin_token = create_test_jwt(Uuid::new_v4(), "admin@example.com");
    let assignee_id = Uuid::new_v4();
    let assignee_token = create_test_jwt(assignee_id, "assignee@example.com");
    let bystander_id = Uuid::new_v4();
    let bystander_token = create_test_jwt(bystander_id, "bystander@example.com");

    let (project_id, invitation_code) = create_project(&harness, &admin_token, "Alpha").await;
    invite(&harness, &admin_token, &project_id, assignee_id, "member").await;
    join(&harness, &assignee_token, &invitation_code).await;
    invite(&harness, &admin_token, &project_id, bystander_id, "member").await;
    join(&harness, &bystander_token, &invitation_code).await;

    let create_request = auth_request(
        Method::POST,
        &format!("/v1/projects/{project_id}/tasks"),
        &admin_token,
        json!({ "title": "T1", "assigneeId": assignee_id }),
    );
    let task = body_json(harness.task_router.clone().oneshot(create_request).await.unwrap()).await;
    let task_id = task["data"]["id"].as_str().unwrap().to_string();

    let bystander_request = auth_request(
        Method::POST,
        &format!("/v1/tasks/{task_id}/status"),
        &bystander_token,
        json!({ "event": "start" }),
    );
    let response = harness.task_router.clone().oneshot(bystander_request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let assignee_request = auth_request(
        Method::POST,
        &format!("/v1/tasks/{task_id}/status"),
        &assignee_token,
        json!({ "event": "start" }),
    );
    let response = harness.task_router.clone().oneshot(assignee_request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

/// End-to-end scenario 6: soft-deleting a task hides it from `listTasks`
/// and `getTask` but its activity log remains readable.
#[tokio::test]
#[ignore = "requires a reachable Postgres instance"]
async fn test_soft_delete_hides_task_but_keeps_activity() {
    let harness = TestHarness::new().await.unwrap();
    let admin_token = create_test_jwt(Uuid::new_v4(), "admin@example.com");
    let (project_id, _) = create_project(&harness, &admin_token, "Alpha").await;

    let create_request = auth_request(
        Method::POST,
        &format!("/v1/projects/{project_id}/tasks"),
        &admin_token,
        json!({ "title": "T1" }),
    );
    let task = body_json(harness.task_router.clone().oneshot(create_request).await.unwrap()).await;
    let task_id = task["data"]["id"].as_str().unwrap().to_string();

    let delete_request = Request::builder()
        .method(Method::DELETE)
        .uri(format!("/v1/tasks/{task_id}"))
        .header("authorization", format!("Bearer {admin_token}"))
        .body(Body::empty())
        .unwrap();
    let response = harness.task_router.clone().oneshot(delete_request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let get_request = Request::builder()
        .method(Method::GET)
        .uri(format!("/v1/tasks/{task_id}"))
        .header("authorization", format!("Bearer {admin_token}"))
        .body(Body::empty())
        .unwrap();
    let response = harness.task_router.clone().oneshot(get_request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let list_request = Request::builder()
        .method(Method::GET)
        .uri(format!("/v1/projects/{project_id}/tasks"))
        .header("authorization", format!("Bearer {admin_token}"))
        .body(Body::empty())
        .unwrap();
    let response = harness.task_router.clone().oneshot(list_request).await.unwrap();
    let body = body_json(response).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let activity_request = Request::builder()
        .method(Method::GET)
        .uri(format!("/v1/tasks/{task_id}/activity"))
        .header("authorization", format!("Bearer {admin_token}"))
        .body(Body::empty())
        .unwrap();
    let response = harness.task_router.clone().oneshot(activity_request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let activity = body_json(response).await;
    let actions: Vec<&str> = activity["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["action"].as_str().unwrap())
        .collect();
    assert_eq!(actions, vec!["delete", "create"]);
}
