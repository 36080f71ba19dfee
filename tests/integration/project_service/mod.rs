//! Project service endpoint integration tests
//!
//! Requires a reachable Postgres instance (`TEST_DATABASE_URL` or
//! `DATABASE_URL`); every test here is `#[ignore]` by convention so a
//! plain `cargo test` run doesn't fail in an environment without one.

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

#[tokio::test]
#[ignore = "requires a reachable Postgres instance"]
async fn test_create_and_get_project() {
    let harness = TestHarness::new().await.unwrap();
    let user_id = Uuid::new_v4();
    let token = create_test_jwt(user_id, "owner@example.com");

    let create_request = auth_request(
        Method::POST,
        "/v1/projects",
        &token,
        json!({ "name": "Alpha" }),
    );
    let response = harness.project_router.clone().oneshot(create_request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = body_json(response).await;
    let created = &created["data"];
    let project_id = created["id"].as_str().unwrap();
    assert_eq!(created["members"][0]["role"], "admin");
    assert_eq!(created["invitationCode"].as_str().unwrap().len(), 8);

    let get_request = Request::builder()
        .method(Method::GET)
        .uri(format!("/v1/projects/{project_id}"))
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = harness.project_router.clone().oneshot(get_request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires a reachable Postgres instance"]
async fn test_invite_and_join_by_code() {
    let harness = TestHarness::new().await.unwrap();
    let admin_id = Uuid::new_v4();
    let admin_token = create_test_jwt(admin_id, "admin@example.com");
    let member_id = Uuid::new_v4();
    let member_token = create_test_jwt(member_id, "member@example.com");

    let create_request = auth_request(
        Method::POST,
        "/v1/projects",
        &admin_token,
        json!({ "name": "Alpha" }),
    );
    let created = body_json(
        harness.project_router.clone().oneshot(create_request).await.unwrap(),
    )
    .await;
    let created = &created["data"];
    let project_id = created["id"].as_str().unwrap();
    let invitation_code = created["invitationCode"].as_str().unwrap().to_string();

    let invite_request = auth_request(
        Method::POST,
        &format!("/v1/projects/{project_id}/members"),
        &admin_token,
        json!({ "userId": member_id, "email": "member@example.com", "role": "member" }),
    );
    let response = harness.project_router.clone().oneshot(invite_request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let join_request = auth_request(
        Method::POST,
        "/v1/projects/join",
        &member_token,
        json!({ "invitationCode": invitation_code }),
    );
    let response = harness.project_router.clone().oneshot(join_request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let joined = body_json(response).await;
    let joined = &joined["data"];
    let members = joined["members"].as_array().unwrap();
    let member_entry = members
        .iter()
        .find(|m| m["userId"] == member_id.to_string())
        .unwrap();
    assert_eq!(member_entry["status"], "active");
}

/// End-to-end scenario 5: the project creator cannot leave.
#[tokio::test]
#[ignore = "requires a reachable Postgres instance"]
async fn test_sole_admin_cannot_leave_project() {
    let harness = TestHarness::new().await.unwrap();
    let admin_id = Uuid::new_v4();
    let admin_token = create_test_jwt(admin_id, "admin@example.com");

    let create_request = auth_request(
        Method::POST,
        "/v1/projects",
        &admin_token,
        json!({ "name": "Alpha" }),
    );
    let created = body_json(
        harness.project_router.clone().oneshot(create_request).await.unwrap(),
    )
    .await;
    let created = &created["data"];
    let project_id = created["id"].as_str().unwrap();

    let leave_request = Request::builder()
        .method(Method::POST)
        .uri(format!("/v1/projects/{project_id}/leave"))
        .header("authorization", format!("Bearer {admin_token}"))
        .body(Body::empty())
        .unwrap();
    let response = harness.project_router.clone().oneshot(leave_request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

/// End-to-end scenario 6: concurrent project creation never collides on
/// invitation code.
#[tokio::test]
#[ignore = "requires a reachable Postgres instance"]
async fn test_concurrent_projects_get_distinct_invitation_codes() {
    let harness = TestHarness::new().await.unwrap();
    let token = create_test_jwt(Uuid::new_v4(), "racer@example.com");

    let mut handles = Vec::new();
    for i in 0..5 {
        let router = harness.project_router.clone();
        let token = token.clone();
        handles.push(tokio::spawn(async move {
            let request = auth_request(
                Method::POST,
                "/v1/projects",
                &token,
                json!({ "name": format!("Racer {i}") }),
            );
            body_json(router.oneshot(request).await.unwrap()).await
        }));
    }

    let mut codes = Vec::new();
    for handle in handles {
        let created = handle.await.unwrap();
        codes.push(created["data"]["invitationCode"].as_str().unwrap().to_string());
    }

    let mut unique = codes.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), codes.len());
}

/// Pagination boundary: `limit=100` is accepted, `limit=101` is rejected.
#[tokio::test]
#[ignore = "requires a reachable Postgres instance"]
async fn test_list_projects_limit_boundary() {
    let harness = TestHarness::new().await.unwrap();
    let token = create_test_jwt(Uuid::new_v4(), "owner@example.com");

    let request = Request::builder()
        .method(Method::GET)
        .uri("/v1/projects?limit=100")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = harness.project_router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["pagination"]["limit"], 100);

    let request = Request::builder()
        .method(Method::GET)
        .uri("/v1/projects?limit=101")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = harness.project_router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}
