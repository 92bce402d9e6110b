//! End-to-end HTTP tests against the full router with in-memory stores.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use serde_json::{Value, json};
use std::sync::Arc;
use tabs_core::{StoreError, StoreFuture, StoreHealth};
use tabs_testing::{InMemoryTabStore, InMemoryUserDirectory, init_tracing, test_service};
use tabs_web::{AppState, CORRELATION_ID_HEADER, build_router};
use tower::ServiceExt;

struct Harness {
    app: Router,
    tabs: InMemoryTabStore,
    users: InMemoryUserDirectory,
}

fn harness() -> Harness {
    init_tracing();
    let (service, tabs, users) = test_service();
    let app = build_router(AppState::new(service, Arc::new(tabs.clone())));
    Harness { app, tabs, users }
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body is JSON")
    };
    (status, value)
}

async fn create(app: &Router, user: &str, title: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/tabs",
        Some(json!({ "user": user, "title": title, "text": "some text" })),
    )
    .await
}

#[tokio::test]
async fn test_full_lifecycle() {
    let h = harness();
    let alice = h.users.insert("alice").to_string();

    let (status, body) = send(&h.app, Method::GET, "/tabs", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No tabs found");

    let (status, body) = create(&h.app, &alice, "Buy milk").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "message": "New tab created" }));

    let (status, body) = send(&h.app, Method::GET, "/tabs", None).await;
    assert_eq!(status, StatusCode::OK);
    let listed = &body.as_array().unwrap()[0];
    assert_eq!(listed["ticket"], 500);
    assert_eq!(listed["title"], "Buy milk");
    assert_eq!(listed["username"], "alice");
    assert_eq!(listed["completed"], false);
    assert!(listed["createdAt"].is_string());
    let id = listed["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &h.app,
        Method::PATCH,
        "/tabs",
        Some(json!({
            "id": id,
            "user": alice,
            "title": "Buy oat milk",
            "text": "1L",
            "completed": true,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("'Buy oat milk' updated"));

    let (_, body) = send(&h.app, Method::GET, "/tabs", None).await;
    let listed = &body.as_array().unwrap()[0];
    assert_eq!(listed["ticket"], 500);
    assert_eq!(listed["completed"], true);
    assert_eq!(listed["text"], "1L");

    let (status, body) = send(&h.app, Method::DELETE, "/tabs", Some(json!({ "id": id }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(format!("tab 'Buy oat milk' with ID {id} deleted")));

    let (status, body) = send(&h.app, Method::GET, "/tabs", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No tabs found");
    assert!(h.tabs.is_empty());
}

#[tokio::test]
async fn test_duplicate_title_is_conflict() {
    let h = harness();
    let user = h.users.insert("bob").to_string();

    assert_eq!(create(&h.app, &user, "Same").await.0, StatusCode::CREATED);
    let (status, body) = create(&h.app, &user, "Same").await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Duplicate tab title");
    assert_eq!(h.tabs.len(), 1);
}

#[tokio::test]
async fn test_create_missing_fields() {
    let h = harness();
    let user = h.users.insert("carol").to_string();

    let (status, body) = send(
        &h.app,
        Method::POST,
        "/tabs",
        Some(json!({ "user": user, "title": "", "text": "x" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "All fields are required");
}

#[tokio::test]
async fn test_create_rejects_non_uuid_owner() {
    let h = harness();

    let (status, body) = create(&h.app, "u1", "Buy milk").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid user ID");
    assert!(h.tabs.is_empty());
}

#[tokio::test]
async fn test_create_without_body() {
    let h = harness();

    let (status, body) = send(&h.app, Method::POST, "/tabs", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "All fields are required");
}

#[tokio::test]
async fn test_update_requires_boolean_completed() {
    let h = harness();
    let user = h.users.insert("dave").to_string();
    create(&h.app, &user, "Chores").await;
    let id = h.tabs.tabs()[0].id.to_string();

    let (status, body) = send(
        &h.app,
        Method::PATCH,
        "/tabs",
        Some(json!({
            "id": id,
            "user": user,
            "title": "Chores",
            "text": "x",
            "completed": "true",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "All fields are required");
    assert!(!h.tabs.tabs()[0].completed);
}

#[tokio::test]
async fn test_update_to_taken_title_is_conflict() {
    let h = harness();
    let user = h.users.insert("erin").to_string();
    create(&h.app, &user, "First").await;
    create(&h.app, &user, "Second").await;
    let second = h.tabs.tabs()[1].id.to_string();

    let (status, body) = send(
        &h.app,
        Method::PATCH,
        "/tabs",
        Some(json!({
            "id": second,
            "user": user,
            "title": "First",
            "text": "x",
            "completed": false,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Duplicate tab title");
}

#[tokio::test]
async fn test_update_unknown_tab() {
    let h = harness();
    let user = h.users.insert("frank").to_string();

    let (status, body) = send(
        &h.app,
        Method::PATCH,
        "/tabs",
        Some(json!({
            "id": tabs_core::TabId::new().to_string(),
            "user": user,
            "title": "Ghost",
            "text": "x",
            "completed": false,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "tab not found");
}

#[tokio::test]
async fn test_delete_requires_id() {
    let h = harness();

    let (status, body) = send(&h.app, Method::DELETE, "/tabs", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "tab ID required");

    let (status, body) = send(&h.app, Method::DELETE, "/tabs", Some(json!({ "id": "nope" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid tab ID");
}

#[tokio::test]
async fn test_delete_unknown_tab() {
    let h = harness();

    let (status, body) = send(
        &h.app,
        Method::DELETE,
        "/tabs",
        Some(json!({ "id": tabs_core::TabId::new().to_string() })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "tab not found");
}

#[tokio::test]
async fn test_write_failure_is_invalid_data() {
    let h = harness();
    let user = h.users.insert("gina").to_string();
    h.tabs.fail_writes(Some("disk full"));

    let (status, body) = create(&h.app, &user, "Doomed").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid tab data received");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let h = harness();

    let response = h
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/tabs")
                .header("content-type", "application/json")
                .body(Body::from("{\"title\":"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tickets_not_reused_over_http() {
    let h = harness();
    let user = h.users.insert("hal").to_string();

    create(&h.app, &user, "one").await;
    let id = h.tabs.tabs()[0].id.to_string();
    send(&h.app, Method::DELETE, "/tabs", Some(json!({ "id": id }))).await;
    create(&h.app, &user, "two").await;

    let (_, body) = send(&h.app, Method::GET, "/tabs", None).await;
    assert_eq!(body[0]["ticket"], 501);
}

#[tokio::test]
async fn test_missing_owner_lists_null_username() {
    let h = harness();
    let user = h.users.insert("ivy");
    create(&h.app, &user.to_string(), "Orphan").await;
    h.users.remove(user);

    let (status, body) = send(&h.app, Method::GET, "/tabs", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["username"], Value::Null);
}

#[tokio::test]
async fn test_health_endpoints() {
    let h = harness();

    let (status, body) = send(&h.app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&h.app, Method::GET, "/health/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], true);
}

struct UnreachableStore;

impl StoreHealth for UnreachableStore {
    fn ping(&self) -> StoreFuture<'_, ()> {
        Box::pin(async { Err(StoreError::Database("connection refused".to_string())) })
    }
}

#[tokio::test]
async fn test_readiness_reports_unreachable_store() {
    let (service, _, _) = test_service();
    let app = build_router(AppState::new(service, Arc::new(UnreachableStore)));

    let (status, body) = send(&app, Method::GET, "/health/ready", None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["ready"], false);
}

#[tokio::test]
async fn test_responses_carry_correlation_id() {
    let h = harness();

    let response = h
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/tabs")
                .header(CORRELATION_ID_HEADER, "trace-me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get(CORRELATION_ID_HEADER).unwrap(),
        "trace-me"
    );
}
