//! Requests that must be answered before any query runs. The server sits on a
//! pool that cannot connect, so a handler touching the database would fail
//! with 500 instead of the expected status.
mod common;
use axum::http::{StatusCode, header::AUTHORIZATION};
use axum_test::{TestRequest, TestServer};
use germangains::{
    Config,
    auth::{UserClaims, generate_token},
};
use serde_json::{Value, json};

use crate::common::setup_offline_server;

/// An anonymous caller and one holding a validly signed token for user 1.
/// The user row never exists because the database is unreachable.
async fn callers() -> [Option<String>; 2] {
    let jwt = Config::get_or_init(true).await.app().jwt();
    let token = generate_token(UserClaims::for_user(1), jwt).unwrap();
    [None, Some(format!("Bearer {token}"))]
}

fn as_caller(req: TestRequest, auth: &Option<String>) -> TestRequest {
    match auth {
        Some(header) => req.add_header(AUTHORIZATION, header.clone()),
        None => req,
    }
}

async fn get_as(server: &TestServer, path: &str, auth: &Option<String>) -> axum_test::TestResponse {
    as_caller(server.get(path), auth).await
}

#[tokio::test]
async fn non_numeric_ids_are_bad_requests() {
    let server = setup_offline_server().await;

    for auth in callers().await {
        for (path, message) in [
            ("/api/lesson/abc", "Invalid lesson ID"),
            ("/api/lesson/module/abc", "Invalid module ID"),
            ("/api/modules/xyz", "Invalid module ID"),
            ("/api/modules/course/1.5", "Invalid course ID"),
            ("/api/courses/none", "Invalid course ID"),
            ("/api/exercises/-", "Invalid exercise ID"),
            ("/api/vocabulary/x1", "Invalid vocabulary ID"),
        ] {
            let resp = get_as(&server, path, &auth).await;
            resp.assert_status(StatusCode::BAD_REQUEST);
            let body = resp.json::<Value>();
            assert_eq!(body["success"], false, "{path} {auth:?}");
            assert_eq!(body["statusCode"], 400, "{path} {auth:?}");
            assert_eq!(body["message"], message, "{path} {auth:?}");
        }
    }
}

#[tokio::test]
async fn invalid_id_wins_over_auth() {
    let server = setup_offline_server().await;

    for auth in callers().await {
        let resp = as_caller(server.delete("/api/lesson/abc"), &auth).await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(resp.json::<Value>()["message"], "Invalid lesson ID");

        as_caller(server.put("/api/modules/abc"), &auth)
            .json(&json!({ "title": "x" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        as_caller(server.get("/api/lesson/module/abc/progress"), &auth)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn progress_without_user_is_bad_request() {
    let server = setup_offline_server().await;

    let resp = server.get("/api/lesson/module/1/progress").await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(resp.json::<Value>()["message"], "User must be authenticated");

    server
        .get("/api/modules/course/1/progress")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    server
        .get("/api/users/progress")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    server
        .post("/api/users/progress")
        .json(&json!({ "lessonId": 1 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn mutations_require_authentication() {
    let server = setup_offline_server().await;

    server
        .post("/api/courses")
        .json(&json!({ "title": "A1" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    server
        .delete("/api/lesson/1")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    server
        .get("/api/users/me")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let server = setup_offline_server().await;

    let resp = server
        .post("/api/users/register")
        .json(&json!({ "username": 42 }))
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(resp.json::<Value>()["success"], false);
}

#[tokio::test]
async fn health_and_info() {
    let server = setup_offline_server().await;

    let resp = server.get("/health").await;
    resp.assert_status_ok();
    let body = resp.json::<Value>();
    assert_eq!(body["status"], "OK");
    assert!(body["timestamp"].is_string());

    let resp = server.get("/").await;
    resp.assert_status_ok();
    let body = resp.json::<Value>();
    assert_eq!(body["message"], "GermanGains API is running");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_db_reports_unreachable_database() {
    let server = setup_offline_server().await;

    let resp = server.get("/test-db").await;
    resp.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body = resp.json::<Value>();
    assert_eq!(body["status"], "DB connection failed");
    assert!(body["error"].is_string());
}
