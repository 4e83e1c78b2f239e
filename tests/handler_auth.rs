mod common;

use axum::http::StatusCode;
use common::{BEARER, create_test_state, test_server};
use serde_json::{Value, json};

#[tokio::test]
async fn test_missing_header_is_forbidden() {
    let server = test_server(create_test_state().await);

    let response = server.get("/api/v1/links").await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["error"]["code"], "forbidden");
}

#[tokio::test]
async fn test_malformed_header_is_forbidden() {
    let server = test_server(create_test_state().await);

    let response = server
        .get("/api/v1/links")
        .add_header("Authorization", "Basic c2VjcmV0")
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_wrong_token_is_unauthorized() {
    let server = test_server(create_test_state().await);

    let response = server
        .post("/api/v1/links")
        .add_header("Authorization", "Bearer not-the-secret")
        .json(&json!({ "target_url": "https://example.com" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.header("www-authenticate"), "Bearer");
    assert_eq!(response.json::<Value>()["error"]["code"], "unauthorized");

    // Nothing was assigned.
    let links: Vec<Value> = server
        .get("/api/v1/links")
        .add_header("Authorization", BEARER)
        .await
        .json();
    assert!(links.is_empty());
}

#[tokio::test]
async fn test_valid_token() {
    let server = test_server(create_test_state().await);

    server
        .get("/api/v1/links")
        .add_header("Authorization", BEARER)
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_public_routes_need_no_token() {
    let server = test_server(create_test_state().await);

    server.get("/health").await.assert_status_ok();
    server
        .get("/bored-bulbasaur")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
