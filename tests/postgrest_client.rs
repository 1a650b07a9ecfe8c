//! PostgREST client tests against a mock server.

use std::sync::Arc;

use axum::http::{header::AUTHORIZATION, HeaderValue, StatusCode};
use axum_test::TestServer;
use httpmock::prelude::*;
use serde_json::json;

use newsdesk::auth::{JwtConfig, JwtManager, StaticCredentialStore};
use newsdesk::http_server::{build_router, AppState, HttpServerConfig};
use newsdesk::query::{Collection, ListParams, PageLimits, QueryBuilder};
use newsdesk::store::{DataStore, PostgrestConfig, PostgrestStore, StoreError};

fn store_for(server: &MockServer) -> PostgrestStore {
    PostgrestStore::new(&PostgrestConfig {
        url: server.base_url(),
        api_key: "anon-key".to_string(),
        timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn test_list_query_on_the_wire() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/rest/v1/news")
                .query_param("select", "*")
                .query_param("publicationdate", "gte.2024-01-01")
                .query_param("publicationdate", "lte.2024-01-31")
                .query_param("title", "ilike.*rust*")
                .query_param("order", "id.asc")
                .query_param("offset", "10")
                .query_param("limit", "10")
                .header("apikey", "anon-key")
                .header("authorization", "Bearer anon-key")
                .header("prefer", "count=exact");
            then.status(200)
                .header("content-type", "application/json")
                .header("content-range", "10-11/12")
                .json_body(json!([
                    { "id": 11, "title": "Rust 1.80" },
                    { "id": 12, "title": "Rust in the kernel" }
                ]));
        })
        .await;

    let params = ListParams::from_json(&json!({
        "limit": 10,
        "page": 2,
        "from": "2024-01-01",
        "to": "2024-01-31",
        "q": "rust"
    }));
    let paged = QueryBuilder::new(Collection::News, PageLimits::default()).list(&params);

    let output = store_for(&server).execute(&paged.query).await.unwrap();

    mock.assert_async().await;
    assert_eq!(output.rows.len(), 2);
    assert_eq!(output.count, Some(12));
}

#[tokio::test]
async fn test_by_id_query_skips_count() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/rest/v1/event")
                .query_param("id", "eq.42")
                .query_param("offset", "0")
                .query_param("limit", "1")
                .matches(|req| {
                    req.headers.as_ref().map_or(true, |headers| {
                        !headers
                            .iter()
                            .any(|(name, _)| name.eq_ignore_ascii_case("prefer"))
                    })
                });
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!([]));
        })
        .await;

    let query = QueryBuilder::new(Collection::Events, PageLimits::default()).by_id("42");
    let output = store_for(&server).execute(&query).await.unwrap();

    mock.assert_async().await;
    assert!(output.rows.is_empty());
    assert_eq!(output.count, None);
}

#[tokio::test]
async fn test_error_message_is_kept() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/rest/v1/news");
            then.status(400)
                .header("content-type", "application/json")
                .json_body(json!({
                    "code": "22007",
                    "message": "invalid input syntax for type date: \"yesterday\""
                }));
        })
        .await;

    let query = QueryBuilder::new(Collection::News, PageLimits::default()).by_id("1");
    let err = store_for(&server).execute(&query).await.unwrap_err();

    assert!(matches!(err, StoreError::Rejected { status: 400, .. }));
    assert_eq!(
        err.to_string(),
        "invalid input syntax for type date: \"yesterday\""
    );
}

#[tokio::test]
async fn test_plain_text_error_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/rest/v1/news");
            then.status(503).body("upstream unavailable");
        })
        .await;

    let query = QueryBuilder::new(Collection::News, PageLimits::default()).by_id("1");
    let err = store_for(&server).execute(&query).await.unwrap_err();

    assert_eq!(err.message(), "upstream unavailable");
}

#[tokio::test]
async fn test_store_rejection_reaches_the_client() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/rest/v1/news");
            then.status(401)
                .header("content-type", "application/json")
                .json_body(json!({ "message": "Invalid API key" }));
        })
        .await;

    let tokens = JwtManager::new(JwtConfig::with_secret("wire-secret"));
    let token = tokens.generate_access_token("admin@gmail.com").unwrap();
    let state = AppState::new(
        Arc::new(store_for(&server)),
        Arc::new(StaticCredentialStore::default()),
        tokens,
    );
    let app = TestServer::new(build_router(state, &HttpServerConfig::default())).unwrap();

    let response = app
        .post("/api/news")
        .add_header(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        )
        .json(&json!({ "page": 1 }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "error": "Invalid API key" }));
}
