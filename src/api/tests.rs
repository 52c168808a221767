//! HTTP tests driving the router end to end against an in-memory database

use super::{router, AppState};
use crate::{
    registry::{
        init_schema, MockValidatorRepository, SqliteValidatorRepository, ValidatorRepository,
    },
    service::ValidatorService,
    Validator, ValidatorError, ValidatorFilter,
};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::{sync::Arc, time::Duration};
use tower::ServiceExt;

async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    init_schema(&pool).await.unwrap();
    pool
}

fn app_with(repo: Arc<dyn ValidatorRepository>, pool: SqlitePool, timeout: Duration) -> Router {
    router(AppState {
        service: ValidatorService::new(repo),
        pool,
        request_timeout: timeout,
    })
}

async fn setup() -> (Router, SqlitePool) {
    let pool = memory_pool().await;
    let repo = Arc::new(SqliteValidatorRepository::new(pool.clone()));
    (app_with(repo, pool.clone(), Duration::from_secs(5)), pool)
}

fn pubkey(seed: char) -> String {
    format!("0x{}", seed.to_string().repeat(96))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn create(app: &Router, seed: char, blockchain: &str, status: &str) -> (StatusCode, Value) {
    let payload = json!({
        "pubkey": pubkey(seed),
        "blockchain": blockchain,
        "blockchain_network": "mainnet",
        "status": status,
        "client": "lighthouse",
    });
    let (code, body) = send(app, json_request("POST", "/validators", payload)).await;
    (code, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_root() {
    let (app, _) = setup().await;

    let (status, body) = send(&app, get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"Validator Key Manager Service");
}

#[tokio::test]
async fn test_healthz_reports_database_state() {
    let (app, pool) = setup().await;

    let (status, body) = send(&app, get("/healthz")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");

    pool.close().await;

    let (status, body) = send(&app, get("/healthz")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(String::from_utf8(body).unwrap().starts_with("Database connection error:"));
}

#[tokio::test]
async fn test_create_and_fetch_validator() {
    let (app, _) = setup().await;

    let (status, created) = create(&app, 'a', "ethereum", "active").await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created["id"].as_i64().unwrap() > 0);
    assert_eq!(created["client"], "lighthouse");

    let (status, body) = send(&app, get(&format!("/validators/{}", pubkey('a')))).await;
    let fetched: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_create_rejects_malformed_pubkey() {
    let (app, _) = setup().await;
    let payload = json!({
        "pubkey": "abc",
        "blockchain": "ethereum",
        "blockchain_network": "mainnet",
        "status": "active",
    });

    let (status, body) = send(&app, json_request("POST", "/validators", payload)).await;
    let body: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "pubkey must start with 0x");
}

#[tokio::test]
async fn test_create_duplicate_is_conflict() {
    let (app, _) = setup().await;
    create(&app, 'b', "ethereum", "active").await;

    let (status, body) = create(&app, 'b', "gnosis", "inactive").await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("already exists"));
}

#[tokio::test]
async fn test_create_with_missing_field_returns_json_error() {
    let (app, _) = setup().await;
    let payload = json!({ "pubkey": pubkey('f') });

    let (status, body) = send(&app, json_request("POST", "/validators", payload)).await;
    let body: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("missing field `blockchain`"));
}

#[tokio::test]
async fn test_update_status_with_malformed_body_returns_json_error() {
    let (app, _) = setup().await;
    let request = Request::builder()
        .method("PATCH")
        .uri(format!("/validators/{}/status", pubkey('f')))
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(&app, request).await;
    let body: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_create_empty_client_is_omitted() {
    let (app, _) = setup().await;
    let payload = json!({
        "pubkey": pubkey('7'),
        "blockchain": "ethereum",
        "blockchain_network": "mainnet",
        "status": "active",
        "client": "",
    });

    let (status, body) = send(&app, json_request("POST", "/validators", payload)).await;
    let body: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert!(body.get("client").is_none());
}

#[tokio::test]
async fn test_create_losing_insert_race_is_conflict() {
    let mut repo = MockValidatorRepository::new();
    repo.expect_get_by_pubkey().times(1).returning(|pubkey| {
        Err(ValidatorError::NotFound {
            pubkey: pubkey.to_string(),
        })
    });
    repo.expect_create().times(1).returning(|v| {
        Err(ValidatorError::ConstraintViolation {
            pubkey: v.pubkey.clone(),
        })
    });
    let app = app_with(Arc::new(repo), memory_pool().await, Duration::from_secs(5));
    let payload = json!({
        "pubkey": pubkey('8'),
        "blockchain": "ethereum",
        "blockchain_network": "mainnet",
        "status": "active",
    });

    let (status, body) = send(&app, json_request("POST", "/validators", payload)).await;
    let body: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("storage constraint"));
}

#[tokio::test]
async fn test_get_unknown_validator_is_not_found() {
    let (app, _) = setup().await;

    let (status, _) = send(&app, get(&format!("/validators/{}", pubkey('c')))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_with_filters() {
    let (app, _) = setup().await;
    create(&app, '1', "ethereum", "active").await;
    create(&app, '2', "ethereum", "inactive").await;
    create(&app, '3', "gnosis", "active").await;

    let (status, body) = send(&app, get("/validators")).await;
    let all: Vec<Validator> = serde_json::from_slice(&body).unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.len(), 3);

    let (_, body) = send(&app, get("/validators?blockchain=ethereum&status=active")).await;
    let filtered: Vec<Validator> = serde_json::from_slice(&body).unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].pubkey, pubkey('1'));

    let (status, body) = send(&app, get("/validators?blockchain=solana")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"[]");
}

#[tokio::test]
async fn test_update_status() {
    let (app, _) = setup().await;
    create(&app, 'd', "ethereum", "active").await;
    let uri = format!("/validators/{}/status", pubkey('d'));

    let (status, _) = send(&app, json_request("PATCH", &uri, json!({ "status": "exited" }))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, get(&format!("/validators/{}", pubkey('d')))).await;
    let fetched: Validator = serde_json::from_slice(&body).unwrap();
    assert_eq!(fetched.status, "exited");
    assert!(fetched.updated_at >= fetched.created_at);
}

#[tokio::test]
async fn test_update_status_unknown_validator_is_not_found() {
    let (app, _) = setup().await;
    let uri = format!("/validators/{}/status", pubkey('e'));

    let (status, _) = send(&app, json_request("PATCH", &uri, json!({ "status": "active" }))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Repository that never answers in time
struct StalledRepository;

#[async_trait]
impl ValidatorRepository for StalledRepository {
    async fn create(&self, _validator: &mut Validator) -> Result<(), ValidatorError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(())
    }

    async fn get_by_pubkey(&self, pubkey: &str) -> Result<Validator, ValidatorError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Err(ValidatorError::NotFound {
            pubkey: pubkey.to_string(),
        })
    }

    async fn list(&self, _filter: &ValidatorFilter) -> Result<Vec<Validator>, ValidatorError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(Vec::new())
    }

    async fn update_status(&self, _pubkey: &str, _status: &str) -> Result<(), ValidatorError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(())
    }
}

#[tokio::test]
async fn test_slow_storage_times_out() {
    let pool = memory_pool().await;
    let app = app_with(Arc::new(StalledRepository), pool, Duration::from_millis(20));

    let (status, body) = send(&app, get("/validators")).await;
    let body: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "request timed out");
}
