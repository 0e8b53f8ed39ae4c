mod common;

use std::sync::Arc;

use axum::{body::Body, middleware, Router};
use chrono::Utc;
use http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use reovalve_api::auth::{auth_routes, hash_password, require_auth, AuthState, ROLE_READONLY};
use reovalve_api::db::DbPool;
use reovalve_api::entities::user;
use reovalve_api::handlers::AppServices;
use reovalve_api::storage::FsBlobStore;
use reovalve_api::api_v1_routes;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

const SEEDED_ADMIN_PASSWORD: &str = "change-me-on-first-login";

async fn test_app() -> (Router, Arc<DbPool>) {
    let db = common::setup_db().await;
    let events = common::drained_event_sender();
    let blob_store = Arc::new(FsBlobStore::new(
        std::env::temp_dir(),
        "http://localhost/documents",
    ));
    let services = AppServices::new(db.clone(), events, blob_store);
    let auth_state = Arc::new(AuthState::new("x".repeat(64), 3600, db.clone()));

    let api = api_v1_routes()
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            require_auth,
        ))
        .with_state(services);

    let app = Router::new()
        .nest("/api/v1", api)
        .nest("/auth", auth_routes().with_state(auth_state));
    (app, db)
}

async fn login(app: &Router, username: &str, password: &str) -> (StatusCode, Option<String>) {
    let request = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"username": username, "password": password}).to_string(),
        ))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let token = serde_json::from_slice::<Value>(&body)
        .ok()
        .and_then(|v| v["token"].as_str().map(str::to_string));
    (status, token)
}

#[tokio::test]
async fn seeded_admin_can_log_in() {
    let (app, _db) = test_app().await;
    let (status, token) = login(&app, "admin", SEEDED_ADMIN_PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    assert!(token.is_some());
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let (app, _db) = test_app().await;
    let (status, token) = login(&app, "admin", "nope").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(token.is_none());
}

#[tokio::test]
async fn api_requires_a_bearer_token() {
    let (app, _db) = test_app().await;

    let request = Request::builder()
        .uri("/api/v1/regions")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_token_allows_writes() {
    let (app, _db) = test_app().await;
    let (_, token) = login(&app, "admin", SEEDED_ADMIN_PASSWORD).await;
    let token = token.unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/regions")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"name": "Gauteng"}).to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let request = Request::builder()
        .uri("/api/v1/regions")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn readonly_role_reads_but_cannot_mutate() {
    let (app, db) = test_app().await;

    user::ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set("viewer".into()),
        password_hash: Set(hash_password("viewer-pass")),
        role: Set(ROLE_READONLY.into()),
        created_at: Set(Utc::now()),
    }
    .insert(db.as_ref())
    .await
    .unwrap();

    let (status, token) = login(&app, "viewer", "viewer-pass").await;
    assert_eq!(status, StatusCode::OK);
    let token = token.unwrap();

    let request = Request::builder()
        .uri("/api/v1/consumables")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/regions")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"name": "Limpopo"}).to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
