//! Reovalve API Library
//!
//! Back-office stock tracking and PRV service scheduling for field
//! operations: consumable and serialized stock, delivery notes, the
//! client/site hierarchy and valve service schedules with document
//! attachments.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod services;
pub mod storage;

use axum::{extract::State, response::Json, routing::get, Router};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::ToSchema;

/// Shared application state for the top-level router.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

/// Envelope used by the status/health endpoints.
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
        }
    }
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

/// The authenticated `/api/v1` surface. The caller applies the auth
/// middleware and supplies the services state.
pub fn api_v1_routes() -> Router<handlers::AppServices> {
    Router::new()
        .nest("/consumables", handlers::consumables::consumables_router())
        .nest("/serialstock", handlers::serial_stock::serial_stock_router())
        .nest(
            "/deliverynotes",
            handlers::delivery_notes::delivery_notes_router(),
        )
        .nest("/prvdevices", handlers::prv_devices::prv_devices_router())
        .nest("/prvservices", handlers::prv_services::prv_services_router())
        .nest("/businessunits", handlers::registry::business_units_router())
        .nest("/regions", handlers::registry::regions_router())
        .nest("/clients", handlers::registry::clients_router())
        .nest("/sites", handlers::registry::sites_router())
        .nest("/technicians", handlers::registry::technicians_router())
        .nest("/simcards", handlers::assets::sim_cards_router())
        .nest("/mobiledevices", handlers::assets::mobile_devices_router())
}

/// Unauthenticated status and health endpoints.
pub fn system_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(api_status))
        .route("/health", get(health_check))
}

async fn api_status(State(state): State<AppState>) -> ApiResult<Value> {
    Ok(Json(ApiResponse::success(json!({
        "status": "ok",
        "service": "reovalve-api",
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.config.environment,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))))
}

async fn health_check(State(state): State<AppState>) -> ApiResult<Value> {
    let db_status = match state.db.ping().await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    Ok(Json(ApiResponse::success(json!({
        "status": db_status,
        "database": db_status,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope() {
        let response = ApiResponse::success("ok");
        assert!(response.success);
        assert_eq!(response.data, Some("ok"));
        assert!(response.message.is_none());
    }

    #[test]
    fn error_envelope() {
        let response = ApiResponse::<()>::error("oops".into());
        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(response.message.as_deref(), Some("oops"));
    }
}
