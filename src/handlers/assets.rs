//! SIM card and mobile device asset endpoints.

use crate::errors::ServiceError;
use crate::handlers::AppServices;
use crate::services::assets::{CreateMobileDevice, CreateSimCard};
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSimCardRequest {
    pub number: String,
    pub network: String,
    pub status: String,
    pub assigned_to: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMobileDeviceRequest {
    pub make: String,
    pub model: String,
    pub imei: String,
    pub status: String,
    pub assigned_to: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignRequest {
    pub assigned_to: Option<String>,
    pub status: String,
}

pub fn sim_cards_router() -> Router<AppServices> {
    Router::new()
        .route("/", get(list_sim_cards).post(create_sim_card))
        .route("/:id/assign", put(assign_sim_card))
        .route("/:id", delete(delete_sim_card))
}

pub fn mobile_devices_router() -> Router<AppServices> {
    Router::new()
        .route("/", get(list_mobile_devices).post(create_mobile_device))
        .route("/:id/assign", put(assign_mobile_device))
        .route("/:id", delete(delete_mobile_device))
}

#[utoipa::path(
    post,
    path = "/api/v1/simcards",
    request_body = CreateSimCardRequest,
    responses(
        (status = 201, description = "SIM card registered"),
        (status = 409, description = "Number already registered", body = crate::errors::ErrorResponse),
    ),
    tag = "assets"
)]
pub async fn create_sim_card(
    State(services): State<AppServices>,
    Json(payload): Json<CreateSimCardRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let card = services
        .assets
        .create_sim_card(CreateSimCard {
            number: payload.number,
            network: payload.network,
            status: payload.status,
            assigned_to: payload.assigned_to,
            location: payload.location,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(card)))
}

#[utoipa::path(
    get,
    path = "/api/v1/simcards",
    responses((status = 200, description = "SIM cards listed")),
    tag = "assets"
)]
pub async fn list_sim_cards(
    State(services): State<AppServices>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(services.assets.list_sim_cards().await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/simcards/{id}/assign",
    params(("id" = Uuid, Path, description = "SIM card id")),
    request_body = AssignRequest,
    responses(
        (status = 200, description = "Assignment updated"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    tag = "assets"
)]
pub async fn assign_sim_card(
    State(services): State<AppServices>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let card = services
        .assets
        .assign_sim_card(id, payload.assigned_to, payload.status)
        .await?;
    Ok(Json(card))
}

#[utoipa::path(
    delete,
    path = "/api/v1/simcards/{id}",
    params(("id" = Uuid, Path, description = "SIM card id")),
    responses(
        (status = 204, description = "SIM card deleted"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    tag = "assets"
)]
pub async fn delete_sim_card(
    State(services): State<AppServices>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    services.assets.delete_sim_card(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/v1/mobiledevices",
    request_body = CreateMobileDeviceRequest,
    responses(
        (status = 201, description = "Mobile device registered"),
        (status = 409, description = "IMEI already registered", body = crate::errors::ErrorResponse),
    ),
    tag = "assets"
)]
pub async fn create_mobile_device(
    State(services): State<AppServices>,
    Json(payload): Json<CreateMobileDeviceRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let device = services
        .assets
        .create_mobile_device(CreateMobileDevice {
            make: payload.make,
            model: payload.model,
            imei: payload.imei,
            status: payload.status,
            assigned_to: payload.assigned_to,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(device)))
}

#[utoipa::path(
    get,
    path = "/api/v1/mobiledevices",
    responses((status = 200, description = "Mobile devices listed")),
    tag = "assets"
)]
pub async fn list_mobile_devices(
    State(services): State<AppServices>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(services.assets.list_mobile_devices().await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/mobiledevices/{id}/assign",
    params(("id" = Uuid, Path, description = "Mobile device id")),
    request_body = AssignRequest,
    responses(
        (status = 200, description = "Assignment updated"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    tag = "assets"
)]
pub async fn assign_mobile_device(
    State(services): State<AppServices>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let device = services
        .assets
        .assign_mobile_device(id, payload.assigned_to, payload.status)
        .await?;
    Ok(Json(device))
}

#[utoipa::path(
    delete,
    path = "/api/v1/mobiledevices/{id}",
    params(("id" = Uuid, Path, description = "Mobile device id")),
    responses(
        (status = 204, description = "Mobile device deleted"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    tag = "assets"
)]
pub async fn delete_mobile_device(
    State(services): State<AppServices>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    services.assets.delete_mobile_device(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
