use crate::errors::ServiceError;
use crate::handlers::AppServices;
use crate::services::allocation::AllocateConsumable;
use crate::services::consumables::AddConsumable;
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddConsumableRequest {
    pub supplier: String,
    #[serde(rename = "type")]
    pub consumable_type: String,
    pub description: String,
    pub user: String,
    pub location: String,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AllocateConsumableRequest {
    #[serde(rename = "type")]
    pub consumable_type: String,
    pub description: String,
    pub source_location: String,
    pub destination_location: String,
    pub quantity: i32,
    pub user: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AllocationResponse {
    pub source_id: Uuid,
    pub source_remaining: i32,
    /// Absent when the destination was the field sink
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_quantity: Option<i32>,
    pub destination_created: bool,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ConsumableFilters {
    pub location: Option<String>,
}

pub fn consumables_router() -> Router<AppServices> {
    Router::new()
        .route("/", get(list_consumables).post(add_consumable))
        .route("/allocate", post(allocate_consumable))
        .route("/:id", get(get_consumable))
}

/// Add stock at a location, merging into a matching row if one exists.
#[utoipa::path(
    post,
    path = "/api/v1/consumables",
    request_body = AddConsumableRequest,
    responses(
        (status = 201, description = "Stock recorded"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
    ),
    tag = "consumables"
)]
pub async fn add_consumable(
    State(services): State<AppServices>,
    Json(payload): Json<AddConsumableRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let model = services
        .consumables
        .add(AddConsumable {
            supplier: payload.supplier,
            consumable_type: payload.consumable_type,
            description: payload.description,
            user: payload.user,
            location: payload.location,
            quantity: payload.quantity,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(model)))
}

/// Move quantity between locations. `destination_location` of `SITE`
/// records field consumption: the quantity leaves the stock system.
#[utoipa::path(
    post,
    path = "/api/v1/consumables/allocate",
    request_body = AllocateConsumableRequest,
    responses(
        (status = 200, description = "Allocation applied", body = AllocationResponse),
        (status = 400, description = "Unknown source or insufficient stock", body = crate::errors::ErrorResponse),
    ),
    tag = "consumables"
)]
pub async fn allocate_consumable(
    State(services): State<AppServices>,
    Json(payload): Json<AllocateConsumableRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let outcome = services
        .allocation
        .allocate_consumable(AllocateConsumable {
            consumable_type: payload.consumable_type,
            description: payload.description,
            source_location: payload.source_location,
            destination_location: payload.destination_location,
            quantity: payload.quantity,
            user: payload.user,
        })
        .await?;
    Ok(Json(AllocationResponse {
        source_id: outcome.source_id,
        source_remaining: outcome.source_remaining,
        destination_id: outcome.destination_id,
        destination_quantity: outcome.destination_quantity,
        destination_created: outcome.destination_created,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/consumables",
    params(ConsumableFilters),
    responses((status = 200, description = "Consumable stock listed")),
    tag = "consumables"
)]
pub async fn list_consumables(
    State(services): State<AppServices>,
    Query(filters): Query<ConsumableFilters>,
) -> Result<impl IntoResponse, ServiceError> {
    let rows = services.consumables.list(filters.location).await?;
    Ok(Json(rows))
}

#[utoipa::path(
    get,
    path = "/api/v1/consumables/{id}",
    params(("id" = Uuid, Path, description = "Consumable row id")),
    responses(
        (status = 200, description = "Consumable row returned"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    tag = "consumables"
)]
pub async fn get_consumable(
    State(services): State<AppServices>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let row = services
        .consumables
        .get(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("consumable {} not found", id)))?;
    Ok(Json(row))
}
