use crate::errors::ServiceError;
use crate::handlers::AppServices;
use crate::services::serial_stock::CreateSerialUnit;
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSerialUnitRequest {
    pub supplier: String,
    pub serial_number: String,
    pub description: String,
    pub make: String,
    pub model: String,
    pub status: String,
    pub note: Option<String>,
    pub size: Option<String>,
    pub location: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RelocateRequest {
    pub location: String,
    pub status: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SerialStockFilters {
    pub location: Option<String>,
    pub serial_number: Option<String>,
}

pub fn serial_stock_router() -> Router<AppServices> {
    Router::new()
        .route("/", get(list_serial_stock).post(create_serial_unit))
        .route("/:id", get(get_serial_unit))
        .route("/:id/relocate", put(relocate_serial_unit))
}

#[utoipa::path(
    post,
    path = "/api/v1/serialstock",
    request_body = CreateSerialUnitRequest,
    responses(
        (status = 201, description = "Unit registered"),
        (status = 409, description = "Serial number already registered", body = crate::errors::ErrorResponse),
    ),
    tag = "serial-stock"
)]
pub async fn create_serial_unit(
    State(services): State<AppServices>,
    Json(payload): Json<CreateSerialUnitRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let unit = services
        .serial_stock
        .create(CreateSerialUnit {
            supplier: payload.supplier,
            serial_number: payload.serial_number,
            description: payload.description,
            make: payload.make,
            model: payload.model,
            status: payload.status,
            note: payload.note,
            size: payload.size,
            location: payload.location,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(unit)))
}

/// List units, filterable by location or exact serial number.
#[utoipa::path(
    get,
    path = "/api/v1/serialstock",
    params(SerialStockFilters),
    responses((status = 200, description = "Serialized units listed")),
    tag = "serial-stock"
)]
pub async fn list_serial_stock(
    State(services): State<AppServices>,
    Query(filters): Query<SerialStockFilters>,
) -> Result<impl IntoResponse, ServiceError> {
    if let Some(serial_number) = filters.serial_number {
        let unit = services.serial_stock.find_by_serial(&serial_number).await?;
        let rows: Vec<_> = unit.into_iter().collect();
        return Ok(Json(rows));
    }
    let rows = services.serial_stock.list(filters.location).await?;
    Ok(Json(rows))
}

#[utoipa::path(
    get,
    path = "/api/v1/serialstock/{id}",
    params(("id" = Uuid, Path, description = "Serialized unit id")),
    responses(
        (status = 200, description = "Unit returned"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    tag = "serial-stock"
)]
pub async fn get_serial_unit(
    State(services): State<AppServices>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let unit = services
        .serial_stock
        .get(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("serial stock unit {} not found", id)))?;
    Ok(Json(unit))
}

/// Move one unit: serialized items cannot be split so relocation is a
/// straight location/status overwrite.
#[utoipa::path(
    put,
    path = "/api/v1/serialstock/{id}/relocate",
    params(("id" = Uuid, Path, description = "Serialized unit id")),
    request_body = RelocateRequest,
    responses(
        (status = 200, description = "Unit relocated"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    tag = "serial-stock"
)]
pub async fn relocate_serial_unit(
    State(services): State<AppServices>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RelocateRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let unit = services
        .serial_stock
        .relocate(id, payload.location, payload.status)
        .await?;
    Ok(Json(unit))
}
