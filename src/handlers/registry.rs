//! CRUD over the organizational registry: business units, regions,
//! clients, sites and technicians.

use crate::errors::ServiceError;
use crate::handlers::AppServices;
use crate::services::registry::{CreateClient, CreateSite, CreateTechnician, UpdateSite};
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct NamedCreateRequest {
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateClientRequest {
    pub name: String,
    pub business_unit_id: Uuid,
    pub contact_person: Option<String>,
    pub contact_number: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSiteRequest {
    pub name: String,
    pub client_id: Option<Uuid>,
    pub region_id: Option<Uuid>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Partial site update. A missing field is untouched; an explicit `null`
/// clears a nullable link.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSiteRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub client_id: Option<Option<Uuid>>,
    #[serde(default)]
    pub region_id: Option<Option<Uuid>>,
    #[serde(default)]
    pub address: Option<Option<String>>,
    #[serde(default)]
    pub latitude: Option<Option<f64>>,
    #[serde(default)]
    pub longitude: Option<Option<f64>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTechnicianRequest {
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub business_unit_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SiteFilters {
    pub client_id: Option<Uuid>,
}

pub fn business_units_router() -> Router<AppServices> {
    Router::new()
        .route("/", get(list_business_units).post(create_business_unit))
        .route("/:id", get(get_business_unit).delete(delete_business_unit))
}

pub fn regions_router() -> Router<AppServices> {
    Router::new().route("/", get(list_regions).post(create_region))
}

pub fn clients_router() -> Router<AppServices> {
    Router::new()
        .route("/", get(list_clients).post(create_client))
        .route("/:id", get(get_client))
}

pub fn sites_router() -> Router<AppServices> {
    Router::new()
        .route("/", get(list_sites).post(create_site))
        .route("/:id", get(get_site).put(update_site))
}

pub fn technicians_router() -> Router<AppServices> {
    Router::new()
        .route("/", get(list_technicians).post(create_technician))
        .route("/:id", axum::routing::delete(delete_technician))
}

#[utoipa::path(
    post,
    path = "/api/v1/businessunits",
    request_body = NamedCreateRequest,
    responses(
        (status = 201, description = "Business unit created"),
        (status = 409, description = "Name already exists", body = crate::errors::ErrorResponse),
    ),
    tag = "registry"
)]
pub async fn create_business_unit(
    State(services): State<AppServices>,
    Json(payload): Json<NamedCreateRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let unit = services.registry.create_business_unit(payload.name).await?;
    Ok((StatusCode::CREATED, Json(unit)))
}

#[utoipa::path(
    get,
    path = "/api/v1/businessunits",
    responses((status = 200, description = "Business units listed")),
    tag = "registry"
)]
pub async fn list_business_units(
    State(services): State<AppServices>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(services.registry.list_business_units().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/businessunits/{id}",
    params(("id" = Uuid, Path, description = "Business unit id")),
    responses(
        (status = 200, description = "Business unit returned"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    tag = "registry"
)]
pub async fn get_business_unit(
    State(services): State<AppServices>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let unit = services
        .registry
        .get_business_unit(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("business unit {} not found", id)))?;
    Ok(Json(unit))
}

#[utoipa::path(
    delete,
    path = "/api/v1/businessunits/{id}",
    params(("id" = Uuid, Path, description = "Business unit id")),
    responses(
        (status = 204, description = "Business unit deleted"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Unit still has clients", body = crate::errors::ErrorResponse),
    ),
    tag = "registry"
)]
pub async fn delete_business_unit(
    State(services): State<AppServices>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    services.registry.delete_business_unit(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/v1/regions",
    request_body = NamedCreateRequest,
    responses(
        (status = 201, description = "Region created"),
        (status = 409, description = "Name already exists", body = crate::errors::ErrorResponse),
    ),
    tag = "registry"
)]
pub async fn create_region(
    State(services): State<AppServices>,
    Json(payload): Json<NamedCreateRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let region = services.registry.create_region(payload.name).await?;
    Ok((StatusCode::CREATED, Json(region)))
}

#[utoipa::path(
    get,
    path = "/api/v1/regions",
    responses((status = 200, description = "Regions listed")),
    tag = "registry"
)]
pub async fn list_regions(
    State(services): State<AppServices>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(services.registry.list_regions().await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/clients",
    request_body = CreateClientRequest,
    responses(
        (status = 201, description = "Client created"),
        (status = 400, description = "Unknown business unit", body = crate::errors::ErrorResponse),
        (status = 409, description = "Name already exists", body = crate::errors::ErrorResponse),
    ),
    tag = "registry"
)]
pub async fn create_client(
    State(services): State<AppServices>,
    Json(payload): Json<CreateClientRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let client = services
        .registry
        .create_client(CreateClient {
            name: payload.name,
            business_unit_id: payload.business_unit_id,
            contact_person: payload.contact_person,
            contact_number: payload.contact_number,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(client)))
}

#[utoipa::path(
    get,
    path = "/api/v1/clients",
    responses((status = 200, description = "Clients listed")),
    tag = "registry"
)]
pub async fn list_clients(
    State(services): State<AppServices>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(services.registry.list_clients().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/clients/{id}",
    params(("id" = Uuid, Path, description = "Client id")),
    responses(
        (status = 200, description = "Client returned"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    tag = "registry"
)]
pub async fn get_client(
    State(services): State<AppServices>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let client = services
        .registry
        .get_client(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("client {} not found", id)))?;
    Ok(Json(client))
}

#[utoipa::path(
    post,
    path = "/api/v1/sites",
    request_body = CreateSiteRequest,
    responses(
        (status = 201, description = "Site created"),
        (status = 400, description = "Unknown client or region", body = crate::errors::ErrorResponse),
    ),
    tag = "registry"
)]
pub async fn create_site(
    State(services): State<AppServices>,
    Json(payload): Json<CreateSiteRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let site = services
        .registry
        .create_site(CreateSite {
            name: payload.name,
            client_id: payload.client_id,
            region_id: payload.region_id,
            address: payload.address,
            latitude: payload.latitude,
            longitude: payload.longitude,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(site)))
}

#[utoipa::path(
    put,
    path = "/api/v1/sites/{id}",
    params(("id" = Uuid, Path, description = "Site id")),
    request_body = UpdateSiteRequest,
    responses(
        (status = 200, description = "Site updated"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    tag = "registry"
)]
pub async fn update_site(
    State(services): State<AppServices>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSiteRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let site = services
        .registry
        .update_site(
            id,
            UpdateSite {
                name: payload.name,
                client_id: payload.client_id,
                region_id: payload.region_id,
                address: payload.address,
                latitude: payload.latitude,
                longitude: payload.longitude,
            },
        )
        .await?;
    Ok(Json(site))
}

#[utoipa::path(
    get,
    path = "/api/v1/sites",
    params(SiteFilters),
    responses((status = 200, description = "Sites listed")),
    tag = "registry"
)]
pub async fn list_sites(
    State(services): State<AppServices>,
    Query(filters): Query<SiteFilters>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(services.registry.list_sites(filters.client_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/sites/{id}",
    params(("id" = Uuid, Path, description = "Site id")),
    responses(
        (status = 200, description = "Site returned"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    tag = "registry"
)]
pub async fn get_site(
    State(services): State<AppServices>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let site = services
        .registry
        .get_site(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("site {} not found", id)))?;
    Ok(Json(site))
}

#[utoipa::path(
    post,
    path = "/api/v1/technicians",
    request_body = CreateTechnicianRequest,
    responses(
        (status = 201, description = "Technician created"),
        (status = 400, description = "Unknown business unit", body = crate::errors::ErrorResponse),
    ),
    tag = "registry"
)]
pub async fn create_technician(
    State(services): State<AppServices>,
    Json(payload): Json<CreateTechnicianRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let technician = services
        .registry
        .create_technician(CreateTechnician {
            full_name: payload.full_name,
            email: payload.email,
            phone: payload.phone,
            business_unit_id: payload.business_unit_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(technician)))
}

#[utoipa::path(
    get,
    path = "/api/v1/technicians",
    responses((status = 200, description = "Technicians listed")),
    tag = "registry"
)]
pub async fn list_technicians(
    State(services): State<AppServices>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(services.registry.list_technicians().await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/technicians/{id}",
    params(("id" = Uuid, Path, description = "Technician id")),
    responses(
        (status = 204, description = "Technician deleted"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    tag = "registry"
)]
pub async fn delete_technician(
    State(services): State<AppServices>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    services.registry.delete_technician(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
