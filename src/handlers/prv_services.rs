use crate::errors::ServiceError;
use crate::handlers::AppServices;
use crate::services::prv_scheduler::{ScheduleService, ServiceAttachment, UpdateService};
use axum::{
    extract::{Json, Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ScheduleServiceRequest {
    pub prv_device_id: Uuid,
    pub next_service_date: NaiveDate,
    pub interval_months: i32,
    pub service_type: Option<String>,
}

pub fn prv_services_router() -> Router<AppServices> {
    Router::new()
        .route("/", get(list_prv_services).post(schedule_prv_service))
        .route("/unscheduled", get(unscheduled_devices))
        .route("/:id", get(get_prv_service).put(update_prv_service))
        .route("/:id/documents", get(list_service_documents))
}

/// Create the service schedule for a device. Each device carries at most
/// one schedule; updates go through PUT.
#[utoipa::path(
    post,
    path = "/api/v1/prvservices",
    request_body = ScheduleServiceRequest,
    responses(
        (status = 201, description = "Schedule created"),
        (status = 400, description = "Invalid PRV Device ID or bad interval", body = crate::errors::ErrorResponse),
        (status = 409, description = "Device already scheduled", body = crate::errors::ErrorResponse),
    ),
    tag = "prv-services"
)]
pub async fn schedule_prv_service(
    State(services): State<AppServices>,
    Json(payload): Json<ScheduleServiceRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let model = services
        .prv_scheduler
        .schedule_service(ScheduleService {
            prv_device_id: payload.prv_device_id,
            next_service_date: payload.next_service_date,
            interval_months: payload.interval_months,
            service_type: payload.service_type,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(model)))
}

/// Record a completed service as multipart form data, optionally attaching
/// one document (job card, certificate). Form fields: `next_service_date`,
/// `last_service_date`, `interval_months`, `service_type`,
/// `attachment_type`, `file`.
#[utoipa::path(
    put,
    path = "/api/v1/prvservices/{id}",
    params(("id" = Uuid, Path, description = "PRV service id")),
    responses(
        (status = 204, description = "Schedule updated"),
        (status = 400, description = "Malformed form data", body = crate::errors::ErrorResponse),
        (status = 404, description = "Service not found", body = crate::errors::ErrorResponse),
        (status = 502, description = "Attachment upload failed", body = crate::errors::ErrorResponse),
    ),
    tag = "prv-services"
)]
pub async fn update_prv_service(
    State(services): State<AppServices>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ServiceError> {
    let (update, attachment) = parse_update_form(id, multipart).await?;
    services.prv_scheduler.update_service(update, attachment).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn parse_update_form(
    service_id: Uuid,
    mut multipart: Multipart,
) -> Result<(UpdateService, Option<ServiceAttachment>), ServiceError> {
    let mut next_service_date = None;
    let mut last_service_date = None;
    let mut interval_months = None;
    let mut service_type = None;
    let mut attachment_type = None;
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::InvalidInput(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "next_service_date" => next_service_date = Some(parse_date(&text(field).await?)?),
            "last_service_date" => last_service_date = Some(parse_date(&text(field).await?)?),
            "interval_months" => {
                let raw = text(field).await?;
                interval_months = Some(raw.trim().parse::<i32>().map_err(|_| {
                    ServiceError::InvalidInput(format!("interval_months is not a number: {raw}"))
                })?);
            }
            "service_type" => service_type = Some(text(field).await?),
            "attachment_type" => attachment_type = Some(text(field).await?),
            "file" => {
                let file_name = field
                    .file_name()
                    .unwrap_or("attachment")
                    .to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await.map_err(|e| {
                    ServiceError::InvalidInput(format!("failed to read file field: {e}"))
                })?;
                file = Some((file_name, content_type, data));
            }
            _ => {}
        }
    }

    let update = UpdateService {
        service_id,
        next_service_date: next_service_date
            .ok_or_else(|| ServiceError::InvalidInput("next_service_date is required".into()))?,
        last_service_date: last_service_date
            .ok_or_else(|| ServiceError::InvalidInput("last_service_date is required".into()))?,
        interval_months: interval_months
            .ok_or_else(|| ServiceError::InvalidInput("interval_months is required".into()))?,
        service_type: service_type
            .ok_or_else(|| ServiceError::InvalidInput("service_type is required".into()))?,
    };

    let attachment = file.map(|(file_name, content_type, data)| ServiceAttachment {
        file_name,
        content_type,
        attachment_type: attachment_type.unwrap_or_else(|| "JobCard".to_string()),
        data,
    });

    Ok((update, attachment))
}

async fn text(field: axum::extract::multipart::Field<'_>) -> Result<String, ServiceError> {
    field
        .text()
        .await
        .map_err(|e| ServiceError::InvalidInput(format!("failed to read form field: {e}")))
}

fn parse_date(raw: &str) -> Result<NaiveDate, ServiceError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ServiceError::InvalidInput(format!("invalid date (expected YYYY-MM-DD): {raw}")))
}

#[utoipa::path(
    get,
    path = "/api/v1/prvservices",
    responses((status = 200, description = "Schedules ordered by next service date")),
    tag = "prv-services"
)]
pub async fn list_prv_services(
    State(services): State<AppServices>,
) -> Result<impl IntoResponse, ServiceError> {
    let schedules = services.prv_scheduler.list_services().await?;
    Ok(Json(schedules))
}

#[utoipa::path(
    get,
    path = "/api/v1/prvservices/{id}",
    params(("id" = Uuid, Path, description = "PRV service id")),
    responses(
        (status = 200, description = "Schedule returned"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    tag = "prv-services"
)]
pub async fn get_prv_service(
    State(services): State<AppServices>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let schedule = services
        .prv_scheduler
        .get_service(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("PRV service {} not found", id)))?;
    Ok(Json(schedule))
}

#[utoipa::path(
    get,
    path = "/api/v1/prvservices/{id}/documents",
    params(("id" = Uuid, Path, description = "PRV service id")),
    responses((status = 200, description = "Attached documents, oldest first")),
    tag = "prv-services"
)]
pub async fn list_service_documents(
    State(services): State<AppServices>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let documents = services.prv_scheduler.list_documents(id).await?;
    Ok(Json(documents))
}

/// Devices that have never been scheduled.
#[utoipa::path(
    get,
    path = "/api/v1/prvservices/unscheduled",
    responses((status = 200, description = "Devices without a service schedule")),
    tag = "prv-services"
)]
pub async fn unscheduled_devices(
    State(services): State<AppServices>,
) -> Result<impl IntoResponse, ServiceError> {
    let devices = services.prv_scheduler.unscheduled_devices().await?;
    Ok(Json(devices))
}
