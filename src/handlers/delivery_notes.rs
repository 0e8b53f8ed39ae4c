use crate::entities::{delivery_note, delivery_note_item};
use crate::errors::ServiceError;
use crate::handlers::AppServices;
use crate::services::delivery_notes::{CreateDeliveryNote, ItemDispatchOutcome};
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDeliveryNoteRequest {
    pub note_date: DateTime<Utc>,
    pub destination: String,
    pub comments: Option<String>,
    /// Ids of the serialized units bundled on this note
    pub serial_stock_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct CreatedDeliveryNoteResponse {
    pub note: delivery_note::Model,
    /// Per-unit relocation results; a failed item leaves the note intact
    pub items: Vec<ItemDispatchOutcome>,
}

#[derive(Debug, Serialize)]
pub struct DeliveryNoteDetail {
    pub note: delivery_note::Model,
    pub items: Vec<delivery_note_item::Model>,
}

pub fn delivery_notes_router() -> Router<AppServices> {
    Router::new()
        .route("/", get(list_delivery_notes).post(create_delivery_note))
        .route("/:id", get(get_delivery_note))
}

/// Cut a delivery note and dispatch its units to the destination.
///
/// The note and item rows are atomic; the per-unit location updates are
/// applied individually and reported in the response.
#[utoipa::path(
    post,
    path = "/api/v1/deliverynotes",
    request_body = CreateDeliveryNoteRequest,
    responses(
        (status = 201, description = "Delivery note created"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
    ),
    tag = "delivery-notes"
)]
pub async fn create_delivery_note(
    State(services): State<AppServices>,
    Json(payload): Json<CreateDeliveryNoteRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = services
        .delivery_notes
        .create(CreateDeliveryNote {
            note_date: payload.note_date,
            destination: payload.destination,
            comments: payload.comments,
            serial_stock_ids: payload.serial_stock_ids,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedDeliveryNoteResponse {
            note: created.note,
            items: created.item_outcomes,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/deliverynotes",
    responses((status = 200, description = "Delivery notes listed, newest first")),
    tag = "delivery-notes"
)]
pub async fn list_delivery_notes(
    State(services): State<AppServices>,
) -> Result<impl IntoResponse, ServiceError> {
    let notes = services.delivery_notes.list().await?;
    Ok(Json(notes))
}

#[utoipa::path(
    get,
    path = "/api/v1/deliverynotes/{id}",
    params(("id" = Uuid, Path, description = "Delivery note id")),
    responses(
        (status = 200, description = "Note with its items"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    tag = "delivery-notes"
)]
pub async fn get_delivery_note(
    State(services): State<AppServices>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let (note, items) = services
        .delivery_notes
        .get(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("delivery note {} not found", id)))?;
    Ok(Json(DeliveryNoteDetail { note, items }))
}
