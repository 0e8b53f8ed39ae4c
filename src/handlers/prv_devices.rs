use crate::errors::ServiceError;
use crate::handlers::AppServices;
use crate::services::lookup::DeviceLocation;
use crate::services::prv_devices::{CreatePrvDevice, PrvAttributes};
use crate::services::prv_scheduler::{
    classify_next_service, marker_color, MarkerColor, ScheduleStatus,
};
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePrvDeviceRequest {
    pub site_id: Uuid,
    pub prv_name: String,
    pub valve_make: Option<String>,
    pub valve_model: Option<String>,
    pub valve_size_mm: Option<i32>,
    pub valve_serial_number: Option<String>,
    pub pilot_make: Option<String>,
    pub pilot_model: Option<String>,
    pub inlet_pressure_kpa: Option<f64>,
    pub outlet_pressure_kpa: Option<f64>,
    pub design_flow_ls: Option<f64>,
    pub pressure_zone: Option<String>,
    pub supply_description: Option<String>,
    pub chamber_type: Option<String>,
    pub chamber_condition: Option<String>,
    pub chamber_lid_condition: Option<String>,
    pub valve_condition: Option<String>,
    pub pilot_condition: Option<String>,
    pub strainer_fitted: Option<bool>,
    pub strainer_condition: Option<String>,
    pub isolating_valve_upstream: Option<bool>,
    pub isolating_valve_downstream: Option<bool>,
    pub isolating_valve_condition: Option<String>,
    pub air_valve_fitted: Option<bool>,
    pub air_valve_condition: Option<String>,
    pub bypass_fitted: Option<bool>,
    pub bypass_condition: Option<String>,
    pub gauge_upstream_fitted: Option<bool>,
    pub gauge_downstream_fitted: Option<bool>,
    pub ball_valves_fitted: Option<bool>,
    pub pipework_condition: Option<String>,
    pub leaks_observed: Option<bool>,
    pub vandalism_observed: Option<bool>,
    pub access_notes: Option<String>,
    pub installation_date: Option<NaiveDate>,
    pub last_inspection_date: Option<NaiveDate>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub general_notes: Option<String>,
}

impl CreatePrvDeviceRequest {
    fn into_command(self) -> CreatePrvDevice {
        CreatePrvDevice {
            site_id: self.site_id,
            prv_name: self.prv_name,
            attributes: PrvAttributes {
                valve_make: self.valve_make,
                valve_model: self.valve_model,
                valve_size_mm: self.valve_size_mm,
                valve_serial_number: self.valve_serial_number,
                pilot_make: self.pilot_make,
                pilot_model: self.pilot_model,
                inlet_pressure_kpa: self.inlet_pressure_kpa,
                outlet_pressure_kpa: self.outlet_pressure_kpa,
                design_flow_ls: self.design_flow_ls,
                pressure_zone: self.pressure_zone,
                supply_description: self.supply_description,
                chamber_type: self.chamber_type,
                chamber_condition: self.chamber_condition,
                chamber_lid_condition: self.chamber_lid_condition,
                valve_condition: self.valve_condition,
                pilot_condition: self.pilot_condition,
                strainer_fitted: self.strainer_fitted,
                strainer_condition: self.strainer_condition,
                isolating_valve_upstream: self.isolating_valve_upstream,
                isolating_valve_downstream: self.isolating_valve_downstream,
                isolating_valve_condition: self.isolating_valve_condition,
                air_valve_fitted: self.air_valve_fitted,
                air_valve_condition: self.air_valve_condition,
                bypass_fitted: self.bypass_fitted,
                bypass_condition: self.bypass_condition,
                gauge_upstream_fitted: self.gauge_upstream_fitted,
                gauge_downstream_fitted: self.gauge_downstream_fitted,
                ball_valves_fitted: self.ball_valves_fitted,
                pipework_condition: self.pipework_condition,
                leaks_observed: self.leaks_observed,
                vandalism_observed: self.vandalism_observed,
                access_notes: self.access_notes,
                installation_date: self.installation_date,
                last_inspection_date: self.last_inspection_date,
                latitude: self.latitude,
                longitude: self.longitude,
                general_notes: self.general_notes,
            },
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PrvDeviceFilters {
    pub site_id: Option<Uuid>,
}

/// One device on the status map. `status` and `marker` are absent for a
/// device with no service schedule.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeviceStatusEntry {
    pub prv_device_id: Uuid,
    pub prv_name: String,
    #[serde(flatten)]
    pub location: DeviceLocation,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub next_service_date: Option<NaiveDate>,
    pub status: Option<ScheduleStatus>,
    pub marker: Option<MarkerColor>,
}

pub fn prv_devices_router() -> Router<AppServices> {
    Router::new()
        .route("/", get(list_prv_devices).post(create_prv_device))
        .route("/status", get(device_status))
        .route("/:id", get(get_prv_device))
}

#[utoipa::path(
    post,
    path = "/api/v1/prvdevices",
    request_body = CreatePrvDeviceRequest,
    responses(
        (status = 201, description = "Device registered"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
    ),
    tag = "prv-devices"
)]
pub async fn create_prv_device(
    State(services): State<AppServices>,
    Json(payload): Json<CreatePrvDeviceRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let device = services.prv_devices.create(payload.into_command()).await?;
    Ok((StatusCode::CREATED, Json(device)))
}

#[utoipa::path(
    get,
    path = "/api/v1/prvdevices",
    params(PrvDeviceFilters),
    responses((status = 200, description = "Devices with resolved location names")),
    tag = "prv-devices"
)]
pub async fn list_prv_devices(
    State(services): State<AppServices>,
    Query(filters): Query<PrvDeviceFilters>,
) -> Result<impl IntoResponse, ServiceError> {
    let devices = services.prv_devices.list(filters.site_id).await?;
    Ok(Json(devices))
}

#[utoipa::path(
    get,
    path = "/api/v1/prvdevices/{id}",
    params(("id" = Uuid, Path, description = "PRV device id")),
    responses(
        (status = 200, description = "Device with resolved location names"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    tag = "prv-devices"
)]
pub async fn get_prv_device(
    State(services): State<AppServices>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let device = services
        .prv_devices
        .get(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("PRV device {} not found", id)))?;
    Ok(Json(device))
}

/// Map view: every device with its schedule status and marker colour.
#[utoipa::path(
    get,
    path = "/api/v1/prvdevices/status",
    responses((status = 200, description = "Device status entries", body = [DeviceStatusEntry])),
    tag = "prv-devices"
)]
pub async fn device_status(
    State(services): State<AppServices>,
) -> Result<impl IntoResponse, ServiceError> {
    let devices = services.prv_devices.list(None).await?;
    let schedules = services.prv_scheduler.list_services().await?;
    let next_by_device: HashMap<Uuid, NaiveDate> = schedules
        .iter()
        .map(|s| (s.prv_device_id, s.next_service_date))
        .collect();

    let today = Utc::now().date_naive();
    let entries: Vec<DeviceStatusEntry> = devices
        .into_iter()
        .map(|d| {
            let next = next_by_device.get(&d.device.id).copied();
            let status = next.map(|n| classify_next_service(n, today));
            DeviceStatusEntry {
                prv_device_id: d.device.id,
                prv_name: d.device.prv_name,
                location: d.location,
                latitude: d.device.latitude,
                longitude: d.device.longitude,
                next_service_date: next,
                status,
                marker: status.map(marker_color),
            }
        })
        .collect();
    Ok(Json(entries))
}
