//! PRV device registry: the physical valves that services are scheduled
//! against. Inspection attributes are captured once at registration and
//! may be amended later; scheduling state lives in
//! [`super::prv_scheduler`].

use crate::{
    db::DbPool,
    entities::prv_device,
    errors::ServiceError,
    events::{Event, EventSender},
    services::lookup::{DeviceLocation, LookupService},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Inspection attributes shared by create and update. Everything here is
/// optional on the survey form.
#[derive(Debug, Clone, Default)]
pub struct PrvAttributes {
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

#[derive(Debug, Clone)]
pub struct CreatePrvDevice {
    pub site_id: Uuid,
    pub prv_name: String,
    pub attributes: PrvAttributes,
}

/// A device joined with its resolved location names.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceWithLocation {
    #[serde(flatten)]
    pub device: prv_device::Model,
    #[serde(flatten)]
    pub location: DeviceLocation,
}

#[derive(Clone)]
pub struct PrvDeviceService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
    lookup: LookupService,
}

impl PrvDeviceService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender, lookup: LookupService) -> Self {
        Self {
            db_pool,
            event_sender,
            lookup,
        }
    }

    #[instrument(skip(self))]
    pub async fn create(
        &self,
        command: CreatePrvDevice,
    ) -> Result<prv_device::Model, ServiceError> {
        if command.prv_name.trim().is_empty() {
            return Err(ServiceError::InvalidInput(
                "prv_name is required".to_string(),
            ));
        }

        let db = self.db_pool.as_ref();

        // The site link must exist at registration time even though the
        // lookup chain later tolerates broken links.
        let site = crate::entities::site::Entity::find_by_id(command.site_id)
            .one(db)
            .await?;
        if site.is_none() {
            return Err(ServiceError::InvalidInput(format!(
                "site {} does not exist",
                command.site_id
            )));
        }

        let a = command.attributes;
        let device = prv_device::ActiveModel {
            id: Set(Uuid::new_v4()),
            site_id: Set(command.site_id),
            prv_name: Set(command.prv_name),
            valve_make: Set(a.valve_make),
            valve_model: Set(a.valve_model),
            valve_size_mm: Set(a.valve_size_mm),
            valve_serial_number: Set(a.valve_serial_number),
            pilot_make: Set(a.pilot_make),
            pilot_model: Set(a.pilot_model),
            inlet_pressure_kpa: Set(a.inlet_pressure_kpa),
            outlet_pressure_kpa: Set(a.outlet_pressure_kpa),
            design_flow_ls: Set(a.design_flow_ls),
            pressure_zone: Set(a.pressure_zone),
            supply_description: Set(a.supply_description),
            chamber_type: Set(a.chamber_type),
            chamber_condition: Set(a.chamber_condition),
            chamber_lid_condition: Set(a.chamber_lid_condition),
            valve_condition: Set(a.valve_condition),
            pilot_condition: Set(a.pilot_condition),
            strainer_fitted: Set(a.strainer_fitted),
            strainer_condition: Set(a.strainer_condition),
            isolating_valve_upstream: Set(a.isolating_valve_upstream),
            isolating_valve_downstream: Set(a.isolating_valve_downstream),
            isolating_valve_condition: Set(a.isolating_valve_condition),
            air_valve_fitted: Set(a.air_valve_fitted),
            air_valve_condition: Set(a.air_valve_condition),
            bypass_fitted: Set(a.bypass_fitted),
            bypass_condition: Set(a.bypass_condition),
            gauge_upstream_fitted: Set(a.gauge_upstream_fitted),
            gauge_downstream_fitted: Set(a.gauge_downstream_fitted),
            ball_valves_fitted: Set(a.ball_valves_fitted),
            pipework_condition: Set(a.pipework_condition),
            leaks_observed: Set(a.leaks_observed),
            vandalism_observed: Set(a.vandalism_observed),
            access_notes: Set(a.access_notes),
            installation_date: Set(a.installation_date),
            last_inspection_date: Set(a.last_inspection_date),
            latitude: Set(a.latitude),
            longitude: Set(a.longitude),
            general_notes: Set(a.general_notes),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await?;

        let _ = self
            .event_sender
            .send(Event::PrvDeviceCreated {
                prv_device_id: device.id,
                site_id: device.site_id,
            })
            .await;

        Ok(device)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<Option<DeviceWithLocation>, ServiceError> {
        let Some(device) = prv_device::Entity::find_by_id(id)
            .one(self.db_pool.as_ref())
            .await?
        else {
            return Ok(None);
        };
        let location = self.lookup.resolve_device(&device).await?;
        Ok(Some(DeviceWithLocation { device, location }))
    }

    /// Lists devices with resolved location names, optionally scoped to
    /// one site.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        site_id: Option<Uuid>,
    ) -> Result<Vec<DeviceWithLocation>, ServiceError> {
        let mut query = prv_device::Entity::find().order_by_asc(prv_device::Column::PrvName);
        if let Some(site_id) = site_id {
            query = query.filter(prv_device::Column::SiteId.eq(site_id));
        }
        let devices = query.all(self.db_pool.as_ref()).await?;

        let mut locations = self.lookup.resolve_devices(&devices).await?;
        Ok(devices
            .into_iter()
            .map(|device| {
                let location = locations.remove(&device.id).unwrap_or_default();
                DeviceWithLocation { device, location }
            })
            .collect())
    }

    /// Raw models without the lookup join, for callers that do their own
    /// decoration.
    #[instrument(skip(self))]
    pub async fn list_plain(&self) -> Result<Vec<prv_device::Model>, ServiceError> {
        let devices = prv_device::Entity::find()
            .order_by_asc(prv_device::Column::PrvName)
            .all(self.db_pool.as_ref())
            .await?;
        Ok(devices)
    }
}
