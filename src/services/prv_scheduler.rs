//! PRV service scheduling: due-date arithmetic, overdue/due-soon
//! classification and service-record persistence with document attachments.

use crate::{
    db::DbPool,
    entities::{prv_device, prv_service, service_document},
    errors::ServiceError,
    events::{Event, EventSender},
    storage::BlobStore,
};
use bytes::Bytes;
use chrono::{Months, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionError, TransactionTrait,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use strum::Display;
use tracing::{instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

/// Applied when a schedule is created without an explicit service type.
pub const DEFAULT_SERVICE_TYPE: &str = "Scheduled";

/// Devices due within this many calendar months count as "due soon".
pub const DUE_SOON_WINDOW_MONTHS: u32 = 4;

/// Where a device sits relative to its next service date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, ToSchema)]
pub enum ScheduleStatus {
    /// Next service date is in the past
    Overdue,
    /// Due within the 4-month window (inclusive at exactly 4 months)
    DueSoon,
    /// Scheduled further than the window
    Scheduled,
}

/// Map-marker colour shown by the desktop client. Any renderer of device
/// status must reproduce exactly this mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MarkerColor {
    Red,
    Green,
    Blue,
}

/// Buckets a device's next service date against `now`.
///
/// The boundaries are deliberate: a date equal to `now` is already due
/// (DueSoon, not Overdue), and the window is inclusive at exactly four
/// calendar months out.
pub fn classify_next_service(next: NaiveDate, now: NaiveDate) -> ScheduleStatus {
    if next < now {
        ScheduleStatus::Overdue
    } else if next <= due_soon_horizon(now) {
        ScheduleStatus::DueSoon
    } else {
        ScheduleStatus::Scheduled
    }
}

pub fn marker_color(status: ScheduleStatus) -> MarkerColor {
    match status {
        ScheduleStatus::Overdue => MarkerColor::Red,
        ScheduleStatus::DueSoon => MarkerColor::Green,
        ScheduleStatus::Scheduled => MarkerColor::Blue,
    }
}

fn due_soon_horizon(now: NaiveDate) -> NaiveDate {
    // checked_add_months only fails near NaiveDate::MAX
    now.checked_add_months(Months::new(DUE_SOON_WINDOW_MONTHS))
        .unwrap_or(NaiveDate::MAX)
}

/// Disjoint device buckets; a device in none of them is adequately
/// scheduled (next service more than four months out).
#[derive(Debug, Default, Clone)]
pub struct ClassifiedDevices {
    pub unscheduled: Vec<Uuid>,
    pub overdue: Vec<Uuid>,
    pub due_soon: Vec<Uuid>,
}

/// Single pass over all devices comparing each schedule against `now`.
pub fn classify_devices(
    devices: &[prv_device::Model],
    services: &[prv_service::Model],
    now: NaiveDate,
) -> ClassifiedDevices {
    let next_by_device: HashMap<Uuid, NaiveDate> = services
        .iter()
        .map(|s| (s.prv_device_id, s.next_service_date))
        .collect();

    let mut buckets = ClassifiedDevices::default();
    for device in devices {
        match next_by_device.get(&device.id) {
            None => buckets.unscheduled.push(device.id),
            Some(next) => match classify_next_service(*next, now) {
                ScheduleStatus::Overdue => buckets.overdue.push(device.id),
                ScheduleStatus::DueSoon => buckets.due_soon.push(device.id),
                ScheduleStatus::Scheduled => {}
            },
        }
    }
    buckets
}

#[derive(Debug, Clone)]
pub struct ScheduleService {
    pub prv_device_id: Uuid,
    pub next_service_date: NaiveDate,
    pub interval_months: i32,
    pub service_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateService {
    pub service_id: Uuid,
    pub next_service_date: NaiveDate,
    pub last_service_date: NaiveDate,
    pub interval_months: i32,
    pub service_type: String,
}

/// An uploaded file accompanying a service update.
#[derive(Clone)]
pub struct ServiceAttachment {
    pub file_name: String,
    pub content_type: String,
    pub attachment_type: String,
    pub data: Bytes,
}

impl std::fmt::Debug for ServiceAttachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAttachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("attachment_type", &self.attachment_type)
            .field("size", &self.data.len())
            .finish()
    }
}

#[derive(Clone)]
pub struct PrvSchedulerService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
    blob_store: Arc<dyn BlobStore>,
}

impl PrvSchedulerService {
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: EventSender,
        blob_store: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            db_pool,
            event_sender,
            blob_store,
        }
    }

    /// Creates the service schedule for a device.
    ///
    /// `last_service_date` is derived as `next - interval` calendar months,
    /// so the creation invariant `next = last + interval` holds by
    /// construction.
    #[instrument(skip(self))]
    pub async fn schedule_service(
        &self,
        command: ScheduleService,
    ) -> Result<prv_service::Model, ServiceError> {
        if command.interval_months <= 0 {
            return Err(ServiceError::InvalidInput(
                "service interval must be a positive number of months".to_string(),
            ));
        }

        let db = self.db_pool.as_ref();

        let device = prv_device::Entity::find_by_id(command.prv_device_id)
            .one(db)
            .await?;
        if device.is_none() {
            return Err(ServiceError::InvalidInput("Invalid PRV Device ID".to_string()));
        }

        let existing = prv_service::Entity::find()
            .filter(prv_service::Column::PrvDeviceId.eq(command.prv_device_id))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "PRV device {} already has a service schedule",
                command.prv_device_id
            )));
        }

        let last_service_date = command
            .next_service_date
            .checked_sub_months(Months::new(command.interval_months as u32))
            .ok_or_else(|| {
                ServiceError::InvalidInput("service interval out of range".to_string())
            })?;

        let now = Utc::now();
        let model = prv_service::ActiveModel {
            id: Set(Uuid::new_v4()),
            prv_device_id: Set(command.prv_device_id),
            last_service_date: Set(last_service_date),
            next_service_date: Set(command.next_service_date),
            service_interval_months: Set(command.interval_months),
            service_type: Set(command
                .service_type
                .unwrap_or_else(|| DEFAULT_SERVICE_TYPE.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await?;

        let _ = self
            .event_sender
            .send(Event::PrvServiceScheduled {
                prv_service_id: model.id,
                prv_device_id: model.prv_device_id,
            })
            .await;

        Ok(model)
    }

    /// Overwrites the scalar schedule fields and, when a file accompanies
    /// the update, appends one ServiceDocument.
    ///
    /// The blob upload happens before any database write; if the store
    /// rejects the file the whole update fails with nothing persisted.
    /// Prior documents are never replaced.
    #[instrument(skip(self, attachment))]
    pub async fn update_service(
        &self,
        command: UpdateService,
        attachment: Option<ServiceAttachment>,
    ) -> Result<(), ServiceError> {
        if command.interval_months <= 0 {
            return Err(ServiceError::InvalidInput(
                "service interval must be a positive number of months".to_string(),
            ));
        }

        let db = self.db_pool.as_ref();

        let existing = prv_service::Entity::find_by_id(command.service_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("PRV service {} not found", command.service_id))
            })?;

        // Upload first so a blob failure leaves the schedule untouched
        let uploaded = match attachment {
            Some(ref file) => {
                let url = self
                    .blob_store
                    .upload(&file.file_name, file.data.clone(), &file.content_type)
                    .await
                    .map_err(|e| {
                        warn!(service_id = %command.service_id, error = %e, "attachment upload failed");
                        ServiceError::AttachmentUploadFailed(e.to_string())
                    })?;
                Some((file.clone(), url))
            }
            None => None,
        };

        let service_id = existing.id;
        let cmd = command.clone();
        let document_id = db
            .transaction::<_, Option<Uuid>, ServiceError>(move |txn| {
                Box::pin(async move {
                    let mut active: prv_service::ActiveModel = existing.into();
                    active.next_service_date = Set(cmd.next_service_date);
                    active.last_service_date = Set(cmd.last_service_date);
                    active.service_interval_months = Set(cmd.interval_months);
                    active.service_type = Set(cmd.service_type.clone());
                    active.updated_at = Set(Utc::now());
                    active.update(txn).await?;

                    match uploaded {
                        Some((file, url)) => {
                            let doc = service_document::ActiveModel {
                                id: Set(Uuid::new_v4()),
                                prv_service_id: Set(service_id),
                                file_name: Set(file.file_name),
                                file_path: Set(url),
                                attachment_type: Set(file.attachment_type),
                                upload_date: Set(Utc::now()),
                            }
                            .insert(txn)
                            .await?;
                            Ok(Some(doc.id))
                        }
                        None => Ok(None),
                    }
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(e) => ServiceError::DatabaseError(e),
                TransactionError::Transaction(e) => e,
            })?;

        let _ = self
            .event_sender
            .send(Event::PrvServiceUpdated(command.service_id))
            .await;
        if let Some(document_id) = document_id {
            let _ = self
                .event_sender
                .send(Event::ServiceDocumentAttached {
                    prv_service_id: command.service_id,
                    document_id,
                })
                .await;
        }

        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get_service(
        &self,
        service_id: Uuid,
    ) -> Result<Option<prv_service::Model>, ServiceError> {
        let service = prv_service::Entity::find_by_id(service_id)
            .one(self.db_pool.as_ref())
            .await?;
        Ok(service)
    }

    #[instrument(skip(self))]
    pub async fn list_services(&self) -> Result<Vec<prv_service::Model>, ServiceError> {
        let services = prv_service::Entity::find()
            .order_by_asc(prv_service::Column::NextServiceDate)
            .all(self.db_pool.as_ref())
            .await?;
        Ok(services)
    }

    #[instrument(skip(self))]
    pub async fn list_documents(
        &self,
        service_id: Uuid,
    ) -> Result<Vec<service_document::Model>, ServiceError> {
        let documents = service_document::Entity::find()
            .filter(service_document::Column::PrvServiceId.eq(service_id))
            .order_by_asc(service_document::Column::UploadDate)
            .all(self.db_pool.as_ref())
            .await?;
        Ok(documents)
    }

    /// Devices with no service schedule at all.
    #[instrument(skip(self))]
    pub async fn unscheduled_devices(&self) -> Result<Vec<prv_device::Model>, ServiceError> {
        let db = self.db_pool.as_ref();

        let scheduled: Vec<Uuid> = prv_service::Entity::find()
            .select_only()
            .column(prv_service::Column::PrvDeviceId)
            .into_tuple()
            .all(db)
            .await?;

        let devices = if scheduled.is_empty() {
            prv_device::Entity::find().all(db).await?
        } else {
            prv_device::Entity::find()
                .filter(prv_device::Column::Id.is_not_in(scheduled))
                .all(db)
                .await?
        };
        Ok(devices)
    }

    /// Full classification of every device against `now`.
    #[instrument(skip(self))]
    pub async fn classify_all(&self, now: NaiveDate) -> Result<ClassifiedDevices, ServiceError> {
        let db = self.db_pool.as_ref();
        let devices = prv_device::Entity::find().all(db).await?;
        let services = prv_service::Entity::find().all(db).await?;
        Ok(classify_devices(&devices, &services, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn past_date_is_overdue() {
        let now = date(2026, 6, 15);
        assert_eq!(
            classify_next_service(date(2026, 6, 14), now),
            ScheduleStatus::Overdue
        );
    }

    #[test]
    fn today_is_due_soon_not_overdue() {
        let now = date(2026, 6, 15);
        assert_eq!(
            classify_next_service(now, now),
            ScheduleStatus::DueSoon
        );
    }

    #[test]
    fn window_is_inclusive_at_exactly_four_months() {
        let now = date(2026, 6, 15);
        assert_eq!(
            classify_next_service(date(2026, 10, 15), now),
            ScheduleStatus::DueSoon
        );
        assert_eq!(
            classify_next_service(date(2026, 10, 16), now),
            ScheduleStatus::Scheduled
        );
    }

    #[test]
    fn month_end_boundary_uses_calendar_months() {
        // four months from 31 Oct clamps to 28 Feb
        let now = date(2025, 10, 31);
        assert_eq!(
            classify_next_service(date(2026, 2, 28), now),
            ScheduleStatus::DueSoon
        );
        assert_eq!(
            classify_next_service(date(2026, 3, 1), now),
            ScheduleStatus::Scheduled
        );
    }

    #[test]
    fn marker_colors_track_status() {
        assert_eq!(marker_color(ScheduleStatus::Overdue), MarkerColor::Red);
        assert_eq!(marker_color(ScheduleStatus::DueSoon), MarkerColor::Green);
        assert_eq!(marker_color(ScheduleStatus::Scheduled), MarkerColor::Blue);
    }

    #[test]
    fn classify_devices_buckets_are_disjoint() {
        let now = date(2026, 6, 15);
        let site_id = Uuid::new_v4();

        let device = |id: Uuid| prv_device::Model {
            id,
            site_id,
            prv_name: "PRV".to_string(),
            valve_make: None,
            valve_model: None,
            valve_size_mm: None,
            valve_serial_number: None,
            pilot_make: None,
            pilot_model: None,
            inlet_pressure_kpa: None,
            outlet_pressure_kpa: None,
            design_flow_ls: None,
            pressure_zone: None,
            supply_description: None,
            chamber_type: None,
            chamber_condition: None,
            chamber_lid_condition: None,
            valve_condition: None,
            pilot_condition: None,
            strainer_fitted: None,
            strainer_condition: None,
            isolating_valve_upstream: None,
            isolating_valve_downstream: None,
            isolating_valve_condition: None,
            air_valve_fitted: None,
            air_valve_condition: None,
            bypass_fitted: None,
            bypass_condition: None,
            gauge_upstream_fitted: None,
            gauge_downstream_fitted: None,
            ball_valves_fitted: None,
            pipework_condition: None,
            leaks_observed: None,
            vandalism_observed: None,
            access_notes: None,
            installation_date: None,
            last_inspection_date: None,
            latitude: None,
            longitude: None,
            general_notes: None,
            created_at: Utc::now(),
        };

        let service = |device_id: Uuid, next: NaiveDate| prv_service::Model {
            id: Uuid::new_v4(),
            prv_device_id: device_id,
            last_service_date: next,
            next_service_date: next,
            service_interval_months: 12,
            service_type: DEFAULT_SERVICE_TYPE.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let overdue_id = Uuid::new_v4();
        let due_soon_id = Uuid::new_v4();
        let scheduled_id = Uuid::new_v4();
        let unscheduled_id = Uuid::new_v4();

        let devices = vec![
            device(overdue_id),
            device(due_soon_id),
            device(scheduled_id),
            device(unscheduled_id),
        ];
        let services = vec![
            service(overdue_id, date(2026, 6, 1)),
            service(due_soon_id, date(2026, 8, 1)),
            service(scheduled_id, date(2027, 6, 1)),
        ];

        let buckets = classify_devices(&devices, &services, now);
        assert_eq!(buckets.overdue, vec![overdue_id]);
        assert_eq!(buckets.due_soon, vec![due_soon_id]);
        assert_eq!(buckets.unscheduled, vec![unscheduled_id]);
    }
}
