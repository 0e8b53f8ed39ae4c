mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use bytes::Bytes;
use chrono::NaiveDate;
use reovalve_api::db::DbPool;
use reovalve_api::errors::ServiceError;
use reovalve_api::services::lookup::LookupService;
use reovalve_api::services::prv_devices::{CreatePrvDevice, PrvAttributes, PrvDeviceService};
use reovalve_api::services::prv_scheduler::{
    PrvSchedulerService, ScheduleService, ServiceAttachment, UpdateService,
};
use reovalve_api::services::registry::{CreateSite, RegistryService};
use reovalve_api::storage::FsBlobStore;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

struct Harness {
    db: Arc<DbPool>,
    devices: PrvDeviceService,
    scheduler: PrvSchedulerService,
    registry: RegistryService,
    _blob_dir: tempfile::TempDir,
}

async fn harness() -> Harness {
    let db = common::setup_db().await;
    let events = common::drained_event_sender();
    let blob_dir = tempfile::tempdir().unwrap();
    let blob_store = Arc::new(FsBlobStore::new(
        blob_dir.path(),
        "http://localhost:8080/documents",
    ));

    Harness {
        devices: PrvDeviceService::new(db.clone(), events.clone(), LookupService::new(db.clone())),
        scheduler: PrvSchedulerService::new(db.clone(), events, blob_store),
        registry: RegistryService::new(db.clone()),
        db,
        _blob_dir: blob_dir,
    }
}

async fn seed_device(h: &Harness, name: &str) -> Uuid {
    let site = h
        .registry
        .create_site(CreateSite {
            name: format!("{name} site"),
            client_id: None,
            region_id: None,
            address: None,
            latitude: None,
            longitude: None,
        })
        .await
        .unwrap();

    h.devices
        .create(CreatePrvDevice {
            site_id: site.id,
            prv_name: name.to_string(),
            attributes: PrvAttributes::default(),
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn scheduling_derives_last_service_date() {
    let h = harness().await;
    let device_id = seed_device(&h, "PRV-001").await;

    let schedule = h
        .scheduler
        .schedule_service(ScheduleService {
            prv_device_id: device_id,
            next_service_date: date(2026, 12, 15),
            interval_months: 6,
            service_type: None,
        })
        .await
        .unwrap();

    assert_eq!(schedule.next_service_date, date(2026, 12, 15));
    assert_eq!(schedule.last_service_date, date(2026, 6, 15));
    assert_eq!(schedule.service_interval_months, 6);
    assert_eq!(schedule.service_type, "Scheduled");
}

#[tokio::test]
async fn unknown_device_rejected_with_client_facing_message() {
    let h = harness().await;

    let err = h
        .scheduler
        .schedule_service(ScheduleService {
            prv_device_id: Uuid::new_v4(),
            next_service_date: date(2026, 12, 15),
            interval_months: 6,
            service_type: None,
        })
        .await
        .unwrap_err();

    assert_matches!(err, ServiceError::InvalidInput(_));
    assert!(err.to_string().contains("Invalid PRV Device ID"));
}

#[tokio::test]
async fn second_schedule_for_same_device_conflicts() {
    let h = harness().await;
    let device_id = seed_device(&h, "PRV-002").await;

    let cmd = ScheduleService {
        prv_device_id: device_id,
        next_service_date: date(2026, 12, 15),
        interval_months: 6,
        service_type: None,
    };
    h.scheduler.schedule_service(cmd.clone()).await.unwrap();
    let err = h.scheduler.schedule_service(cmd).await.unwrap_err();
    assert_matches!(err, ServiceError::Conflict(_));
}

#[tokio::test]
async fn unscheduled_list_shrinks_as_devices_are_scheduled() {
    let h = harness().await;
    let a = seed_device(&h, "PRV-A").await;
    let b = seed_device(&h, "PRV-B").await;

    let before: Vec<Uuid> = h
        .scheduler
        .unscheduled_devices()
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.id)
        .collect();
    assert!(before.contains(&a) && before.contains(&b));

    h.scheduler
        .schedule_service(ScheduleService {
            prv_device_id: a,
            next_service_date: date(2026, 12, 15),
            interval_months: 12,
            service_type: Some("Overhaul".into()),
        })
        .await
        .unwrap();

    let after: Vec<Uuid> = h
        .scheduler
        .unscheduled_devices()
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.id)
        .collect();
    assert!(!after.contains(&a));
    assert!(after.contains(&b));
}

#[tokio::test]
async fn classification_buckets_follow_next_service_dates() {
    let h = harness().await;
    let overdue = seed_device(&h, "PRV-overdue").await;
    let due_soon = seed_device(&h, "PRV-due-soon").await;
    let scheduled = seed_device(&h, "PRV-scheduled").await;
    let unscheduled = seed_device(&h, "PRV-unscheduled").await;

    let now = date(2026, 6, 15);
    for (device, next) in [
        (overdue, date(2026, 6, 1)),
        (due_soon, date(2026, 10, 15)),
        (scheduled, date(2026, 10, 16)),
    ] {
        h.scheduler
            .schedule_service(ScheduleService {
                prv_device_id: device,
                next_service_date: next,
                interval_months: 12,
                service_type: None,
            })
            .await
            .unwrap();
    }

    let buckets = h.scheduler.classify_all(now).await.unwrap();
    assert_eq!(buckets.overdue, vec![overdue]);
    assert_eq!(buckets.due_soon, vec![due_soon]);
    assert_eq!(buckets.unscheduled, vec![unscheduled]);
    assert!(!buckets.overdue.contains(&scheduled));
    assert!(!buckets.due_soon.contains(&scheduled));
}

#[tokio::test]
async fn update_with_attachment_appends_exactly_one_document() {
    let h = harness().await;
    let device_id = seed_device(&h, "PRV-doc").await;

    let schedule = h
        .scheduler
        .schedule_service(ScheduleService {
            prv_device_id: device_id,
            next_service_date: date(2026, 12, 15),
            interval_months: 6,
            service_type: None,
        })
        .await
        .unwrap();

    let update = UpdateService {
        service_id: schedule.id,
        next_service_date: date(2027, 6, 15),
        last_service_date: date(2026, 12, 15),
        interval_months: 6,
        service_type: "Scheduled".into(),
    };

    h.scheduler
        .update_service(
            update.clone(),
            Some(ServiceAttachment {
                file_name: "jobcard.pdf".into(),
                content_type: "application/pdf".into(),
                attachment_type: "JobCard".into(),
                data: Bytes::from_static(b"%PDF-1.4"),
            }),
        )
        .await
        .unwrap();

    let documents = h.scheduler.list_documents(schedule.id).await.unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].file_name, "jobcard.pdf");

    // A second update with a file appends; it never replaces
    h.scheduler
        .update_service(
            update,
            Some(ServiceAttachment {
                file_name: "certificate.pdf".into(),
                content_type: "application/pdf".into(),
                attachment_type: "Certificate".into(),
                data: Bytes::from_static(b"%PDF-1.4"),
            }),
        )
        .await
        .unwrap();

    let documents = h.scheduler.list_documents(schedule.id).await.unwrap();
    assert_eq!(documents.len(), 2);

    let updated = h
        .scheduler
        .get_service(schedule.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.next_service_date, date(2027, 6, 15));
    assert_eq!(updated.last_service_date, date(2026, 12, 15));
}

#[tokio::test]
async fn update_of_unknown_service_is_not_found() {
    let h = harness().await;
    let _ = &h.db;

    let err = h
        .scheduler
        .update_service(
            UpdateService {
                service_id: Uuid::new_v4(),
                next_service_date: date(2027, 6, 15),
                last_service_date: date(2026, 12, 15),
                interval_months: 6,
                service_type: "Scheduled".into(),
            },
            None,
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));
}

#[tokio::test]
async fn update_without_attachment_leaves_documents_untouched() {
    let h = harness().await;
    let device_id = seed_device(&h, "PRV-plain").await;

    let schedule = h
        .scheduler
        .schedule_service(ScheduleService {
            prv_device_id: device_id,
            next_service_date: date(2026, 12, 15),
            interval_months: 6,
            service_type: None,
        })
        .await
        .unwrap();

    h.scheduler
        .update_service(
            UpdateService {
                service_id: schedule.id,
                next_service_date: date(2027, 1, 15),
                last_service_date: date(2026, 7, 15),
                interval_months: 6,
                service_type: "Scheduled".into(),
            },
            None,
        )
        .await
        .unwrap();

    assert!(h
        .scheduler
        .list_documents(schedule.id)
        .await
        .unwrap()
        .is_empty());
}
