mod common;

use assert_matches::assert_matches;
use chrono::{TimeZone, Utc};
use reovalve_api::entities::delivery_note;
use reovalve_api::errors::ServiceError;
use reovalve_api::services::delivery_notes::{
    CreateDeliveryNote, DeliveryNoteService, DISPATCHED_STATUS,
};
use reovalve_api::services::serial_stock::{CreateSerialUnit, SerialStockService};
use sea_orm::EntityTrait;
use uuid::Uuid;

fn unit(serial: &str) -> CreateSerialUnit {
    CreateSerialUnit {
        supplier: "Hydrotech".into(),
        serial_number: serial.into(),
        description: "Data logger".into(),
        make: "Technolog".into(),
        model: "Cello 4S".into(),
        status: "In Stock".into(),
        note: None,
        size: None,
        location: "JHB Office".into(),
    }
}

#[tokio::test]
async fn note_numbers_are_sequential_and_formatted() {
    let db = common::setup_db().await;
    let events = common::drained_event_sender();
    let serial_stock = SerialStockService::new(db.clone(), events.clone());
    let notes = DeliveryNoteService::new(db.clone(), events);

    let a = serial_stock.create(unit("SN-1001")).await.unwrap();
    let b = serial_stock.create(unit("SN-1002")).await.unwrap();

    let note_date = Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap();

    let first = notes
        .create(CreateDeliveryNote {
            note_date,
            destination: "Mogale City".into(),
            comments: Some("Two loggers for zone metering".into()),
            serial_stock_ids: vec![a.id],
        })
        .await
        .unwrap();
    let second = notes
        .create(CreateDeliveryNote {
            note_date,
            destination: "Mogale City".into(),
            comments: None,
            serial_stock_ids: vec![b.id],
        })
        .await
        .unwrap();

    assert_eq!(first.note.del_note_number, "REODN-2026-00001");
    assert_eq!(second.note.del_note_number, "REODN-2026-00002");
    assert_eq!(first.note.sequence + 1, second.note.sequence);
}

#[tokio::test]
async fn created_note_dispatches_its_units() {
    let db = common::setup_db().await;
    let events = common::drained_event_sender();
    let serial_stock = SerialStockService::new(db.clone(), events.clone());
    let notes = DeliveryNoteService::new(db.clone(), events);

    let a = serial_stock.create(unit("SN-2001")).await.unwrap();
    let b = serial_stock.create(unit("SN-2002")).await.unwrap();

    let created = notes
        .create(CreateDeliveryNote {
            note_date: Utc::now(),
            destination: "Rand Water Depot".into(),
            comments: None,
            serial_stock_ids: vec![a.id, b.id],
        })
        .await
        .unwrap();

    assert_eq!(created.item_outcomes.len(), 2);
    assert!(created.item_outcomes.iter().all(|o| o.dispatched));

    for id in [a.id, b.id] {
        let moved = serial_stock.get(id).await.unwrap().unwrap();
        assert_eq!(moved.location, "Rand Water Depot");
        assert_eq!(moved.status, DISPATCHED_STATUS);
    }

    let (note, items) = notes.get(created.note.id).await.unwrap().unwrap();
    assert_eq!(note.id, created.note.id);
    assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn unknown_unit_fails_creation_entirely() {
    let db = common::setup_db().await;
    let events = common::drained_event_sender();
    let serial_stock = SerialStockService::new(db.clone(), events.clone());
    let notes = DeliveryNoteService::new(db.clone(), events);

    let known = serial_stock.create(unit("SN-3001")).await.unwrap();

    let err = notes
        .create(CreateDeliveryNote {
            note_date: Utc::now(),
            destination: "Depot".into(),
            comments: None,
            serial_stock_ids: vec![known.id, Uuid::new_v4()],
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidInput(_));

    // Nothing committed: no note row, known unit untouched
    assert!(delivery_note::Entity::find()
        .all(db.as_ref())
        .await
        .unwrap()
        .is_empty());
    let untouched = serial_stock.get(known.id).await.unwrap().unwrap();
    assert_eq!(untouched.location, "JHB Office");
}

#[tokio::test]
async fn empty_item_list_rejected() {
    let db = common::setup_db().await;
    let events = common::drained_event_sender();
    let notes = DeliveryNoteService::new(db, events);

    let err = notes
        .create(CreateDeliveryNote {
            note_date: Utc::now(),
            destination: "Depot".into(),
            comments: None,
            serial_stock_ids: vec![],
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidInput(_));
}
