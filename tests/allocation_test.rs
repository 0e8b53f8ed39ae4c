mod common;

use assert_matches::assert_matches;
use reovalve_api::entities::consumable;
use reovalve_api::errors::ServiceError;
use reovalve_api::services::allocation::{
    AllocateConsumable, AllocationService, SITE_SENTINEL,
};
use reovalve_api::services::consumables::{AddConsumable, ConsumableService};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

fn add_cmd(location: &str, quantity: i32) -> AddConsumable {
    AddConsumable {
        supplier: "Hydrotech".into(),
        consumable_type: "Gasket".into(),
        description: "80mm EPDM".into(),
        user: "stores".into(),
        location: location.into(),
        quantity,
    }
}

fn allocate_cmd(source: &str, destination: &str, quantity: i32) -> AllocateConsumable {
    AllocateConsumable {
        consumable_type: "Gasket".into(),
        description: "80mm EPDM".into(),
        source_location: source.into(),
        destination_location: destination.into(),
        quantity,
        user: "jvr".into(),
    }
}

async fn total_quantity(db: &reovalve_api::db::DbPool) -> i64 {
    consumable::Entity::find()
        .all(db)
        .await
        .unwrap()
        .iter()
        .map(|row| row.quantity as i64)
        .sum()
}

#[tokio::test]
async fn allocation_moves_quantity_and_conserves_total() {
    let db = common::setup_db().await;
    let events = common::drained_event_sender();
    let consumables = ConsumableService::new(db.clone(), events.clone());
    let allocation = AllocationService::new(db.clone(), events);

    consumables.add(add_cmd("JHB Office", 10)).await.unwrap();

    let outcome = allocation
        .allocate_consumable(allocate_cmd("JHB Office", "CPT Office", 4))
        .await
        .unwrap();

    assert_eq!(outcome.source_remaining, 6);
    assert_eq!(outcome.destination_quantity, Some(4));
    assert!(outcome.destination_created);
    assert_eq!(total_quantity(&db).await, 10);
}

#[tokio::test]
async fn repeat_allocation_merges_into_destination_row() {
    let db = common::setup_db().await;
    let events = common::drained_event_sender();
    let consumables = ConsumableService::new(db.clone(), events.clone());
    let allocation = AllocationService::new(db.clone(), events);

    consumables.add(add_cmd("JHB Office", 10)).await.unwrap();

    let first = allocation
        .allocate_consumable(allocate_cmd("JHB Office", "CPT Office", 4))
        .await
        .unwrap();
    let second = allocation
        .allocate_consumable(allocate_cmd("JHB Office", "CPT Office", 2))
        .await
        .unwrap();

    assert!(first.destination_created);
    assert!(!second.destination_created);
    assert_eq!(second.destination_id, first.destination_id);
    assert_eq!(second.destination_quantity, Some(6));

    let cpt_rows = consumable::Entity::find()
        .filter(consumable::Column::Location.eq("CPT Office"))
        .all(db.as_ref())
        .await
        .unwrap();
    assert_eq!(cpt_rows.len(), 1);
    assert_eq!(cpt_rows[0].quantity, 6);
}

#[tokio::test]
async fn site_destination_consumes_stock_without_a_row() {
    let db = common::setup_db().await;
    let events = common::drained_event_sender();
    let consumables = ConsumableService::new(db.clone(), events.clone());
    let allocation = AllocationService::new(db.clone(), events);

    consumables.add(add_cmd("JHB Office", 10)).await.unwrap();

    let outcome = allocation
        .allocate_consumable(allocate_cmd("JHB Office", SITE_SENTINEL, 3))
        .await
        .unwrap();

    assert_eq!(outcome.source_remaining, 7);
    assert_eq!(outcome.destination_id, None);
    assert_eq!(outcome.destination_quantity, None);

    let site_rows = consumable::Entity::find()
        .filter(consumable::Column::Location.eq(SITE_SENTINEL))
        .all(db.as_ref())
        .await
        .unwrap();
    assert!(site_rows.is_empty());
    assert_eq!(total_quantity(&db).await, 7);
}

#[tokio::test]
async fn insufficient_stock_rolls_back_everything() {
    let db = common::setup_db().await;
    let events = common::drained_event_sender();
    let consumables = ConsumableService::new(db.clone(), events.clone());
    let allocation = AllocationService::new(db.clone(), events);

    consumables.add(add_cmd("JHB Office", 2)).await.unwrap();

    let err = allocation
        .allocate_consumable(allocate_cmd("JHB Office", "CPT Office", 4))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InsufficientStock(_));
    let message = err.to_string();
    assert!(message.contains("2 available"), "got: {message}");
    assert!(message.contains("4 requested"), "got: {message}");

    let jhb = consumable::Entity::find()
        .filter(consumable::Column::Location.eq("JHB Office"))
        .one(db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(jhb.quantity, 2);
    assert_eq!(total_quantity(&db).await, 2);
}

#[tokio::test]
async fn unknown_source_is_invalid_input() {
    let db = common::setup_db().await;
    let events = common::drained_event_sender();
    let allocation = AllocationService::new(db, events);

    let err = allocation
        .allocate_consumable(allocate_cmd("Nowhere", "CPT Office", 1))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidInput(_));
}

#[tokio::test]
async fn zero_and_negative_quantities_rejected() {
    let db = common::setup_db().await;
    let events = common::drained_event_sender();
    let allocation = AllocationService::new(db, events);

    for quantity in [0, -3] {
        let err = allocation
            .allocate_consumable(allocate_cmd("JHB Office", "CPT Office", quantity))
            .await
            .unwrap_err();
        assert_matches!(err, ServiceError::InvalidInput(_));
    }
}

#[tokio::test]
async fn same_source_and_destination_rejected() {
    let db = common::setup_db().await;
    let events = common::drained_event_sender();
    let allocation = AllocationService::new(db, events);

    let err = allocation
        .allocate_consumable(allocate_cmd("JHB Office", "JHB Office", 1))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidInput(_));
}
