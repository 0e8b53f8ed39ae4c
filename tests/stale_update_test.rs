//! Updates racing against deletion. A row removed between the service's
//! fetch and its write must come back as NotFound (or ConcurrencyConflict
//! when the row survives), never as a generic database error.

mod common;

use assert_matches::assert_matches;
use reovalve_api::entities::site;
use reovalve_api::errors::ServiceError;
use reovalve_api::services::assets::{AssetService, CreateSimCard};
use reovalve_api::services::registry::{CreateSite, RegistryService, UpdateSite};
use sea_orm::{ActiveModelTrait, DbErr, EntityTrait, Set};

fn rename_only(name: &str) -> UpdateSite {
    UpdateSite {
        name: Some(name.to_string()),
        client_id: None,
        region_id: None,
        address: None,
        latitude: None,
        longitude: None,
    }
}

#[tokio::test]
async fn updating_a_deleted_site_is_not_found() {
    let db = common::setup_db().await;
    let registry = RegistryService::new(db.clone());

    let created = registry
        .create_site(CreateSite {
            name: "Pump Station 12".to_string(),
            client_id: None,
            region_id: None,
            address: None,
            latitude: None,
            longitude: None,
        })
        .await
        .unwrap();

    site::Entity::delete_by_id(created.id)
        .exec(db.as_ref())
        .await
        .unwrap();

    let err = registry
        .update_site(created.id, rename_only("Renamed"))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));
}

/// The raw race the services remap: a model fetched before the row is
/// deleted writes against zero rows, which SeaORM reports as
/// `RecordNotUpdated` rather than a query error.
#[tokio::test]
async fn write_to_a_vanished_row_surfaces_record_not_updated() {
    let db = common::setup_db().await;
    let registry = RegistryService::new(db.clone());

    let created = registry
        .create_site(CreateSite {
            name: "Reservoir Outlet".to_string(),
            client_id: None,
            region_id: None,
            address: None,
            latitude: None,
            longitude: None,
        })
        .await
        .unwrap();

    let fetched = site::Entity::find_by_id(created.id)
        .one(db.as_ref())
        .await
        .unwrap()
        .unwrap();

    site::Entity::delete_by_id(created.id)
        .exec(db.as_ref())
        .await
        .unwrap();

    let mut active: site::ActiveModel = fetched.into();
    active.name = Set("Renamed".to_string());
    let err = active.update(db.as_ref()).await.unwrap_err();
    assert_matches!(err, DbErr::RecordNotUpdated);
}

#[tokio::test]
async fn assigning_a_deleted_sim_card_is_not_found() {
    let db = common::setup_db().await;
    let assets = AssetService::new(db.clone());

    let card = assets
        .create_sim_card(CreateSimCard {
            number: "27820000001".to_string(),
            network: "Vodacom".to_string(),
            status: "Active".to_string(),
            assigned_to: None,
            location: None,
        })
        .await
        .unwrap();

    assets.delete_sim_card(card.id).await.unwrap();

    let err = assets
        .assign_sim_card(card.id, Some("J. Naidoo".to_string()), "Active".to_string())
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));
}
