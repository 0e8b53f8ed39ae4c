mod common;

use reovalve_api::services::lookup::LookupService;
use reovalve_api::services::prv_devices::{CreatePrvDevice, PrvAttributes, PrvDeviceService};
use reovalve_api::services::registry::{CreateClient, CreateSite, RegistryService};

#[tokio::test]
async fn full_chain_resolves_all_names() {
    let db = common::setup_db().await;
    let events = common::drained_event_sender();
    let registry = RegistryService::new(db.clone());
    let devices = PrvDeviceService::new(db.clone(), events, LookupService::new(db.clone()));

    let unit = registry
        .create_business_unit("Water Services".into())
        .await
        .unwrap();
    let region = registry.create_region("Gauteng".into()).await.unwrap();
    let client = registry
        .create_client(CreateClient {
            name: "Mogale City LM".into(),
            business_unit_id: unit.id,
            contact_person: None,
            contact_number: None,
        })
        .await
        .unwrap();
    let site = registry
        .create_site(CreateSite {
            name: "Krugersdorp Reservoir".into(),
            client_id: Some(client.id),
            region_id: Some(region.id),
            address: None,
            latitude: None,
            longitude: None,
        })
        .await
        .unwrap();

    let device = devices
        .create(CreatePrvDevice {
            site_id: site.id,
            prv_name: "PRV-KR-01".into(),
            attributes: PrvAttributes::default(),
        })
        .await
        .unwrap();

    let resolved = devices.get(device.id).await.unwrap().unwrap();
    assert_eq!(resolved.location.site_name.as_deref(), Some("Krugersdorp Reservoir"));
    assert_eq!(resolved.location.client_name.as_deref(), Some("Mogale City LM"));
    assert_eq!(
        resolved.location.business_unit_name.as_deref(),
        Some("Water Services")
    );
    assert_eq!(resolved.location.region_name.as_deref(), Some("Gauteng"));
}

#[tokio::test]
async fn missing_links_resolve_to_none_without_failing() {
    let db = common::setup_db().await;
    let events = common::drained_event_sender();
    let registry = RegistryService::new(db.clone());
    let devices = PrvDeviceService::new(db.clone(), events, LookupService::new(db.clone()));

    // Site with no client and no region: only the site name resolves
    let site = registry
        .create_site(CreateSite {
            name: "Orphan Pump Station".into(),
            client_id: None,
            region_id: None,
            address: None,
            latitude: None,
            longitude: None,
        })
        .await
        .unwrap();

    let device = devices
        .create(CreatePrvDevice {
            site_id: site.id,
            prv_name: "PRV-ORPHAN".into(),
            attributes: PrvAttributes::default(),
        })
        .await
        .unwrap();

    let resolved = devices.get(device.id).await.unwrap().unwrap();
    assert_eq!(
        resolved.location.site_name.as_deref(),
        Some("Orphan Pump Station")
    );
    assert_eq!(resolved.location.client_name, None);
    assert_eq!(resolved.location.business_unit_name, None);
    assert_eq!(resolved.location.region_name, None);
}

#[tokio::test]
async fn region_comes_from_the_site_not_the_client() {
    let db = common::setup_db().await;
    let events = common::drained_event_sender();
    let registry = RegistryService::new(db.clone());
    let devices = PrvDeviceService::new(db.clone(), events, LookupService::new(db.clone()));

    let unit = registry
        .create_business_unit("Metering".into())
        .await
        .unwrap();
    let client = registry
        .create_client(CreateClient {
            name: "Rand Water".into(),
            business_unit_id: unit.id,
            contact_person: None,
            contact_number: None,
        })
        .await
        .unwrap();

    // Client assigned but the site has no region of its own
    let site = registry
        .create_site(CreateSite {
            name: "Zuikerbosch".into(),
            client_id: Some(client.id),
            region_id: None,
            address: None,
            latitude: None,
            longitude: None,
        })
        .await
        .unwrap();

    let device = devices
        .create(CreatePrvDevice {
            site_id: site.id,
            prv_name: "PRV-ZB-01".into(),
            attributes: PrvAttributes::default(),
        })
        .await
        .unwrap();

    let resolved = devices.get(device.id).await.unwrap().unwrap();
    assert_eq!(resolved.location.client_name.as_deref(), Some("Rand Water"));
    assert_eq!(resolved.location.business_unit_name.as_deref(), Some("Metering"));
    assert_eq!(resolved.location.region_name, None);
}

#[tokio::test]
async fn batch_listing_decorates_every_device() {
    let db = common::setup_db().await;
    let events = common::drained_event_sender();
    let registry = RegistryService::new(db.clone());
    let devices = PrvDeviceService::new(db.clone(), events, LookupService::new(db.clone()));

    let site = registry
        .create_site(CreateSite {
            name: "Shared Site".into(),
            client_id: None,
            region_id: None,
            address: None,
            latitude: None,
            longitude: None,
        })
        .await
        .unwrap();

    for name in ["PRV-1", "PRV-2", "PRV-3"] {
        devices
            .create(CreatePrvDevice {
                site_id: site.id,
                prv_name: name.into(),
                attributes: PrvAttributes::default(),
            })
            .await
            .unwrap();
    }

    let listed = devices.list(Some(site.id)).await.unwrap();
    assert_eq!(listed.len(), 3);
    assert!(listed
        .iter()
        .all(|d| d.location.site_name.as_deref() == Some("Shared Site")));
}
