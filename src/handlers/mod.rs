pub mod assets;
pub mod consumables;
pub mod delivery_notes;
pub mod prv_devices;
pub mod prv_services;
pub mod registry;
pub mod serial_stock;

use crate::db::DbPool;
use crate::events::EventSender;
use crate::services::{
    allocation::AllocationService, assets::AssetService, consumables::ConsumableService,
    delivery_notes::DeliveryNoteService, lookup::LookupService, prv_devices::PrvDeviceService,
    prv_scheduler::PrvSchedulerService, registry::RegistryService,
    serial_stock::SerialStockService,
};
use crate::storage::BlobStore;
use std::sync::Arc;

/// Services layer behind the HTTP handlers.
#[derive(Clone)]
pub struct AppServices {
    pub allocation: Arc<AllocationService>,
    pub assets: Arc<AssetService>,
    pub consumables: Arc<ConsumableService>,
    pub delivery_notes: Arc<DeliveryNoteService>,
    pub prv_devices: Arc<PrvDeviceService>,
    pub prv_scheduler: Arc<PrvSchedulerService>,
    pub registry: Arc<RegistryService>,
    pub serial_stock: Arc<SerialStockService>,
}

impl AppServices {
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: EventSender,
        blob_store: Arc<dyn BlobStore>,
    ) -> Self {
        let lookup = LookupService::new(db_pool.clone());

        Self {
            allocation: Arc::new(AllocationService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            assets: Arc::new(AssetService::new(db_pool.clone())),
            consumables: Arc::new(ConsumableService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            delivery_notes: Arc::new(DeliveryNoteService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            prv_devices: Arc::new(PrvDeviceService::new(
                db_pool.clone(),
                event_sender.clone(),
                lookup,
            )),
            prv_scheduler: Arc::new(PrvSchedulerService::new(
                db_pool.clone(),
                event_sender.clone(),
                blob_store,
            )),
            registry: Arc::new(RegistryService::new(db_pool.clone())),
            serial_stock: Arc::new(SerialStockService::new(db_pool, event_sender)),
        }
    }
}
