//! Read-side hierarchy resolution.
//!
//! Flattens Device -> Site -> {Client -> BusinessUnit, Region} into the
//! denormalized display fields every device list/detail view carries. A
//! broken link anywhere on the chain yields `None` names; it never fails
//! the request. The region always comes from the site, not the client.

use crate::{
    db::DbPool,
    entities::{business_unit, client, prv_device, region, site},
    errors::ServiceError,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

/// Denormalized location names for one device.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct DeviceLocation {
    pub site_id: Option<Uuid>,
    pub site_name: Option<String>,
    pub client_name: Option<String>,
    pub business_unit_name: Option<String>,
    pub region_name: Option<String>,
}

#[derive(Clone)]
pub struct LookupService {
    db_pool: Arc<DbPool>,
}

impl LookupService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Resolves the location chain for a single device.
    #[instrument(skip(self))]
    pub async fn resolve_device(
        &self,
        device: &prv_device::Model,
    ) -> Result<DeviceLocation, ServiceError> {
        let mut resolved = self.resolve_devices(std::slice::from_ref(device)).await?;
        Ok(resolved.remove(&device.id).unwrap_or_default())
    }

    /// Batch resolution for list views: four queries regardless of device
    /// count.
    #[instrument(skip(self, devices), fields(devices = devices.len()))]
    pub async fn resolve_devices(
        &self,
        devices: &[prv_device::Model],
    ) -> Result<HashMap<Uuid, DeviceLocation>, ServiceError> {
        let db = self.db_pool.as_ref();

        let site_ids: Vec<Uuid> = devices.iter().map(|d| d.site_id).collect();
        let sites: HashMap<Uuid, site::Model> = if site_ids.is_empty() {
            HashMap::new()
        } else {
            site::Entity::find()
                .filter(site::Column::Id.is_in(site_ids))
                .all(db)
                .await?
                .into_iter()
                .map(|s| (s.id, s))
                .collect()
        };

        let client_ids: Vec<Uuid> = sites.values().filter_map(|s| s.client_id).collect();
        let clients: HashMap<Uuid, client::Model> = if client_ids.is_empty() {
            HashMap::new()
        } else {
            client::Entity::find()
                .filter(client::Column::Id.is_in(client_ids))
                .all(db)
                .await?
                .into_iter()
                .map(|c| (c.id, c))
                .collect()
        };

        let unit_ids: Vec<Uuid> = clients.values().map(|c| c.business_unit_id).collect();
        let units: HashMap<Uuid, business_unit::Model> = if unit_ids.is_empty() {
            HashMap::new()
        } else {
            business_unit::Entity::find()
                .filter(business_unit::Column::Id.is_in(unit_ids))
                .all(db)
                .await?
                .into_iter()
                .map(|u| (u.id, u))
                .collect()
        };

        let region_ids: Vec<Uuid> = sites.values().filter_map(|s| s.region_id).collect();
        let regions: HashMap<Uuid, region::Model> = if region_ids.is_empty() {
            HashMap::new()
        } else {
            region::Entity::find()
                .filter(region::Column::Id.is_in(region_ids))
                .all(db)
                .await?
                .into_iter()
                .map(|r| (r.id, r))
                .collect()
        };

        let mut result = HashMap::with_capacity(devices.len());
        for device in devices {
            let site = sites.get(&device.site_id);
            let client = site
                .and_then(|s| s.client_id)
                .and_then(|id| clients.get(&id));
            let unit = client.and_then(|c| units.get(&c.business_unit_id));
            let region = site
                .and_then(|s| s.region_id)
                .and_then(|id| regions.get(&id));

            result.insert(
                device.id,
                DeviceLocation {
                    site_id: site.map(|s| s.id),
                    site_name: site.map(|s| s.name.clone()),
                    client_name: client.map(|c| c.name.clone()),
                    business_unit_name: unit.map(|u| u.name.clone()),
                    region_name: region.map(|r| r.name.clone()),
                },
            );
        }
        Ok(result)
    }
}
