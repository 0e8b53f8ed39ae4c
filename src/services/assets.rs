//! Tracked assets outside the stock ledgers: SIM cards and mobile
//! devices. Both carry a globally unique identifier (number / IMEI) and a
//! free-form assignment.

use crate::{
    db::DbPool,
    entities::{mobile_device, sim_card},
    errors::ServiceError,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateSimCard {
    pub number: String,
    pub network: String,
    pub status: String,
    pub assigned_to: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateMobileDevice {
    pub make: String,
    pub model: String,
    pub imei: String,
    pub status: String,
    pub assigned_to: Option<String>,
}

#[derive(Clone)]
pub struct AssetService {
    db_pool: Arc<DbPool>,
}

impl AssetService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    // --- SIM cards ---

    #[instrument(skip(self))]
    pub async fn create_sim_card(
        &self,
        command: CreateSimCard,
    ) -> Result<sim_card::Model, ServiceError> {
        if command.number.trim().is_empty() {
            return Err(ServiceError::InvalidInput(
                "sim card number is required".to_string(),
            ));
        }
        let db = self.db_pool.as_ref();

        let duplicate = sim_card::Entity::find()
            .filter(sim_card::Column::Number.eq(command.number.clone()))
            .one(db)
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "sim card {} already registered",
                command.number
            )));
        }

        let card = sim_card::ActiveModel {
            id: Set(Uuid::new_v4()),
            number: Set(command.number),
            network: Set(command.network),
            status: Set(command.status),
            assigned_to: Set(command.assigned_to),
            location: Set(command.location),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await?;
        Ok(card)
    }

    #[instrument(skip(self))]
    pub async fn list_sim_cards(&self) -> Result<Vec<sim_card::Model>, ServiceError> {
        let cards = sim_card::Entity::find()
            .order_by_asc(sim_card::Column::Number)
            .all(self.db_pool.as_ref())
            .await?;
        Ok(cards)
    }

    #[instrument(skip(self))]
    pub async fn assign_sim_card(
        &self,
        id: Uuid,
        assigned_to: Option<String>,
        status: String,
    ) -> Result<sim_card::Model, ServiceError> {
        let db = self.db_pool.as_ref();
        let card = sim_card::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("sim card {} not found", id)))?;

        let mut active: sim_card::ActiveModel = card.into();
        active.assigned_to = Set(assigned_to);
        active.status = Set(status);
        let updated = match active.update(db).await {
            Ok(updated) => updated,
            Err(DbErr::RecordNotUpdated) => {
                let still_exists = sim_card::Entity::find_by_id(id).one(db).await?.is_some();
                return Err(super::stale_update_error(still_exists, "sim card", id));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_sim_card(&self, id: Uuid) -> Result<(), ServiceError> {
        let db = self.db_pool.as_ref();
        let card = sim_card::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("sim card {} not found", id)))?;
        card.delete(db).await?;
        Ok(())
    }

    // --- mobile devices ---

    #[instrument(skip(self))]
    pub async fn create_mobile_device(
        &self,
        command: CreateMobileDevice,
    ) -> Result<mobile_device::Model, ServiceError> {
        if command.imei.trim().is_empty() {
            return Err(ServiceError::InvalidInput("imei is required".to_string()));
        }
        let db = self.db_pool.as_ref();

        let duplicate = mobile_device::Entity::find()
            .filter(mobile_device::Column::Imei.eq(command.imei.clone()))
            .one(db)
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "mobile device with imei {} already registered",
                command.imei
            )));
        }

        let device = mobile_device::ActiveModel {
            id: Set(Uuid::new_v4()),
            make: Set(command.make),
            model: Set(command.model),
            imei: Set(command.imei),
            status: Set(command.status),
            assigned_to: Set(command.assigned_to),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await?;
        Ok(device)
    }

    #[instrument(skip(self))]
    pub async fn list_mobile_devices(&self) -> Result<Vec<mobile_device::Model>, ServiceError> {
        let devices = mobile_device::Entity::find()
            .order_by_asc(mobile_device::Column::Make)
            .all(self.db_pool.as_ref())
            .await?;
        Ok(devices)
    }

    #[instrument(skip(self))]
    pub async fn assign_mobile_device(
        &self,
        id: Uuid,
        assigned_to: Option<String>,
        status: String,
    ) -> Result<mobile_device::Model, ServiceError> {
        let db = self.db_pool.as_ref();
        let device = mobile_device::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("mobile device {} not found", id)))?;

        let mut active: mobile_device::ActiveModel = device.into();
        active.assigned_to = Set(assigned_to);
        active.status = Set(status);
        let updated = match active.update(db).await {
            Ok(updated) => updated,
            Err(DbErr::RecordNotUpdated) => {
                let still_exists = mobile_device::Entity::find_by_id(id).one(db).await?.is_some();
                return Err(super::stale_update_error(still_exists, "mobile device", id));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_mobile_device(&self, id: Uuid) -> Result<(), ServiceError> {
        let db = self.db_pool.as_ref();
        let device = mobile_device::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("mobile device {} not found", id)))?;
        device.delete(db).await?;
        Ok(())
    }
}
