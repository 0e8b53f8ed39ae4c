use crate::{
    db::DbPool,
    entities::serial_stock,
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateSerialUnit {
    pub supplier: String,
    pub serial_number: String,
    pub description: String,
    pub make: String,
    pub model: String,
    pub status: String,
    pub note: Option<String>,
    pub size: Option<String>,
    pub location: String,
}

#[derive(Clone)]
pub struct SerialStockService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl SerialStockService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self))]
    pub async fn create(
        &self,
        command: CreateSerialUnit,
    ) -> Result<serial_stock::Model, ServiceError> {
        let db = self.db_pool.as_ref();

        let duplicate = serial_stock::Entity::find()
            .filter(serial_stock::Column::SerialNumber.eq(command.serial_number.clone()))
            .one(db)
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "serial number {} already registered",
                command.serial_number
            )));
        }

        let now = Utc::now();
        let model = serial_stock::ActiveModel {
            id: Set(Uuid::new_v4()),
            supplier: Set(command.supplier),
            serial_number: Set(command.serial_number),
            description: Set(command.description),
            make: Set(command.make),
            model: Set(command.model),
            status: Set(command.status),
            note: Set(command.note),
            size: Set(command.size),
            location: Set(command.location),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await?;

        Ok(model)
    }

    /// Direct relocation of one unit: a serialized item cannot be split,
    /// so moving it is just a location/status update.
    #[instrument(skip(self))]
    pub async fn relocate(
        &self,
        id: Uuid,
        location: String,
        status: String,
    ) -> Result<serial_stock::Model, ServiceError> {
        let db = self.db_pool.as_ref();

        let unit = serial_stock::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("serial stock unit {} not found", id)))?;

        let mut active: serial_stock::ActiveModel = unit.into();
        active.location = Set(location.clone());
        active.status = Set(status.clone());
        active.updated_at = Set(Utc::now());
        let updated = match active.update(db).await {
            Ok(updated) => updated,
            Err(DbErr::RecordNotUpdated) => {
                let still_exists = serial_stock::Entity::find_by_id(id).one(db).await?.is_some();
                return Err(crate::services::stale_update_error(
                    still_exists,
                    "serial stock unit",
                    id,
                ));
            }
            Err(e) => return Err(e.into()),
        };

        let _ = self
            .event_sender
            .send(Event::SerialUnitRelocated {
                serial_stock_id: id,
                location,
                status,
            })
            .await;

        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn find_by_serial(
        &self,
        serial_number: &str,
    ) -> Result<Option<serial_stock::Model>, ServiceError> {
        let unit = serial_stock::Entity::find()
            .filter(serial_stock::Column::SerialNumber.eq(serial_number))
            .one(self.db_pool.as_ref())
            .await?;
        Ok(unit)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<Option<serial_stock::Model>, ServiceError> {
        let unit = serial_stock::Entity::find_by_id(id)
            .one(self.db_pool.as_ref())
            .await?;
        Ok(unit)
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        location: Option<String>,
    ) -> Result<Vec<serial_stock::Model>, ServiceError> {
        let mut query =
            serial_stock::Entity::find().order_by_asc(serial_stock::Column::SerialNumber);
        if let Some(location) = location {
            query = query.filter(serial_stock::Column::Location.eq(location));
        }
        let units = query.all(self.db_pool.as_ref()).await?;
        Ok(units)
    }
}
