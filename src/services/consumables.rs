use crate::{
    db::DbPool,
    entities::consumable,
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct AddConsumable {
    pub supplier: String,
    pub consumable_type: String,
    pub description: String,
    pub user: String,
    pub location: String,
    pub quantity: i32,
}

/// Consumable stock keeping. Allocation between locations lives in
/// [`super::allocation`]; this service covers intake and listing.
#[derive(Clone)]
pub struct ConsumableService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl ConsumableService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Adds stock: merges into an existing row matching
    /// (supplier, type, description, location) or inserts a new one.
    #[instrument(skip(self))]
    pub async fn add(&self, command: AddConsumable) -> Result<consumable::Model, ServiceError> {
        if command.quantity <= 0 {
            return Err(ServiceError::InvalidInput(
                "quantity must be a positive integer".to_string(),
            ));
        }

        let db = self.db_pool.as_ref();

        let existing = consumable::Entity::find()
            .filter(consumable::Column::Supplier.eq(command.supplier.clone()))
            .filter(consumable::Column::ConsumableType.eq(command.consumable_type.clone()))
            .filter(consumable::Column::Description.eq(command.description.clone()))
            .filter(consumable::Column::Location.eq(command.location.clone()))
            .one(db)
            .await?;

        let model = match existing {
            Some(row) => {
                let merged_quantity = row.quantity + command.quantity;
                let mut active: consumable::ActiveModel = row.into();
                active.quantity = Set(merged_quantity);
                active.user = Set(command.user.clone());
                active.updated_at = Set(Utc::now());
                active.update(db).await?
            }
            None => {
                consumable::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    supplier: Set(command.supplier.clone()),
                    consumable_type: Set(command.consumable_type.clone()),
                    description: Set(command.description.clone()),
                    user: Set(command.user.clone()),
                    location: Set(command.location.clone()),
                    quantity: Set(command.quantity),
                    updated_at: Set(Utc::now()),
                }
                .insert(db)
                .await?
            }
        };

        let _ = self
            .event_sender
            .send(Event::ConsumableAdded {
                consumable_id: model.id,
                location: model.location.clone(),
                quantity: command.quantity,
            })
            .await;

        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        location: Option<String>,
    ) -> Result<Vec<consumable::Model>, ServiceError> {
        let mut query = consumable::Entity::find()
            .order_by_asc(consumable::Column::Location)
            .order_by_asc(consumable::Column::ConsumableType);
        if let Some(location) = location {
            query = query.filter(consumable::Column::Location.eq(location));
        }
        let rows = query.all(self.db_pool.as_ref()).await?;
        Ok(rows)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<Option<consumable::Model>, ServiceError> {
        let row = consumable::Entity::find_by_id(id)
            .one(self.db_pool.as_ref())
            .await?;
        Ok(row)
    }
}
