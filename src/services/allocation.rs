//! Consumable allocation: moving quantity between locations while keeping
//! the total conserved.

use crate::{
    db::DbPool,
    entities::consumable,
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
    TransactionError, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Destination sentinel meaning the material was consumed/installed in the
/// field: the source is decremented and no destination row exists anywhere.
pub const SITE_SENTINEL: &str = "SITE";

#[derive(Debug, Clone)]
pub struct AllocateConsumable {
    pub consumable_type: String,
    pub description: String,
    pub source_location: String,
    pub destination_location: String,
    pub quantity: i32,
    pub user: String,
}

/// What an allocation did, reported back to the handler.
#[derive(Debug, Clone)]
pub struct AllocationOutcome {
    pub source_id: Uuid,
    pub source_remaining: i32,
    /// None when the destination was the SITE sink
    pub destination_id: Option<Uuid>,
    pub destination_quantity: Option<i32>,
    pub destination_created: bool,
}

#[derive(Clone)]
pub struct AllocationService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl AllocationService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Transfers quantity of a consumable between locations.
    ///
    /// Source decrement and destination merge/insert commit in one
    /// transaction, so a failure on either side leaves both rows untouched.
    /// The source row keeps its supplier; a destination row created here
    /// inherits it.
    #[instrument(skip(self))]
    pub async fn allocate_consumable(
        &self,
        command: AllocateConsumable,
    ) -> Result<AllocationOutcome, ServiceError> {
        if command.quantity <= 0 {
            return Err(ServiceError::InvalidInput(
                "allocation quantity must be a positive integer".to_string(),
            ));
        }
        if command.source_location == command.destination_location {
            return Err(ServiceError::InvalidInput(
                "source and destination locations must differ".to_string(),
            ));
        }

        let db = self.db_pool.as_ref();
        let cmd = command.clone();

        let outcome = db
            .transaction::<_, AllocationOutcome, ServiceError>(move |txn| {
                Box::pin(async move { apply_allocation(txn, &cmd).await })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(e) => ServiceError::DatabaseError(e),
                TransactionError::Transaction(e) => e,
            })?;

        info!(
            source_id = %outcome.source_id,
            remaining = outcome.source_remaining,
            destination = %command.destination_location,
            quantity = command.quantity,
            "consumable allocation committed"
        );

        let _ = self
            .event_sender
            .send(Event::ConsumableAllocated {
                source_id: outcome.source_id,
                destination_id: outcome.destination_id,
                destination_location: command.destination_location,
                quantity: command.quantity,
                user: command.user,
            })
            .await;

        Ok(outcome)
    }
}

async fn apply_allocation<C: ConnectionTrait>(
    txn: &C,
    cmd: &AllocateConsumable,
) -> Result<AllocationOutcome, ServiceError> {
    let source = consumable::Entity::find()
        .filter(consumable::Column::ConsumableType.eq(cmd.consumable_type.clone()))
        .filter(consumable::Column::Description.eq(cmd.description.clone()))
        .filter(consumable::Column::Location.eq(cmd.source_location.clone()))
        .one(txn)
        .await?
        .ok_or_else(|| {
            ServiceError::InvalidInput(format!(
                "No {} ({}) stock held at {}",
                cmd.consumable_type, cmd.description, cmd.source_location
            ))
        })?;

    if source.quantity < cmd.quantity {
        return Err(ServiceError::InsufficientStock(format!(
            "{} available at {}, {} requested",
            source.quantity, cmd.source_location, cmd.quantity
        )));
    }

    let source_id = source.id;
    let source_remaining = source.quantity - cmd.quantity;
    let supplier = source.supplier.clone();

    let mut source_active: consumable::ActiveModel = source.into();
    source_active.quantity = Set(source_remaining);
    source_active.user = Set(cmd.user.clone());
    source_active.updated_at = Set(Utc::now());
    source_active.update(txn).await?;

    // "SITE" is a one-way sink: the material is installed, not relocated
    if cmd.destination_location == SITE_SENTINEL {
        return Ok(AllocationOutcome {
            source_id,
            source_remaining,
            destination_id: None,
            destination_quantity: None,
            destination_created: false,
        });
    }

    let existing_destination = consumable::Entity::find()
        .filter(consumable::Column::ConsumableType.eq(cmd.consumable_type.clone()))
        .filter(consumable::Column::Description.eq(cmd.description.clone()))
        .filter(consumable::Column::Location.eq(cmd.destination_location.clone()))
        .one(txn)
        .await?;

    match existing_destination {
        Some(destination) => {
            let destination_id = destination.id;
            let destination_quantity = destination.quantity + cmd.quantity;
            let mut active: consumable::ActiveModel = destination.into();
            active.quantity = Set(destination_quantity);
            active.user = Set(cmd.user.clone());
            active.updated_at = Set(Utc::now());
            active.update(txn).await?;

            Ok(AllocationOutcome {
                source_id,
                source_remaining,
                destination_id: Some(destination_id),
                destination_quantity: Some(destination_quantity),
                destination_created: false,
            })
        }
        None => {
            let destination_id = Uuid::new_v4();
            consumable::ActiveModel {
                id: Set(destination_id),
                supplier: Set(supplier),
                consumable_type: Set(cmd.consumable_type.clone()),
                description: Set(cmd.description.clone()),
                user: Set(cmd.user.clone()),
                location: Set(cmd.destination_location.clone()),
                quantity: Set(cmd.quantity),
                updated_at: Set(Utc::now()),
            }
            .insert(txn)
            .await?;

            Ok(AllocationOutcome {
                source_id,
                source_remaining,
                destination_id: Some(destination_id),
                destination_quantity: Some(cmd.quantity),
                destination_created: true,
            })
        }
    }
}
