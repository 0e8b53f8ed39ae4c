//! Delivery notes: dispatch records bundling serialized units.
//!
//! Note numbers follow `REODN-{year}-{sequence:05}`. The sequence is
//! max(sequence)+1 computed inside the insert transaction, so concurrent
//! creators serialize on the transaction instead of racing the way a bare
//! read-then-insert would; numbering is still not gap-free after a
//! rollback.

use crate::{
    db::DbPool,
    entities::{delivery_note, delivery_note_item, serial_stock},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, Datelike, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, TransactionError, TransactionTrait,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

pub const DEL_NOTE_PREFIX: &str = "REODN";

/// Status stamped onto each bundled unit when the note is dispatched.
pub const DISPATCHED_STATUS: &str = "Dispatched";

pub fn format_del_note_number(year: i32, sequence: i32) -> String {
    format!("{}-{}-{:05}", DEL_NOTE_PREFIX, year, sequence)
}

#[derive(Debug, Clone)]
pub struct CreateDeliveryNote {
    pub note_date: DateTime<Utc>,
    pub destination: String,
    pub comments: Option<String>,
    pub serial_stock_ids: Vec<Uuid>,
}

/// Per-unit result of the post-creation relocation pass.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemDispatchOutcome {
    pub serial_stock_id: Uuid,
    pub dispatched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreatedDeliveryNote {
    pub note: delivery_note::Model,
    pub item_outcomes: Vec<ItemDispatchOutcome>,
}

#[derive(Clone)]
pub struct DeliveryNoteService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl DeliveryNoteService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Creates the note and its item rows in one transaction, then updates
    /// each bundled unit's location/status individually.
    ///
    /// The per-unit updates are best-effort by design: a failure partway
    /// leaves earlier updates applied and is reported per item, never
    /// rolled back. The note itself always exists once this returns Ok.
    #[instrument(skip(self))]
    pub async fn create(
        &self,
        command: CreateDeliveryNote,
    ) -> Result<CreatedDeliveryNote, ServiceError> {
        if command.serial_stock_ids.is_empty() {
            return Err(ServiceError::InvalidInput(
                "a delivery note requires at least one serialized item".to_string(),
            ));
        }
        if command.destination.trim().is_empty() {
            return Err(ServiceError::InvalidInput(
                "destination is required".to_string(),
            ));
        }

        let db = self.db_pool.as_ref();
        let cmd = command.clone();

        let note = db
            .transaction::<_, delivery_note::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    // Referenced units must exist before the note is cut
                    let known = serial_stock::Entity::find()
                        .filter(serial_stock::Column::Id.is_in(cmd.serial_stock_ids.clone()))
                        .all(txn)
                        .await?;
                    if known.len() != cmd.serial_stock_ids.len() {
                        return Err(ServiceError::InvalidInput(
                            "one or more serial stock ids are unknown".to_string(),
                        ));
                    }

                    let max_sequence: Option<Option<i32>> = delivery_note::Entity::find()
                        .select_only()
                        .column_as(delivery_note::Column::Sequence.max(), "max_sequence")
                        .into_tuple()
                        .one(txn)
                        .await?;
                    let sequence = max_sequence.flatten().unwrap_or(0) + 1;

                    let note = delivery_note::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        sequence: Set(sequence),
                        del_note_number: Set(format_del_note_number(
                            cmd.note_date.year(),
                            sequence,
                        )),
                        note_date: Set(cmd.note_date),
                        destination: Set(cmd.destination.clone()),
                        comments: Set(cmd.comments.clone()),
                        created_at: Set(Utc::now()),
                    }
                    .insert(txn)
                    .await?;

                    for serial_stock_id in &cmd.serial_stock_ids {
                        delivery_note_item::ActiveModel {
                            id: Set(Uuid::new_v4()),
                            delivery_note_id: Set(note.id),
                            serial_stock_id: Set(*serial_stock_id),
                        }
                        .insert(txn)
                        .await?;
                    }

                    Ok(note)
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(e) => ServiceError::DatabaseError(e),
                TransactionError::Transaction(e) => e,
            })?;

        let item_outcomes = self
            .dispatch_items(&command.serial_stock_ids, &command.destination)
            .await;

        let _ = self
            .event_sender
            .send(Event::DeliveryNoteCreated {
                delivery_note_id: note.id,
                del_note_number: note.del_note_number.clone(),
                item_count: command.serial_stock_ids.len(),
            })
            .await;

        Ok(CreatedDeliveryNote {
            note,
            item_outcomes,
        })
    }

    async fn dispatch_items(
        &self,
        serial_stock_ids: &[Uuid],
        destination: &str,
    ) -> Vec<ItemDispatchOutcome> {
        let db = self.db_pool.as_ref();
        let mut outcomes = Vec::with_capacity(serial_stock_ids.len());

        for id in serial_stock_ids {
            let result: Result<(), ServiceError> = async {
                let unit = serial_stock::Entity::find_by_id(*id)
                    .one(db)
                    .await?
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!("serial stock unit {} not found", id))
                    })?;
                let mut active: serial_stock::ActiveModel = unit.into();
                active.location = Set(destination.to_string());
                active.status = Set(DISPATCHED_STATUS.to_string());
                active.updated_at = Set(Utc::now());
                active.update(db).await?;
                Ok(())
            }
            .await;

            match result {
                Ok(()) => outcomes.push(ItemDispatchOutcome {
                    serial_stock_id: *id,
                    dispatched: true,
                    error: None,
                }),
                Err(e) => {
                    warn!(serial_stock_id = %id, error = %e, "dispatch update failed; continuing");
                    outcomes.push(ItemDispatchOutcome {
                        serial_stock_id: *id,
                        dispatched: false,
                        error: Some(e.to_string()),
                    });
                }
            }
        }
        outcomes
    }

    #[instrument(skip(self))]
    pub async fn get(
        &self,
        id: Uuid,
    ) -> Result<Option<(delivery_note::Model, Vec<delivery_note_item::Model>)>, ServiceError> {
        let db = self.db_pool.as_ref();
        let Some(note) = delivery_note::Entity::find_by_id(id).one(db).await? else {
            return Ok(None);
        };
        let items = note
            .find_related(delivery_note_item::Entity)
            .all(db)
            .await?;
        Ok(Some((note, items)))
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<delivery_note::Model>, ServiceError> {
        let notes = delivery_note::Entity::find()
            .order_by_desc(delivery_note::Column::Sequence)
            .all(self.db_pool.as_ref())
            .await?;
        Ok(notes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn del_note_number_format() {
        assert_eq!(format_del_note_number(2026, 1), "REODN-2026-00001");
        assert_eq!(format_del_note_number(2026, 123), "REODN-2026-00123");
        assert_eq!(format_del_note_number(2027, 99999), "REODN-2027-99999");
    }
}
