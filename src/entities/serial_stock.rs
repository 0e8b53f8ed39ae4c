use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Uniquely identified physical stock unit tracked by serial number.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "serial_stock")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub supplier: String,
    #[sea_orm(unique)]
    pub serial_number: String,
    pub description: String,
    pub make: String,
    pub model: String,
    pub status: String,
    pub note: Option<String>,
    pub size: Option<String>,
    pub location: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::delivery_note_item::Entity")]
    DeliveryNoteItems,
}

impl Related<super::delivery_note_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeliveryNoteItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
