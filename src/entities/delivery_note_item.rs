use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "delivery_note_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub delivery_note_id: Uuid,
    pub serial_stock_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::delivery_note::Entity",
        from = "Column::DeliveryNoteId",
        to = "super::delivery_note::Column::Id",
        on_delete = "Cascade"
    )]
    DeliveryNote,
    #[sea_orm(
        belongs_to = "super::serial_stock::Entity",
        from = "Column::SerialStockId",
        to = "super::serial_stock::Column::Id"
    )]
    SerialStock,
}

impl Related<super::delivery_note::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeliveryNote.def()
    }
}

impl Related<super::serial_stock::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SerialStock.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
