use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Dispatch record bundling serialized units moving to a destination.
///
/// `sequence` is per-table monotonic and feeds the human-facing
/// `del_note_number` (`REODN-{year}-{sequence:05}`).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "delivery_notes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub sequence: i32,
    #[sea_orm(unique)]
    pub del_note_number: String,
    pub note_date: DateTimeUtc,
    pub destination: String,
    pub comments: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::delivery_note_item::Entity")]
    Items,
}

impl Related<super::delivery_note_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
