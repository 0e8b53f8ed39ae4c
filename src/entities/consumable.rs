use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Fungible stock tracked by quantity at a location.
///
/// Merge identity for add/allocate is (supplier, consumable_type,
/// description, location); `user` records the last operator to touch the
/// row, not ownership.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "consumables")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub supplier: String,
    pub consumable_type: String,
    pub description: String,
    pub user: String,
    pub location: String,
    pub quantity: i32,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
