use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Service schedule for a PRV device.
///
/// At creation the invariant holds that `next_service_date` equals
/// `last_service_date` plus `service_interval_months` calendar months; a
/// later update may overwrite the scalar fields independently.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "prv_services")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub prv_device_id: Uuid,
    pub last_service_date: Date,
    pub next_service_date: Date,
    pub service_interval_months: i32,
    pub service_type: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::prv_device::Entity",
        from = "Column::PrvDeviceId",
        to = "super::prv_device::Column::Id"
    )]
    PrvDevice,
    #[sea_orm(has_many = "super::service_document::Entity")]
    ServiceDocuments,
}

impl Related<super::prv_device::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PrvDevice.def()
    }
}

impl Related<super::service_document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceDocuments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
