use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Attachment uploaded against a PRV service; `file_path` is the blob-store
/// URL, never a local path. Rows are cascade-deleted with the parent service.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_documents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub prv_service_id: Uuid,
    pub file_name: String,
    pub file_path: String,
    pub attachment_type: String,
    pub upload_date: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::prv_service::Entity",
        from = "Column::PrvServiceId",
        to = "super::prv_service::Column::Id",
        on_delete = "Cascade"
    )]
    PrvService,
}

impl Related<super::prv_service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PrvService.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
