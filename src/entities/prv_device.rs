use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A pressure-reducing valve installed in the field.
///
/// Created once per physical device; the inspection attributes are captured
/// on the initial survey form and most are optional. Service scheduling
/// lives in [`super::prv_service`] and references this row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "prv_devices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub site_id: Uuid,
    pub prv_name: String,
    pub valve_make: Option<String>,
    pub valve_model: Option<String>,
    pub valve_size_mm: Option<i32>,
    pub valve_serial_number: Option<String>,
    pub pilot_make: Option<String>,
    pub pilot_model: Option<String>,
    pub inlet_pressure_kpa: Option<f64>,
    pub outlet_pressure_kpa: Option<f64>,
    pub design_flow_ls: Option<f64>,
    pub pressure_zone: Option<String>,
    pub supply_description: Option<String>,
    pub chamber_type: Option<String>,
    pub chamber_condition: Option<String>,
    pub chamber_lid_condition: Option<String>,
    pub valve_condition: Option<String>,
    pub pilot_condition: Option<String>,
    pub strainer_fitted: Option<bool>,
    pub strainer_condition: Option<String>,
    pub isolating_valve_upstream: Option<bool>,
    pub isolating_valve_downstream: Option<bool>,
    pub isolating_valve_condition: Option<String>,
    pub air_valve_fitted: Option<bool>,
    pub air_valve_condition: Option<String>,
    pub bypass_fitted: Option<bool>,
    pub bypass_condition: Option<String>,
    pub gauge_upstream_fitted: Option<bool>,
    pub gauge_downstream_fitted: Option<bool>,
    pub ball_valves_fitted: Option<bool>,
    pub pipework_condition: Option<String>,
    pub leaks_observed: Option<bool>,
    pub vandalism_observed: Option<bool>,
    pub access_notes: Option<String>,
    pub installation_date: Option<Date>,
    pub last_inspection_date: Option<Date>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub general_notes: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::site::Entity",
        from = "Column::SiteId",
        to = "super::site::Column::Id"
    )]
    Site,
    #[sea_orm(has_many = "super::prv_service::Entity")]
    PrvServices,
}

impl Related<super::site::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Site.def()
    }
}

impl Related<super::prv_service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PrvServices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
