//! SeaORM entity definitions.
//!
//! Foreign keys are explicit columns on every model; nothing relies on
//! ORM-managed shadow properties.

pub mod business_unit;
pub mod client;
pub mod consumable;
pub mod delivery_note;
pub mod delivery_note_item;
pub mod mobile_device;
pub mod prv_device;
pub mod prv_service;
pub mod region;
pub mod serial_stock;
pub mod service_document;
pub mod sim_card;
pub mod site;
pub mod technician;
pub mod user;
