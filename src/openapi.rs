//! OpenAPI document and Swagger UI wiring.

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Reovalve API",
        description = "Stock tracking and PRV service scheduling back office",
        version = env!("CARGO_PKG_VERSION"),
    ),
    paths(
        crate::handlers::consumables::add_consumable,
        crate::handlers::consumables::allocate_consumable,
        crate::handlers::consumables::list_consumables,
        crate::handlers::consumables::get_consumable,
        crate::handlers::serial_stock::create_serial_unit,
        crate::handlers::serial_stock::list_serial_stock,
        crate::handlers::serial_stock::get_serial_unit,
        crate::handlers::serial_stock::relocate_serial_unit,
        crate::handlers::delivery_notes::create_delivery_note,
        crate::handlers::delivery_notes::list_delivery_notes,
        crate::handlers::delivery_notes::get_delivery_note,
        crate::handlers::prv_devices::create_prv_device,
        crate::handlers::prv_devices::list_prv_devices,
        crate::handlers::prv_devices::get_prv_device,
        crate::handlers::prv_devices::device_status,
        crate::handlers::prv_services::schedule_prv_service,
        crate::handlers::prv_services::update_prv_service,
        crate::handlers::prv_services::list_prv_services,
        crate::handlers::prv_services::get_prv_service,
        crate::handlers::prv_services::list_service_documents,
        crate::handlers::prv_services::unscheduled_devices,
        crate::handlers::registry::create_business_unit,
        crate::handlers::registry::list_business_units,
        crate::handlers::registry::get_business_unit,
        crate::handlers::registry::delete_business_unit,
        crate::handlers::registry::create_region,
        crate::handlers::registry::list_regions,
        crate::handlers::registry::create_client,
        crate::handlers::registry::list_clients,
        crate::handlers::registry::get_client,
        crate::handlers::registry::create_site,
        crate::handlers::registry::update_site,
        crate::handlers::registry::list_sites,
        crate::handlers::registry::get_site,
        crate::handlers::registry::create_technician,
        crate::handlers::registry::list_technicians,
        crate::handlers::registry::delete_technician,
        crate::handlers::assets::create_sim_card,
        crate::handlers::assets::list_sim_cards,
        crate::handlers::assets::assign_sim_card,
        crate::handlers::assets::delete_sim_card,
        crate::handlers::assets::create_mobile_device,
        crate::handlers::assets::list_mobile_devices,
        crate::handlers::assets::assign_mobile_device,
        crate::handlers::assets::delete_mobile_device,
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        crate::handlers::consumables::AddConsumableRequest,
        crate::handlers::consumables::AllocateConsumableRequest,
        crate::handlers::consumables::AllocationResponse,
        crate::handlers::serial_stock::CreateSerialUnitRequest,
        crate::handlers::serial_stock::RelocateRequest,
        crate::handlers::delivery_notes::CreateDeliveryNoteRequest,
        crate::handlers::prv_devices::CreatePrvDeviceRequest,
        crate::handlers::prv_devices::DeviceStatusEntry,
        crate::handlers::prv_services::ScheduleServiceRequest,
        crate::handlers::registry::NamedCreateRequest,
        crate::handlers::registry::CreateClientRequest,
        crate::handlers::registry::CreateSiteRequest,
        crate::handlers::registry::UpdateSiteRequest,
        crate::handlers::registry::CreateTechnicianRequest,
        crate::handlers::assets::CreateSimCardRequest,
        crate::handlers::assets::CreateMobileDeviceRequest,
        crate::handlers::assets::AssignRequest,
        crate::services::delivery_notes::ItemDispatchOutcome,
        crate::services::lookup::DeviceLocation,
        crate::services::prv_scheduler::ScheduleStatus,
        crate::services::prv_scheduler::MarkerColor,
        crate::auth::LoginRequest,
        crate::auth::LoginResponse,
    )),
    tags(
        (name = "consumables", description = "Consumable stock and allocation"),
        (name = "serial-stock", description = "Serialized stock units"),
        (name = "delivery-notes", description = "Dispatch notes"),
        (name = "prv-devices", description = "Pressure-reducing valve registry"),
        (name = "prv-services", description = "Service scheduling and documents"),
        (name = "registry", description = "Business units, regions, clients, sites, technicians"),
        (name = "assets", description = "SIM cards and mobile devices"),
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_builds() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("/api/v1/consumables/allocate"));
        assert!(json.contains("/api/v1/prvservices/unscheduled"));
    }
}
