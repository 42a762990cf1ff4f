//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{bookings, equipment, events, health, maintenance, supplies};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "AgriLink API",
        version = "0.3.0",
        description = "Farm Services Coordination REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Equipment
        equipment::list_equipment,
        equipment::get_equipment,
        equipment::create_equipment,
        equipment::check_availability,
        // Bookings
        bookings::list_bookings,
        bookings::create_booking,
        bookings::approve_booking,
        bookings::decline_booking,
        bookings::complete_booking,
        bookings::cancel_booking,
        bookings::delete_booking,
        events::booking_stream,
        // Maintenance
        maintenance::schedule_maintenance,
        maintenance::update_maintenance_status,
        maintenance::list_equipment_maintenance,
        // Supplies
        supplies::list_supplies,
        supplies::create_supply,
        supplies::check_stock,
        supplies::place_order,
        supplies::list_orders,
        supplies::update_order_status,
        supplies::update_total_quantity,
    ),
    components(
        schemas(
            crate::error::ErrorResponse,
            crate::models::enums::BookingStatus,
            crate::models::enums::MaintenanceStatus,
            crate::models::enums::MaintenancePriority,
            crate::models::enums::OrderStatus,
            crate::models::booking::Booking,
            crate::models::booking::CreateBooking,
            crate::models::equipment::Equipment,
            crate::models::equipment::CreateEquipment,
            crate::models::equipment::AvailabilityResponse,
            crate::models::maintenance::MaintenanceWindow,
            crate::models::maintenance::ScheduleMaintenance,
            crate::models::maintenance::UpdateMaintenanceStatus,
            crate::models::supply::Supply,
            crate::models::supply::SupplyOrder,
            crate::models::supply::CreateSupply,
            crate::models::supply::CreateOrder,
            crate::models::supply::UpdateOrderStatus,
            crate::models::supply::UpdateTotalQuantity,
            crate::models::supply::StockCheck,
            crate::models::notification::Notification,
            crate::models::notification::NotificationType,
            bookings::DeleteResponse,
            health::HealthResponse,
        )
    ),
    tags(
        (name = "health", description = "Service health"),
        (name = "equipment", description = "Equipment catalog and availability"),
        (name = "bookings", description = "Booking lifecycle"),
        (name = "maintenance", description = "Maintenance scheduling"),
        (name = "supplies", description = "Supply marketplace and stock")
    )
)]
pub struct ApiDoc;

/// Create the Swagger UI router
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
