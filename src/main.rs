//! AgriLink Server - Farm Services Coordination
//!
//! REST API server for equipment booking, maintenance scheduling and
//! supply stock reservation.

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agrilink_server::{api, config::AppConfig, repository::Repository, services::Services, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("agrilink_server={},tower_http=debug", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting AgriLink Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository);

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Equipment
        .route("/equipment", get(api::equipment::list_equipment))
        .route("/equipment", post(api::equipment::create_equipment))
        .route("/equipment/:id", get(api::equipment::get_equipment))
        .route("/equipment/:id/availability", get(api::equipment::check_availability))
        // Bookings
        .route("/bookings", get(api::bookings::list_bookings))
        .route("/bookings", post(api::bookings::create_booking))
        .route("/bookings/stream", get(api::events::booking_stream))
        .route("/bookings/:id", delete(api::bookings::delete_booking))
        .route("/bookings/:id/approve", patch(api::bookings::approve_booking))
        .route("/bookings/:id/decline", patch(api::bookings::decline_booking))
        .route("/bookings/:id/complete", patch(api::bookings::complete_booking))
        .route("/bookings/:id/cancel", patch(api::bookings::cancel_booking))
        // Maintenance
        .route("/maintenance/schedule", post(api::maintenance::schedule_maintenance))
        .route("/maintenance/:id/status", put(api::maintenance::update_maintenance_status))
        .route("/maintenance/equipment/:id", get(api::maintenance::list_equipment_maintenance))
        // Supplies
        .route("/supplies", get(api::supplies::list_supplies))
        .route("/supplies", post(api::supplies::create_supply))
        .route("/supplies/orders", get(api::supplies::list_orders))
        .route("/supplies/orders/:id/status", put(api::supplies::update_order_status))
        .route("/supplies/:id/order", post(api::supplies::place_order))
        .route("/supplies/:id/stock", get(api::supplies::check_stock))
        .route("/supplies/:id/quantity", put(api::supplies::update_total_quantity))
        .with_state(state.clone());

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
