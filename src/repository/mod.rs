//! Repository layer for database operations

pub mod bookings;
pub mod equipment;
pub mod maintenance;
pub mod supplies;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub equipment: equipment::EquipmentRepository,
    pub bookings: bookings::BookingsRepository,
    pub maintenance: maintenance::MaintenanceRepository,
    pub supplies: supplies::SuppliesRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            equipment: equipment::EquipmentRepository::new(pool.clone()),
            bookings: bookings::BookingsRepository::new(pool.clone()),
            maintenance: maintenance::MaintenanceRepository::new(pool.clone()),
            supplies: supplies::SuppliesRepository::new(pool.clone()),
            pool,
        }
    }
}
