//! Business logic services

pub mod availability;
pub mod bookings;
pub mod equipment;
pub mod inventory;
pub mod maintenance;
pub mod notifications;

use std::sync::Arc;

use crate::repository::Repository;

use notifications::{InProcessRegistry, NotificationRegistry};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub availability: availability::AvailabilityService,
    pub bookings: bookings::BookingsService,
    pub equipment: equipment::EquipmentService,
    pub maintenance: maintenance::MaintenanceService,
    pub inventory: inventory::InventoryService,
    pub notifications: Arc<dyn NotificationRegistry>,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        let registry: Arc<dyn NotificationRegistry> = Arc::new(InProcessRegistry::new());
        Self {
            availability: availability::AvailabilityService::new(repository.clone()),
            bookings: bookings::BookingsService::new(repository.clone(), registry.clone()),
            equipment: equipment::EquipmentService::new(repository.clone()),
            maintenance: maintenance::MaintenanceService::new(repository.clone()),
            inventory: inventory::InventoryService::new(repository),
            notifications: registry,
        }
    }
}
