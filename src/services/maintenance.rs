//! Maintenance scheduling service

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::maintenance::{MaintenanceWindow, ScheduleMaintenance, UpdateMaintenanceStatus},
    repository::Repository,
};

#[derive(Clone)]
pub struct MaintenanceService {
    repository: Repository,
}

impl MaintenanceService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<MaintenanceWindow> {
        self.repository.maintenance.get_by_id(id).await
    }

    pub async fn list_for_equipment(
        &self,
        equipment_id: i32,
    ) -> AppResult<Vec<MaintenanceWindow>> {
        // Verify the equipment exists
        self.repository.equipment.get_by_id(equipment_id).await?;
        self.repository.maintenance.list_for_equipment(equipment_id).await
    }

    /// Schedule a maintenance window; only the equipment owner may do so
    pub async fn schedule(
        &self,
        actor_id: i32,
        data: &ScheduleMaintenance,
    ) -> AppResult<MaintenanceWindow> {
        if data.scheduled_date < Utc::now().date_naive() {
            return Err(AppError::Validation(
                "Scheduled date cannot be in the past".to_string(),
            ));
        }

        let equipment = self.repository.equipment.get_by_id(data.equipment_id).await?;
        if actor_id != equipment.owner_id {
            return Err(AppError::Authorization(
                "Only the equipment owner may schedule maintenance".to_string(),
            ));
        }

        let window = self.repository.maintenance.create_and_refresh(data).await?;
        tracing::info!(
            maintenance_id = window.id,
            equipment_id = window.equipment_id,
            "Maintenance scheduled"
        );
        Ok(window)
    }

    /// Change a window's status along the maintenance state machine,
    /// recomputing the equipment's availability afterwards
    pub async fn update_status(
        &self,
        id: i32,
        actor_id: i32,
        data: &UpdateMaintenanceStatus,
    ) -> AppResult<MaintenanceWindow> {
        let window = self.repository.maintenance.get_by_id(id).await?;
        let equipment = self.repository.equipment.get_by_id(window.equipment_id).await?;

        if actor_id != equipment.owner_id {
            return Err(AppError::Authorization(
                "Only the equipment owner may update maintenance".to_string(),
            ));
        }

        if !window.status.can_transition_to(data.status) {
            return Err(AppError::InvalidTransition(format!(
                "Cannot move maintenance from {} to {}",
                window.status, data.status
            )));
        }

        let updated = self
            .repository
            .maintenance
            .update_status_and_refresh(id, window.status, data.status, data)
            .await?
            .ok_or_else(|| {
                AppError::InvalidTransition(format!(
                    "Maintenance window {} is no longer in status {}",
                    id, window.status
                ))
            })?;

        tracing::info!(maintenance_id = id, status = %updated.status, "Maintenance transitioned");
        Ok(updated)
    }
}
