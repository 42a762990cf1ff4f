//! Maintenance windows repository for database operations

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{MaintenancePriority, MaintenanceStatus},
        maintenance::{MaintenanceWindow, ScheduleMaintenance, UpdateMaintenanceStatus},
    },
};

use super::equipment::refresh_availability_on;

#[derive(Clone)]
pub struct MaintenanceRepository {
    pool: Pool<Postgres>,
}

impl MaintenanceRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get maintenance window by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<MaintenanceWindow> {
        sqlx::query_as::<_, MaintenanceWindow>("SELECT * FROM maintenance_windows WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Maintenance window {} not found", id)))
    }

    /// List windows for one equipment
    pub async fn list_for_equipment(&self, equipment_id: i32) -> AppResult<Vec<MaintenanceWindow>> {
        let rows = sqlx::query_as::<_, MaintenanceWindow>(
            r#"
            SELECT * FROM maintenance_windows
            WHERE equipment_id = $1
            ORDER BY scheduled_date DESC, id DESC
            "#,
        )
        .bind(equipment_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Dates of active (scheduled/in_progress) windows for one equipment
    pub async fn active_dates(&self, equipment_id: i32) -> AppResult<Vec<NaiveDate>> {
        let rows: Vec<(NaiveDate,)> = sqlx::query_as(
            r#"
            SELECT scheduled_date FROM maintenance_windows
            WHERE equipment_id = $1 AND status = ANY($2)
            "#,
        )
        .bind(equipment_id)
        .bind(MaintenanceStatus::ACTIVE)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    /// Create a window in `scheduled` and recompute availability, since a
    /// scheduled window immediately blocks the equipment.
    pub async fn create_and_refresh(
        &self,
        data: &ScheduleMaintenance,
    ) -> AppResult<MaintenanceWindow> {
        let mut tx = self.pool.begin().await?;

        let window = sqlx::query_as::<_, MaintenanceWindow>(
            r#"
            INSERT INTO maintenance_windows
                (equipment_id, maintenance_type, scheduled_date, description, status, priority)
            VALUES ($1, $2, $3, $4, 'scheduled', $5)
            RETURNING *
            "#,
        )
        .bind(data.equipment_id)
        .bind(&data.maintenance_type)
        .bind(data.scheduled_date)
        .bind(&data.description)
        .bind(data.priority.unwrap_or(MaintenancePriority::Medium))
        .fetch_one(&mut *tx)
        .await?;

        refresh_availability_on(&mut *tx, data.equipment_id).await?;
        tx.commit().await?;

        Ok(window)
    }

    /// Persist a status change (plus optional completion fields) and
    /// recompute the equipment's availability in one transaction.
    ///
    /// The write is conditional on the status the transition was checked
    /// against; `None` means the window moved on under the caller.
    pub async fn update_status_and_refresh(
        &self,
        id: i32,
        from: MaintenanceStatus,
        to: MaintenanceStatus,
        data: &UpdateMaintenanceStatus,
    ) -> AppResult<Option<MaintenanceWindow>> {
        let mut tx = self.pool.begin().await?;

        let window = sqlx::query_as::<_, MaintenanceWindow>(
            r#"
            UPDATE maintenance_windows SET
                status = $3,
                notes = COALESCE($4, notes),
                cost = COALESCE($5, cost),
                technician = COALESCE($6, technician),
                modif_date = NOW()
            WHERE id = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .bind(&data.notes)
        .bind(data.cost)
        .bind(&data.technician)
        .fetch_optional(&mut *tx)
        .await?;

        let window = match window {
            Some(window) => window,
            None => {
                tx.rollback().await?;
                return Ok(None);
            }
        };

        refresh_availability_on(&mut *tx, window.equipment_id).await?;
        tx.commit().await?;

        Ok(Some(window))
    }
}
