//! Equipment repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{BookingStatus, MaintenanceStatus},
        equipment::{CreateEquipment, Equipment},
    },
};

/// Recompute the derived `available` flag of one equipment record.
///
/// `available` must always equal "no active booking and no active
/// maintenance window references this equipment". Every booking and
/// maintenance mutation path goes through this function, on whatever
/// executor (pool or open transaction) the mutation runs on.
pub(crate) async fn refresh_availability_on<'e, E>(
    executor: E,
    equipment_id: i32,
) -> AppResult<bool>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let available: bool = sqlx::query_scalar(
        r#"
        UPDATE equipment SET
            available = NOT EXISTS(
                SELECT 1 FROM bookings
                WHERE equipment_id = $1 AND status = ANY($2)
            ) AND NOT EXISTS(
                SELECT 1 FROM maintenance_windows
                WHERE equipment_id = $1 AND status = ANY($3)
            ),
            modif_date = NOW()
        WHERE id = $1
        RETURNING available
        "#,
    )
    .bind(equipment_id)
    .bind(BookingStatus::ACTIVE)
    .bind(MaintenanceStatus::ACTIVE)
    .fetch_one(executor)
    .await?;
    Ok(available)
}

#[derive(Clone)]
pub struct EquipmentRepository {
    pool: Pool<Postgres>,
}

impl EquipmentRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all equipment
    pub async fn list(&self) -> AppResult<Vec<Equipment>> {
        let rows = sqlx::query_as::<_, Equipment>("SELECT * FROM equipment ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Get equipment by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// Create equipment, initially available
    pub async fn create(&self, owner_id: i32, data: &CreateEquipment) -> AppResult<Equipment> {
        let row = sqlx::query_as::<_, Equipment>(
            r#"
            INSERT INTO equipment (owner_id, name, category, daily_rate, available, notes)
            VALUES ($1, $2, $3, $4, TRUE, $5)
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(&data.name)
        .bind(&data.category)
        .bind(data.daily_rate)
        .bind(&data.notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}
