//! Bookings repository for database operations

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::Booking,
        enums::{BookingStatus, MaintenanceStatus},
    },
};

use super::equipment::refresh_availability_on;

/// Result of the guarded booking creation
#[derive(Debug)]
pub enum CreateOutcome {
    Created(Booking),
    /// An active booking overlaps the requested range
    DateConflict,
    /// An active maintenance window falls inside the requested range
    MaintenanceConflict,
}

#[derive(Clone)]
pub struct BookingsRepository {
    pool: Pool<Postgres>,
}

impl BookingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get booking by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", id)))
    }

    /// List bookings where the user is requester or owner
    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, Booking>(
            r#"
            SELECT * FROM bookings
            WHERE requester_id = $1 OR owner_id = $1
            ORDER BY start_date DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Active (pending/approved) booking date ranges for one equipment
    pub async fn active_ranges(&self, equipment_id: i32) -> AppResult<Vec<(NaiveDate, NaiveDate)>> {
        let rows: Vec<(NaiveDate, NaiveDate)> = sqlx::query_as(
            r#"
            SELECT start_date, end_date FROM bookings
            WHERE equipment_id = $1 AND status = ANY($2)
            "#,
        )
        .bind(equipment_id)
        .bind(BookingStatus::ACTIVE)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Create a booking only if the date range is free.
    ///
    /// The SQL overlap test is the collapsed form of the interval-overlap
    /// predicate in `services::availability`; its unit tests verify both
    /// forms agree, so the read path and the write path agree on
    /// boundary days.
    ///
    /// The check and the insert run in one transaction holding a row lock
    /// on the equipment, so two concurrent requests for overlapping ranges
    /// cannot both pass the check.
    pub async fn create_if_available(
        &self,
        equipment_id: i32,
        owner_id: i32,
        requester_id: i32,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> AppResult<CreateOutcome> {
        let mut tx = self.pool.begin().await?;

        // Serialize concurrent creations per equipment
        sqlx::query("SELECT id FROM equipment WHERE id = $1 FOR UPDATE")
            .bind(equipment_id)
            .fetch_one(&mut *tx)
            .await?;

        // Primary check, fail-closed: if the overlap lookup itself errors
        // we treat the range as taken rather than risk a double booking.
        let booking_conflict: bool = match sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM bookings
                WHERE equipment_id = $1
                  AND status = ANY($4)
                  AND start_date <= $3 AND end_date >= $2
            )
            "#,
        )
        .bind(equipment_id)
        .bind(start_date)
        .bind(end_date)
        .bind(BookingStatus::ACTIVE)
        .fetch_one(&mut *tx)
        .await
        {
            Ok(exists) => exists,
            Err(e) => {
                tracing::warn!("Booking overlap lookup failed, treating as conflict: {:?}", e);
                true
            }
        };

        if booking_conflict {
            tx.rollback().await?;
            return Ok(CreateOutcome::DateConflict);
        }

        // Secondary check, best-effort: a failure of the maintenance lookup
        // is logged and does not abort the creation.
        match sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM maintenance_windows
                WHERE equipment_id = $1
                  AND status = ANY($4)
                  AND scheduled_date BETWEEN $2 AND $3
            )
            "#,
        )
        .bind(equipment_id)
        .bind(start_date)
        .bind(end_date)
        .bind(MaintenanceStatus::ACTIVE)
        .fetch_one(&mut *tx)
        .await
        {
            Ok(true) => {
                tx.rollback().await?;
                return Ok(CreateOutcome::MaintenanceConflict);
            }
            Ok(false) => {}
            Err(e) => {
                tracing::warn!("Maintenance overlap lookup failed, proceeding: {:?}", e);
            }
        }

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (equipment_id, requester_id, owner_id, start_date, end_date, status)
            VALUES ($1, $2, $3, $4, $5, 'pending')
            RETURNING *
            "#,
        )
        .bind(equipment_id)
        .bind(requester_id)
        .bind(owner_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_one(&mut *tx)
        .await?;

        refresh_availability_on(&mut *tx, equipment_id).await?;
        tx.commit().await?;

        Ok(CreateOutcome::Created(booking))
    }

    /// Persist a status change and recompute the equipment's availability
    /// in one transaction. The recompute runs on every transition, not
    /// only the ones that change blocking state.
    ///
    /// The write is conditional on the status the caller validated the
    /// transition against. When two racing updates both read the same
    /// status, only the first commit matches the row; the loser gets
    /// `None` instead of overwriting a terminal state.
    pub async fn update_status_and_refresh(
        &self,
        id: i32,
        from: BookingStatus,
        to: BookingStatus,
    ) -> AppResult<Option<Booking>> {
        let mut tx = self.pool.begin().await?;

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings SET status = $3, modif_date = NOW()
            WHERE id = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .fetch_optional(&mut *tx)
        .await?;

        let booking = match booking {
            Some(booking) => booking,
            None => {
                tx.rollback().await?;
                return Ok(None);
            }
        };

        refresh_availability_on(&mut *tx, booking.equipment_id).await?;
        tx.commit().await?;

        Ok(Some(booking))
    }

    /// Hard delete, bypassing the state machine. Triggers the same
    /// availability recompute as a transition.
    pub async fn delete_and_refresh(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let equipment_id: i32 =
            sqlx::query_scalar("DELETE FROM bookings WHERE id = $1 RETURNING equipment_id")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", id)))?;

        refresh_availability_on(&mut *tx, equipment_id).await?;
        tx.commit().await?;

        Ok(())
    }
}
