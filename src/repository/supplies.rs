//! Supplies and supply orders repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::OrderStatus,
        supply::{CreateOrder, CreateSupply, Supply, SupplyOrder},
    },
};

/// Result of the guarded order placement
#[derive(Debug)]
pub enum OrderOutcome {
    Created(SupplyOrder),
    /// The conditional decrement matched no row: not enough stock left
    Insufficient,
}

/// Result of an order cancellation
#[derive(Debug)]
pub enum CancelOutcome {
    /// The order transitioned to cancelled and stock was restored
    Cancelled(SupplyOrder),
    /// The order was already cancelled; nothing restored
    AlreadyCancelled(SupplyOrder),
}

/// Reserve stock with a single atomic conditional decrement. Returns
/// `None` when less than `qty` is available, and the (before, after)
/// available quantities otherwise.
async fn reserve_stock_on<'e, E>(executor: E, supply_id: i32, qty: i32) -> AppResult<Option<(i32, i32)>>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let row: Option<(i32, i32)> = sqlx::query_as(
        r#"
        UPDATE supplies SET
            available_quantity = available_quantity - $2,
            available = (available_quantity - $2) > 0,
            modif_date = NOW()
        WHERE id = $1 AND available_quantity >= $2
        RETURNING available_quantity + $2, available_quantity
        "#,
    )
    .bind(supply_id)
    .bind(qty)
    .fetch_optional(executor)
    .await?;
    Ok(row)
}

/// Restore reserved stock, clamped to the supply's total quantity.
/// Returns (before, after) available quantities so the caller can spot
/// a clamp that truncated the restore.
async fn restore_stock_on<'e, E>(executor: E, supply_id: i32, qty: i32) -> AppResult<(i32, i32)>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let row: Option<(i32, i32)> = sqlx::query_as(
        r#"
        WITH prev AS (
            SELECT available_quantity FROM supplies WHERE id = $1
        )
        UPDATE supplies s SET
            available_quantity = LEAST(s.available_quantity + $2, s.total_quantity),
            available = LEAST(s.available_quantity + $2, s.total_quantity) > 0,
            modif_date = NOW()
        FROM prev
        WHERE s.id = $1
        RETURNING prev.available_quantity, s.available_quantity
        "#,
    )
    .bind(supply_id)
    .bind(qty)
    .fetch_optional(executor)
    .await?;

    row.ok_or_else(|| AppError::NotFound(format!("Supply {} not found", supply_id)))
}

#[derive(Clone)]
pub struct SuppliesRepository {
    pool: Pool<Postgres>,
}

impl SuppliesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all supplies
    pub async fn list(&self) -> AppResult<Vec<Supply>> {
        let rows = sqlx::query_as::<_, Supply>("SELECT * FROM supplies ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Get supply by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Supply> {
        sqlx::query_as::<_, Supply>("SELECT * FROM supplies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Supply {} not found", id)))
    }

    /// Create a supply with full stock
    pub async fn create(&self, supplier_id: i32, data: &CreateSupply) -> AppResult<Supply> {
        let row = sqlx::query_as::<_, Supply>(
            r#"
            INSERT INTO supplies
                (supplier_id, name, unit, price_per_unit, total_quantity, available_quantity, available)
            VALUES ($1, $2, $3, $4, $5, $5, $5 > 0)
            RETURNING *
            "#,
        )
        .bind(supplier_id)
        .bind(&data.name)
        .bind(&data.unit)
        .bind(data.price_per_unit)
        .bind(data.total_quantity)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Set a new total quantity, shifting available stock by the delta.
    /// Returns `None` when the reduction would take available stock below
    /// what outstanding orders have already reserved.
    pub async fn update_total_quantity(
        &self,
        supply_id: i32,
        new_total: i32,
    ) -> AppResult<Option<Supply>> {
        let row = sqlx::query_as::<_, Supply>(
            r#"
            UPDATE supplies SET
                available_quantity = available_quantity + ($2 - total_quantity),
                available = (available_quantity + ($2 - total_quantity)) > 0,
                total_quantity = $2,
                modif_date = NOW()
            WHERE id = $1 AND available_quantity + ($2 - total_quantity) >= 0
            RETURNING *
            "#,
        )
        .bind(supply_id)
        .bind(new_total)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    // -----------------------------------------------------------------
    // Orders
    // -----------------------------------------------------------------

    /// Get order by ID
    pub async fn get_order(&self, id: i32) -> AppResult<SupplyOrder> {
        sqlx::query_as::<_, SupplyOrder>("SELECT * FROM supply_orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {} not found", id)))
    }

    /// List orders where the user is buyer or supplier
    pub async fn list_orders_for_user(&self, user_id: i32) -> AppResult<Vec<SupplyOrder>> {
        let rows = sqlx::query_as::<_, SupplyOrder>(
            r#"
            SELECT * FROM supply_orders
            WHERE buyer_id = $1 OR supplier_id = $1
            ORDER BY id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Reserve stock and record the order in one transaction. The pre/post
    /// available quantities of the decrement are stamped onto the order's
    /// audit fields so a later cancellation restores exactly what was taken.
    pub async fn place_order(
        &self,
        supply: &Supply,
        buyer_id: i32,
        data: &CreateOrder,
    ) -> AppResult<OrderOutcome> {
        let mut tx = self.pool.begin().await?;

        let reserved = reserve_stock_on(&mut *tx, supply.id, data.quantity).await?;

        let (original, remaining) = match reserved {
            Some(r) => r,
            None => {
                tx.rollback().await?;
                return Ok(OrderOutcome::Insufficient);
            }
        };

        let order = sqlx::query_as::<_, SupplyOrder>(
            r#"
            INSERT INTO supply_orders
                (supply_id, buyer_id, supplier_id, quantity, status,
                 original_supply_quantity, remaining_supply_quantity,
                 delivery_address, contact_phone, notes)
            VALUES ($1, $2, $3, $4, 'pending', $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(supply.id)
        .bind(buyer_id)
        .bind(supply.supplier_id)
        .bind(data.quantity)
        .bind(original)
        .bind(remaining)
        .bind(&data.delivery_address)
        .bind(&data.contact_phone)
        .bind(&data.notes)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(OrderOutcome::Created(order))
    }

    /// Update an order to a non-cancelled status. Orders already cancelled
    /// are never resurrected.
    pub async fn update_order_status(
        &self,
        id: i32,
        status: OrderStatus,
    ) -> AppResult<Option<SupplyOrder>> {
        let row = sqlx::query_as::<_, SupplyOrder>(
            r#"
            UPDATE supply_orders SET status = $2, modif_date = NOW()
            WHERE id = $1 AND status != 'cancelled'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Cancel an order and restore its reserved stock exactly once.
    ///
    /// The status flip is conditional on the order not already being
    /// cancelled, and the restore runs in the same transaction, so a
    /// repeated cancellation is a no-op rather than a double restore.
    pub async fn cancel_order(&self, id: i32) -> AppResult<CancelOutcome> {
        let mut tx = self.pool.begin().await?;

        let cancelled = sqlx::query_as::<_, SupplyOrder>(
            r#"
            UPDATE supply_orders SET status = 'cancelled', modif_date = NOW()
            WHERE id = $1 AND status != 'cancelled'
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let order = match cancelled {
            Some(order) => order,
            None => {
                tx.rollback().await?;
                // Either absent or already cancelled; a second cancel is a no-op
                let order = self.get_order(id).await?;
                return Ok(CancelOutcome::AlreadyCancelled(order));
            }
        };

        let (before, after) =
            restore_stock_on(&mut *tx, order.supply_id, order.quantity).await?;
        if after - before != order.quantity {
            tracing::warn!(
                order_id = order.id,
                supply_id = order.supply_id,
                quantity = order.quantity,
                before,
                after,
                "Restore clamped to total quantity"
            );
        }

        tx.commit().await?;
        Ok(CancelOutcome::Cancelled(order))
    }
}
