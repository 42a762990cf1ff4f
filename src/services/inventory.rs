//! Supply stock reservation service

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::OrderStatus,
        supply::{CreateOrder, CreateSupply, StockCheck, Supply, SupplyOrder, UpdateTotalQuantity},
    },
    repository::{
        supplies::{CancelOutcome, OrderOutcome},
        Repository,
    },
};

#[derive(Clone)]
pub struct InventoryService {
    repository: Repository,
}

impl InventoryService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list_supplies(&self) -> AppResult<Vec<Supply>> {
        self.repository.supplies.list().await
    }

    pub async fn get_supply(&self, id: i32) -> AppResult<Supply> {
        self.repository.supplies.get_by_id(id).await
    }

    pub async fn create_supply(&self, supplier_id: i32, data: &CreateSupply) -> AppResult<Supply> {
        if data.total_quantity < 0 {
            return Err(AppError::Validation(
                "Total quantity cannot be negative".to_string(),
            ));
        }
        self.repository.supplies.create(supplier_id, data).await
    }

    /// Advisory stock check. Fail-closed: a missing or unavailable supply,
    /// or a lookup failure, reports no stock. The authoritative check is
    /// the conditional decrement inside `place_order`.
    pub async fn check_stock(&self, supply_id: i32, requested: i32) -> StockCheck {
        match self.repository.supplies.get_by_id(supply_id).await {
            Ok(supply) if supply.available => StockCheck {
                has_stock: supply.available_quantity >= requested,
                available_quantity: supply.available_quantity,
            },
            Ok(_) => StockCheck {
                has_stock: false,
                available_quantity: 0,
            },
            Err(e) => {
                tracing::warn!(supply_id, "Stock lookup failed, reporting no stock: {}", e);
                StockCheck {
                    has_stock: false,
                    available_quantity: 0,
                }
            }
        }
    }

    /// Reserve stock and record the order atomically
    pub async fn place_order(
        &self,
        supply_id: i32,
        buyer_id: i32,
        data: &CreateOrder,
    ) -> AppResult<SupplyOrder> {
        if data.quantity < 1 {
            return Err(AppError::Validation(
                "Order quantity must be at least 1".to_string(),
            ));
        }

        let supply = self.repository.supplies.get_by_id(supply_id).await?;

        match self.repository.supplies.place_order(&supply, buyer_id, data).await? {
            OrderOutcome::Created(order) => {
                tracing::info!(
                    order_id = order.id,
                    supply_id,
                    quantity = order.quantity,
                    remaining = order.remaining_supply_quantity,
                    "Order placed"
                );
                Ok(order)
            }
            OrderOutcome::Insufficient => {
                // Re-read for the error message; stock may have moved since
                let available = self
                    .repository
                    .supplies
                    .get_by_id(supply_id)
                    .await
                    .map(|s| s.available_quantity)
                    .unwrap_or(0);
                Err(AppError::InsufficientStock(format!(
                    "Requested {} but only {} available",
                    data.quantity, available
                )))
            }
        }
    }

    pub async fn get_order(&self, id: i32) -> AppResult<SupplyOrder> {
        self.repository.supplies.get_order(id).await
    }

    pub async fn list_orders_for_user(&self, user_id: i32) -> AppResult<Vec<SupplyOrder>> {
        self.repository.supplies.list_orders_for_user(user_id).await
    }

    /// Update an order's status. Cancellation restores the reserved stock
    /// exactly once; a repeated cancellation is a no-op.
    pub async fn update_order_status(
        &self,
        order_id: i32,
        actor_id: i32,
        status: OrderStatus,
    ) -> AppResult<SupplyOrder> {
        let order = self.repository.supplies.get_order(order_id).await?;

        match status {
            OrderStatus::Cancelled => {
                // Either party may cancel
                if actor_id != order.buyer_id && actor_id != order.supplier_id {
                    return Err(AppError::Authorization(
                        "Only the buyer or the supplier may cancel an order".to_string(),
                    ));
                }
                match self.repository.supplies.cancel_order(order_id).await? {
                    CancelOutcome::Cancelled(order) => {
                        tracing::info!(order_id, "Order cancelled, stock restored");
                        Ok(order)
                    }
                    CancelOutcome::AlreadyCancelled(order) => Ok(order),
                }
            }
            _ => {
                // Fulfilment statuses belong to the supplier
                if actor_id != order.supplier_id {
                    return Err(AppError::Authorization(
                        "Only the supplier may update the order status".to_string(),
                    ));
                }
                self.repository
                    .supplies
                    .update_order_status(order_id, status)
                    .await?
                    .ok_or_else(|| {
                        AppError::InvalidTransition(
                            "Cannot change the status of a cancelled order".to_string(),
                        )
                    })
            }
        }
    }

    /// Restock or shrink a supply; only the supplier may do so. Refuses to
    /// reduce stock below what outstanding orders have already reserved.
    pub async fn update_total_quantity(
        &self,
        supply_id: i32,
        actor_id: i32,
        data: &UpdateTotalQuantity,
    ) -> AppResult<Supply> {
        if data.total_quantity < 0 {
            return Err(AppError::Validation(
                "Total quantity cannot be negative".to_string(),
            ));
        }

        let supply = self.repository.supplies.get_by_id(supply_id).await?;
        if actor_id != supply.supplier_id {
            return Err(AppError::Authorization(
                "Only the supplier may adjust stock".to_string(),
            ));
        }

        self.repository
            .supplies
            .update_total_quantity(supply_id, data.total_quantity)
            .await?
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "Cannot reduce total to {}: outstanding orders hold more than the difference",
                    data.total_quantity
                ))
            })
    }
}
