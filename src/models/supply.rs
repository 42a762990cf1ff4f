//! Supply and supply order models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::OrderStatus;

/// Supply listing with finite stock
///
/// Invariant: `0 <= available_quantity <= total_quantity`;
/// `available == (available_quantity > 0)`, maintained on every stock
/// mutation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Supply {
    pub id: i32,
    pub supplier_id: i32,
    pub name: String,
    /// Unit of sale (kg, bag, litre, ...)
    pub unit: Option<String>,
    pub price_per_unit: Option<f64>,
    pub total_quantity: i32,
    pub available_quantity: i32,
    pub available: bool,
    pub crea_date: Option<DateTime<Utc>>,
    pub modif_date: Option<DateTime<Utc>>,
}

/// Supply order record
///
/// `original_supply_quantity` / `remaining_supply_quantity` snapshot the
/// supply's available quantity immediately before/after reservation, so a
/// cancellation restores exactly what was taken even if other orders
/// interleaved.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SupplyOrder {
    pub id: i32,
    pub supply_id: i32,
    pub buyer_id: i32,
    pub supplier_id: i32,
    pub quantity: i32,
    pub status: OrderStatus,
    pub original_supply_quantity: i32,
    pub remaining_supply_quantity: i32,
    pub delivery_address: Option<String>,
    pub contact_phone: Option<String>,
    pub notes: Option<String>,
    pub crea_date: Option<DateTime<Utc>>,
    pub modif_date: Option<DateTime<Utc>>,
}

/// Create supply request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSupply {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub unit: Option<String>,
    pub price_per_unit: Option<f64>,
    #[validate(range(min = 0))]
    pub total_quantity: i32,
}

/// Place order request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOrder {
    #[validate(range(min = 1))]
    pub quantity: i32,
    pub delivery_address: Option<String>,
    pub contact_phone: Option<String>,
    pub notes: Option<String>,
}

/// Order status update request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatus {
    pub status: OrderStatus,
}

/// Restock request (sets the new total quantity)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTotalQuantity {
    pub total_quantity: i32,
}

/// Stock check result
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct StockCheck {
    pub has_stock: bool,
    pub available_quantity: i32,
}
