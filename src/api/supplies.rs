//! Supply marketplace endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::supply::{
        CreateOrder, CreateSupply, StockCheck, Supply, SupplyOrder, UpdateOrderStatus,
        UpdateTotalQuantity,
    },
};

use super::AuthenticatedUser;

/// Stock check query parameters
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct StockQuery {
    /// Quantity the caller intends to order
    pub quantity: i32,
}

/// List all supplies
#[utoipa::path(
    get,
    path = "/supplies",
    tag = "supplies",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Supplies list", body = Vec<Supply>)
    )
)]
pub async fn list_supplies(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Supply>>> {
    let supplies = state.services.inventory.list_supplies().await?;
    Ok(Json(supplies))
}

/// Create a supply listing owned by the caller
#[utoipa::path(
    post,
    path = "/supplies",
    tag = "supplies",
    security(("bearer_auth" = [])),
    request_body = CreateSupply,
    responses(
        (status = 201, description = "Supply created", body = Supply),
        (status = 400, description = "Invalid request")
    )
)]
pub async fn create_supply(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateSupply>,
) -> AppResult<(StatusCode, Json<Supply>)> {
    data.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let supply = state.services.inventory.create_supply(claims.user_id, &data).await?;
    Ok((StatusCode::CREATED, Json(supply)))
}

/// Advisory stock check before ordering
#[utoipa::path(
    get,
    path = "/supplies/{id}/stock",
    tag = "supplies",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Supply ID"),
        StockQuery
    ),
    responses(
        (status = 200, description = "Stock check result", body = StockCheck)
    )
)]
pub async fn check_stock(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(supply_id): Path<i32>,
    Query(query): Query<StockQuery>,
) -> AppResult<Json<StockCheck>> {
    let check = state.services.inventory.check_stock(supply_id, query.quantity).await;
    Ok(Json(check))
}

/// Place an order, reserving stock
#[utoipa::path(
    post,
    path = "/supplies/{id}/order",
    tag = "supplies",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Supply ID")),
    request_body = CreateOrder,
    responses(
        (status = 201, description = "Order placed", body = SupplyOrder),
        (status = 400, description = "Insufficient stock or invalid quantity"),
        (status = 404, description = "Supply not found")
    )
)]
pub async fn place_order(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(supply_id): Path<i32>,
    Json(data): Json<CreateOrder>,
) -> AppResult<(StatusCode, Json<SupplyOrder>)> {
    data.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let order = state
        .services
        .inventory
        .place_order(supply_id, claims.user_id, &data)
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// List the caller's orders (as buyer or supplier)
#[utoipa::path(
    get,
    path = "/supplies/orders",
    tag = "supplies",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Orders list", body = Vec<SupplyOrder>)
    )
)]
pub async fn list_orders(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<SupplyOrder>>> {
    let orders = state
        .services
        .inventory
        .list_orders_for_user(claims.user_id)
        .await?;
    Ok(Json(orders))
}

/// Update an order's status; cancellation restores the reserved stock
#[utoipa::path(
    put,
    path = "/supplies/orders/{id}/status",
    tag = "supplies",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Order ID")),
    request_body = UpdateOrderStatus,
    responses(
        (status = 200, description = "Order updated", body = SupplyOrder),
        (status = 400, description = "Invalid transition"),
        (status = 403, description = "Not a party to the order"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn update_order_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(order_id): Path<i32>,
    Json(data): Json<UpdateOrderStatus>,
) -> AppResult<Json<SupplyOrder>> {
    let order = state
        .services
        .inventory
        .update_order_status(order_id, claims.user_id, data.status)
        .await?;
    Ok(Json(order))
}

/// Adjust a supply's total quantity (supplier only)
#[utoipa::path(
    put,
    path = "/supplies/{id}/quantity",
    tag = "supplies",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Supply ID")),
    request_body = UpdateTotalQuantity,
    responses(
        (status = 200, description = "Quantity updated", body = Supply),
        (status = 400, description = "Reduction below outstanding reservations"),
        (status = 403, description = "Not the supplier"),
        (status = 404, description = "Supply not found")
    )
)]
pub async fn update_total_quantity(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(supply_id): Path<i32>,
    Json(data): Json<UpdateTotalQuantity>,
) -> AppResult<Json<Supply>> {
    let supply = state
        .services
        .inventory
        .update_total_quantity(supply_id, claims.user_id, &data)
        .await?;
    Ok(Json(supply))
}
