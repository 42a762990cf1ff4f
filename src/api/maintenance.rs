//! Maintenance scheduling endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::maintenance::{MaintenanceWindow, ScheduleMaintenance, UpdateMaintenanceStatus},
};

use super::AuthenticatedUser;

/// Schedule a maintenance window (equipment owner only)
#[utoipa::path(
    post,
    path = "/maintenance/schedule",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    request_body = ScheduleMaintenance,
    responses(
        (status = 201, description = "Maintenance scheduled", body = MaintenanceWindow),
        (status = 400, description = "Missing fields or past date"),
        (status = 403, description = "Not the equipment owner"),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn schedule_maintenance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<ScheduleMaintenance>,
) -> AppResult<(StatusCode, Json<MaintenanceWindow>)> {
    data.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let window = state.services.maintenance.schedule(claims.user_id, &data).await?;
    Ok((StatusCode::CREATED, Json(window)))
}

/// Update the status of a maintenance window
#[utoipa::path(
    put,
    path = "/maintenance/{id}/status",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Maintenance window ID")),
    request_body = UpdateMaintenanceStatus,
    responses(
        (status = 200, description = "Status updated", body = MaintenanceWindow),
        (status = 400, description = "Invalid transition"),
        (status = 403, description = "Not the equipment owner"),
        (status = 404, description = "Maintenance window not found")
    )
)]
pub async fn update_maintenance_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateMaintenanceStatus>,
) -> AppResult<Json<MaintenanceWindow>> {
    let window = state
        .services
        .maintenance
        .update_status(id, claims.user_id, &data)
        .await?;
    Ok(Json(window))
}

/// List maintenance windows for one equipment
#[utoipa::path(
    get,
    path = "/maintenance/equipment/{id}",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Maintenance windows", body = Vec<MaintenanceWindow>),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn list_equipment_maintenance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(equipment_id): Path<i32>,
) -> AppResult<Json<Vec<MaintenanceWindow>>> {
    let windows = state
        .services
        .maintenance
        .list_for_equipment(equipment_id)
        .await?;
    Ok(Json(windows))
}
