//! Maintenance window model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::{MaintenancePriority, MaintenanceStatus};

/// Maintenance window record
///
/// A window blocks availability of its equipment on `scheduled_date`
/// while its status is `scheduled` or `in_progress`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MaintenanceWindow {
    pub id: i32,
    pub equipment_id: i32,
    pub maintenance_type: String,
    pub scheduled_date: NaiveDate,
    pub description: Option<String>,
    pub status: MaintenanceStatus,
    pub priority: MaintenancePriority,
    pub notes: Option<String>,
    pub cost: Option<f64>,
    pub technician: Option<String>,
    pub crea_date: Option<DateTime<Utc>>,
    pub modif_date: Option<DateTime<Utc>>,
}

/// Schedule maintenance request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ScheduleMaintenance {
    pub equipment_id: i32,
    #[validate(length(min = 1, max = 100))]
    pub maintenance_type: String,
    pub scheduled_date: NaiveDate,
    pub description: Option<String>,
    pub priority: Option<MaintenancePriority>,
}

/// Maintenance status update request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateMaintenanceStatus {
    pub status: MaintenanceStatus,
    pub notes: Option<String>,
    pub cost: Option<f64>,
    pub technician: Option<String>,
}
