//! Equipment (rentable resource) model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Equipment record
///
/// `available` is a derived cache of "no active booking or maintenance
/// window references this equipment". It is recomputed by the repository
/// after every booking/maintenance mutation, never written directly.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Equipment {
    pub id: i32,
    pub owner_id: i32,
    pub name: String,
    /// Category (tractor, harvester, irrigation, ...)
    pub category: Option<String>,
    /// Rental rate per calendar day
    pub daily_rate: Option<f64>,
    pub available: bool,
    pub notes: Option<String>,
    pub crea_date: Option<DateTime<Utc>>,
    pub modif_date: Option<DateTime<Utc>>,
}

/// Create equipment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEquipment {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub category: Option<String>,
    pub daily_rate: Option<f64>,
    pub notes: Option<String>,
}

/// Availability query parameters
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct AvailabilityQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Availability check response
#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityResponse {
    pub equipment_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub available: bool,
}
