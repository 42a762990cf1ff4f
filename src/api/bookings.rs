//! Booking lifecycle endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::booking::{Booking, BookingAction, CreateBooking},
};

use super::AuthenticatedUser;

/// Deletion confirmation
#[derive(Serialize, ToSchema)]
pub struct DeleteResponse {
    pub status: String,
}

/// List the caller's bookings (as requester or owner)
#[utoipa::path(
    get,
    path = "/bookings",
    tag = "bookings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Bookings list", body = Vec<Booking>)
    )
)]
pub async fn list_bookings(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Booking>>> {
    let bookings = state.services.bookings.list_for_user(claims.user_id).await?;
    Ok(Json(bookings))
}

/// Request a booking for a date range
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    security(("bearer_auth" = [])),
    request_body = CreateBooking,
    responses(
        (status = 201, description = "Booking created", body = Booking),
        (status = 400, description = "Invalid dates"),
        (status = 404, description = "Equipment not found"),
        (status = 409, description = "Date or maintenance conflict")
    )
)]
pub async fn create_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateBooking>,
) -> AppResult<(StatusCode, Json<Booking>)> {
    let booking = state.services.bookings.create(claims.user_id, &data).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// Approve a pending booking (owner only)
#[utoipa::path(
    patch,
    path = "/bookings/{id}/approve",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking approved", body = Booking),
        (status = 400, description = "Invalid transition"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn approve_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Booking>> {
    let booking = state
        .services
        .bookings
        .apply_action(id, claims.user_id, BookingAction::Approve)
        .await?;
    Ok(Json(booking))
}

/// Decline a pending booking (owner only)
#[utoipa::path(
    patch,
    path = "/bookings/{id}/decline",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking declined", body = Booking),
        (status = 400, description = "Invalid transition"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn decline_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Booking>> {
    let booking = state
        .services
        .bookings
        .apply_action(id, claims.user_id, BookingAction::Decline)
        .await?;
    Ok(Json(booking))
}

/// Complete an approved booking (owner only)
#[utoipa::path(
    patch,
    path = "/bookings/{id}/complete",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking completed", body = Booking),
        (status = 400, description = "Invalid transition"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn complete_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Booking>> {
    let booking = state
        .services
        .bookings
        .apply_action(id, claims.user_id, BookingAction::Complete)
        .await?;
    Ok(Json(booking))
}

/// Cancel a pending or approved booking (requester only)
#[utoipa::path(
    patch,
    path = "/bookings/{id}/cancel",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking cancelled", body = Booking),
        (status = 400, description = "Invalid transition"),
        (status = 403, description = "Not the requester"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn cancel_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Booking>> {
    let booking = state
        .services
        .bookings
        .apply_action(id, claims.user_id, BookingAction::Cancel)
        .await?;
    Ok(Json(booking))
}

/// Hard delete a booking (owner or requester, any status)
#[utoipa::path(
    delete,
    path = "/bookings/{id}",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking deleted", body = DeleteResponse),
        (status = 403, description = "Not a party to the booking"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn delete_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<DeleteResponse>> {
    state.services.bookings.delete(id, claims.user_id).await?;
    Ok(Json(DeleteResponse {
        status: "deleted".to_string(),
    }))
}
