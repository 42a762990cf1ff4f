//! Booking lifecycle service

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::{transition, Booking, BookingAction, BookingActor, CreateBooking},
        notification::{Notification, NotificationType},
    },
    repository::{bookings::CreateOutcome, Repository},
};

use super::notifications::NotificationRegistry;

#[derive(Clone)]
pub struct BookingsService {
    repository: Repository,
    registry: Arc<dyn NotificationRegistry>,
}

impl BookingsService {
    pub fn new(repository: Repository, registry: Arc<dyn NotificationRegistry>) -> Self {
        Self {
            repository,
            registry,
        }
    }

    /// List the caller's bookings (as requester or owner)
    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<Booking>> {
        self.repository.bookings.list_for_user(user_id).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Booking> {
        self.repository.bookings.get_by_id(id).await
    }

    /// Create a booking in `pending`, if the requested range is free
    pub async fn create(&self, requester_id: i32, data: &CreateBooking) -> AppResult<Booking> {
        let today = Utc::now().date_naive();
        if data.start_date < today {
            return Err(AppError::Validation(
                "Start date cannot be in the past".to_string(),
            ));
        }
        if data.end_date <= data.start_date {
            return Err(AppError::Validation(
                "End date must be after start date (minimum 1-day rental)".to_string(),
            ));
        }

        let equipment = self.repository.equipment.get_by_id(data.equipment_id).await?;

        let outcome = self
            .repository
            .bookings
            .create_if_available(
                equipment.id,
                equipment.owner_id,
                requester_id,
                data.start_date,
                data.end_date,
            )
            .await?;

        let booking = match outcome {
            CreateOutcome::Created(booking) => booking,
            CreateOutcome::DateConflict => {
                return Err(AppError::Conflict("Date conflict detected".to_string()))
            }
            CreateOutcome::MaintenanceConflict => {
                return Err(AppError::Conflict(
                    "Maintenance conflict detected".to_string(),
                ))
            }
        };

        tracing::info!(
            booking_id = booking.id,
            equipment_id = booking.equipment_id,
            "Booking created"
        );

        let payload = json!(&booking);
        self.registry.send(
            booking.requester_id,
            Notification::new(NotificationType::BookingCreated, "Booking request submitted")
                .with_payload(payload.clone()),
        );
        self.registry.send(
            booking.owner_id,
            Notification::new(
                NotificationType::NewBooking,
                format!("New booking request for {}", equipment.name),
            )
            .with_payload(payload),
        );

        Ok(booking)
    }

    /// Apply a lifecycle action, actor-gated per the state machine
    pub async fn apply_action(
        &self,
        booking_id: i32,
        actor_id: i32,
        action: BookingAction,
    ) -> AppResult<Booking> {
        let booking = self.repository.bookings.get_by_id(booking_id).await?;

        match action.required_actor() {
            BookingActor::Owner if actor_id != booking.owner_id => {
                return Err(AppError::Authorization(format!(
                    "Only the equipment owner may {} a booking",
                    action
                )));
            }
            BookingActor::Requester if actor_id != booking.requester_id => {
                return Err(AppError::Authorization(format!(
                    "Only the requester may {} a booking",
                    action
                )));
            }
            _ => {}
        }

        let next = transition(booking.status, action).ok_or_else(|| {
            AppError::InvalidTransition(format!(
                "Cannot {} a booking in status {}",
                action, booking.status
            ))
        })?;

        let updated = self
            .repository
            .bookings
            .update_status_and_refresh(booking_id, booking.status, next)
            .await?
            .ok_or_else(|| {
                AppError::InvalidTransition(format!(
                    "Booking {} is no longer in status {}",
                    booking_id, booking.status
                ))
            })?;

        tracing::info!(booking_id, status = %updated.status, "Booking transitioned");

        let kind = match action {
            BookingAction::Approve => NotificationType::BookingApproved,
            BookingAction::Decline => NotificationType::BookingRejected,
            BookingAction::Complete => NotificationType::BookingCompleted,
            BookingAction::Cancel => NotificationType::BookingCancelled,
        };
        let payload = json!(&updated);
        let message = format!("Booking {}", updated.status);
        for party in [updated.requester_id, updated.owner_id] {
            self.registry.send(
                party,
                Notification::new(kind, message.clone()).with_payload(payload.clone()),
            );
        }

        Ok(updated)
    }

    /// Hard delete, permitted to owner or requester from any status
    pub async fn delete(&self, booking_id: i32, actor_id: i32) -> AppResult<()> {
        let booking = self.repository.bookings.get_by_id(booking_id).await?;

        if actor_id != booking.owner_id && actor_id != booking.requester_id {
            return Err(AppError::Authorization(
                "Only the owner or the requester may delete a booking".to_string(),
            ));
        }

        self.repository.bookings.delete_and_refresh(booking_id).await?;
        tracing::info!(booking_id, "Booking deleted");

        let other = if actor_id == booking.requester_id {
            booking.owner_id
        } else {
            booking.requester_id
        };
        self.registry.send(
            other,
            Notification::new(NotificationType::BookingUpdated, "Booking removed")
                .with_payload(json!({ "booking_id": booking_id })),
        );

        Ok(())
    }
}
