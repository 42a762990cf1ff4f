//! Real-time notification events

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Event types pushed over the booking stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    Connected,
    BookingCreated,
    BookingApproved,
    BookingRejected,
    BookingCompleted,
    BookingCancelled,
    BookingUpdated,
    NewBooking,
}

/// A notification delivered to a connected client.
///
/// Delivery is fire-and-forget: events for users without a live channel
/// are dropped, never queued.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub message: String,
    #[schema(value_type = Object)]
    pub payload: serde_json::Value,
}

impl Notification {
    pub fn new(kind: NotificationType, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            payload: serde_json::Value::Null,
        }
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_snake_case_type_tag() {
        let n = Notification::new(NotificationType::BookingApproved, "Booking approved");
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["type"], "booking_approved");
        assert_eq!(json["message"], "Booking approved");
    }
}
