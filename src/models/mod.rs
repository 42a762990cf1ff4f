//! Data models for AgriLink

pub mod booking;
pub mod enums;
pub mod equipment;
pub mod maintenance;
pub mod notification;
pub mod supply;
pub mod user;

// Re-export commonly used types
pub use booking::{Booking, BookingAction, BookingActor};
pub use enums::{BookingStatus, MaintenancePriority, MaintenanceStatus, OrderStatus};
pub use equipment::Equipment;
pub use maintenance::MaintenanceWindow;
pub use notification::{Notification, NotificationType};
pub use supply::{Supply, SupplyOrder};
pub use user::UserClaims;
