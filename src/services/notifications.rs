//! Real-time notification dispatch
//!
//! The registry is a process-wide map from user id to that user's live
//! server-push channel. It is process-local: behind a load balancer a
//! user only receives events raised on the instance they are connected
//! to. The `NotificationRegistry` trait keeps the coordination services
//! independent of that choice; a pub/sub-backed implementation can be
//! dropped in for multi-instance deployments.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        RwLock,
    },
};

use tokio::sync::mpsc;

use crate::models::notification::Notification;

/// Identifies one registration, so a stale connection's teardown cannot
/// unregister the channel that replaced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionId(u64);

/// Port for delivering events to connected clients
pub trait NotificationRegistry: Send + Sync {
    /// Register a user's channel. A second registration for the same user
    /// replaces the first (the older connection is stale).
    fn register(&self, user_id: i32, tx: mpsc::Sender<Notification>) -> ConnectionId;

    /// Remove a user's channel. Idempotent.
    fn unregister(&self, user_id: i32);

    /// Remove a user's channel only if it still belongs to `conn`.
    fn unregister_connection(&self, user_id: i32, conn: ConnectionId);

    /// Fire-and-forget delivery: silently dropped when no channel is
    /// registered or the channel's buffer is full.
    fn send(&self, user_id: i32, event: Notification);
}

struct Entry {
    conn: ConnectionId,
    tx: mpsc::Sender<Notification>,
}

/// In-process registry for single-instance deployments
pub struct InProcessRegistry {
    channels: RwLock<HashMap<i32, Entry>>,
    next_conn: AtomicU64,
}

impl InProcessRegistry {
    pub fn new() -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            next_conn: AtomicU64::new(1),
        }
    }

    /// Number of live channels
    pub fn connected(&self) -> usize {
        self.channels.read().map(|m| m.len()).unwrap_or(0)
    }
}

impl Default for InProcessRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationRegistry for InProcessRegistry {
    fn register(&self, user_id: i32, tx: mpsc::Sender<Notification>) -> ConnectionId {
        let conn = ConnectionId(self.next_conn.fetch_add(1, Ordering::Relaxed));
        if let Ok(mut map) = self.channels.write() {
            if map.insert(user_id, Entry { conn, tx }).is_some() {
                tracing::debug!(user_id, "Replaced stale notification channel");
            }
        }
        conn
    }

    fn unregister(&self, user_id: i32) {
        if let Ok(mut map) = self.channels.write() {
            map.remove(&user_id);
        }
    }

    fn unregister_connection(&self, user_id: i32, conn: ConnectionId) {
        if let Ok(mut map) = self.channels.write() {
            if map.get(&user_id).map(|e| e.conn) == Some(conn) {
                map.remove(&user_id);
            }
        }
    }

    fn send(&self, user_id: i32, event: Notification) {
        let Ok(map) = self.channels.read() else {
            return;
        };
        let Some(entry) = map.get(&user_id) else {
            return;
        };
        if let Err(e) = entry.tx.try_send(event) {
            tracing::debug!(user_id, "Dropped notification: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notification::NotificationType;

    fn event(kind: NotificationType) -> Notification {
        Notification::new(kind, "test")
    }

    #[tokio::test]
    async fn delivers_to_registered_channel() {
        let registry = InProcessRegistry::new();
        let (tx, mut rx) = mpsc::channel(4);
        registry.register(7, tx);

        registry.send(7, event(NotificationType::BookingCreated));
        let received = rx.recv().await.unwrap();
        assert_eq!(received.kind, NotificationType::BookingCreated);
    }

    #[test]
    fn send_without_channel_is_noop() {
        let registry = InProcessRegistry::new();
        registry.send(42, event(NotificationType::NewBooking));
    }

    #[tokio::test]
    async fn second_register_replaces_first() {
        let registry = InProcessRegistry::new();
        let (tx1, mut rx1) = mpsc::channel(4);
        let (tx2, mut rx2) = mpsc::channel(4);
        registry.register(7, tx1);
        registry.register(7, tx2);

        registry.send(7, event(NotificationType::BookingApproved));
        assert!(rx1.try_recv().is_err());
        assert_eq!(
            rx2.recv().await.unwrap().kind,
            NotificationType::BookingApproved
        );
    }

    #[test]
    fn stale_connection_cannot_unregister_replacement() {
        let registry = InProcessRegistry::new();
        let (tx1, _rx1) = mpsc::channel(4);
        let (tx2, _rx2) = mpsc::channel(4);
        let stale = registry.register(7, tx1);
        registry.register(7, tx2);

        registry.unregister_connection(7, stale);
        assert_eq!(registry.connected(), 1);
    }

    #[test]
    fn unregister_is_idempotent() {
        let registry = InProcessRegistry::new();
        let (tx, _rx) = mpsc::channel(4);
        registry.register(7, tx);
        registry.unregister(7);
        registry.unregister(7);
        assert_eq!(registry.connected(), 0);
    }

    #[test]
    fn full_channel_drops_event() {
        let registry = InProcessRegistry::new();
        let (tx, _rx) = mpsc::channel(1);
        registry.register(7, tx);
        registry.send(7, event(NotificationType::BookingCreated));
        // Buffer full: second send is dropped, not an error
        registry.send(7, event(NotificationType::BookingUpdated));
    }
}
