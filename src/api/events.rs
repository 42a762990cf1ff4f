//! Server-sent events stream for booking notifications

use std::{
    convert::Infallible,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use tokio::sync::mpsc;
use tokio_stream::{wrappers::ReceiverStream, Stream, StreamExt};

use crate::{
    models::notification::{Notification, NotificationType},
    services::notifications::{ConnectionId, NotificationRegistry},
};

use super::AuthenticatedUser;

/// Receiver stream that unregisters its channel when the client
/// disconnects. The connection id guard keeps a stale stream's drop from
/// tearing down a replacement registered by a newer connection.
struct ClientStream {
    rx: ReceiverStream<Notification>,
    registry: Arc<dyn NotificationRegistry>,
    user_id: i32,
    conn: ConnectionId,
}

impl Stream for ClientStream {
    type Item = Notification;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.rx).poll_next(cx)
    }
}

impl Drop for ClientStream {
    fn drop(&mut self) {
        self.registry.unregister_connection(self.user_id, self.conn);
    }
}

/// Open the caller's notification stream
#[utoipa::path(
    get,
    path = "/bookings/stream",
    tag = "bookings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "SSE stream of booking events", content_type = "text/event-stream")
    )
)]
pub async fn booking_stream(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let capacity = state.config.notifications.channel_capacity;
    let (tx, rx) = mpsc::channel(capacity);

    // Handshake frame goes directly into the channel so it is the first
    // event the client sees.
    let _ = tx.try_send(Notification::new(
        NotificationType::Connected,
        "Notification stream established",
    ));

    let registry = state.services.notifications.clone();
    let conn = registry.register(claims.user_id, tx);
    tracing::debug!(user_id = claims.user_id, "Notification stream opened");

    let stream = ClientStream {
        rx: ReceiverStream::new(rx),
        registry,
        user_id: claims.user_id,
        conn,
    }
    .map(|notification| {
        let data = serde_json::to_string(&notification).unwrap_or_else(|_| "{}".to_string());
        Ok(Event::default().data(data))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
