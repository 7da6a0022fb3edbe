//! The streaming handle returned to the boundary layer for a subscriber.

use std::convert::Infallible;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::Stream;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::rooms::registry::RoomRegistry;

/// Frames queued for one subscriber, consumed by the HTTP layer as a
/// response body. When the remote peer disconnects, axum drops the body
/// stream, which drops the guard and deregisters the listener from its
/// room — no admin action and no polling involved.
pub struct ListenerStream {
    frames: UnboundedReceiverStream<Bytes>,
    _guard: DisconnectGuard,
}

impl ListenerStream {
    pub(crate) fn new(
        frames: UnboundedReceiverStream<Bytes>,
        registry: Arc<RoomRegistry>,
        room_id: String,
        listener_id: String,
    ) -> Self {
        Self {
            frames,
            _guard: DisconnectGuard {
                registry,
                room_id,
                listener_id,
            },
        }
    }
}

impl Stream for ListenerStream {
    type Item = Result<Bytes, Infallible>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.frames).poll_next(cx).map(|f| f.map(Ok))
    }
}

/// Non-owning association back to the room: just ids resolved through the
/// registry, so no retain cycle between room and listener.
struct DisconnectGuard {
    registry: Arc<RoomRegistry>,
    room_id: String,
    listener_id: String,
}

impl Drop for DisconnectGuard {
    fn drop(&mut self) {
        self.registry
            .remove_listener(&self.room_id, &self.listener_id);
        tracing::debug!(
            room_id = %self.room_id,
            listener_id = %self.listener_id,
            "Listener disconnected"
        );
    }
}
