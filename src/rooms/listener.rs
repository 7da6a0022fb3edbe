//! One subscriber's open streaming connection within a room.

use bytes::Bytes;
use tokio::sync::mpsc;

use crate::rooms::error::DeliveryFailure;
use crate::rooms::frame;

/// A single listener: owns the sender half of the channel feeding the
/// subscriber's response body. The room is the sole owner and mutator;
/// the receiver half lives inside the [`ListenerStream`] handed to the
/// boundary layer.
///
/// [`ListenerStream`]: crate::rooms::stream::ListenerStream
pub struct EventListener {
    id: String,
    tx: Option<mpsc::UnboundedSender<Bytes>>,
}

impl EventListener {
    /// Create a listener and its transport channel. The `:connected`
    /// priming frame is queued synchronously here, so it is guaranteed to
    /// precede any frame pushed after this returns.
    pub fn open(id: String) -> (Self, mpsc::UnboundedReceiver<Bytes>) {
        let (tx, rx) = mpsc::unbounded_channel();
        // Cannot fail: we still hold the receiver.
        let _ = tx.send(frame::connected_frame());
        (Self { id, tx: Some(tx) }, rx)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Encode and queue one event frame. Fails only if the transport is
    /// no longer writable; the room catches and ignores that.
    pub fn push(&self, event: Option<&str>, data: &str) -> Result<(), DeliveryFailure> {
        self.send_raw(frame::event_frame(event, data))
    }

    /// Queue a keepalive comment frame.
    pub fn ping_keepalive(&self) -> Result<(), DeliveryFailure> {
        self.send_raw(frame::ping_frame())
    }

    /// Drop the transport, ending the subscriber's stream. Idempotent.
    pub fn close(&mut self) {
        self.tx = None;
    }

    /// Terminal once true: either closed locally or the remote peer
    /// dropped the receiving end.
    pub fn is_closed(&self) -> bool {
        match &self.tx {
            Some(tx) => tx.is_closed(),
            None => true,
        }
    }

    fn send_raw(&self, frame: Bytes) -> Result<(), DeliveryFailure> {
        match &self.tx {
            Some(tx) => tx.send(frame).map_err(|_| DeliveryFailure),
            None => Err(DeliveryFailure),
        }
    }
}
