use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use uuid::Uuid;

use super::message::Envelope;

/// Bound on the per-channel outbound queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

static NEXT_CHANNEL_ID: AtomicU64 = AtomicU64::new(1);

/// One persistent connection. Producers enqueue through `try_send`; the
/// single consumer is the transport writer loop holding the
/// [`ChannelReceiver`]. `close` is idempotent: the first caller wins and
/// wakes the writer.
pub struct Channel {
    id: u64,
    user_id: Option<Uuid>,
    tx: mpsc::Sender<Envelope>,
    closed: AtomicBool,
    close_tx: watch::Sender<bool>,
}

/// Consumer half handed to the writer loop.
pub struct ChannelReceiver {
    pub rx: mpsc::Receiver<Envelope>,
    pub close_rx: watch::Receiver<bool>,
}

impl Channel {
    pub fn new(user_id: Option<Uuid>, capacity: usize) -> (Arc<Self>, ChannelReceiver) {
        let (tx, rx) = mpsc::channel(capacity);
        let (close_tx, close_rx) = watch::channel(false);
        let channel = Arc::new(Self {
            id: NEXT_CHANNEL_ID.fetch_add(1, Ordering::Relaxed),
            user_id,
            tx,
            closed: AtomicBool::new(false),
            close_tx,
        });
        (channel, ChannelReceiver { rx, close_rx })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.user_id
    }

    /// Non-blocking enqueue; returns false when the channel is closed or
    /// the queue is full.
    pub fn try_send(&self, message: Envelope) -> bool {
        if self.closed.load(Ordering::Acquire) {
            return false;
        }
        self.tx.try_send(message).is_ok()
    }

    /// Returns true only for the caller that actually closed the channel.
    pub fn close(&self) -> bool {
        if self.closed.swap(true, Ordering::AcqRel) {
            return false;
        }
        let _ = self.close_tx.send(true);
        true
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn try_send_delivers_in_fifo_order() {
        let (channel, mut receiver) = Channel::new(None, 4);
        assert!(channel.try_send(Envelope::error("first")));
        assert!(channel.try_send(Envelope::error("second")));

        let first = receiver.rx.recv().await.unwrap();
        let second = receiver.rx.recv().await.unwrap();
        assert_eq!(first.payload.unwrap()["message"], "first");
        assert_eq!(second.payload.unwrap()["message"], "second");
    }

    #[tokio::test]
    async fn try_send_fails_when_queue_is_full() {
        let (channel, _receiver) = Channel::new(None, 1);
        assert!(channel.try_send(Envelope::error("fits")));
        assert!(!channel.try_send(Envelope::error("overflow")));
    }

    #[tokio::test]
    async fn close_is_idempotent_and_stops_sends() {
        let (channel, mut receiver) = Channel::new(None, 4);
        assert!(channel.close());
        assert!(!channel.close());
        assert!(channel.is_closed());
        assert!(!channel.try_send(Envelope::error("late")));
        assert!(receiver.close_rx.changed().await.is_ok());
        assert!(*receiver.close_rx.borrow());
    }

    #[test]
    fn channels_get_distinct_ids() {
        let (a, _ra) = Channel::new(None, 1);
        let (b, _rb) = Channel::new(Some(Uuid::new_v4()), 1);
        assert_ne!(a.id(), b.id());
    }
}
