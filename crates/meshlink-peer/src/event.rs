use std::fmt;
use std::sync::mpsc;

use bytes::Bytes;

/// Connection status transitions surfaced to the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    /// Connected as group owner.
    Host,
    /// Connected as client.
    Client,
    /// The connection ended; terminal.
    Disconnected,
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkStatus::Host => f.write_str("HOST"),
            LinkStatus::Client => f.write_str("CLIENT"),
            LinkStatus::Disconnected => f.write_str("DISCONNECTED"),
        }
    }
}

/// One delivery to the consumer: an inbound message or a status change.
///
/// Errors travel this same path as status events, so the consumer stays
/// single-threaded with one thing to drain.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkEvent {
    /// An opaque payload received from the peer.
    Message(Bytes),
    /// The connection changed state.
    Status(LinkStatus),
}

pub type EventSender = mpsc::Sender<LinkEvent>;
pub type EventReceiver = mpsc::Receiver<LinkEvent>;

/// Create the inbox pair connecting the read loop to the consumer.
///
/// Unbounded FIFO: the producer never blocks on a slow consumer, and
/// delivery order is insertion order. Single producer, single consumer.
pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::channel()
}
