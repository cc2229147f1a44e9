use std::io::{ErrorKind, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::thread::JoinHandle;

use bytes::Bytes;
use tracing::debug;

use meshlink_transport::LinkStream;

use crate::error::{PeerError, Result};
use crate::event::{EventSender, LinkEvent, LinkStatus};

/// Size of the read buffer. One successful read becomes one message.
pub const READ_BUFFER_SIZE: usize = 1024;

/// Message-oriented wrapper around an established connection.
///
/// Owns the connection exclusively: a dedicated thread turns the inbound byte
/// stream into [`LinkEvent::Message`]s, and [`send`](Self::send) pushes
/// outbound payloads onto the wire.
///
/// Payloads are written raw, with no framing. The byte count returned by one
/// read is treated as one message, so boundaries of back-to-back messages may
/// split or merge under TCP fragmentation or coalescing; bytes are never
/// reordered or interleaved. Adequate for human-typed traffic, the intended
/// workload.
pub struct Link {
    writer: Mutex<LinkStream>,
    control: LinkStream,
    closed: AtomicBool,
    reader: Mutex<Option<JoinHandle<()>>>,
}

impl Link {
    /// Take ownership of `stream` and start the read loop.
    ///
    /// Every read of `n > 0` bytes is delivered to `events` as one message; a
    /// 0-byte read or a read error posts [`LinkStatus::Disconnected`] and ends
    /// the loop. The loop never restarts.
    pub fn start(stream: LinkStream, events: EventSender) -> Result<Self> {
        let reader_stream = stream.try_clone()?;
        let control = stream.try_clone()?;

        let handle = std::thread::Builder::new()
            .name("meshlink-read".into())
            .spawn(move || read_loop(reader_stream, events))
            .map_err(|e| PeerError::Transport(e.into()))?;

        Ok(Self {
            writer: Mutex::new(stream),
            control,
            closed: AtomicBool::new(false),
            reader: Mutex::new(Some(handle)),
        })
    }

    /// Write one payload to the peer (fire-and-forget).
    ///
    /// Concurrent calls are serialized behind the writer lock, so bytes of
    /// distinct payloads never interleave on the wire and sends hit the wire
    /// in call order. On failure the payload is not requeued.
    pub fn send(&self, payload: &[u8]) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(PeerError::ConnectionClosed);
        }

        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut offset = 0usize;
        while offset < payload.len() {
            match writer.write(&payload[offset..]) {
                Ok(0) => return Err(PeerError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) if err.kind() == ErrorKind::BrokenPipe => {
                    return Err(PeerError::ConnectionClosed)
                }
                Err(err) => return Err(PeerError::Write(err)),
            }
        }

        loop {
            match writer.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(PeerError::Write(err)),
            }
        }
    }

    /// Close the connection from this side; idempotent.
    ///
    /// Shuts the socket down both ways, which unblocks an in-progress read so
    /// the read loop can post its terminal [`LinkStatus::Disconnected`] and
    /// exit. Subsequent sends fail with [`PeerError::ConnectionClosed`].
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            debug!("closing link");
            let _ = self.control.shutdown();
        }
    }

    /// Whether [`close`](Self::close) has been called on this side.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Drop for Link {
    fn drop(&mut self) {
        self.close();
        let handle = self
            .reader
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            let _ = handle.join();
        }
    }
}

fn read_loop(mut stream: LinkStream, events: EventSender) {
    let mut buf = [0u8; READ_BUFFER_SIZE];
    loop {
        match stream.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                let payload = Bytes::copy_from_slice(&buf[..n]);
                if events.send(LinkEvent::Message(payload)).is_err() {
                    // Consumer is gone; nothing left to deliver to.
                    break;
                }
            }
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => {
                debug!(%err, "read loop ending on error");
                break;
            }
        }
    }
    let _ = events.send(LinkEvent::Status(LinkStatus::Disconnected));
}
