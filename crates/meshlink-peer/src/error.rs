/// Errors that can occur in peer link operations.
#[derive(Debug, thiserror::Error)]
pub enum PeerError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] meshlink_transport::TransportError),

    /// The client role was resolved without a host address to connect to.
    #[error("no peer address available for the client role")]
    NoPeerAddress,

    /// The connection is closed; no further sends are possible.
    #[error("connection closed")]
    ConnectionClosed,

    /// A socket write failed mid-message. The payload is not requeued.
    #[error("write failed: {0}")]
    Write(std::io::Error),
}

pub type Result<T> = std::result::Result<T, PeerError>;
