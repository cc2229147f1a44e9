//! TCP transport for peer-to-peer group links.
//!
//! This is the lowest layer of meshlink. It provides role-conditioned socket
//! setup — [`TcpAcceptor`] for the group-owner side, [`connect`] for the
//! client side — and the [`LinkStream`] type everything above builds on.

pub mod error;
pub mod stream;
pub mod tcp;

pub use error::{Result, TransportError};
pub use stream::LinkStream;
pub use tcp::{connect, TcpAcceptor, CONNECT_TIMEOUT, TRANSPORT_PORT};
