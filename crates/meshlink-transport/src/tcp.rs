use std::io::ErrorKind;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpListener, TcpStream};
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::stream::LinkStream;

/// Well-known transport port shared by the host and client roles.
pub const TRANSPORT_PORT: u16 = 8888;

/// Default bound on a client connection attempt.
pub const CONNECT_TIMEOUT: Duration = Duration::from_millis(500);

/// TCP listener for the group-owner role.
///
/// Accepts exactly one peer connection per bind: [`accept`](Self::accept)
/// consumes the acceptor, and the listening socket closes once the accepted
/// stream is handed off. A further connection attempt is queued by the OS
/// while the acceptor lives and refused after it drops.
pub struct TcpAcceptor {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl TcpAcceptor {
    /// Bind a listening socket on all interfaces.
    ///
    /// Port 0 selects an ephemeral port; [`local_addr`](Self::local_addr)
    /// reports the choice.
    pub fn bind(port: u16) -> Result<Self> {
        let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
        let listener = TcpListener::bind(addr).map_err(|e| TransportError::Bind {
            addr,
            source: e,
        })?;
        let local_addr = listener.local_addr().map_err(|e| TransportError::Bind {
            addr,
            source: e,
        })?;

        info!(%local_addr, "listening for peer");

        Ok(Self {
            listener,
            local_addr,
        })
    }

    /// Block until one peer connects, then stop listening.
    pub fn accept(self) -> Result<(LinkStream, SocketAddr)> {
        let (stream, peer) = self.listener.accept().map_err(TransportError::Accept)?;
        debug!(%peer, "accepted peer connection");
        Ok((LinkStream::from_tcp(stream), peer))
    }

    /// The address this acceptor is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Transport name for diagnostics.
    pub fn transport_name(&self) -> &'static str {
        "tcp"
    }
}

/// Connect to a listening host with a bounded timeout (blocking).
///
/// A single attempt: exceeding `timeout` yields
/// [`TransportError::ConnectTimeout`], any other failure yields
/// [`TransportError::Connect`]. Retry decisions belong to the caller.
pub fn connect(host: IpAddr, port: u16, timeout: Duration) -> Result<LinkStream> {
    let addr = SocketAddr::from((host, port));
    let stream = TcpStream::connect_timeout(&addr, timeout).map_err(|e| {
        if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) {
            TransportError::ConnectTimeout { addr, timeout }
        } else {
            TransportError::Connect { addr, source: e }
        }
    })?;
    debug!(%addr, "connected to host");
    Ok(LinkStream::from_tcp(stream))
}
