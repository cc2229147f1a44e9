use std::net::IpAddr;
use std::time::Duration;

use tracing::info;

use meshlink_transport::{connect, LinkStream, TcpAcceptor, CONNECT_TIMEOUT, TRANSPORT_PORT};

use crate::error::{PeerError, Result};
use crate::event::{event_channel, EventReceiver, LinkEvent, LinkStatus};
use crate::link::Link;
use crate::role::{Role, RoleAssignment};

/// Connection parameters shared by both roles.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Port the host listens on and the client connects to.
    pub port: u16,
    /// Bound on the client connection attempt.
    pub connect_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            port: TRANSPORT_PORT,
            connect_timeout: CONNECT_TIMEOUT,
        }
    }
}

/// One established link session: the resolved role, the live connection, and
/// the consumer's inbox, bundled into a single explicitly passed object.
///
/// At most one session is alive per device at a time; establishing a new one
/// requires the previous connection to be closed first. The first event the
/// inbox delivers is the role status ([`LinkStatus::Host`] or
/// [`LinkStatus::Client`]), ahead of any message.
pub struct Session {
    role: Role,
    link: Link,
    events: EventReceiver,
}

impl Session {
    /// Role-conditioned setup: the host binds and blocks in accept, the
    /// client connects with a bounded timeout.
    pub fn establish(assignment: &RoleAssignment, config: &SessionConfig) -> Result<Self> {
        match assignment.role {
            Role::Host => Self::host(TcpAcceptor::bind(config.port)?),
            Role::Client => {
                let addr = assignment.peer_address.ok_or(PeerError::NoPeerAddress)?;
                Self::join(addr, config)
            }
        }
    }

    /// Host half: block until one peer connects, then wrap the stream.
    pub fn host(acceptor: TcpAcceptor) -> Result<Self> {
        let (stream, peer) = acceptor.accept()?;
        info!(%peer, "peer joined the group link");
        Self::from_stream(Role::Host, stream)
    }

    /// Client half: connect to the host and wrap the stream.
    pub fn join(addr: IpAddr, config: &SessionConfig) -> Result<Self> {
        let stream = connect(addr, config.port, config.connect_timeout)?;
        info!(%addr, "joined host");
        Self::from_stream(Role::Client, stream)
    }

    fn from_stream(role: Role, stream: LinkStream) -> Result<Self> {
        let (tx, rx) = event_channel();

        let status = match role {
            Role::Host => LinkStatus::Host,
            Role::Client => LinkStatus::Client,
        };
        // Enqueued before the read loop exists, so it precedes any message.
        let _ = tx.send(LinkEvent::Status(status));

        let link = Link::start(stream, tx)?;
        Ok(Self {
            role,
            link,
            events: rx,
        })
    }

    /// The role this session runs as.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Send one opaque payload to the peer.
    pub fn send(&self, payload: &[u8]) -> Result<()> {
        self.link.send(payload)
    }

    /// The consumer's inbox: messages and status changes in delivery order.
    pub fn events(&self) -> &EventReceiver {
        &self.events
    }

    /// Receive the next event, blocking until one arrives.
    ///
    /// Fails with [`PeerError::ConnectionClosed`] once the link is down and
    /// the inbox has drained.
    pub fn recv(&self) -> Result<LinkEvent> {
        self.events.recv().map_err(|_| PeerError::ConnectionClosed)
    }

    /// Close the connection from this side; idempotent.
    pub fn close(&self) {
        self.link.close();
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Duration;

    use bytes::Bytes;
    use meshlink_transport::TcpAcceptor;

    use super::*;

    fn session_pair() -> (Session, Session) {
        let acceptor = TcpAcceptor::bind(0).expect("bind should succeed");
        let port = acceptor.local_addr().port();

        let host = thread::spawn(move || Session::host(acceptor).expect("host should accept"));

        let config = SessionConfig {
            port,
            ..SessionConfig::default()
        };
        let client = Session::join("127.0.0.1".parse().unwrap(), &config)
            .expect("client should connect");

        (host.join().expect("host thread should finish"), client)
    }

    fn expect_event(session: &Session, expected: LinkEvent) {
        let event = session
            .events()
            .recv_timeout(Duration::from_secs(2))
            .expect("event should arrive");
        assert_eq!(event, expected);
    }

    #[test]
    fn roles_are_reported_before_any_message() {
        let (host, client) = session_pair();

        assert_eq!(host.role(), Role::Host);
        assert_eq!(client.role(), Role::Client);
        expect_event(&host, LinkEvent::Status(LinkStatus::Host));
        expect_event(&client, LinkEvent::Status(LinkStatus::Client));
    }

    #[test]
    fn peers_exchange_messages_in_both_directions() {
        let (host, client) = session_pair();
        expect_event(&host, LinkEvent::Status(LinkStatus::Host));
        expect_event(&client, LinkEvent::Status(LinkStatus::Client));

        client.send(b"from-client").expect("send should succeed");
        expect_event(&host, LinkEvent::Message(Bytes::from_static(b"from-client")));

        host.send(b"from-host").expect("send should succeed");
        expect_event(&client, LinkEvent::Message(Bytes::from_static(b"from-host")));
    }

    #[test]
    fn close_is_observed_by_the_peer() {
        let (host, client) = session_pair();
        expect_event(&host, LinkEvent::Status(LinkStatus::Host));
        expect_event(&client, LinkEvent::Status(LinkStatus::Client));

        host.close();

        expect_event(&client, LinkEvent::Status(LinkStatus::Disconnected));
        expect_event(&host, LinkEvent::Status(LinkStatus::Disconnected));
    }

    #[test]
    fn inbox_drains_then_reports_closed() {
        let (host, client) = session_pair();
        expect_event(&client, LinkEvent::Status(LinkStatus::Client));

        host.close();
        drop(host);

        expect_event(&client, LinkEvent::Status(LinkStatus::Disconnected));
        assert!(matches!(
            client.recv(),
            Err(PeerError::ConnectionClosed)
        ));
    }

    #[test]
    fn client_without_peer_address_is_rejected() {
        let assignment = RoleAssignment {
            role: Role::Client,
            peer_address: None,
        };
        let result = Session::establish(&assignment, &SessionConfig::default());
        assert!(matches!(result, Err(PeerError::NoPeerAddress)));
    }
}
