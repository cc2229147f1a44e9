//! Peer link management for meshlink.
//!
//! This is the core of the system. Resolve which side of a formed group
//! listens and which connects, wrap the established connection in a
//! message-oriented [`Link`] with its own read-loop thread, and hand inbound
//! payloads to a single consumer through an ordered inbox.

pub mod error;
pub mod event;
pub mod link;
pub mod role;
pub mod session;

pub use error::{PeerError, Result};
pub use event::{event_channel, EventReceiver, EventSender, LinkEvent, LinkStatus};
pub use link::{Link, READ_BUFFER_SIZE};
pub use role::{resolve, GroupInfo, Role, RoleAssignment};
pub use session::{Session, SessionConfig};
