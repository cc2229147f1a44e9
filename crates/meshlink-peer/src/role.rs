use std::fmt;
use std::net::IpAddr;

/// Which side of the connection this device runs.
///
/// Determined once per session from group-formation facts; immutable
/// afterward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Group owner: listens for the incoming connection.
    Host,
    /// Group member: initiates the connection to the owner.
    Client,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Host => f.write_str("host"),
            Role::Client => f.write_str("client"),
        }
    }
}

/// Group-formation facts supplied by the discovery collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupInfo {
    /// Whether the peer-to-peer group exists yet.
    pub group_formed: bool,
    /// Whether this device was elected group owner.
    pub is_owner: bool,
    /// The owner's network address, when known.
    pub owner_address: Option<IpAddr>,
}

/// The resolved role plus the address to connect to (client role only).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleAssignment {
    pub role: Role,
    pub peer_address: Option<IpAddr>,
}

/// Decide whether this device runs as listener or connector.
///
/// Pure decision function: no side effects, and deterministic for a given
/// `GroupInfo`. Returns `None` until the group is formed — the caller must
/// not proceed to connection setup. A client assignment with a missing owner
/// address is passed through unchanged; the connect path surfaces it, not
/// this function.
pub fn resolve(info: &GroupInfo) -> Option<RoleAssignment> {
    if !info.group_formed {
        return None;
    }

    if info.is_owner {
        Some(RoleAssignment {
            role: Role::Host,
            peer_address: None,
        })
    } else {
        Some(RoleAssignment {
            role: Role::Client,
            peer_address: info.owner_address,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner_addr() -> IpAddr {
        "192.168.49.1".parse().expect("address should parse")
    }

    #[test]
    fn unformed_group_resolves_nothing() {
        let info = GroupInfo {
            group_formed: false,
            is_owner: true,
            owner_address: Some(owner_addr()),
        };
        assert_eq!(resolve(&info), None);
    }

    #[test]
    fn owner_resolves_to_host_without_peer_address() {
        let info = GroupInfo {
            group_formed: true,
            is_owner: true,
            owner_address: Some(owner_addr()),
        };
        let assignment = resolve(&info).expect("formed group should resolve");
        assert_eq!(assignment.role, Role::Host);
        assert_eq!(assignment.peer_address, None);
    }

    #[test]
    fn member_resolves_to_client_with_owner_address() {
        let info = GroupInfo {
            group_formed: true,
            is_owner: false,
            owner_address: Some(owner_addr()),
        };
        let assignment = resolve(&info).expect("formed group should resolve");
        assert_eq!(assignment.role, Role::Client);
        assert_eq!(assignment.peer_address, Some(owner_addr()));
    }

    #[test]
    fn missing_owner_address_passes_through() {
        let info = GroupInfo {
            group_formed: true,
            is_owner: false,
            owner_address: None,
        };
        let assignment = resolve(&info).expect("formed group should resolve");
        assert_eq!(assignment.role, Role::Client);
        assert_eq!(assignment.peer_address, None);
    }

    #[test]
    fn resolution_is_deterministic() {
        let info = GroupInfo {
            group_formed: true,
            is_owner: false,
            owner_address: Some(owner_addr()),
        };
        let first = resolve(&info);
        for _ in 0..16 {
            assert_eq!(resolve(&info), first);
        }
    }
}
