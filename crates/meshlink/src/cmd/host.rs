use meshlink_peer::{resolve, GroupInfo, Session, SessionConfig};
use tracing::info;

use crate::chat;
use crate::cmd::HostArgs;
use crate::exit::{peer_error, CliError, CliResult, INTERNAL};
use crate::output::OutputFormat;

pub fn run(args: HostArgs, format: OutputFormat) -> CliResult<i32> {
    let info = GroupInfo {
        group_formed: true,
        is_owner: true,
        owner_address: None,
    };
    let assignment =
        resolve(&info).ok_or_else(|| CliError::new(INTERNAL, "group not formed"))?;

    let config = SessionConfig {
        port: args.port,
        ..SessionConfig::default()
    };

    info!(port = args.port, "waiting for a peer to join");
    let session = Session::establish(&assignment, &config)
        .map_err(|err| peer_error("session setup failed", err))?;

    chat::run(session, args.echo, format)
}
