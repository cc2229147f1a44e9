use meshlink_peer::{resolve, GroupInfo, Session, SessionConfig};

use crate::chat;
use crate::cmd::{parse_duration, JoinArgs};
use crate::exit::{peer_error, CliError, CliResult, INTERNAL};
use crate::output::OutputFormat;

pub fn run(args: JoinArgs, format: OutputFormat) -> CliResult<i32> {
    let connect_timeout = parse_duration(&args.timeout)?;

    let info = GroupInfo {
        group_formed: true,
        is_owner: false,
        owner_address: Some(args.address),
    };
    let assignment =
        resolve(&info).ok_or_else(|| CliError::new(INTERNAL, "group not formed"))?;

    let config = SessionConfig {
        port: args.port,
        connect_timeout,
    };

    let session = Session::establish(&assignment, &config)
        .map_err(|err| peer_error("connect failed", err))?;

    chat::run(session, false, format)
}
