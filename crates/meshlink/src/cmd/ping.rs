use std::sync::mpsc::RecvTimeoutError;
use std::time::Instant;

use meshlink_peer::{LinkEvent, LinkStatus, Session, SessionConfig};

use crate::cmd::{parse_duration, PingArgs};
use crate::exit::{peer_error, CliError, CliResult, FAILURE, SUCCESS, TIMEOUT};
use crate::output::{print_pong, OutputFormat};

/// Round-trip probe. Requires the host side to run with `--echo` so every
/// probe payload comes straight back.
pub fn run(args: PingArgs, format: OutputFormat) -> CliResult<i32> {
    let connect_timeout = parse_duration(&args.timeout)?;
    let wait_timeout = parse_duration(&args.wait_timeout)?;

    let config = SessionConfig {
        port: args.port,
        connect_timeout,
    };
    let session =
        Session::join(args.address, &config).map_err(|err| peer_error("connect failed", err))?;

    for seq in 0..args.count {
        let probe = format!("ping-{seq}");
        let start = Instant::now();
        session
            .send(probe.as_bytes())
            .map_err(|err| peer_error("send failed", err))?;

        loop {
            match session.events().recv_timeout(wait_timeout) {
                Ok(LinkEvent::Message(reply)) => {
                    if reply.as_ref() != probe.as_bytes() {
                        return Err(CliError::new(
                            FAILURE,
                            format!("probe {seq} came back altered"),
                        ));
                    }
                    print_pong(seq, reply.len(), start.elapsed(), format);
                    break;
                }
                Ok(LinkEvent::Status(LinkStatus::Disconnected)) => {
                    return Err(CliError::new(FAILURE, "peer disconnected during ping"));
                }
                Ok(LinkEvent::Status(_)) => continue,
                Err(RecvTimeoutError::Timeout) => {
                    return Err(CliError::new(
                        TIMEOUT,
                        format!("no reply to probe {seq} within {}", args.wait_timeout),
                    ));
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(CliError::new(FAILURE, "peer disconnected during ping"));
                }
            }
        }
    }

    session.close();
    Ok(SUCCESS)
}
