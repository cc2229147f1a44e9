use std::net::IpAddr;
use std::time::Duration;

use clap::{Args, Subcommand};
use meshlink_transport::TRANSPORT_PORT;

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod host;
pub mod join;
pub mod ping;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run as group owner: listen, accept one peer, then chat.
    Host(HostArgs),
    /// Run as client: connect to the host, then chat.
    Join(JoinArgs),
    /// Round-trip probe against a host running with --echo.
    Ping(PingArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Host(args) => host::run(args, format),
        Command::Join(args) => join::run(args, format),
        Command::Ping(args) => ping::run(args, format),
        Command::Version(args) => version::run(args, format),
    }
}

#[derive(Args, Debug)]
pub struct HostArgs {
    /// Port to listen on.
    #[arg(long, short = 'p', default_value_t = TRANSPORT_PORT)]
    pub port: u16,
    /// Reflect every inbound payload back to the sender.
    #[arg(long)]
    pub echo: bool,
}

#[derive(Args, Debug)]
pub struct JoinArgs {
    /// Host address to connect to.
    pub address: IpAddr,
    /// Port the host listens on.
    #[arg(long, short = 'p', default_value_t = TRANSPORT_PORT)]
    pub port: u16,
    /// Connection timeout (e.g. 500ms, 2s).
    #[arg(long, default_value = "500ms")]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct PingArgs {
    /// Host address to probe.
    pub address: IpAddr,
    /// Port the host listens on.
    #[arg(long, short = 'p', default_value_t = TRANSPORT_PORT)]
    pub port: u16,
    /// Number of probes to send.
    #[arg(long, short = 'c', default_value_t = 4)]
    pub count: u32,
    /// Connection timeout (e.g. 500ms, 2s).
    #[arg(long, default_value = "500ms")]
    pub timeout: String,
    /// Maximum time to wait for each reply (e.g. 2s, 500ms).
    #[arg(long, default_value = "2s")]
    pub wait_timeout: String,
}

#[derive(Args, Debug, Default)]
pub struct VersionArgs {}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        _ => Err(CliError::new(
            USAGE,
            format!("unsupported duration unit: {unit}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("bad").is_err());
        assert!(parse_duration("").is_err());
    }
}
