mod chat;
mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "meshlink", version, about = "Peer-to-peer group messaging CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_host_subcommand() {
        let cli = Cli::try_parse_from(["meshlink", "host", "--port", "9000", "--echo"])
            .expect("host args should parse");

        match cli.command {
            Command::Host(args) => {
                assert_eq!(args.port, 9000);
                assert!(args.echo);
            }
            other => panic!("expected host command, got {other:?}"),
        }
    }

    #[test]
    fn host_defaults_to_transport_port() {
        let cli = Cli::try_parse_from(["meshlink", "host"]).expect("host args should parse");

        match cli.command {
            Command::Host(args) => {
                assert_eq!(args.port, meshlink_transport::TRANSPORT_PORT);
                assert!(!args.echo);
            }
            other => panic!("expected host command, got {other:?}"),
        }
    }

    #[test]
    fn parses_join_subcommand() {
        let cli = Cli::try_parse_from([
            "meshlink",
            "join",
            "192.168.49.1",
            "--timeout",
            "250ms",
        ])
        .expect("join args should parse");

        match cli.command {
            Command::Join(args) => {
                assert_eq!(args.address, "192.168.49.1".parse::<std::net::IpAddr>().unwrap());
                assert_eq!(args.timeout, "250ms");
            }
            other => panic!("expected join command, got {other:?}"),
        }
    }

    #[test]
    fn join_requires_an_address() {
        let err = Cli::try_parse_from(["meshlink", "join"]).expect_err("missing address should fail");
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn join_rejects_a_hostname() {
        assert!(Cli::try_parse_from(["meshlink", "join", "not-an-ip"]).is_err());
    }

    #[test]
    fn parses_ping_subcommand() {
        let cli = Cli::try_parse_from(["meshlink", "ping", "10.0.0.7", "--count", "2"])
            .expect("ping args should parse");

        match cli.command {
            Command::Ping(args) => {
                assert_eq!(args.count, 2);
                assert_eq!(args.port, meshlink_transport::TRANSPORT_PORT);
            }
            other => panic!("expected ping command, got {other:?}"),
        }
    }
}
