use std::io::{IsTerminal, Write};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use meshlink_peer::LinkStatus;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct MessageOutput<'a> {
    event: &'a str,
    from: &'a str,
    payload_size: usize,
    payload: String,
    timestamp: String,
}

/// Print one inbound payload. `from` names the peer it came from.
pub fn print_message(payload: &[u8], from: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = MessageOutput {
                event: "message",
                from,
                payload_size: payload.len(),
                payload: payload_preview(payload),
                timestamp: now_unix_seconds(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FROM", "SIZE", "PAYLOAD"])
                .add_row(vec![
                    from.to_string(),
                    payload.len().to_string(),
                    payload_preview(payload),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("[{from}] {}", payload_preview(payload));
        }
        OutputFormat::Raw => {
            print_raw(payload);
        }
    }
}

#[derive(Serialize)]
struct StatusOutput<'a> {
    event: &'a str,
    status: String,
    timestamp: String,
}

/// Print a connection status transition. Silent in raw mode, where stdout
/// carries payload bytes only.
pub fn print_status(status: LinkStatus, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = StatusOutput {
                event: "status",
                status: status.to_string(),
                timestamp: now_unix_seconds(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("status: {status}");
        }
        OutputFormat::Raw => {}
    }
}

#[derive(Serialize)]
struct PongOutput<'a> {
    event: &'a str,
    seq: u32,
    payload_size: usize,
    rtt_ms: f64,
}

/// Print one round-trip probe result.
pub fn print_pong(seq: u32, payload_size: usize, rtt: Duration, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = PongOutput {
                event: "pong",
                seq,
                payload_size,
                rtt_ms: rtt.as_secs_f64() * 1000.0,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        _ => {
            println!(
                "reply: seq={seq} bytes={payload_size} time={:.2}ms",
                rtt.as_secs_f64() * 1000.0
            );
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn payload_preview(payload: &[u8]) -> String {
    match std::str::from_utf8(payload) {
        Ok(text) => text.to_string(),
        Err(_) => format!("<binary {} bytes>", payload.len()),
    }
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
