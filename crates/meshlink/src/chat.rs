use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use meshlink_peer::{LinkEvent, LinkStatus, Role, Session};
use tracing::debug;

use crate::exit::{peer_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_message, print_status, OutputFormat};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// The single-threaded consumer loop shared by the host and join commands.
///
/// One thread drains the session inbox and issues all sends; stdin lines
/// arrive through a side channel fed by a dedicated reader thread. The loop
/// ends on peer disconnect or Ctrl-C. With `echo` set, every inbound payload
/// is reflected back to the sender before being printed.
pub fn run(session: Session, echo: bool, format: OutputFormat) -> CliResult<i32> {
    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let peer_label = match session.role() {
        Role::Host => "client",
        Role::Client => "host",
    };

    let outgoing = spawn_stdin_reader();
    let mut stdin_open = true;

    while running.load(Ordering::SeqCst) {
        if stdin_open {
            loop {
                match outgoing.try_recv() {
                    Ok(line) => session
                        .send(line.as_bytes())
                        .map_err(|err| peer_error("send failed", err))?,
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        // Stdin closed; keep draining inbound traffic.
                        stdin_open = false;
                        break;
                    }
                }
            }
        }

        match session.events().recv_timeout(POLL_INTERVAL) {
            Ok(LinkEvent::Message(payload)) => {
                if echo {
                    session
                        .send(&payload)
                        .map_err(|err| peer_error("echo failed", err))?;
                }
                print_message(&payload, peer_label, format);
            }
            Ok(LinkEvent::Status(status)) => {
                print_status(status, format);
                if status == LinkStatus::Disconnected {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                debug!("inbox drained after link shutdown");
                break;
            }
        }
    }

    session.close();
    Ok(SUCCESS)
}

fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });
    rx
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
