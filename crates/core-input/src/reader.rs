use crate::{log_translated, translate};
use core_events::{Event, EventSender, EventSource, PushOutcome, Shutdown};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{info, warn};

/// Upper bound on how long the reader blocks before re-checking shutdown.
pub const READ_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// [`EventSource`] reading crossterm events from the controlling terminal.
#[derive(Debug, Clone, Copy)]
pub struct TerminalReader {
    poll_interval: Duration,
}

impl TerminalReader {
    pub fn new() -> Self {
        Self {
            poll_interval: READ_POLL_INTERVAL,
        }
    }
}

impl Default for TerminalReader {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for TerminalReader {
    fn name(&self) -> &'static str {
        "terminal-reader"
    }

    fn spawn(self: Box<Self>, tx: EventSender, shutdown: Shutdown) -> std::io::Result<JoinHandle<()>> {
        let poll_interval = self.poll_interval;
        thread::Builder::new()
            .name("tessel-input".into())
            .spawn(move || {
                read_loop(&tx, &shutdown, poll_interval);
                info!(target: "input", "terminal reader stopped");
            })
    }
}

fn read_loop(tx: &EventSender, shutdown: &Shutdown, poll_interval: Duration) {
    while !shutdown.is_triggered() {
        let ready = match crossterm::event::poll(poll_interval) {
            Ok(ready) => ready,
            Err(e) => {
                warn!(target: "input", error = %e, "terminal_poll_failed");
                tx.push(Event::Quit);
                return;
            }
        };
        if !ready {
            continue;
        }
        let raw = match crossterm::event::read() {
            Ok(raw) => raw,
            Err(e) => {
                // input stream is gone; let the loop shut down cleanly
                warn!(target: "input", error = %e, "terminal_read_failed");
                tx.push(Event::Quit);
                return;
            }
        };
        let Some(ev) = translate(raw) else {
            continue;
        };
        log_translated(&ev);
        if tx.push(ev) == PushOutcome::Closed {
            return;
        }
    }
}
