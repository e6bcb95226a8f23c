//! Resize watcher: a producer thread that polls the terminal size and pushes
//! [`Event::Resize`] when it changes.
//!
//! Polling keeps the watcher portable (no signal handlers); the reader
//! thread in `core-input` also forwards resize events crossterm reports, and
//! a duplicate resize is harmless because layout recomputation is idempotent.

use crate::terminal_size;
use core_events::{Event, EventSender, EventSource, PushOutcome, Shutdown};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info};

pub const RESIZE_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Change detector over successive size samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeTracker {
    last: (u16, u16),
}

impl ResizeTracker {
    pub fn new(initial: (u16, u16)) -> Self {
        Self { last: initial }
    }

    /// Record `size`; returns it when it differs from the previous sample.
    pub fn observe(&mut self, size: (u16, u16)) -> Option<(u16, u16)> {
        if size == self.last {
            return None;
        }
        self.last = size;
        Some(size)
    }
}

/// [`EventSource`] polling the terminal size with a fixed interval.
pub struct ResizeWatcher {
    interval: Duration,
    sample: Box<dyn FnMut() -> (u16, u16) + Send>,
}

impl ResizeWatcher {
    pub fn new() -> Self {
        Self::with_sampler(RESIZE_POLL_INTERVAL, terminal_size)
    }

    /// Watcher over an arbitrary size source.
    pub fn with_sampler(interval: Duration, sample: impl FnMut() -> (u16, u16) + Send + 'static) -> Self {
        Self {
            interval,
            sample: Box::new(sample),
        }
    }
}

impl Default for ResizeWatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for ResizeWatcher {
    fn name(&self) -> &'static str {
        "resize"
    }

    fn spawn(self: Box<Self>, tx: EventSender, shutdown: Shutdown) -> std::io::Result<JoinHandle<()>> {
        let ResizeWatcher {
            interval,
            mut sample,
        } = *self;
        thread::Builder::new()
            .name("tessel-resize".into())
            .spawn(move || {
                let mut tracker = ResizeTracker::new(sample());
                while !shutdown.is_triggered() {
                    thread::sleep(interval);
                    let Some((width, height)) = tracker.observe(sample()) else {
                        continue;
                    };
                    debug!(target: "input", width, height, "resize_detected");
                    if tx.push(Event::Resize { width, height }) == PushOutcome::Closed {
                        break;
                    }
                }
                info!(target: "input", "resize watcher stopped");
            })
    }
}
