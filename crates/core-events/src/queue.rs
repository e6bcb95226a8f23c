//! Bounded multi-producer queue and the thread event sources feeding it.
//!
//! Policy: pushes never block. When the queue is full the *newest* event is
//! dropped and counted, so a stalled consumer can never wedge the terminal
//! reader. The consumer drains everything available once per tick and
//! applies events in arrival order.
//!
//! Telemetry: each queue carries its own [`QueueStats`]; the process-wide
//! statics below aggregate over every queue (relaxed atomics, no locking).

use crate::Event;
use crossbeam_channel::{Receiver, Sender, TrySendError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, info};

pub static EVENTS_QUEUED: AtomicU64 = AtomicU64::new(0);
pub static EVENTS_DROPPED: AtomicU64 = AtomicU64::new(0);
pub static EVENTS_DRAINED: AtomicU64 = AtomicU64::new(0);

/// Per-queue counters shared by every sender clone and the receiver.
#[derive(Debug, Default)]
pub struct QueueStats {
    queued: AtomicU64,
    dropped: AtomicU64,
    drained: AtomicU64,
}

impl QueueStats {
    pub fn queued(&self) -> u64 {
        self.queued.load(Ordering::Relaxed)
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn drained(&self) -> u64 {
        self.drained.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Queued,
    /// Queue full; the pushed event was discarded.
    Dropped,
    /// Consumer is gone; producers should stop.
    Closed,
}

/// Create a bounded queue holding at most `capacity` events (minimum 1).
pub fn event_queue(capacity: usize) -> (EventSender, EventReceiver) {
    let (tx, rx) = crossbeam_channel::bounded(capacity.max(1));
    let stats = Arc::new(QueueStats::default());
    (
        EventSender {
            tx,
            stats: stats.clone(),
        },
        EventReceiver { rx, stats },
    )
}

#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Sender<Event>,
    stats: Arc<QueueStats>,
}

impl EventSender {
    /// Non-blocking push with drop-newest on overflow.
    pub fn push(&self, event: Event) -> PushOutcome {
        match self.tx.try_send(event) {
            Ok(()) => {
                self.stats.queued.fetch_add(1, Ordering::Relaxed);
                EVENTS_QUEUED.fetch_add(1, Ordering::Relaxed);
                PushOutcome::Queued
            }
            Err(TrySendError::Full(event)) => {
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                EVENTS_DROPPED.fetch_add(1, Ordering::Relaxed);
                debug!(
                    target: "events.queue",
                    kind = event.kind(),
                    dropped_total = self.stats.dropped(),
                    "queue full, dropping newest"
                );
                PushOutcome::Dropped
            }
            Err(TrySendError::Disconnected(_)) => PushOutcome::Closed,
        }
    }

    pub fn stats(&self) -> &QueueStats {
        &self.stats
    }
}

#[derive(Debug)]
pub struct EventReceiver {
    rx: Receiver<Event>,
    stats: Arc<QueueStats>,
}

impl EventReceiver {
    /// Take every event currently queued, oldest first.
    pub fn drain(&self) -> Vec<Event> {
        let events: Vec<Event> = self.rx.try_iter().collect();
        if !events.is_empty() {
            let n = events.len() as u64;
            self.stats.drained.fetch_add(n, Ordering::Relaxed);
            EVENTS_DRAINED.fetch_add(n, Ordering::Relaxed);
        }
        events
    }

    /// Block up to `timeout` for one event.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Event> {
        let event = self.rx.recv_timeout(timeout).ok()?;
        self.stats.drained.fetch_add(1, Ordering::Relaxed);
        EVENTS_DRAINED.fetch_add(1, Ordering::Relaxed);
        Some(event)
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.rx.capacity()
    }

    pub fn stats(&self) -> &QueueStats {
        &self.stats
    }
}

/// Cooperative stop signal shared with every producer thread.
#[derive(Debug, Clone, Default)]
pub struct Shutdown(Arc<AtomicBool>);

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A producer running on its own thread.
///
/// Implementors stop when [`EventSender::push`] reports [`PushOutcome::Closed`]
/// or when `shutdown` is triggered, and must not busy-loop: poll with a
/// timeout or sleep between checks.
pub trait EventSource: Send + 'static {
    /// Stable identifier used for the thread name and logs.
    fn name(&self) -> &'static str;
    /// Consume the source and start its thread.
    fn spawn(self: Box<Self>, tx: EventSender, shutdown: Shutdown) -> std::io::Result<JoinHandle<()>>;
}

/// Registered sources, started together once the queue exists.
#[derive(Default)]
pub struct EventSourceRegistry {
    sources: Vec<Box<dyn EventSource>>,
}

impl EventSourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<S: EventSource>(&mut self, src: S) {
        self.sources.push(Box::new(src));
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Start every registered source; each receives its own sender clone.
    /// Sources are drained from the registry so a second call starts nothing.
    pub fn spawn_all(
        &mut self,
        tx: &EventSender,
        shutdown: &Shutdown,
    ) -> anyhow::Result<Vec<JoinHandle<()>>> {
        let mut out = Vec::with_capacity(self.sources.len());
        for src in self.sources.drain(..) {
            let name = src.name();
            info!(target: "events.queue", source = name, "spawning event source");
            let handle = src
                .spawn(tx.clone(), shutdown.clone())
                .map_err(|e| anyhow::anyhow!("failed to spawn event source `{name}`: {e}"))?;
            out.push(handle);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KeyEvent;
    use std::thread;

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::from_char(c))
    }

    #[test]
    fn full_queue_drops_newest() {
        let (tx, rx) = event_queue(2);
        assert_eq!(tx.push(key('a')), PushOutcome::Queued);
        assert_eq!(tx.push(key('b')), PushOutcome::Queued);
        assert_eq!(tx.push(key('c')), PushOutcome::Dropped);
        assert_eq!(rx.drain(), vec![key('a'), key('b')]);
        assert_eq!(tx.stats().queued(), 2);
        assert_eq!(tx.stats().dropped(), 1);
        assert_eq!(rx.stats().drained(), 2);
        assert!(rx.is_empty());
    }

    #[test]
    fn drain_preserves_arrival_order_across_senders() {
        let (tx, rx) = event_queue(16);
        let tx2 = tx.clone();
        tx.push(key('1'));
        tx2.push(Event::Resize {
            width: 10,
            height: 5,
        });
        tx.push(Event::Quit);
        let kinds: Vec<_> = rx.drain().iter().map(Event::kind).collect();
        assert_eq!(kinds, vec!["key", "resize", "quit"]);
    }

    #[test]
    fn push_after_receiver_dropped_reports_closed() {
        let (tx, rx) = event_queue(4);
        drop(rx);
        assert_eq!(tx.push(Event::Quit), PushOutcome::Closed);
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let (tx, rx) = event_queue(0);
        assert_eq!(rx.capacity(), Some(1));
        assert_eq!(tx.push(Event::Quit), PushOutcome::Queued);
    }

    struct OnceSource;

    impl EventSource for OnceSource {
        fn name(&self) -> &'static str {
            "once"
        }
        fn spawn(
            self: Box<Self>,
            tx: EventSender,
            _shutdown: Shutdown,
        ) -> std::io::Result<JoinHandle<()>> {
            thread::Builder::new().name("once".into()).spawn(move || {
                tx.push(key('z'));
            })
        }
    }

    struct UntilShutdown;

    impl EventSource for UntilShutdown {
        fn name(&self) -> &'static str {
            "until_shutdown"
        }
        fn spawn(
            self: Box<Self>,
            tx: EventSender,
            shutdown: Shutdown,
        ) -> std::io::Result<JoinHandle<()>> {
            thread::Builder::new().name("until".into()).spawn(move || {
                while !shutdown.is_triggered() {
                    if tx.push(Event::Quit) == PushOutcome::Closed {
                        break;
                    }
                    thread::sleep(Duration::from_millis(1));
                }
            })
        }
    }

    #[test]
    fn registry_spawns_and_sources_stop() {
        let (tx, rx) = event_queue(1024);
        let shutdown = Shutdown::new();
        let mut reg = EventSourceRegistry::new();
        reg.register(OnceSource);
        reg.register(UntilShutdown);
        assert_eq!(reg.len(), 2);
        let handles = reg.spawn_all(&tx, &shutdown).unwrap();
        assert!(reg.is_empty());
        let first = rx.recv_timeout(Duration::from_secs(2));
        assert!(first.is_some());
        shutdown.trigger();
        for h in handles {
            h.join().unwrap();
        }
        let events = rx.drain();
        assert!(
            events.contains(&key('z')) || first == Some(key('z')),
            "once source delivered its event"
        );
    }
}
