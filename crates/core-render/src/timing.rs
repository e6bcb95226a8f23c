//! Render timing: duration of the last frame composition and emission, in
//! nanoseconds. Point samples only.
use std::sync::atomic::{AtomicU64, Ordering};

static LAST_COMPOSE_NS: AtomicU64 = AtomicU64::new(0);
static LAST_WRITE_NS: AtomicU64 = AtomicU64::new(0);

pub fn record_last_compose_ns(ns: u64) {
    LAST_COMPOSE_NS.store(ns, Ordering::Relaxed);
}

pub fn record_last_write_ns(ns: u64) {
    LAST_WRITE_NS.store(ns, Ordering::Relaxed);
}

pub fn last_compose_ns() -> u64 {
    LAST_COMPOSE_NS.load(Ordering::Relaxed)
}

pub fn last_write_ns() -> u64 {
    LAST_WRITE_NS.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_and_load() {
        record_last_compose_ns(1234);
        assert_eq!(last_compose_ns(), 1234);
    }
}
