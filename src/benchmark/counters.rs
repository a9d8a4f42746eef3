//! Per-worker counters
//!
//! Each worker owns one `WorkerCounters` behind an `Arc`. The worker is the
//! only writer; the coordinator and the progress reporter are concurrent
//! readers, which is why the cells are atomics rather than plain fields.
//! Counters are per-worker, so there is no cross-worker write contention.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Counters for a single benchmark connection
#[derive(Debug, Default)]
pub struct WorkerCounters {
    /// Completed queries, monotonically non-decreasing during a run
    queries: AtomicU64,

    /// Cumulative wall-clock time spent strictly inside query execution,
    /// in nanoseconds. Reconnect time is never added here.
    total_query_ns: AtomicU64,

    /// Latency of the most recent query, for live telemetry
    last_query_ns: AtomicU64,
}

impl WorkerCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed query and its measured execution time.
    pub fn record(&self, elapsed: Duration) {
        let ns = elapsed.as_nanos() as u64;
        self.queries.fetch_add(1, Ordering::Relaxed);
        self.total_query_ns.fetch_add(ns, Ordering::Relaxed);
        self.last_query_ns.store(ns, Ordering::Relaxed);
    }

    /// Number of completed queries so far
    pub fn queries(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }

    /// Cumulative time spent executing queries
    pub fn total_query_time(&self) -> Duration {
        Duration::from_nanos(self.total_query_ns.load(Ordering::Relaxed))
    }

    /// Latency of the most recently completed query
    pub fn last_query_time(&self) -> Duration {
        Duration::from_nanos(self.last_query_ns.load(Ordering::Relaxed))
    }

    /// Mean query execution time, `None` until at least one query completed
    pub fn average_query_time(&self) -> Option<Duration> {
        let queries = self.queries.load(Ordering::Relaxed);
        if queries == 0 {
            return None;
        }
        Some(Duration::from_nanos(
            self.total_query_ns.load(Ordering::Relaxed) / queries,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_record_accumulates() {
        let counters = WorkerCounters::new();

        counters.record(Duration::from_millis(2));
        counters.record(Duration::from_millis(4));

        assert_eq!(counters.queries(), 2);
        assert_eq!(counters.total_query_time(), Duration::from_millis(6));
        assert_eq!(counters.last_query_time(), Duration::from_millis(4));
        assert_eq!(
            counters.average_query_time(),
            Some(Duration::from_millis(3))
        );
    }

    #[test]
    fn test_average_guards_zero_queries() {
        let counters = WorkerCounters::new();
        assert_eq!(counters.average_query_time(), None);
    }

    #[test]
    fn test_readable_while_writer_active() {
        let counters = Arc::new(WorkerCounters::new());

        let writer = {
            let c = Arc::clone(&counters);
            thread::spawn(move || {
                for _ in 0..1000 {
                    c.record(Duration::from_micros(10));
                }
            })
        };

        // Concurrent reads must only ever observe consistent monotonic counts.
        let mut last = 0;
        while !writer.is_finished() {
            let now = counters.queries();
            assert!(now >= last);
            last = now;
        }
        writer.join().unwrap();

        assert_eq!(counters.queries(), 1000);
        assert_eq!(counters.total_query_time(), Duration::from_millis(10));
    }
}
