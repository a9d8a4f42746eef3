//! Benchmark worker
//!
//! Each worker owns exactly one live connection and runs one timed query
//! loop for its lifetime. The deadline is checked only between iterations:
//! a slow query is never interrupted, so a worker's wall-clock run time is
//! the configured duration plus the latency of whatever query was in flight
//! when the deadline was crossed. That is a deliberate throughput/simplicity
//! tradeoff, not a timeout guarantee.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use super::counters::WorkerCounters;
use crate::client::{BenchmarkConnection, ConnectionFactory};
use crate::utils::{ConnectError, WorkerError};

/// One benchmark connection and its timed query loop
pub struct ConnectionWorker<F: ConnectionFactory> {
    id: usize,
    factory: F,
    conn: F::Conn,
    query: String,
    reconnect: bool,
    counters: Arc<WorkerCounters>,
}

impl<F: ConnectionFactory> ConnectionWorker<F> {
    /// Open (and ping) one connection via the factory.
    pub async fn connect(
        id: usize,
        factory: F,
        query: String,
        reconnect: bool,
    ) -> Result<Self, ConnectError> {
        let conn = factory.connect().await?;
        Ok(Self {
            id,
            factory,
            conn,
            query,
            reconnect,
            counters: Arc::new(WorkerCounters::new()),
        })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Live handle to this worker's counters, safe to read during the run.
    pub fn counters(&self) -> Arc<WorkerCounters> {
        Arc::clone(&self.counters)
    }

    /// Run the timed query loop until the deadline, consuming the worker.
    ///
    /// The connection is closed on every exit path. A query failure is
    /// fatal and propagated; a reconnect failure ends this worker's loop
    /// early without touching its siblings. Whatever was counted before an
    /// early exit stays in the counters.
    pub async fn run(mut self, duration: Duration) -> Result<(), WorkerError> {
        let deadline = Instant::now() + duration;

        while Instant::now() < deadline {
            let started = Instant::now();
            if let Err(source) = self.conn.execute(&self.query).await {
                let _ = self.conn.close().await;
                return Err(WorkerError::Query {
                    worker: self.id,
                    source,
                });
            }
            self.counters.record(started.elapsed());

            if self.reconnect {
                // Tear down and re-establish the session so connection
                // setup cost is part of the workload. Not timed: the
                // counters only measure query execution.
                self.conn
                    .close()
                    .await
                    .map_err(|source| WorkerError::Reconnect {
                        worker: self.id,
                        source,
                    })?;
                self.conn =
                    self.factory
                        .connect()
                        .await
                        .map_err(|source| WorkerError::Reconnect {
                            worker: self.id,
                            source,
                        })?;
            }
        }

        if let Err(e) = self.conn.close().await {
            debug!(worker = self.id, error = %e, "close after run failed");
        }
        Ok(())
    }
}
