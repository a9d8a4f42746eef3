//! In-memory connection seam for tests: fixed latencies, shared
//! open/close/execute counters, and failure injection.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::{BenchmarkConnection, ConnectionFactory};
use crate::utils::{ConnectError, QueryError};

/// Observable side effects shared by every connection a factory opens.
#[derive(Debug, Default)]
pub struct MockState {
    pub opened: AtomicUsize,
    pub closed: AtomicUsize,
    pub executed: AtomicUsize,
}

#[derive(Clone, Default)]
pub struct MockFactory {
    query_latency: Duration,
    connect_latency: Duration,
    /// Queries beyond this global count fail.
    fail_queries_after: Option<usize>,
    /// Connection opens beyond this global count fail.
    fail_opens_after: Option<usize>,
    state: Arc<MockState>,
}

impl MockFactory {
    pub fn new(query_latency: Duration) -> Self {
        Self {
            query_latency,
            ..Self::default()
        }
    }

    pub fn with_connect_latency(mut self, latency: Duration) -> Self {
        self.connect_latency = latency;
        self
    }

    pub fn fail_queries_after(mut self, count: usize) -> Self {
        self.fail_queries_after = Some(count);
        self
    }

    pub fn fail_opens_after(mut self, count: usize) -> Self {
        self.fail_opens_after = Some(count);
        self
    }

    pub fn state(&self) -> Arc<MockState> {
        Arc::clone(&self.state)
    }
}

#[async_trait]
impl ConnectionFactory for MockFactory {
    type Conn = MockConnection;

    async fn connect(&self) -> Result<MockConnection, ConnectError> {
        if let Some(limit) = self.fail_opens_after {
            if self.state.opened.load(Ordering::Relaxed) >= limit {
                return Err(ConnectError::Open(Box::new(io::Error::new(
                    io::ErrorKind::ConnectionRefused,
                    "injected connect failure",
                ))));
            }
        }
        if !self.connect_latency.is_zero() {
            tokio::time::sleep(self.connect_latency).await;
        }
        let generation = self.state.opened.fetch_add(1, Ordering::Relaxed);
        Ok(MockConnection {
            generation,
            query_latency: self.query_latency,
            fail_queries_after: self.fail_queries_after,
            state: Arc::clone(&self.state),
        })
    }
}

pub struct MockConnection {
    /// Distinguishes connection instances across reconnect cycles.
    pub generation: usize,
    query_latency: Duration,
    fail_queries_after: Option<usize>,
    state: Arc<MockState>,
}

#[async_trait]
impl BenchmarkConnection for MockConnection {
    async fn execute(&mut self, _query: &str) -> Result<(), QueryError> {
        let n = self.state.executed.fetch_add(1, Ordering::Relaxed);
        if let Some(limit) = self.fail_queries_after {
            if n >= limit {
                return Err(QueryError(Box::new(io::Error::new(
                    io::ErrorKind::Other,
                    "injected query failure",
                ))));
            }
        }
        if !self.query_latency.is_zero() {
            tokio::time::sleep(self.query_latency).await;
        }
        Ok(())
    }

    async fn close(self) -> Result<(), ConnectError> {
        self.state.closed.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
