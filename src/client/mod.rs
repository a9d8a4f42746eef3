//! Database connection seam
//!
//! The benchmark engine never talks to a database client directly; it drives
//! these two traits. `SqlConnectionFactory` is the production implementation
//! (sqlx Any driver, Postgres or MySQL selected by the DSN scheme); the mock
//! implementation lives in `mock` and is compiled for tests only.

use async_trait::async_trait;

use crate::utils::{ConnectError, QueryError};

pub mod sql;

#[cfg(test)]
pub(crate) mod mock;

pub use sql::{SqlConnection, SqlConnectionFactory};

/// Opens fresh connections. Each worker owns a clone and uses it for the
/// initial connect and for every reconnect cycle.
#[async_trait]
pub trait ConnectionFactory: Clone + Send + Sync + 'static {
    type Conn: BenchmarkConnection;

    /// Open a connection and verify liveness with a round-trip ping.
    async fn connect(&self) -> Result<Self::Conn, ConnectError>;
}

/// One live database session, exclusively owned by a single worker.
#[async_trait]
pub trait BenchmarkConnection: Send + 'static {
    /// Execute the statement and fully drain its result set. Failure to
    /// drain counts as a query failure.
    async fn execute(&mut self, query: &str) -> Result<(), QueryError>;

    /// Graceful protocol-level close, consuming the session.
    async fn close(self) -> Result<(), ConnectError>;
}
