//! sqlx-backed connection factory
//!
//! Uses the sqlx `Any` driver so one code path serves both Postgres and
//! MySQL: the DSN URL scheme picks the driver, everything else rides in the
//! URL.

use std::sync::Once;

use async_trait::async_trait;
use sqlx::{AnyConnection, Connection, Executor};

use super::{BenchmarkConnection, ConnectionFactory};
use crate::utils::{ConnectError, QueryError};

static INSTALL_DRIVERS: Once = Once::new();

/// Factory producing one `AnyConnection` per call from a fixed DSN.
#[derive(Debug, Clone)]
pub struct SqlConnectionFactory {
    dsn: String,
}

impl SqlConnectionFactory {
    pub fn new(dsn: impl Into<String>) -> Self {
        // sqlx requires the compiled-in Any drivers to be registered before
        // the first connect; guard so repeated factories stay safe.
        INSTALL_DRIVERS.call_once(sqlx::any::install_default_drivers);
        Self { dsn: dsn.into() }
    }

    pub fn dsn(&self) -> &str {
        &self.dsn
    }
}

#[async_trait]
impl ConnectionFactory for SqlConnectionFactory {
    type Conn = SqlConnection;

    async fn connect(&self) -> Result<SqlConnection, ConnectError> {
        let mut conn = AnyConnection::connect(&self.dsn)
            .await
            .map_err(|e| ConnectError::Open(e.into()))?;
        conn.ping()
            .await
            .map_err(|e| ConnectError::Ping(e.into()))?;
        Ok(SqlConnection { conn })
    }
}

/// A single live session on the benchmarked database.
pub struct SqlConnection {
    conn: AnyConnection,
}

#[async_trait]
impl BenchmarkConnection for SqlConnection {
    async fn execute(&mut self, query: &str) -> Result<(), QueryError> {
        // fetch_all drains the full result set; rows are dropped unread.
        let rows = (&mut self.conn)
            .fetch_all(query)
            .await
            .map_err(|e| QueryError(e.into()))?;
        drop(rows);
        Ok(())
    }

    async fn close(self) -> Result<(), ConnectError> {
        self.conn
            .close()
            .await
            .map_err(|e| ConnectError::Close(e.into()))
    }
}
