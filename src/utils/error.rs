//! Error types for sqlbench

use std::io;
use thiserror::Error;

/// Boxed driver-level error, kept type-erased so the connection seam does
/// not leak a specific database client into the benchmark engine.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level application error
#[derive(Error, Debug)]
pub enum BenchmarkError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("connection error: {0}")]
    Connect(#[from] ConnectError),

    #[error("worker error: {0}")]
    Worker(#[from] WorkerError),

    #[error("worker task panicked")]
    WorkerPanic,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid configuration file: {0}")]
    ConfigFile(#[from] serde_yaml::Error),
}

/// Connection open/liveness/close errors
#[derive(Error, Debug)]
pub enum ConnectError {
    #[error("failed to open connection: {0}")]
    Open(#[source] BoxError),

    #[error("liveness check failed: {0}")]
    Ping(#[source] BoxError),

    #[error("failed to close connection: {0}")]
    Close(#[source] BoxError),
}

/// A query or result-drain failure during the timed loop.
///
/// Always fatal to the run: the loop never retries or skips a failed
/// iteration.
#[derive(Error, Debug)]
#[error("query execution failed: {0}")]
pub struct QueryError(#[source] pub BoxError);

/// Errors surfaced by a worker's run loop
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Fatal: aborts the whole benchmark, no statistics are reported.
    #[error("connection {worker}: {source}")]
    Query {
        worker: usize,
        #[source]
        source: QueryError,
    },

    /// Worker-local: ends this worker's loop early, siblings keep running.
    #[error("connection {worker}: reconnect failed: {source}")]
    Reconnect {
        worker: usize,
        #[source]
        source: ConnectError,
    },
}

pub type Result<T> = std::result::Result<T, BenchmarkError>;
