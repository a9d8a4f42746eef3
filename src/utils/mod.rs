//! Utility modules

pub mod error;

pub use error::{BenchmarkError, BoxError, ConnectError, QueryError, Result, WorkerError};
