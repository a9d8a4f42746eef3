//! sqlbench library
//!
//! Concurrent SQL query throughput benchmark: N workers, one connection
//! each, hammering a configured query for a fixed duration, with
//! per-connection counters aggregated into total queries, queries/sec and
//! average query time.

pub mod benchmark;
pub mod client;
pub mod config;
pub mod utils;
