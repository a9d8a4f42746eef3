//! Benchmark engine
//!
//! The concurrent core of the tool:
//! - WorkerCounters: per-connection atomic counters, readable live
//! - ConnectionWorker: one connection driving the timed query loop
//! - BenchmarkCoordinator: spawns workers, joins them, aggregates results

pub mod coordinator;
pub mod counters;
pub mod worker;

pub use coordinator::BenchmarkCoordinator;
pub use counters::WorkerCounters;
pub use worker::ConnectionWorker;
