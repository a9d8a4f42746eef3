//! Benchmark coordinator
//!
//! Owns the full set of workers, runs them concurrently, and aggregates
//! their counters into benchmark-wide figures. Joining the worker tasks is
//! the sole synchronization point in the system: workers never talk to each
//! other, only their task completion is awaited.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use super::counters::WorkerCounters;
use super::worker::ConnectionWorker;
use crate::client::ConnectionFactory;
use crate::config::BenchmarkConfig;
use crate::utils::{BenchmarkError, Result, WorkerError};

/// Coordinates the concurrent benchmark run
pub struct BenchmarkCoordinator<F: ConnectionFactory> {
    config: BenchmarkConfig,
    workers: Vec<ConnectionWorker<F>>,
    /// Counter handles outliving the workers, which are consumed by `run`
    counters: Vec<Arc<WorkerCounters>>,
}

impl<F: ConnectionFactory> BenchmarkCoordinator<F> {
    /// Establish every connection up front, sequentially.
    ///
    /// The first failed connect aborts construction with that worker's
    /// error; no partial benchmark is run. Connections already opened at
    /// that point are dropped rather than gracefully closed, an accepted
    /// leak since the process is about to exit.
    pub async fn new(factory: F, config: &BenchmarkConfig) -> Result<Self> {
        config.validate()?;

        let mut workers = Vec::with_capacity(config.connections);
        for id in 0..config.connections {
            let worker =
                ConnectionWorker::connect(id, factory.clone(), config.query.clone(), config.reconnect)
                    .await?;
            workers.push(worker);
        }
        let counters = workers.iter().map(|w| w.counters()).collect();

        Ok(Self {
            config: config.clone(),
            workers,
            counters,
        })
    }

    /// Run every worker to completion and apply the error policy.
    ///
    /// A query failure in any worker is fatal: the error is returned and the
    /// caller must not report statistics. A reconnect failure only degrades
    /// that worker's contribution; siblings finish normally and aggregation
    /// proceeds over whatever was accumulated.
    pub async fn run(&mut self) -> Result<()> {
        let workers = std::mem::take(&mut self.workers);
        if workers.is_empty() {
            return Err(BenchmarkError::Config(
                "benchmark has already run".to_string(),
            ));
        }

        let done = Arc::new(AtomicBool::new(false));
        let reporter = if !self.config.quiet {
            Some(tokio::spawn(report_progress(
                self.counters.clone(),
                self.config.duration,
                Arc::clone(&done),
            )))
        } else {
            None
        };

        let duration = self.config.duration;
        let handles: Vec<_> = workers
            .into_iter()
            .map(|worker| tokio::spawn(worker.run(duration)))
            .collect();

        // Counting barrier: every worker is joined exactly once, whatever
        // its exit path was.
        let mut fatal: Option<WorkerError> = None;
        let mut panicked = false;
        for handle in handles {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(err @ WorkerError::Reconnect { .. })) => warn!("{err}"),
                Ok(Err(err)) => {
                    if fatal.is_none() {
                        fatal = Some(err);
                    }
                }
                Err(_) => panicked = true,
            }
        }

        done.store(true, Ordering::Relaxed);
        if let Some(reporter) = reporter {
            let _ = reporter.await;
        }

        if let Some(err) = fatal {
            return Err(err.into());
        }
        if panicked {
            return Err(BenchmarkError::WorkerPanic);
        }
        Ok(())
    }

    /// Total queries across all workers.
    ///
    /// Stable once `run` has returned; mid-run it is a non-atomic snapshot
    /// used only for live telemetry.
    pub fn queries(&self) -> u64 {
        self.counters.iter().map(|c| c.queries()).sum()
    }

    /// Throughput over the *nominal* configured duration, not the measured
    /// wall-clock time (which may be longer when queries overrun the
    /// deadline).
    pub fn queries_per_second(&self) -> f64 {
        self.queries() as f64 / self.config.duration.as_secs_f64()
    }

    /// Unweighted arithmetic mean of the per-worker average query times.
    ///
    /// Deliberately a mean of means, not a count-weighted average: a worker
    /// that completed few slow queries weighs the same as one that completed
    /// many fast ones. Existing consumers of the tool depend on this exact
    /// semantic. Workers that completed no queries are excluded; `None` when
    /// nothing completed at all.
    pub fn average_query_time(&self) -> Option<Duration> {
        let averages: Vec<Duration> = self
            .counters
            .iter()
            .filter_map(|c| c.average_query_time())
            .collect();
        if averages.is_empty() {
            return None;
        }
        Some(averages.iter().sum::<Duration>() / averages.len() as u32)
    }
}

/// Live progress: a duration bar with a rolling throughput message, plus
/// per-connection counters at debug level.
async fn report_progress(
    counters: Vec<Arc<WorkerCounters>>,
    duration: Duration,
    done: Arc<AtomicBool>,
) {
    let pb = ProgressBar::new(duration.as_secs().max(1));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}s/{len}s | {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let mut last_total = 0u64;
    let mut last_time = start;

    while !done.load(Ordering::Relaxed) {
        tokio::time::sleep(Duration::from_millis(100)).await;
        pb.set_position(start.elapsed().as_secs().min(duration.as_secs()));

        let now = Instant::now();
        let interval = now.duration_since(last_time).as_secs_f64();
        if interval >= 1.0 {
            let total: u64 = counters.iter().map(|c| c.queries()).sum();
            let throughput = (total - last_total) as f64 / interval;
            pb.set_message(format!("{throughput:.0} queries/s, total: {total}"));

            for (id, c) in counters.iter().enumerate() {
                debug!(
                    connection = id,
                    queries = c.queries(),
                    last = ?c.last_query_time(),
                    cumulative = ?c.total_query_time(),
                    "live counters"
                );
            }

            last_total = total;
            last_time = now;
        }
    }

    let total: u64 = counters.iter().map(|c| c.queries()).sum();
    pb.finish_with_message(format!("complete - {total} queries"));
}
