//! sqlbench - concurrent SQL query throughput benchmark
//!
//! Drives a fixed number of connections against Postgres or MySQL, each
//! repeating a configured query for a fixed duration, and reports total
//! queries, queries per second and average query time.

use anyhow::Result;
use clap::Parser;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

use sqlbench::benchmark::BenchmarkCoordinator;
use sqlbench::client::SqlConnectionFactory;
use sqlbench::config::{BenchmarkConfig, CliArgs, APP_NAME};

fn setup_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

fn print_banner(config: &BenchmarkConfig) {
    if config.quiet {
        return;
    }

    println!("{} v{}", APP_NAME, env!("CARGO_PKG_VERSION"));
    println!("====================================");
    println!("Driver: {}", config.driver);
    println!(
        "Connections: {}, Duration: {}s, Reconnect: {}",
        config.connections,
        config.duration.as_secs(),
        config.reconnect
    );
    println!("Query: {}", config.query);
    println!("====================================\n");
}

fn print_report<F: sqlbench::client::ConnectionFactory>(coordinator: &BenchmarkCoordinator<F>) {
    println!("Queries: {}", coordinator.queries());
    println!("Queries per second: {:.0}", coordinator.queries_per_second());
    match coordinator.average_query_time() {
        Some(avg) => println!("Average query time: {:.3}ms", avg.as_secs_f64() * 1000.0),
        None => println!("Average query time: n/a (no queries completed)"),
    }
}

async fn run() -> Result<()> {
    let args = CliArgs::parse();
    setup_logging(args.verbose, args.quiet);

    let config = BenchmarkConfig::from_cli(&args)?;
    print_banner(&config);

    let factory = SqlConnectionFactory::new(config.dsn.clone());
    let mut coordinator = BenchmarkCoordinator::new(factory, &config).await?;
    coordinator.run().await?;

    print_report(&coordinator);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
}
