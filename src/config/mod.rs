//! Configuration: CLI flags, YAML file, DSN assembly

pub mod benchmark_config;
pub mod cli;

pub use benchmark_config::{BenchmarkConfig, FileConfig, APP_NAME, DEFAULT_QUERY};
pub use cli::{CliArgs, Driver};
