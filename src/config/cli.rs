//! Command-line argument parsing
//!
//! Flags mirror the knobs of the classic single-binary SQL benchmarks:
//! everything needed to reach the database, plus the workload shape
//! (connections, duration, query, reconnect). A YAML file given with
//! `--config` overrides any flag it names.

use std::fmt;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::Deserialize;

use super::benchmark_config::DEFAULT_QUERY;

/// Concurrent SQL query throughput benchmark
#[derive(Parser, Debug, Clone)]
#[command(name = "sqlbench")]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    // ===== Workload =====
    /// Database driver
    #[arg(long, value_enum, default_value_t = Driver::Postgres)]
    pub driver: Driver,

    /// Number of concurrent connections to the database
    #[arg(short = 'c', long, default_value_t = 1)]
    pub connections: usize,

    /// Query to execute for the benchmark
    #[arg(long, default_value = DEFAULT_QUERY)]
    pub query: String,

    /// Duration of the benchmark in seconds
    #[arg(short = 'd', long = "duration", default_value_t = 1)]
    pub duration_secs: u64,

    /// Force a database reconnection between each query
    #[arg(long)]
    pub reconnect: bool,

    // ===== Connection =====
    /// Full connection string (assembled from the options below when omitted)
    #[arg(long)]
    pub dsn: Option<String>,

    /// Host address of the database
    #[arg(long, default_value = "")]
    pub host: String,

    /// Port of the database (0 = driver default)
    #[arg(long, default_value_t = 0)]
    pub port: u16,

    /// Username for the database
    #[arg(long, default_value = "")]
    pub user: String,

    /// Password for the database
    #[arg(long, default_value = "")]
    pub password: String,

    /// Database name
    #[arg(long, default_value = "")]
    pub database: String,

    /// TLS mode passed to the driver (e.g. disable, require)
    #[arg(long, default_value = "")]
    pub tls: String,

    /// Connection timeout in seconds (0 = driver default)
    #[arg(long = "connect-timeout", default_value_t = 0)]
    pub connect_timeout: u64,

    // ===== Process =====
    /// YAML configuration file; present fields override flags
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Quiet mode (errors only, no banner or progress)
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose output (per-connection telemetry)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Supported database drivers
#[derive(ValueEnum, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    #[default]
    Postgres,
    Mysql,
}

impl Driver {
    /// URL scheme understood by the sqlx Any driver
    pub fn scheme(self) -> &'static str {
        match self {
            Driver::Postgres => "postgres",
            Driver::Mysql => "mysql",
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scheme())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = CliArgs::parse_from(["sqlbench"]);
        assert_eq!(args.driver, Driver::Postgres);
        assert_eq!(args.connections, 1);
        assert_eq!(args.duration_secs, 1);
        assert!(!args.reconnect);
        assert!(args.query.contains("sqlbench"));
    }

    #[test]
    fn test_workload_args() {
        let args = CliArgs::parse_from([
            "sqlbench",
            "--driver",
            "mysql",
            "-c",
            "16",
            "-d",
            "30",
            "--reconnect",
            "--query",
            "SELECT 1",
        ]);
        assert_eq!(args.driver, Driver::Mysql);
        assert_eq!(args.connections, 16);
        assert_eq!(args.duration_secs, 30);
        assert!(args.reconnect);
        assert_eq!(args.query, "SELECT 1");
    }

    #[test]
    fn test_unknown_driver_rejected() {
        assert!(CliArgs::try_parse_from(["sqlbench", "--driver", "oracle"]).is_err());
    }
}
