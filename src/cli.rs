//! CLI arguments and subcommands for procmem-api.
//!
//! This module defines the command-line interface structure using the clap library,
//! including all flags, options, and subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use std::net::IpAddr;
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Configuration format options for output
#[derive(Debug, Clone, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "procmem-api",
    about = "HTTP API for host process snapshots and per-process memory maps",
    long_about = "HTTP API for host process snapshots and per-process memory maps.\n\n\
                  Serves the process list and RAM usage written by an external collector, \
                  terminates processes on request and breaks /proc/<pid>/smaps down into \
                  memory regions with size and resident totals.",
    version,
    propagate_version = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// HTTP listen port
    #[arg(short = 'p', long)]
    pub port: Option<u16>,

    /// Bind to specific interface/IP
    #[arg(long)]
    pub bind: Option<IpAddr>,

    /// Log level (overrides log_level from the config file)
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,

    /// Root of the proc filesystem used for smaps reads
    #[arg(long)]
    pub proc_root: Option<PathBuf>,

    /// Path to the RAM snapshot JSON
    #[arg(long)]
    pub ram_snapshot: Option<PathBuf>,

    /// Path to the CPU/process snapshot JSON
    #[arg(long)]
    pub cpu_snapshot: Option<PathBuf>,

    /// Divisor applied to smaps kB values (1024 = legacy scaling, 1 = plain kB)
    #[arg(long)]
    pub unit_divisor: Option<f64>,

    /// Signal sent by POST /tasks (e.g. SIGTERM, SIGKILL)
    #[arg(long)]
    pub kill_signal: Option<String>,

    /// Reject process termination requests
    #[arg(long)]
    pub disable_kill: bool,

    /// Disable /health endpoint
    #[arg(long)]
    pub disable_health: bool,

    /// Disable the CORS layer
    #[arg(long)]
    pub disable_cors: bool,

    /// Enable TLS/SSL for HTTPS
    #[arg(long)]
    pub enable_tls: bool,

    /// Path to TLS certificate file (PEM format)
    #[arg(long)]
    pub tls_cert: Option<PathBuf>,

    /// Path to TLS private key file (PEM format)
    #[arg(long)]
    pub tls_key: Option<PathBuf>,
}

/// Subcommands for additional functionality
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse an smaps report and print the memory report as JSON
    Parse {
        /// smaps file to parse ("-" reads stdin)
        #[arg(conflicts_with = "pid", required_unless_present = "pid")]
        file: Option<PathBuf>,

        /// Read <proc_root>/<PID>/smaps instead of a file
        #[arg(long)]
        pid: Option<i32>,

        /// Print compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Validate configuration and system requirements
    Check,

    /// Generate configuration files
    Config {
        /// Output file path ("-" prints to stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,

        /// Include comments and examples
        #[arg(long)]
        commented: bool,
    },
}
