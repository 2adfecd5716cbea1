//! Configuration management for procmem-api.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use crate::cli::{Args, ConfigFormat};
use nix::sys::signal::Signal;
use procmem_api::memmap::DEFAULT_UNIT_DIVISOR;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;

// Default configuration constants
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_PROC_ROOT: &str = "/proc";
pub const DEFAULT_RAM_SNAPSHOT: &str = "/proc/mem_grupo8";
pub const DEFAULT_CPU_SNAPSHOT: &str = "/proc/cpu_grupo8";
pub const DEFAULT_KILL_SIGNAL: &str = "SIGTERM";

/// Service configuration. Every field is optional so that partial files merge
/// with the defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Server configuration
    pub port: Option<u16>,
    pub bind: Option<String>,

    // Data sources
    #[serde(alias = "proc-root")]
    pub proc_root: Option<PathBuf>,
    #[serde(alias = "ram-snapshot-path")]
    pub ram_snapshot_path: Option<PathBuf>,
    #[serde(alias = "cpu-snapshot-path")]
    pub cpu_snapshot_path: Option<PathBuf>,

    // Memory reports
    /// Divisor applied to smaps kB values before they are reported.
    #[serde(alias = "unit-divisor")]
    pub unit_divisor: Option<f64>,

    // Process control
    #[serde(alias = "enable-kill")]
    pub enable_kill: Option<bool>,
    #[serde(alias = "kill-signal")]
    pub kill_signal: Option<String>,

    // Feature flags
    #[serde(alias = "enable-health")]
    pub enable_health: Option<bool>,
    #[serde(alias = "enable-cors")]
    pub enable_cors: Option<bool>,
    /// Allowed origins; `None` or empty allows any origin.
    #[serde(alias = "cors-allowed-origins")]
    pub cors_allowed_origins: Option<Vec<String>>,

    // Logging
    pub log_level: Option<String>,

    // TLS/SSL Configuration
    #[serde(alias = "enable-tls")]
    pub enable_tls: Option<bool>,
    #[serde(alias = "tls-cert-path")]
    pub tls_cert_path: Option<String>,
    #[serde(alias = "tls-key-path")]
    pub tls_key_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: Some(DEFAULT_PORT),
            bind: Some(DEFAULT_BIND_ADDR.to_string()),
            proc_root: Some(PathBuf::from(DEFAULT_PROC_ROOT)),
            ram_snapshot_path: Some(PathBuf::from(DEFAULT_RAM_SNAPSHOT)),
            cpu_snapshot_path: Some(PathBuf::from(DEFAULT_CPU_SNAPSHOT)),
            unit_divisor: Some(DEFAULT_UNIT_DIVISOR),
            enable_kill: Some(true),
            kill_signal: Some(DEFAULT_KILL_SIGNAL.to_string()),
            enable_health: Some(true),
            enable_cors: Some(true),
            cors_allowed_origins: None,
            log_level: Some("info".into()),
            enable_tls: Some(false),
            tls_cert_path: None,
            tls_key_path: None,
        }
    }
}

impl Config {
    pub fn proc_root(&self) -> PathBuf {
        self.proc_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROC_ROOT))
    }

    pub fn ram_snapshot_path(&self) -> PathBuf {
        self.ram_snapshot_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RAM_SNAPSHOT))
    }

    pub fn cpu_snapshot_path(&self) -> PathBuf {
        self.cpu_snapshot_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CPU_SNAPSHOT))
    }

    pub fn unit_divisor(&self) -> f64 {
        self.unit_divisor.unwrap_or(DEFAULT_UNIT_DIVISOR)
    }

    /// Configured termination signal. Falls back to SIGTERM when the name is
    /// unknown; `validate_effective_config` rejects such names at startup.
    pub fn kill_signal(&self) -> Signal {
        self.kill_signal
            .as_deref()
            .and_then(|name| parse_signal(name).ok())
            .unwrap_or(Signal::SIGTERM)
    }
}

/// Parses `SIGTERM`, `TERM` or `term` style signal names.
pub fn parse_signal(name: &str) -> Result<Signal, String> {
    let upper = name.trim().to_ascii_uppercase();
    let full = if upper.starts_with("SIG") {
        upper
    } else {
        format!("SIG{upper}")
    };
    Signal::from_str(&full).map_err(|_| format!("Unknown signal '{}'", name))
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let divisor = cfg.unit_divisor();
    if !divisor.is_finite() || divisor <= 0.0 {
        return Err(format!(
            "unit_divisor must be a positive finite number, got {}",
            divisor
        )
        .into());
    }

    if let Some(name) = cfg.kill_signal.as_deref() {
        parse_signal(name).map_err(|e| format!("Invalid kill_signal: {}", e))?;
    }

    if let Some(level) = cfg.log_level.as_deref() {
        level
            .parse::<LevelFilter>()
            .map_err(|_| format!("Invalid log_level '{}'", level))?;
    }

    if let Some(origins) = &cfg.cors_allowed_origins {
        if let Some(bad) = origins.iter().find(|o| o.trim().is_empty()) {
            return Err(format!("Invalid empty entry in cors_allowed_origins: '{}'", bad).into());
        }
    }

    // TLS validation
    if cfg.enable_tls.unwrap_or(false) {
        let cert_path = cfg.tls_cert_path.as_deref();
        let key_path = cfg.tls_key_path.as_deref();

        match (cert_path, key_path) {
            (None, None) => {
                return Err(
                    "TLS is enabled but neither tls_cert_path nor tls_key_path are set".into(),
                );
            }
            (Some(_), None) => {
                return Err("TLS is enabled but tls_key_path is not set".into());
            }
            (None, Some(_)) => {
                return Err("TLS is enabled but tls_cert_path is not set".into());
            }
            (Some(cert), Some(key)) => {
                check_pem_file(cert, "certificate")?;
                check_pem_file(key, "private key")?;
            }
        }
    }

    Ok(())
}

fn check_pem_file(path: &str, what: &str) -> Result<(), Box<dyn std::error::Error>> {
    match fs::metadata(path) {
        Ok(meta) if meta.len() == 0 => Err(format!("TLS {} file is empty: {}", what, path).into()),
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("TLS {} file not found: {}", what, path).into())
        }
        Err(e) => Err(format!("TLS {} file is not readable: {} ({})", what, path, e).into()),
    }
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    if let Some(bind_ip) = args.bind {
        config.bind = Some(bind_ip.to_string());
    }
    if let Some(cli_port) = args.port {
        config.port = Some(cli_port);
    }

    if let Some(root) = &args.proc_root {
        config.proc_root = Some(root.clone());
    }
    if let Some(path) = &args.ram_snapshot {
        config.ram_snapshot_path = Some(path.clone());
    }
    if let Some(path) = &args.cpu_snapshot {
        config.cpu_snapshot_path = Some(path.clone());
    }
    if let Some(divisor) = args.unit_divisor {
        config.unit_divisor = Some(divisor);
    }
    if let Some(level) = &args.log_level {
        config.log_level = Some(level.as_str().to_string());
    }
    if let Some(signal) = &args.kill_signal {
        config.kill_signal = Some(signal.clone());
    }

    // Feature flags
    if args.disable_kill {
        config.enable_kill = Some(false);
    }
    if args.disable_health {
        config.enable_health = Some(false);
    }
    if args.disable_cors {
        config.enable_cors = Some(false);
    }

    // TLS configuration: CLI wins if provided
    if args.enable_tls {
        config.enable_tls = Some(true);
    }
    if let Some(cert_path) = &args.tls_cert {
        config.tls_cert_path = Some(cert_path.to_string_lossy().to_string());
    }
    if let Some(key_path) = &args.tls_key {
        config.tls_key_path = Some(key_path.to_string_lossy().to_string());
    }

    Ok(config)
}

/// Loads a config file, or the first default location that exists.
///
/// Fields missing from the file take their default values.
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(format!("Config file not found: {}", p.display()).into());
            }
            p.to_path_buf()
        }
        None => {
            let defaults = [
                "/etc/procmem-api/procmem-api.yaml",
                "/etc/procmem-api/procmem-api.yml",
                "/etc/procmem-api/procmem-api.json",
                "./procmem-api.yaml",
                "./procmem-api.yml",
                "./procmem-api.json",
            ];
            match defaults.iter().map(Path::new).find(|p| p.exists()) {
                Some(p) => p.to_path_buf(),
                None => return Ok(Config::default()),
            }
        }
    };

    let content = fs::read_to_string(&path)?;

    let loaded: Config = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(&content)?,
        Some("toml") => toml::from_str(&content)?,
        // Default to YAML
        _ => serde_yaml::from_str(&content)?,
    };
    info!("Loaded configuration from: {}", path.display());

    Ok(merge_with_defaults(loaded))
}

/// Fills unset fields with their defaults.
fn merge_with_defaults(cfg: Config) -> Config {
    let d = Config::default();
    Config {
        port: cfg.port.or(d.port),
        bind: cfg.bind.or(d.bind),
        proc_root: cfg.proc_root.or(d.proc_root),
        ram_snapshot_path: cfg.ram_snapshot_path.or(d.ram_snapshot_path),
        cpu_snapshot_path: cfg.cpu_snapshot_path.or(d.cpu_snapshot_path),
        unit_divisor: cfg.unit_divisor.or(d.unit_divisor),
        enable_kill: cfg.enable_kill.or(d.enable_kill),
        kill_signal: cfg.kill_signal.or(d.kill_signal),
        enable_health: cfg.enable_health.or(d.enable_health),
        enable_cors: cfg.enable_cors.or(d.enable_cors),
        cors_allowed_origins: cfg.cors_allowed_origins.or(d.cors_allowed_origins),
        log_level: cfg.log_level.or(d.log_level),
        enable_tls: cfg.enable_tls.or(d.enable_tls),
        tls_cert_path: cfg.tls_cert_path.or(d.tls_cert_path),
        tls_key_path: cfg.tls_key_path.or(d.tls_key_path),
    }
}

/// Renders a configuration in the requested format.
pub fn render_config(
    config: &Config,
    format: &ConfigFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    Ok(match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    })
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: ConfigFormat) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", render_config(config, &format)?);
    Ok(())
}
