//! Config command implementation.
//!
//! Generates configuration files in various formats.

use std::fs;
use std::path::PathBuf;

use crate::cli::ConfigFormat;
use crate::config::{render_config, Config};

/// Generates configuration files.
pub fn command_config(
    output: Option<PathBuf>,
    format: ConfigFormat,
    commented: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    let output = output.unwrap_or_else(|| PathBuf::from("procmem-api.yaml"));

    let mut content = render_config(&config, &format)?;
    if commented && matches!(format, ConfigFormat::Yaml) {
        content = add_config_comments(content);
    }

    if output.to_string_lossy() == "-" {
        print!("{}", content);
    } else {
        fs::write(&output, content)?;
        println!("✅ Configuration written to: {}", output.display());
    }

    Ok(())
}

/// Adds comments to YAML configuration.
fn add_config_comments(yaml: String) -> String {
    let comments = r#"# procmem-api Configuration
# ==========================
#
# Server Configuration
# --------------------
# bind: "0.0.0.0"                      # Bind IP (0.0.0.0 = all interfaces)
# port: 8080                           # HTTP port
#
# Data Sources
# ------------
# proc_root: "/proc"                   # Where <pid>/smaps is read from
# ram_snapshot_path: "/proc/mem_grupo8"  # RAM snapshot JSON written by the collector
# cpu_snapshot_path: "/proc/cpu_grupo8"  # CPU/process snapshot JSON
#
# Memory Reports
# --------------
# unit_divisor: 1024.0                 # smaps values are kB; 1024 keeps the legacy
#                                      # MiB scaling, 1.0 reports plain kB
#
# Process Control
# ---------------
# enable_kill: true                    # Accept POST /tasks
# kill_signal: "SIGTERM"               # Signal sent to the target process
#
# Feature Flags
# -------------
# enable_health: true                  # Enable /health endpoint
# enable_cors: true                    # Add CORS headers
# cors_allowed_origins: null           # null = any origin
#
# Logging
# -------
# log_level: "info"                    # off, error, warn, info, debug, trace
#
# TLS/SSL Configuration
# ---------------------
# enable_tls: false                    # Enable HTTPS (default: false)
# tls_cert_path: null                  # Path to TLS certificate (PEM format)
# tls_key_path: null                   # Path to TLS private key (PEM format)
"#;

    format!("{comments}\n{yaml}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.yaml");
        command_config(Some(path.clone()), ConfigFormat::Yaml, true).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# procmem-api Configuration"));
        let parsed: Config = serde_yaml::from_str(&content).unwrap();
        assert_eq!(parsed.port, Some(8080));
    }
}
