//! Parse command implementation.
//!
//! Runs an smaps report through the memory-map parser and prints the JSON
//! that `POST /memory` would return.

use anyhow::{bail, Context, Result};
use procmem_api::MemoryReport;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::process::{parse_reader, read_memory_report_blocking, smaps_path};

/// Parses a report from a file, stdin (`-`) or a live process.
pub fn command_parse(
    file: Option<PathBuf>,
    pid: Option<i32>,
    compact: bool,
    config: &Config,
) -> Result<()> {
    let divisor = config.unit_divisor();

    let report = match (file, pid) {
        (Some(path), None) => parse_source(&path, divisor)?,
        (None, Some(pid)) => {
            if pid <= 0 {
                bail!("invalid PID {}", pid);
            }
            let path = smaps_path(&config.proc_root(), pid);
            read_memory_report_blocking(&path, divisor)
                .with_context(|| format!("failed to read {}", path.display()))?
        }
        _ => bail!("exactly one of FILE or --pid is required"),
    };

    let json = render_report(&report, compact)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", json)?;
    Ok(())
}

fn parse_source(path: &Path, divisor: f64) -> Result<MemoryReport> {
    if path.as_os_str() == "-" {
        return parse_reader(io::stdin().lock(), divisor).context("failed to read stdin");
    }
    read_memory_report_blocking(path, divisor)
        .with_context(|| format!("failed to read {}", path.display()))
}

fn render_report(report: &MemoryReport, compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(report)?
    } else {
        serde_json::to_string_pretty(report)?
    };
    Ok(json)
}
