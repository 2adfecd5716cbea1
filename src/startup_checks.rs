//! Startup requirement validation for procmem-api.
//!
//! Reading foreign smaps reports and signalling foreign processes both need
//! privileges. These checks only warn; the service starts regardless.

use nix::unistd::geteuid;
use std::fs;
use std::path::Path;
use tracing::{error, info, warn};

use crate::config::Config;

/// Outcome of the startup checks that the `check` subcommand reports.
#[derive(Debug, Default)]
pub struct RequirementReport {
    pub is_root: bool,
    pub proc_readable: bool,
    pub ram_snapshot_present: bool,
    pub cpu_snapshot_present: bool,
}

impl RequirementReport {
    pub fn all_ok(&self) -> bool {
        self.proc_readable && self.ram_snapshot_present && self.cpu_snapshot_present
    }
}

/// Validate all runtime requirements
pub fn validate_requirements(config: &Config) -> Result<RequirementReport, ValidationError> {
    info!("🔍 Validating runtime requirements...");

    let report = RequirementReport {
        is_root: check_user_privileges(),
        proc_readable: check_proc_access(&config.proc_root())?,
        ram_snapshot_present: check_snapshot("RAM", &config.ram_snapshot_path()),
        cpu_snapshot_present: check_snapshot("CPU", &config.cpu_snapshot_path()),
    };

    if report.all_ok() {
        info!("✅ All runtime requirements validated");
    }
    Ok(report)
}

/// Check if running with sufficient privileges
fn check_user_privileges() -> bool {
    if geteuid().is_root() {
        info!("✅ Running as root (uid=0)");
        true
    } else {
        warn!("⚠️  Not running as root - memory maps and termination of foreign processes will fail");
        warn!("   Recommendation: Run as root or grant CAP_SYS_PTRACE and CAP_KILL");
        false
    }
}

/// Check smaps access for the init process below `proc_root`.
fn check_proc_access(proc_root: &Path) -> Result<bool, ValidationError> {
    if !proc_root.exists() {
        error!("❌ {} not found", proc_root.display());
        return Err(ValidationError::ProcRootMissing(
            proc_root.display().to_string(),
        ));
    }

    let test_file = proc_root.join("1").join("smaps");
    match fs::File::open(&test_file) {
        Ok(_) => {
            info!("✅ {} readable", test_file.display());
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            error!(
                "❌ Cannot read {} - insufficient permissions",
                test_file.display()
            );
            error!("   /memory will only work for processes owned by this user");
            Ok(false)
        }
        Err(e) => {
            warn!("⚠️  Could not test {}: {}", test_file.display(), e);
            Ok(false)
        }
    }
}

fn check_snapshot(kind: &str, path: &Path) -> bool {
    if path.exists() {
        info!("✅ {} snapshot found at {}", kind, path.display());
        true
    } else {
        warn!(
            "⚠️  {} snapshot {} not found - GET /tasks will fail until the collector writes it",
            kind,
            path.display()
        );
        false
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("proc filesystem root not found: {0}")]
    ProcRootMissing(String),
}
