//! Application state management for the service.
//!
//! This module defines the shared application state that is passed
//! to HTTP handlers.

use procmem_api::IdentityResolver;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::health_stats::HealthStats;
use crate::process::ProcessTerminator;

/// Type alias for shared application state.
pub type SharedState = Arc<AppState>;

/// Global application state shared across requests.
pub struct AppState {
    pub config: Arc<Config>,
    pub proc_root: PathBuf,
    pub ram_snapshot_path: PathBuf,
    pub cpu_snapshot_path: PathBuf,
    pub unit_divisor: f64,
    pub identity: Arc<dyn IdentityResolver>,
    /// `None` when termination requests are disabled.
    pub terminator: Option<Arc<dyn ProcessTerminator>>,
    pub health_stats: Arc<HealthStats>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// Builds state from a validated config with the given collaborators.
    pub fn new(
        config: Config,
        identity: Arc<dyn IdentityResolver>,
        terminator: Arc<dyn ProcessTerminator>,
    ) -> Self {
        let terminator = if config.enable_kill.unwrap_or(true) {
            Some(terminator)
        } else {
            None
        };

        Self {
            proc_root: config.proc_root(),
            ram_snapshot_path: config.ram_snapshot_path(),
            cpu_snapshot_path: config.cpu_snapshot_path(),
            unit_divisor: config.unit_divisor(),
            config: Arc::new(config),
            identity,
            terminator,
            health_stats: Arc::new(HealthStats::new()),
            start_time: Instant::now(),
        }
    }
}
