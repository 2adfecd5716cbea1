//! Health check endpoint handler.
//!
//! This module provides the `/health` endpoint handler that returns
//! service statistics and the effective data sources.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use tracing::{debug, instrument};

use crate::state::SharedState;

// Time conversion constants
const SECONDS_PER_HOUR: f64 = 3600.0;
const MINUTES_PER_HOUR: f64 = 60.0;
const HOURS_PER_DAY: f64 = 24.0;

/// Handler for the /health endpoint.
#[instrument(skip(state))]
pub async fn health_handler(State(state): State<SharedState>) -> impl IntoResponse {
    debug!("Processing /health request");
    state.health_stats.record_http_request();

    let uptime_seconds = state.health_stats.get_uptime_seconds();
    let uptime_hours = uptime_seconds as f64 / SECONDS_PER_HOUR;
    let uptime_str = if uptime_hours < 1.0 {
        format!("{:.1} minutes", uptime_hours * MINUTES_PER_HOUR)
    } else if uptime_hours < HOURS_PER_DAY {
        format!("{:.1} hours", uptime_hours)
    } else {
        format!("{:.1} days", uptime_hours / HOURS_PER_DAY)
    };

    let kill = if state.terminator.is_some() {
        "enabled"
    } else {
        "disabled"
    };

    let table = state.health_stats.render_table();

    (
        StatusCode::OK,
        [("Content-Type", "text/plain; charset=utf-8")],
        format!(
            "OK\n\nUptime: {uptime_str}\n\
             proc_root: {}\n\
             ram_snapshot: {}\n\
             cpu_snapshot: {}\n\
             unit_divisor: {}\n\
             process termination: {kill}\n\n{table}",
            state.proc_root.display(),
            state.ram_snapshot_path.display(),
            state.cpu_snapshot_path.display(),
            state.unit_divisor,
        ),
    )
}
