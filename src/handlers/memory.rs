//! Memory-map endpoint handler.
//!
//! This module provides the `POST /memory` handler. The body carries a PID;
//! the response is the parsed `/proc/<pid>/smaps` report as JSON.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::time::Instant;
use tracing::{debug, instrument, warn};

use crate::process::{parse_pid_body, read_memory_report};
use crate::state::SharedState;

/// Handler for `POST /memory`.
#[instrument(skip(state, body))]
pub async fn memory_handler(State(state): State<SharedState>, body: String) -> Response {
    debug!("Processing /memory request");
    state.health_stats.record_http_request();

    let pid = match parse_pid_body(&body) {
        Ok(pid) => pid,
        Err(e) => {
            warn!("Rejected /memory request: {}", e);
            state.health_stats.record_invalid_pid();
            return (StatusCode::BAD_REQUEST, "Invalid PID\n").into_response();
        }
    };

    let started = Instant::now();
    match read_memory_report(&state.proc_root, pid, state.unit_divisor).await {
        Ok(report) => {
            let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
            state
                .health_stats
                .record_memory_report(report.regions.len(), elapsed_ms);
            debug!(
                "Memory report for pid {}: {} regions in {:.3} ms",
                pid,
                report.regions.len(),
                elapsed_ms
            );
            Json(report).into_response()
        }
        Err(e) => {
            warn!("Failed to read memory map of pid {}: {}", pid, e);
            state.health_stats.record_memory_read_error();
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error reading process memory\n",
            )
                .into_response()
        }
    }
}
