//! Root endpoint handler.
//!
//! This module provides the `/` endpoint handler that greets clients and
//! lists the available endpoints.

use axum::{extract::State, response::IntoResponse};
use tracing::{debug, instrument};

use crate::state::SharedState;

/// Handler for the root `/` endpoint.
#[instrument(skip(state))]
pub async fn root_handler(State(state): State<SharedState>) -> impl IntoResponse {
    debug!("Processing / request");
    state.health_stats.record_http_request();

    let version = env!("CARGO_PKG_VERSION");

    let uptime_secs = state.start_time.elapsed().as_secs();
    let hours = uptime_secs / 3600;
    let minutes = (uptime_secs % 3600) / 60;
    let seconds = uptime_secs % 60;

    format!(
        "Welcome to procmem-api {version} (up {hours}h {minutes}m {seconds}s)\n\n\
         GET  /tasks   process snapshot with RAM and CPU counters\n\
         POST /tasks   terminate the process whose PID is the request body\n\
         POST /memory  memory regions of the process whose PID is the request body\n\
         GET  /health  service statistics\n"
    )
}
