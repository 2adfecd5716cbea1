//! Process list and termination handlers.
//!
//! - `GET /tasks`: snapshot overview with resolved user names
//! - `POST /tasks`: terminate the process whose PID is the request body

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use procmem_api::load_overview;
use tracing::{debug, error, info, instrument, warn};

use crate::process::parse_pid_body;
use crate::state::SharedState;

/// Handler for `GET /tasks`.
#[instrument(skip(state))]
pub async fn tasks_handler(State(state): State<SharedState>) -> Response {
    debug!("Processing GET /tasks request");
    state.health_stats.record_http_request();

    match load_overview(
        &state.ram_snapshot_path,
        &state.cpu_snapshot_path,
        state.identity.as_ref(),
    )
    .await
    {
        Ok(overview) => {
            state.health_stats.record_snapshot(true);
            debug!("Serving {} tasks", overview.tasks.len());
            Json(overview).into_response()
        }
        Err(e) => {
            error!("Failed to build task overview: {}", e);
            state.health_stats.record_snapshot(false);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Handler for `POST /tasks`.
#[instrument(skip(state, body))]
pub async fn kill_handler(State(state): State<SharedState>, body: String) -> Response {
    debug!("Processing POST /tasks request");
    state.health_stats.record_http_request();

    let Some(terminator) = state.terminator.as_ref() else {
        warn!("Rejected termination request: process termination is disabled");
        return (StatusCode::FORBIDDEN, "Process termination is disabled\n").into_response();
    };

    let pid = match parse_pid_body(&body) {
        Ok(pid) => pid,
        Err(e) => {
            warn!("Rejected termination request: {}", e);
            state.health_stats.record_invalid_pid();
            return (StatusCode::BAD_REQUEST, "Information: Invalid PID\n").into_response();
        }
    };

    match terminator.terminate(pid) {
        Ok(()) => {
            state.health_stats.record_kill(true);
            info!("Process with PID {} has been deleted", pid);
            (StatusCode::OK, "Process deleted\n").into_response()
        }
        Err(e) => {
            state.health_stats.record_kill(false);
            error!("Error killing process {}: {}", pid, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error killing process\n").into_response()
        }
    }
}
