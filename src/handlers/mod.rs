//! HTTP endpoint handlers for the service.
//!
//! This module provides handlers for all HTTP endpoints:
//! - `/`: Welcome text with the endpoint list
//! - `/tasks`: Process snapshot (GET) and process termination (POST)
//! - `/memory`: Per-process memory-map breakdown (POST)
//! - `/health`: Service statistics

pub mod health;
pub mod memory;
pub mod root;
pub mod tasks;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::config::Config;
use crate::state::SharedState;

// Re-export handlers
pub use health::health_handler;
pub use memory::memory_handler;
pub use root::root_handler;
pub use tasks::{kill_handler, tasks_handler};

/// Builds the application router with CORS and request tracing.
pub fn build_router(state: SharedState) -> Router {
    let mut app = Router::new()
        .route("/", get(root_handler))
        .route("/tasks", get(tasks_handler).post(kill_handler))
        .route("/memory", post(memory_handler));

    if state.config.enable_health.unwrap_or(true) {
        app = app.route("/health", get(health_handler));
    }

    let cors = cors_layer(&state.config);
    let app = app.with_state(state).layer(TraceLayer::new_for_http());

    match cors {
        Some(cors) => app.layer(cors),
        None => app,
    }
}

/// CORS policy from config. Permissive unless origins are listed.
fn cors_layer(cfg: &Config) -> Option<CorsLayer> {
    if !cfg.enable_cors.unwrap_or(true) {
        debug!("CORS layer disabled");
        return None;
    }

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    let origins: Vec<HeaderValue> = cfg
        .cors_allowed_origins
        .iter()
        .flatten()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        Some(layer.allow_origin(Any))
    } else {
        Some(layer.allow_origin(origins))
    }
}
