//! API module for all HTTP handlers
//!
//! `POST /` receives GitLab webhooks; the other routes are operational.

pub mod status;
pub mod webhook;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};

use crate::SharedState;

// Re-export handlers
pub use status::{healthz, status};
pub use webhook::transmit_robot;

/// Builds the application router. Every request is logged at `info`.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", post(transmit_robot))
        .route("/healthz", get(healthz))
        .route("/status", get(status))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO))
                .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
        )
}
