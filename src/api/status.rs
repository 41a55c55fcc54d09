//! Operational endpoints

use axum::{Json, extract::State as AxumState};
use serde::Serialize;

use crate::SharedState;

#[derive(Debug, Serialize)]
pub struct ServerStatus {
    pub name: String,
    pub version: String,
    pub started_at: String,
    pub uptime_seconds: u64,
    pub robot_url: String,
    pub insecure_tls: bool,
}

/// GET /healthz - Liveness probe
pub async fn healthz() -> &'static str {
    "ok"
}

/// GET /status - Server information
pub async fn status(AxumState(state): AxumState<SharedState>) -> Json<ServerStatus> {
    Json(ServerStatus {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        started_at: state.started_at.to_rfc3339(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        robot_url: state.robot.send_url().to_string(),
        insecure_tls: state.config.insecure_tls,
    })
}
