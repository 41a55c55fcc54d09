pub mod api;
pub mod config;
pub mod envelope;
pub mod error;
pub mod events;
pub mod gitmoji;
pub mod logging;
pub mod render;
pub mod robot;

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;

pub use config::BridgeConfig;
pub use error::{BridgeError, Result};
use robot::RobotClient;

pub struct AppState {
    pub config: BridgeConfig,
    pub robot: RobotClient,
    pub start_time: Instant,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Builds the shared state, including the outbound client used by every request.
    pub fn new(config: BridgeConfig) -> Result<Self> {
        let robot = RobotClient::new(&config)?;
        Ok(Self {
            config,
            robot,
            start_time: Instant::now(),
            started_at: Utc::now(),
        })
    }
}

pub type SharedState = Arc<AppState>;
