//! Process configuration
//!
//! Defaults, then an optional TOML file named by `BRIDGE_CONFIG`, then
//! environment overrides. The environment names `listenAddr` and `BotDebug`
//! are kept as existing deployments set them.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{BridgeError, Result};

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:9090";
pub const DEFAULT_ROBOT_URL: &str = "https://qyapi.weixin.qq.com/cgi-bin/webhook/send";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const CONFIG_PATH_VAR: &str = "BRIDGE_CONFIG";
pub const LISTEN_ADDR_VAR: &str = "listenAddr";
pub const DEBUG_VAR: &str = "BotDebug";
pub const ROBOT_URL_VAR: &str = "ROBOT_WEBHOOK_URL";
pub const INSECURE_TLS_VAR: &str = "ROBOT_INSECURE_TLS";
pub const TIMEOUT_VAR: &str = "ROBOT_TIMEOUT_SECS";
pub const LOG_DIR_VAR: &str = "LOG_DIR";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BridgeConfig {
    pub listen_addr: String,
    pub debug: bool,
    /// Robot send endpoint; `?key=<token>` is appended per request.
    pub robot_url: String,
    /// Skip TLS certificate verification on the outbound call.
    pub insecure_tls: bool,
    pub timeout_secs: u64,
    pub log_dir: Option<PathBuf>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            debug: false,
            robot_url: DEFAULT_ROBOT_URL.to_string(),
            insecure_tls: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_dir: None,
        }
    }
}

impl BridgeConfig {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load configuration reading variables through `env`.
    pub fn load_with<F>(env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match env(CONFIG_PATH_VAR).filter(|p| !p.is_empty()) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(&env)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and parse a TOML configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_str = fs::read_to_string(path).map_err(|e| {
            BridgeError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&config_str).map_err(|e| {
            BridgeError::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    fn apply_env<F>(&mut self, env: &F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = env(LISTEN_ADDR_VAR).filter(|v| !v.is_empty()) {
            self.listen_addr = addr;
        }
        // Any non-empty value turns debug on.
        if env(DEBUG_VAR).is_some_and(|v| !v.is_empty()) {
            self.debug = true;
        }
        if let Some(url) = env(ROBOT_URL_VAR).filter(|v| !v.is_empty()) {
            self.robot_url = url;
        }
        if let Some(flag) = env(INSECURE_TLS_VAR) {
            self.insecure_tls = parse_flag(INSECURE_TLS_VAR, &flag)?;
        }
        if let Some(secs) = env(TIMEOUT_VAR).filter(|v| !v.is_empty()) {
            self.timeout_secs = secs.trim().parse().map_err(|e| {
                BridgeError::Config(format!("Invalid {} '{}': {}", TIMEOUT_VAR, secs, e))
            })?;
        }
        if let Some(dir) = env(LOG_DIR_VAR).filter(|v| !v.is_empty()) {
            self.log_dir = Some(PathBuf::from(dir));
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.listen_addr.trim().is_empty() {
            return Err(BridgeError::Config("listen_addr is empty".to_string()));
        }
        if self.robot_url.trim().is_empty() {
            return Err(BridgeError::Config("robot_url is empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(BridgeError::Config(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(BridgeError::Config(format!(
            "Invalid {} '{}': expected true or false",
            name, other
        ))),
    }
}
