//! Outbound client for the WeCom group robot webhook

use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::BridgeConfig;
use crate::error::Result;

/// `{errcode, errmsg}` answer of the robot API. The same shape is used for
/// every response the bridge sends back to GitLab.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotAck {
    #[serde(default)]
    pub errcode: i64,
    #[serde(default)]
    pub errmsg: String,
}

impl RobotAck {
    pub fn ok(errmsg: impl Into<String>) -> Self {
        Self {
            errcode: 0,
            errmsg: errmsg.into(),
        }
    }
}

/// Shared HTTP client posting messages to the robot send endpoint.
#[derive(Debug, Clone)]
pub struct RobotClient {
    http: reqwest::Client,
    send_url: String,
}

impl RobotClient {
    pub fn new(config: &BridgeConfig) -> Result<Self> {
        if config.insecure_tls {
            warn!("TLS certificate verification is disabled for robot requests");
        }
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .danger_accept_invalid_certs(config.insecure_tls)
            .build()?;

        Ok(Self {
            http,
            send_url: config.robot_url.clone(),
        })
    }

    pub fn send_url(&self) -> &str {
        &self.send_url
    }

    /// POSTs an already encoded message body for the robot identified by `key`.
    ///
    /// Transport failures are errors. A reply that is not a JSON ack is
    /// logged and answered with the zero ack.
    pub async fn send(&self, key: &str, body: Vec<u8>) -> Result<RobotAck> {
        let response = self
            .http
            .post(&self.send_url)
            .query(&[("key", key)])
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            // The URL carries the robot key.
            .map_err(|e| e.without_url())?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| e.without_url())?;

        match serde_json::from_slice::<RobotAck>(&bytes) {
            Ok(ack) => {
                debug!(%status, errcode = ack.errcode, "Robot replied");
                Ok(ack)
            }
            Err(e) => {
                warn!(%status, "Robot reply is not a JSON ack: {}", e);
                Ok(RobotAck::default())
            }
        }
    }
}
