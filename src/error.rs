use std::io;

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::robot::RobotAck;

/// Custom error type for gitlab_wecom_bridge operations
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("X-Gitlab-Token is empty")]
    MissingToken,

    #[error("Parse gitlab requset body error: {0}")]
    BodyParse(#[source] serde_json::Error),

    #[error("Build robot message error: {0}")]
    Envelope(#[source] serde_json::Error),

    #[error("Request wexin robot err: {0} ")]
    RobotRequest(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl BridgeError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            BridgeError::MissingToken => StatusCode::FORBIDDEN,
            BridgeError::BodyParse(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // GitLab only looks at the status here, the body stays a bare string.
        if let BridgeError::MissingToken = self {
            return (
                status,
                [(header::CONTENT_TYPE, "application/json")],
                self.to_string(),
            )
                .into_response();
        }

        let ack = RobotAck {
            errcode: i64::from(status.as_u16()),
            errmsg: self.to_string(),
        };
        (status, Json(ack)).into_response()
    }
}

/// Helper type for Results that use BridgeError
pub type Result<T> = std::result::Result<T, BridgeError>;
