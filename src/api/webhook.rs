//! Webhook handler relaying GitLab events to the WeCom robot

use axum::{
    Json,
    body::Bytes,
    extract::State as AxumState,
    http::HeaderMap,
};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::SharedState;
use crate::envelope::build_msg;
use crate::error::{BridgeError, Result};
use crate::events::{EventKind, GitlabEvent};
use crate::gitmoji::trans_to_emoji;
use crate::render::{Render, Rendered, SkipReason};
use crate::robot::RobotAck;

pub const TOKEN_HEADER: &str = "X-Gitlab-Token";
pub const EVENT_HEADER: &str = "X-Gitlab-Event";
pub const EVENT_UUID_HEADER: &str = "X-Gitlab-Event-UUID";

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Decodes and renders a webhook body announced by `event_header`.
///
/// Unknown event headers render nothing, which is not an error.
pub fn render_event(event_header: &str, body: &[u8]) -> Result<Rendered> {
    let Some(kind) = EventKind::from_header(event_header) else {
        return Ok(Rendered::Skipped(SkipReason::NoContent));
    };

    let event = GitlabEvent::decode(kind, body).map_err(BridgeError::BodyParse)?;
    debug!(source = event.source_name(), "Decoded {}", kind.header_value());

    match event.render() {
        Rendered::Message(content) if content.is_empty() => {
            Ok(Rendered::Skipped(SkipReason::NoContent))
        }
        rendered => Ok(rendered),
    }
}

/// Handles the GitLab webhook POST request.
///
/// The `X-Gitlab-Token` header is the robot key the message is sent with.
#[instrument(
    name = "gitlab.webhook",
    skip_all,
    fields(
        event = tracing::field::Empty,
        delivery = tracing::field::Empty,
    )
)]
pub async fn transmit_robot(
    AxumState(state): AxumState<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<RobotAck>> {
    let Some(key) = header_str(&headers, TOKEN_HEADER).filter(|k| !k.is_empty()) else {
        info!("Rejected webhook without {}", TOKEN_HEADER);
        return Err(BridgeError::MissingToken);
    };

    let event_header = header_str(&headers, EVENT_HEADER).unwrap_or_default();
    let delivery = header_str(&headers, EVENT_UUID_HEADER)
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::now_v7().to_string());

    let span = tracing::Span::current();
    span.record("event", event_header);
    span.record("delivery", delivery.as_str());

    let content = match render_event(event_header, &body) {
        Ok(Rendered::Message(content)) => content,
        Ok(Rendered::Skipped(reason)) => {
            info!(%reason, "Nothing to forward");
            return Ok(Json(RobotAck::ok(reason.to_string())));
        }
        Err(e) => {
            info!("Could not parse webhook body: {}", e);
            return Err(e);
        }
    };

    let content = trans_to_emoji(&content);
    debug!("Rendered message:\n{}", content);

    let message = build_msg(&content, true).map_err(BridgeError::Envelope)?;
    let ack = state.robot.send(key, message).await.inspect_err(|e| {
        error!("Robot request failed: {}", e);
    })?;

    info!(
        errcode = ack.errcode,
        errmsg = %ack.errmsg,
        "Forwarded event to robot"
    );
    Ok(Json(ack))
}
