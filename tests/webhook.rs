//! End-to-end tests for the webhook relay.
//!
//! The router is driven with `tower::ServiceExt::oneshot`; the WeCom robot is
//! an `httpmock` server the bridge is pointed at through `robot_url`.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use httpmock::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use gitlab_wecom_bridge::{AppState, BridgeConfig, api};

const ROBOT_PATH: &str = "/cgi-bin/webhook/send";

// ── Helpers ───────────────────────────────────────────────────────────────────

fn app(robot_url: String) -> Router {
    let config = BridgeConfig {
        robot_url,
        timeout_secs: 2,
        ..BridgeConfig::default()
    };
    api::router(Arc::new(AppState::new(config).unwrap()))
}

struct Reply {
    status: StatusCode,
    content_type: Option<String>,
    body: String,
}

impl Reply {
    fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

async fn post(app: Router, headers: &[(&str, &str)], body: &str) -> Reply {
    let mut request = Request::builder().method("POST").uri("/");
    for (name, value) in headers {
        request = request.header(*name, *value);
    }
    let request = request.body(Body::from(body.to_string())).unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    Reply {
        status,
        content_type,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

/// Robot mock that accepts exactly `content` as markdown for key `K`.
async fn expect_markdown<'a>(server: &'a MockServer, content: &str) -> httpmock::Mock<'a> {
    let expected = json!({"msgtype": "markdown", "markdown": {"content": content}});
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path(ROBOT_PATH)
                .query_param("key", "K")
                .header("content-type", "application/json")
                .json_body(expected);
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"errcode": 0, "errmsg": "ok"}));
        })
        .await
}

/// Robot mock that matches any POST, for asserting nothing was sent.
async fn any_post(server: &MockServer) -> httpmock::Mock<'_> {
    server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200).json_body(json!({"errcode": 0, "errmsg": "ok"}));
        })
        .await
}

// ── Forwarded events ──────────────────────────────────────────────────────────

#[tokio::test]
async fn push_with_two_commits_is_forwarded_with_emoji() {
    let server = MockServer::start_async().await;
    let mock = expect_markdown(
        &server,
        "# repo\n### On branch `refs/heads/main`\nA push a commit [fix \u{1F41B}](http://c/1)  T1\nB push a commit [feat](http://c/2)  T2\n",
    )
    .await;

    let body = r#"{"ref":"refs/heads/main","after":"abc","user_name":"u","repository":{"name":"repo"},"commits":[{"author":{"name":"A"},"message":"fix :bug:","url":"http://c/1","timestamp":"T1"},{"author":{"name":"B"},"message":"feat","url":"http://c/2","timestamp":"T2"}]}"#;
    let reply = post(
        app(server.url(ROBOT_PATH)),
        &[("X-Gitlab-Token", "K"), ("X-Gitlab-Event", "Push Hook")],
        body,
    )
    .await;

    mock.assert_async().await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json(), json!({"errcode": 0, "errmsg": "ok"}));
}

#[tokio::test]
async fn branch_deletion_is_forwarded() {
    let server = MockServer::start_async().await;
    let mock = expect_markdown(
        &server,
        "# repo\n### On branch `refs/heads/main`\nu `remove` it",
    )
    .await;

    let body = r#"{"ref":"refs/heads/main","after":"0000000000000000000000000000000000000000","user_name":"u","repository":{"name":"repo"},"commits":[]}"#;
    let reply = post(
        app(server.url(ROBOT_PATH)),
        &[("X-Gitlab-Token", "K"), ("X-Gitlab-Event", "Push Hook")],
        body,
    )
    .await;

    mock.assert_async().await;
    assert_eq!(reply.status, StatusCode::OK);
}

#[tokio::test]
async fn successful_tag_pipeline_is_forwarded() {
    let server = MockServer::start_async().await;
    let mock = expect_markdown(
        &server,
        "# P\n### Pipeline on tag `v1`\n`Status`: \u{2705}\n`Start at`: T0\n`Finish at`: T1\n`Duration`: 42s",
    )
    .await;

    let body = r#"{"project":{"name":"P"},"object_attributes":{"ref":"v1","status":"success","created_at":"T0","finished_at":"T1","duration":42,"tag":true}}"#;
    let reply = post(
        app(server.url(ROBOT_PATH)),
        &[("X-Gitlab-Token", "K"), ("X-Gitlab-Event", "Pipeline Hook")],
        body,
    )
    .await;

    mock.assert_async().await;
    assert_eq!(reply.status, StatusCode::OK);
}

#[tokio::test]
async fn issue_is_forwarded() {
    let server = MockServer::start_async().await;
    let mock = expect_markdown(&server, "# R\nU opened a issue [T](http://i)").await;

    let body = r#"{"user":{"name":"U"},"repository":{"name":"R"},"object_attributes":{"title":"T","action":"opened","url":"http://i"}}"#;
    let reply = post(
        app(server.url(ROBOT_PATH)),
        &[("X-Gitlab-Token", "K"), ("X-Gitlab-Event", "Issue Hook")],
        body,
    )
    .await;

    mock.assert_async().await;
    assert_eq!(reply.status, StatusCode::OK);
}

#[tokio::test]
async fn quotes_in_comments_survive_the_envelope() {
    let server = MockServer::start_async().await;
    let mock = expect_markdown(
        &server,
        "# R\nU leave a comment: use \"--force\" \\o/ :tada  T \n[Detail>>](http://n)",
    )
    .await;

    let body = r#"{"user":{"name":"U"},"repository":{"name":"R"},"object_attributes":{"note":"use \"--force\" \\o/ :tada","updated_at":"T","url":"http://n"}}"#;
    let reply = post(
        app(server.url(ROBOT_PATH)),
        &[("X-Gitlab-Token", "K"), ("X-Gitlab-Event", "Note Hook")],
        body,
    )
    .await;

    mock.assert_async().await;
    assert_eq!(reply.status, StatusCode::OK);
}

#[tokio::test]
async fn robot_error_ack_is_passed_through() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path(ROBOT_PATH);
            then.status(200).json_body(json!({
                "errcode": 93000,
                "errmsg": "invalid webhook url, hint: [1700000000_1]"
            }));
        })
        .await;

    let body = r#"{"user":{"name":"U"},"repository":{"name":"R"},"object_attributes":{"action":"open","source_branch":"f","target_branch":"main","url":"http://mr"}}"#;
    let reply = post(
        app(server.url(ROBOT_PATH)),
        &[("X-Gitlab-Token", "K"), ("X-Gitlab-Event", "Merge Request Hook")],
        body,
    )
    .await;

    mock.assert_async().await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(
        reply.json(),
        json!({"errcode": 93000, "errmsg": "invalid webhook url, hint: [1700000000_1]"})
    );
}

// ── Short-circuits ────────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_token_is_forbidden() {
    let server = MockServer::start_async().await;
    let mock = any_post(&server).await;

    let reply = post(
        app(server.url(ROBOT_PATH)),
        &[("X-Gitlab-Event", "Push Hook")],
        "{}",
    )
    .await;

    assert_eq!(reply.status, StatusCode::FORBIDDEN);
    assert_eq!(reply.body, "X-Gitlab-Token is empty");
    assert_eq!(reply.content_type.as_deref(), Some("application/json"));
    mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn empty_token_is_forbidden() {
    let server = MockServer::start_async().await;
    let reply = post(
        app(server.url(ROBOT_PATH)),
        &[("X-Gitlab-Token", ""), ("X-Gitlab-Event", "Push Hook")],
        "{}",
    )
    .await;

    assert_eq!(reply.status, StatusCode::FORBIDDEN);
    assert_eq!(reply.body, "X-Gitlab-Token is empty");
}

#[tokio::test]
async fn unknown_event_is_acknowledged_without_sending() {
    let server = MockServer::start_async().await;
    let mock = any_post(&server).await;

    let reply = post(
        app(server.url(ROBOT_PATH)),
        &[("X-Gitlab-Token", "K"), ("X-Gitlab-Event", "Job Hook")],
        r#"{"object_kind":"build"}"#,
    )
    .await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json(), json!({"errcode": 0, "errmsg": "no content"}));
    mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn push_without_commits_is_acknowledged_without_sending() {
    let server = MockServer::start_async().await;
    let mock = any_post(&server).await;

    let body = r#"{"ref":"refs/heads/main","after":"abc","user_name":"u","repository":{"name":"repo"},"commits":[]}"#;
    let reply = post(
        app(server.url(ROBOT_PATH)),
        &[("X-Gitlab-Token", "K"), ("X-Gitlab-Event", "Push Hook")],
        body,
    )
    .await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json(), json!({"errcode": 0, "errmsg": "no commit"}));
    mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn unknown_pipeline_status_is_acknowledged_without_sending() {
    let server = MockServer::start_async().await;
    let mock = any_post(&server).await;

    let body = r#"{"project":{"name":"P"},"object_attributes":{"ref":"v1","status":"canceled","created_at":"T0","finished_at":"T1","duration":42,"tag":true}}"#;
    let reply = post(
        app(server.url(ROBOT_PATH)),
        &[("X-Gitlab-Token", "K"), ("X-Gitlab-Event", "Pipeline Hook")],
        body,
    )
    .await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(
        reply.json(),
        json!({"errcode": 0, "errmsg": "unknown status: canceled"})
    );
    mock.assert_hits_async(0).await;
}

// ── Failures ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let server = MockServer::start_async().await;
    let mock = any_post(&server).await;

    let reply = post(
        app(server.url(ROBOT_PATH)),
        &[("X-Gitlab-Token", "K"), ("X-Gitlab-Event", "Tag Push Hook")],
        r#"{"ref": "#,
    )
    .await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    let ack = reply.json();
    assert_eq!(ack["errcode"], 400);
    let errmsg = ack["errmsg"].as_str().unwrap();
    assert!(
        errmsg.starts_with("Parse gitlab requset body error: "),
        "{errmsg}"
    );
    mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn unreachable_robot_is_a_server_error() {
    let reply = post(
        app("http://127.0.0.1:1/cgi-bin/webhook/send".to_string()),
        &[("X-Gitlab-Token", "K"), ("X-Gitlab-Event", "Issue Hook")],
        r#"{"user":{"name":"U"},"repository":{"name":"R"},"object_attributes":{"title":"T","action":"opened","url":"http://i"}}"#,
    )
    .await;

    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    let ack = reply.json();
    assert_eq!(ack["errcode"], 500);
    let errmsg = ack["errmsg"].as_str().unwrap();
    assert!(errmsg.starts_with("Request wexin robot err: "), "{errmsg}");
    assert!(errmsg.ends_with(' '), "{errmsg:?}");
}

// ── Operational routes ────────────────────────────────────────────────────────

#[tokio::test]
async fn healthz_and_status() {
    let app = app("http://robot.invalid/send".to_string());

    let response = app
        .clone()
        .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(Request::get("/status").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let status: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(status["name"], "gitlab_wecom_bridge");
    assert_eq!(status["robot_url"], "http://robot.invalid/send");
    assert_eq!(status["insecure_tls"], false);
}

#[tokio::test]
async fn other_methods_on_webhook_route_are_rejected() {
    let app = app("http://robot.invalid/send".to_string());
    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
