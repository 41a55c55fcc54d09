//! WeCom group robot message bodies

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Content {
    pub content: String,
}

/// Body of a `cgi-bin/webhook/send` call.
///
/// Serializes as `{"msgtype":"markdown","markdown":{"content":"..."}}` or the
/// `text` equivalent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "msgtype", rename_all = "lowercase")]
pub enum RobotMessage {
    Markdown { markdown: Content },
    Text { text: Content },
}

impl RobotMessage {
    pub fn markdown(content: impl Into<String>) -> Self {
        RobotMessage::Markdown {
            markdown: Content {
                content: content.into(),
            },
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        RobotMessage::Text {
            text: Content {
                content: content.into(),
            },
        }
    }
}

/// Builds the JSON request body for `content`. The content is JSON-encoded,
/// so quotes, backslashes and newlines in commit messages are safe.
pub fn build_msg(content: &str, markdown: bool) -> Result<Vec<u8>, serde_json::Error> {
    let message = if markdown {
        RobotMessage::markdown(content)
    } else {
        RobotMessage::text(content)
    };
    serde_json::to_vec(&message)
}
