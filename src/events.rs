//! GitLab webhook payloads
//!
//! Only the fields the renderers need are modelled. GitLab is loose about
//! which fields it sends per version, so absent fields and JSON `null` decode
//! to empty values; only malformed JSON or a type mismatch is an error.

use serde::{Deserialize, Deserializer};

/// `after` value GitLab sends when a push deletes the branch.
pub const ZERO_SHA: &str = "0000000000000000000000000000000000000000";

/// The six `X-Gitlab-Event` values the bridge understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Push,
    TagPush,
    Issue,
    Note,
    MergeRequest,
    Pipeline,
}

const EVENT_KINDS: [(&str, EventKind); 6] = [
    ("Push Hook", EventKind::Push),
    ("Tag Push Hook", EventKind::TagPush),
    ("Issue Hook", EventKind::Issue),
    ("Note Hook", EventKind::Note),
    ("Merge Request Hook", EventKind::MergeRequest),
    ("Pipeline Hook", EventKind::Pipeline),
];

impl EventKind {
    /// Maps an `X-Gitlab-Event` header value to its kind. Matching is exact.
    pub fn from_header(value: &str) -> Option<Self> {
        EVENT_KINDS
            .iter()
            .find(|(header, _)| *header == value)
            .map(|(_, kind)| *kind)
    }

    pub fn header_value(self) -> &'static str {
        EVENT_KINDS
            .iter()
            .find(|(_, kind)| *kind == self)
            .map(|(header, _)| *header)
            .unwrap_or_default()
    }
}

/// A decoded webhook body, tagged by the header that announced it.
#[derive(Debug, Clone)]
pub enum GitlabEvent {
    Push(PushEvent),
    TagPush(TagPushEvent),
    Issue(IssueEvent),
    Note(NoteEvent),
    MergeRequest(MergeRequestEvent),
    Pipeline(PipelineEvent),
}

impl GitlabEvent {
    /// Decodes `body` as the payload shape for `kind`.
    pub fn decode(kind: EventKind, body: &[u8]) -> Result<Self, serde_json::Error> {
        let event = match kind {
            EventKind::Push => GitlabEvent::Push(serde_json::from_slice(body)?),
            EventKind::TagPush => GitlabEvent::TagPush(serde_json::from_slice(body)?),
            EventKind::Issue => GitlabEvent::Issue(serde_json::from_slice(body)?),
            EventKind::Note => GitlabEvent::Note(serde_json::from_slice(body)?),
            EventKind::MergeRequest => GitlabEvent::MergeRequest(serde_json::from_slice(body)?),
            EventKind::Pipeline => GitlabEvent::Pipeline(serde_json::from_slice(body)?),
        };
        Ok(event)
    }

    pub fn kind(&self) -> EventKind {
        match self {
            GitlabEvent::Push(_) => EventKind::Push,
            GitlabEvent::TagPush(_) => EventKind::TagPush,
            GitlabEvent::Issue(_) => EventKind::Issue,
            GitlabEvent::Note(_) => EventKind::Note,
            GitlabEvent::MergeRequest(_) => EventKind::MergeRequest,
            GitlabEvent::Pipeline(_) => EventKind::Pipeline,
        }
    }

    /// Repository name for repository events, project name for pipelines.
    pub fn source_name(&self) -> &str {
        match self {
            GitlabEvent::Push(e) => &e.repository.name,
            GitlabEvent::TagPush(e) => &e.repository.name,
            GitlabEvent::Issue(e) => &e.repository.name,
            GitlabEvent::Note(e) => &e.repository.name,
            GitlabEvent::MergeRequest(e) => &e.repository.name,
            GitlabEvent::Pipeline(e) => &e.project.name,
        }
    }
}

/// Treats JSON `null` the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Repository {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub homepage: String,
    #[serde(deserialize_with = "null_as_default")]
    pub git_ssh_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Project {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub web_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub git_ssh_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct User {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub username: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Author {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Commit {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(deserialize_with = "null_as_default")]
    pub timestamp: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub author: Author,
}

/// `Push Hook`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PushEvent {
    #[serde(deserialize_with = "null_as_default")]
    pub object_kind: String,
    #[serde(rename = "ref", deserialize_with = "null_as_default")]
    pub git_ref: String,
    #[serde(deserialize_with = "null_as_default")]
    pub after: String,
    #[serde(deserialize_with = "null_as_default")]
    pub user_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub repository: Repository,
    #[serde(deserialize_with = "null_as_default")]
    pub commits: Vec<Commit>,
}

impl PushEvent {
    pub fn is_branch_deletion(&self) -> bool {
        self.after == ZERO_SHA
    }
}

/// `Tag Push Hook`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TagPushEvent {
    #[serde(deserialize_with = "null_as_default")]
    pub user_name: String,
    #[serde(rename = "ref", deserialize_with = "null_as_default")]
    pub git_ref: String,
    #[serde(deserialize_with = "null_as_default")]
    pub repository: Repository,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IssueAttributes {
    pub id: Option<i64>,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub action: String,
}

/// `Issue Hook`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IssueEvent {
    #[serde(deserialize_with = "null_as_default")]
    pub user: User,
    #[serde(deserialize_with = "null_as_default")]
    pub repository: Repository,
    #[serde(deserialize_with = "null_as_default")]
    pub object_attributes: IssueAttributes,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NoteAttributes {
    pub id: Option<i64>,
    #[serde(deserialize_with = "null_as_default")]
    pub note: String,
    #[serde(deserialize_with = "null_as_default")]
    pub updated_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
}

/// `Note Hook`, a comment on a commit, issue, merge request or snippet.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NoteEvent {
    #[serde(deserialize_with = "null_as_default")]
    pub user: User,
    #[serde(deserialize_with = "null_as_default")]
    pub repository: Repository,
    #[serde(deserialize_with = "null_as_default")]
    pub object_attributes: NoteAttributes,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MergeRequestAttributes {
    pub id: Option<i64>,
    #[serde(deserialize_with = "null_as_default")]
    pub target_branch: String,
    #[serde(deserialize_with = "null_as_default")]
    pub source_branch: String,
    #[serde(deserialize_with = "null_as_default")]
    pub updated_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub action: String,
}

/// `Merge Request Hook`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MergeRequestEvent {
    #[serde(deserialize_with = "null_as_default")]
    pub user: User,
    #[serde(deserialize_with = "null_as_default")]
    pub repository: Repository,
    #[serde(deserialize_with = "null_as_default")]
    pub object_attributes: MergeRequestAttributes,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PipelineAttributes {
    pub id: Option<i64>,
    #[serde(rename = "ref", deserialize_with = "null_as_default")]
    pub git_ref: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub finished_at: String,
    /// Seconds; GitLab sends `null` while the pipeline is still running.
    #[serde(deserialize_with = "null_as_default")]
    pub duration: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub tag: bool,
}

/// `Pipeline Hook`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PipelineEvent {
    #[serde(deserialize_with = "null_as_default")]
    pub object_attributes: PipelineAttributes,
    #[serde(deserialize_with = "null_as_default")]
    pub user: User,
    #[serde(deserialize_with = "null_as_default")]
    pub project: Project,
}
