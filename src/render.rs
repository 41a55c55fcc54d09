//! Markdown templates, one per GitLab event kind

use std::fmt;

use crate::events::{
    GitlabEvent, IssueEvent, MergeRequestEvent, NoteEvent, PipelineEvent, PushEvent, TagPushEvent,
};

/// Icons for the pipeline statuses worth announcing.
const PIPELINE_STATUS_ICONS: [(&str, &str); 4] = [
    ("failed", "\u{1F41B}"),
    ("running", "\u{1F680}"),
    ("success", "\u{2705}"),
    ("pending", "\u{1F512}"),
];

/// Why an event produced nothing to send. Answered as a successful ack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NoCommit,
    NoContent,
    UnknownStatus(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoCommit => f.write_str("no commit"),
            SkipReason::NoContent => f.write_str("no content"),
            SkipReason::UnknownStatus(status) => write!(f, "unknown status: {}", status),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Message(String),
    Skipped(SkipReason),
}

pub trait Render {
    fn render(&self) -> Rendered;
}

fn header(name: &str) -> String {
    format!("# {}\n", name)
}

pub fn pipeline_status_icon(status: &str) -> Option<&'static str> {
    PIPELINE_STATUS_ICONS
        .iter()
        .find(|(name, _)| *name == status)
        .map(|(_, icon)| *icon)
}

impl Render for PushEvent {
    fn render(&self) -> Rendered {
        let deleted = self.is_branch_deletion();
        if self.commits.is_empty() && !deleted {
            return Rendered::Skipped(SkipReason::NoCommit);
        }

        let mut content = header(&self.repository.name);
        content.push_str(&format!("### On branch `{}`\n", self.git_ref));
        for commit in &self.commits {
            content.push_str(&format!(
                "{} push a commit [{}]({})  {}\n",
                commit.author.name,
                commit.message.replace('\n', ""),
                commit.url,
                commit.timestamp
            ));
        }
        if deleted {
            content.push_str(&format!("{} `remove` it", self.user_name));
        }
        Rendered::Message(content)
    }
}

impl Render for TagPushEvent {
    fn render(&self) -> Rendered {
        let mut content = header(&self.repository.name);
        content.push_str(&format!(
            "{} push a tag: [{}]({}{})",
            self.user_name,
            self.git_ref,
            self.repository.homepage,
            self.git_ref.replace("refs", "")
        ));
        Rendered::Message(content)
    }
}

impl Render for IssueEvent {
    fn render(&self) -> Rendered {
        let attrs = &self.object_attributes;
        let mut content = header(&self.repository.name);
        content.push_str(&format!(
            "{} {} a issue [{}]({})",
            self.user.name, attrs.action, attrs.title, attrs.url
        ));
        Rendered::Message(content)
    }
}

impl Render for NoteEvent {
    fn render(&self) -> Rendered {
        let attrs = &self.object_attributes;
        let mut content = header(&self.repository.name);
        content.push_str(&format!(
            "{} leave a comment: {}  {} \n[Detail>>]({})",
            self.user.name, attrs.note, attrs.updated_at, attrs.url
        ));
        Rendered::Message(content)
    }
}

impl Render for MergeRequestEvent {
    fn render(&self) -> Rendered {
        let attrs = &self.object_attributes;
        let mut content = header(&self.repository.name);
        content.push_str(&format!(
            "{} `{}` a merge request from `{}` to `{}` \n[Detail>>]({})",
            self.user.name, attrs.action, attrs.source_branch, attrs.target_branch, attrs.url
        ));
        Rendered::Message(content)
    }
}

impl Render for PipelineEvent {
    fn render(&self) -> Rendered {
        let attrs = &self.object_attributes;
        let Some(icon) = pipeline_status_icon(&attrs.status) else {
            return Rendered::Skipped(SkipReason::UnknownStatus(attrs.status.clone()));
        };

        let ref_kind = if attrs.tag { "tag" } else { "branch" };
        let mut content = header(&self.project.name);
        content.push_str(&format!("### Pipeline on {} `{}`\n", ref_kind, attrs.git_ref));
        content.push_str(&format!("`Status`: {}\n", icon));
        content.push_str(&format!("`Start at`: {}\n", attrs.created_at));
        if !attrs.finished_at.is_empty() {
            content.push_str(&format!("`Finish at`: {}\n", attrs.finished_at));
        }
        if attrs.duration > 0 {
            content.push_str(&format!("`Duration`: {}s", attrs.duration));
        }
        Rendered::Message(content)
    }
}

impl Render for GitlabEvent {
    fn render(&self) -> Rendered {
        match self {
            GitlabEvent::Push(e) => e.render(),
            GitlabEvent::TagPush(e) => e.render(),
            GitlabEvent::Issue(e) => e.render(),
            GitlabEvent::Note(e) => e.render(),
            GitlabEvent::MergeRequest(e) => e.render(),
            GitlabEvent::Pipeline(e) => e.render(),
        }
    }
}
