use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Spam classification of a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassificationState {
    /// Submitted, not yet sent to the reputation service
    #[default]
    Unchecked,
    Ham,
    Spam,
    /// The reputation call failed; the comment still needs review
    CheckFailed,
}

impl ClassificationState {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "unchecked" => Some(ClassificationState::Unchecked),
            "ham" => Some(ClassificationState::Ham),
            "spam" => Some(ClassificationState::Spam),
            "check-failed" | "check_failed" => Some(ClassificationState::CheckFailed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationState::Unchecked => "unchecked",
            ClassificationState::Ham => "ham",
            ClassificationState::Spam => "spam",
            ClassificationState::CheckFailed => "check-failed",
        }
    }
}

impl fmt::Display for ClassificationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reader comment on an entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub id: Option<u64>,

    /// Permalink of the entry being commented on
    pub entry_permalink: String,

    #[serde(default)]
    pub author: Option<String>,

    /// Submitter IP address
    #[serde(default)]
    pub ip: Option<String>,

    /// Author homepage or email address
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub body: Option<String>,

    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub referrer: Option<String>,

    #[serde(default)]
    pub user_agent: Option<String>,

    /// True once the reputation service answered for this comment
    #[serde(default)]
    pub checked: bool,

    #[serde(default)]
    pub state: ClassificationState,
}

impl Comment {
    pub fn new(entry_permalink: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: None,
            entry_permalink: entry_permalink.into(),
            author: None,
            ip: None,
            url: None,
            body: Some(body.into()),
            created_at: Utc::now(),
            referrer: None,
            user_agent: None,
            checked: false,
            state: ClassificationState::Unchecked,
        }
    }

    /// Display name, falling back to "Anonymous Coward"
    pub fn author(&self) -> &str {
        match self.author.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => "Anonymous Coward",
        }
    }

    /// Trimmed author URL, `None` when blank
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }

    /// Link target for the author's name
    pub fn author_link(&self) -> Option<String> {
        let url = self.url()?;
        let link = if url.starts_with("http:") || url.starts_with("https:") {
            url.to_string()
        } else if url.starts_with("mailto:") && url.contains('@') {
            url.to_string()
        } else if url.contains('@') {
            format!("mailto:{url}")
        } else {
            format!("http://{url}")
        };
        Some(link)
    }

    /// Body collapsed onto one line and cut to `length` characters
    pub fn excerpt(&self, length: usize) -> String {
        let text = self
            .body
            .as_deref()
            .unwrap_or_default()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        if text.chars().count() > length {
            let cut: String = text.chars().take(length).collect();
            format!("{cut} ...")
        } else {
            text
        }
    }

    pub fn is_spam(&self) -> bool {
        self.state == ClassificationState::Spam
    }

    /// Only a positive classification counts as ham; failed checks do not.
    pub fn is_ham(&self) -> bool {
        self.state == ClassificationState::Ham
    }

    /// Comments no classifier has vouched for
    pub fn needs_review(&self) -> bool {
        matches!(
            self.state,
            ClassificationState::Unchecked | ClassificationState::CheckFailed
        )
    }
}
