use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// Filter chain used when an entry does not name one.
pub const DEFAULT_FILTER: &str = "markdown";

/// Kind of published entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Article,
    Bookmark,
}

impl EntryKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "article" => Some(EntryKind::Article),
            "bookmark" => Some(EntryKind::Bookmark),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Article => "article",
            EntryKind::Bookmark => "bookmark",
        }
    }

    /// Path segment entries of this kind live under
    fn section(&self) -> &'static str {
        match self {
            EntryKind::Article => "writings",
            EntryKind::Bookmark => "linkings",
        }
    }
}

/// A single article or bookmark
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    /// URL slug, unique across entries
    pub slug: String,

    pub kind: EntryKind,

    #[serde(default)]
    pub published: bool,

    pub title: String,

    #[serde(default)]
    pub summary: Option<String>,

    /// Filter chain name, e.g. "markdown" or "markdown, sanitize"
    #[serde(default)]
    pub filter: Option<String>,

    /// External link (bookmarks)
    #[serde(default)]
    pub url: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    #[serde(default)]
    pub body: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,
}

impl Entry {
    /// Create an unpublished entry stamped with the current time
    pub fn new(kind: EntryKind, slug: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            slug: slug.into(),
            kind,
            published: false,
            title: title.into(),
            summary: None,
            filter: None,
            url: None,
            created_at: now,
            updated_at: now,
            body: None,
            tags: Vec::new(),
        }
    }

    /// Site-relative path without leading slash, e.g. "writings/hello"
    pub fn stem(&self) -> String {
        format!("{}/{}", self.kind.section(), self.slug)
    }

    /// Absolute URL of this entry on the site at `site_url`
    pub fn permalink(&self, site_url: &str) -> String {
        format!("{}/{}", site_url.trim_end_matches('/'), self.stem())
    }

    /// Host of the external link with any leading "www." removed
    pub fn domain(&self) -> Option<String> {
        let url = Url::parse(self.url.as_deref()?.trim()).ok()?;
        if !matches!(url.scheme(), "http" | "https") {
            return None;
        }
        let host = url.host_str()?;
        Some(host.strip_prefix("www.").unwrap_or(host).to_string())
    }

    /// Filter chain this entry's body is rendered with.
    ///
    /// Bookmarks always render as markdown regardless of what was imported.
    pub fn filter(&self) -> &str {
        match self.kind {
            EntryKind::Bookmark => DEFAULT_FILTER,
            EntryKind::Article => self
                .filter
                .as_deref()
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .unwrap_or(DEFAULT_FILTER),
        }
    }

    pub fn is_published(&self) -> bool {
        self.published
    }

    pub fn is_draft(&self) -> bool {
        !self.published
    }

    pub fn has_body(&self) -> bool {
        self.body.as_deref().is_some_and(|b| !b.is_empty())
    }

    /// Replace tags from a free-form list ("rust, web  notes")
    pub fn set_tag_names(&mut self, value: &str) {
        let mut tags: Vec<String> = Vec::new();
        for name in value.split(|c: char| c == ',' || c.is_whitespace()) {
            if !name.is_empty() && !tags.iter().any(|t| t == name) {
                tags.push(name.to_string());
            }
        }
        self.tags = tags;
    }

    /// Apply a publish flag as submitted by a form.
    ///
    /// A draft that becomes published is restamped so it sorts as new.
    pub fn publish(&mut self, value: &str) {
        let flag = matches!(value, "Publish" | "1" | "true" | "yes");
        if flag && self.is_draft() {
            let now = Utc::now();
            self.created_at = now;
            self.updated_at = now;
        }
        self.published = flag;
    }
}
