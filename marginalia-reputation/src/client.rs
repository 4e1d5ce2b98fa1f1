//! The reputation service capability.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use marginalia_types::Comment;
use serde::Serialize;
use thiserror::Error;

/// Errors talking to the reputation service
#[derive(Debug, Error)]
pub enum ReputationError {
    #[error("request to reputation service failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("reputation service did not answer within {0:?}")]
    Timeout(Duration),

    #[error("reputation service returned HTTP {status}")]
    Status { status: u16 },

    #[error("unexpected response from reputation service: {0}")]
    Protocol(String),

    #[error("reputation service rejected the API key")]
    InvalidKey,

    #[error("reputation service is not configured: {0}")]
    NotConfigured(String),

    #[error("{0} is not supported by this client")]
    Unsupported(&'static str),
}

/// Parameters describing one comment, as sent to the service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CommentParams(BTreeMap<String, String>);

impl CommentParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble the parameter set for a comment
    pub fn from_comment(comment: &Comment) -> Self {
        let mut params = Self::new();
        params.insert("user_ip", comment.ip.as_deref().unwrap_or_default());
        params.insert("user_agent", comment.user_agent.as_deref().unwrap_or_default());
        params.insert("referrer", comment.referrer.as_deref().unwrap_or_default());
        params.insert("permalink", &comment.entry_permalink);
        params.insert("comment_type", "comment");
        params.insert("comment_author", comment.author());
        if let Some(url) = comment.url() {
            params.insert("comment_author_url", url);
        }
        params.insert("comment_content", comment.body.as_deref().unwrap_or_default());
        params
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A session with the reputation service
#[async_trait]
pub trait ReputationClient: Send + Sync {
    /// Ask whether a comment is spam (`true`) or ham (`false`)
    async fn check(&self, params: &CommentParams) -> Result<bool, ReputationError>;

    /// Tell the service a comment it let through was spam
    async fn submit_spam(&self, params: &CommentParams) -> Result<(), ReputationError>;

    /// Confirm the configured credentials are accepted
    async fn verify_key(&self) -> Result<bool, ReputationError> {
        Err(ReputationError::Unsupported("verify-key"))
    }
}
