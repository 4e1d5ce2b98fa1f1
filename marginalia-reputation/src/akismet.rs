//! Akismet REST client.
//!
//! Requests are form-encoded POSTs to `{endpoint}/1.1/{method}`. The service
//! answers `comment-check` with a bare `true`/`false` body and explains
//! failures in the `X-akismet-debug-help` header.

use std::time::Duration;

use async_trait::async_trait;
use marginalia_core::config::ReputationConfig;
use tracing::debug;

use crate::client::{CommentParams, ReputationClient, ReputationError};

const DEBUG_HELP_HEADER: &str = "x-akismet-debug-help";

/// HTTP client for an Akismet-compatible service
#[derive(Debug, Clone)]
pub struct AkismetClient {
    http: reqwest::Client,
    key: String,
    blog: String,
    endpoint: String,
    timeout: Duration,
}

impl AkismetClient {
    /// Create a client for `blog` authenticated with `key`.
    ///
    /// `endpoint` defaults to `https://{key}.rest.akismet.com`.
    pub fn new(
        key: impl Into<String>,
        blog: impl Into<String>,
        endpoint: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, ReputationError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ReputationError::NotConfigured("API key is empty".into()));
        }

        let endpoint = endpoint
            .map(|e| e.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("https://{key}.rest.akismet.com"));

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("marginalia/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            key,
            blog: blog.into(),
            endpoint,
            timeout,
        })
    }

    /// Create a client from the `reputation` config section
    pub fn from_config(config: &ReputationConfig, blog: &str) -> Result<Self, ReputationError> {
        let key = config
            .api_key
            .as_deref()
            .ok_or_else(|| ReputationError::NotConfigured("reputation.api_key is not set".into()))?;
        Self::new(
            key,
            blog,
            config.endpoint.as_deref(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, method: &str) -> String {
        format!("{}/1.1/{}", self.endpoint, method)
    }

    /// POST form fields to `method`, returning the trimmed body and any debug help
    async fn post(
        &self,
        method: &str,
        form: &[(&str, &str)],
    ) -> Result<(String, Option<String>), ReputationError> {
        debug!(method, endpoint = %self.endpoint, "calling reputation service");

        let response = self
            .http
            .post(self.url(method))
            .form(form)
            .send()
            .await
            .map_err(|err| self.map_error(err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReputationError::Status {
                status: status.as_u16(),
            });
        }

        let help = response
            .headers()
            .get(DEBUG_HELP_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await.map_err(|err| self.map_error(err))?;

        Ok((body.trim().to_string(), help))
    }

    async fn post_comment(
        &self,
        method: &str,
        params: &CommentParams,
    ) -> Result<(String, Option<String>), ReputationError> {
        let mut form: Vec<(&str, &str)> = vec![("blog", self.blog.as_str())];
        form.extend(params.iter());
        self.post(method, &form).await
    }

    fn map_error(&self, err: reqwest::Error) -> ReputationError {
        if err.is_timeout() {
            ReputationError::Timeout(self.timeout)
        } else {
            ReputationError::Http(err)
        }
    }
}

#[async_trait]
impl ReputationClient for AkismetClient {
    async fn check(&self, params: &CommentParams) -> Result<bool, ReputationError> {
        let (body, help) = self.post_comment("comment-check", params).await?;
        match body.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            "invalid" => Err(ReputationError::InvalidKey),
            _ => Err(unexpected(body, help)),
        }
    }

    async fn submit_spam(&self, params: &CommentParams) -> Result<(), ReputationError> {
        self.post_comment("submit-spam", params).await?;
        Ok(())
    }

    async fn verify_key(&self) -> Result<bool, ReputationError> {
        let form = [("key", self.key.as_str()), ("blog", self.blog.as_str())];
        let (body, help) = self.post("verify-key", &form).await?;
        match body.as_str() {
            "valid" => Ok(true),
            "invalid" => Ok(false),
            _ => Err(unexpected(body, help)),
        }
    }
}

fn unexpected(body: String, help: Option<String>) -> ReputationError {
    match help {
        Some(help) => ReputationError::Protocol(format!("{body:?} ({help})")),
        None => ReputationError::Protocol(format!("{body:?}")),
    }
}
