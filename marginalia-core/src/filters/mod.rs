//! Content filters: named text transforms and the pipeline that chains them.
//!
//! A transform is a pure `&str -> String` function registered under a name.
//! Content declares an ordered list of names (its filter chain); the list is
//! resolved against the registry once, so unknown names surface as a
//! [`ConfigurationError`] before anything is rendered.

pub mod markdown;
pub mod pipeline;
pub mod registry;
pub mod sanitize;
pub mod smartify;
pub mod text;

use thiserror::Error;

pub use markdown::MarkdownProcessor;
pub use pipeline::{apply, FilterChain};
pub use registry::{Transform, TransformRegistry};

/// A transform could not process its input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TransformError {
    message: String,
}

impl TransformError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A filter chain refers to something the registry cannot provide
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("unknown transform `{0}`")]
    UnknownTransform(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("transform `{0}` is already registered")]
    Duplicate(String),

    #[error("transform names must be non-empty and contain no commas or whitespace: {0:?}")]
    InvalidName(String),
}

/// Split a chain spec such as `"markdown, sanitize"` into transform names
pub fn split_chain(spec: &str) -> impl Iterator<Item = &str> {
    spec.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|name| !name.is_empty())
}

pub(crate) fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
