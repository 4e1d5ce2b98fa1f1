//! Rendering entry and comment text through their filter chains.

use marginalia_types::{Comment, Entry};

use crate::config::{Config, FiltersConfig};
use crate::filters::{apply, ConfigurationError, FilterChain, TransformRegistry};

/// Renders content to HTML.
///
/// The chains named in configuration are resolved when the renderer is
/// built, so a typo there fails at startup rather than on first request.
#[derive(Debug, Clone)]
pub struct Renderer {
    registry: &'static TransformRegistry,
    comment_chain: FilterChain,
    summary_chain: FilterChain,
}

impl Renderer {
    /// Build a renderer over `registry` with the given default chains
    pub fn new(
        registry: &'static TransformRegistry,
        filters: &FiltersConfig,
    ) -> Result<Self, ConfigurationError> {
        Ok(Self {
            registry,
            comment_chain: registry.chain(&filters.comment)?,
            summary_chain: registry.chain(&filters.summary)?,
        })
    }

    /// Build a renderer over the built-in transforms
    pub fn from_config(config: &Config) -> Result<Self, ConfigurationError> {
        Self::new(TransformRegistry::builtin(), &config.filters)
    }

    pub fn registry(&self) -> &TransformRegistry {
        self.registry
    }

    /// Resolve a chain spec such as `"markdown, sanitize"`
    pub fn chain(&self, spec: &str) -> Result<FilterChain, ConfigurationError> {
        self.registry.parse_chain(spec)
    }

    /// Render text through a resolved chain. Never fails.
    pub fn render(&self, text: Option<&str>, chain: &FilterChain) -> String {
        apply(text, chain)
    }

    /// The entry's body, rendered with the entry's own filter chain
    pub fn entry_body(&self, entry: &Entry) -> Result<String, ConfigurationError> {
        let chain = self.chain(entry.filter())?;
        Ok(self.render(entry.body.as_deref(), &chain))
    }

    /// The entry's summary, rendered with the configured summary chain
    pub fn entry_summary(&self, entry: &Entry) -> String {
        self.render(entry.summary.as_deref(), &self.summary_chain)
    }

    /// The comment's body, rendered with the configured comment chain
    pub fn comment_body(&self, comment: &Comment) -> String {
        self.render(comment.body.as_deref(), &self.comment_chain)
    }

    pub fn comment_chain(&self) -> &FilterChain {
        &self.comment_chain
    }

    pub fn summary_chain(&self) -> &FilterChain {
        &self.summary_chain
    }
}
