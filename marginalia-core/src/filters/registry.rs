//! Name-to-function mapping for content transforms.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::debug;

use super::{
    markdown, sanitize, smartify, split_chain, text, ConfigurationError, FilterChain,
    RegistryError, TransformError,
};

/// A pure text transform as stored in the registry
pub type Transform = Arc<dyn Fn(&str) -> Result<String, TransformError> + Send + Sync>;

static BUILTIN: Lazy<TransformRegistry> = Lazy::new(TransformRegistry::with_builtins);

/// Registry of named transforms.
///
/// Populated once at startup and only read afterwards; names are append-only.
#[derive(Clone, Default)]
pub struct TransformRegistry {
    transforms: Vec<(String, Transform)>,
}

impl TransformRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in transform
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.insert("markdown", infallible(markdown::markdown));
        registry.insert("sanitize", infallible(sanitize::sanitize));
        registry.insert("smartify", infallible(smartify::smartify));
        registry.insert("html", infallible(str::to_string));
        registry.insert("text", infallible(text::text_to_html));
        registry.insert("autolink", infallible(text::autolink));
        registry
    }

    /// Shared, read-only registry of the built-in transforms
    pub fn builtin() -> &'static TransformRegistry {
        &BUILTIN
    }

    /// Register a transform under a new name
    pub fn register<F>(&mut self, name: impl Into<String>, transform: F) -> Result<(), RegistryError>
    where
        F: Fn(&str) -> Result<String, TransformError> + Send + Sync + 'static,
    {
        let name = name.into();
        if name.is_empty() || name.contains(|c: char| c == ',' || c.is_whitespace()) {
            return Err(RegistryError::InvalidName(name));
        }
        if self.contains(&name) {
            return Err(RegistryError::Duplicate(name));
        }
        debug!(transform = %name, "registered transform");
        self.insert(name, Arc::new(transform));
        Ok(())
    }

    fn insert(&mut self, name: impl Into<String>, transform: Transform) {
        self.transforms.push((name.into(), transform));
    }

    /// Find a transform by name
    pub fn lookup(&self, name: &str) -> Result<Transform, ConfigurationError> {
        self.transforms
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| Arc::clone(t))
            .ok_or_else(|| ConfigurationError::UnknownTransform(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.transforms.iter().any(|(n, _)| n == name)
    }

    /// Registered names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.transforms.iter().map(|(n, _)| n.as_str())
    }

    /// Resolve an ordered list of names into a chain
    pub fn chain<I, S>(&self, names: I) -> Result<FilterChain, ConfigurationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let steps = names
            .into_iter()
            .map(|name| {
                let name = name.as_ref();
                self.lookup(name).map(|t| (name.to_string(), t))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FilterChain::from_steps(steps))
    }

    /// Resolve a chain written as text, e.g. `"markdown, sanitize"`
    pub fn parse_chain(&self, spec: &str) -> Result<FilterChain, ConfigurationError> {
        self.chain(split_chain(spec))
    }
}

fn infallible(f: fn(&str) -> String) -> Transform {
    Arc::new(move |s: &str| -> Result<String, TransformError> { Ok(f(s)) })
}

impl fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
