//! Ordered, fault-tolerant execution of a filter chain.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use tracing::warn;

use super::{html_escape, Transform, TransformError};

/// An ordered list of transforms resolved from a registry.
///
/// Only [`TransformRegistry`](super::TransformRegistry) builds chains, so
/// every step is known to exist.
#[derive(Clone, Default)]
pub struct FilterChain {
    steps: Vec<(String, Transform)>,
}

impl FilterChain {
    pub(crate) fn from_steps(steps: Vec<(String, Transform)>) -> Self {
        Self { steps }
    }

    /// A chain with no steps; renders input unchanged
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run the chain, stopping at the first failing step.
    ///
    /// A transform that panics is treated as one that returned an error.
    fn run(&self, text: &str) -> Result<String, (String, TransformError)> {
        let mut result = text.to_string();
        for (name, transform) in &self.steps {
            let step = panic::catch_unwind(AssertUnwindSafe(|| transform(&result)))
                .unwrap_or_else(|payload| Err(panic_error(payload)));
            result = step.map_err(|err| (name.clone(), err))?;
        }
        Ok(result)
    }
}

fn panic_error(payload: Box<dyn Any + Send>) -> TransformError {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "transform panicked".to_string());
    TransformError::new(format!("panicked: {message}"))
}

impl fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Render `text` through `chain`.
///
/// Never fails: a failing transform replaces the whole output with a visible
/// error fragment carrying the escaped message, and no later transform runs.
/// Absent or empty input renders as an empty string without invoking any
/// transform.
pub fn apply(text: Option<&str>, chain: &FilterChain) -> String {
    let text = match text {
        Some(t) if !t.is_empty() => t,
        _ => return String::new(),
    };

    match chain.run(text) {
        Ok(html) => html,
        Err((name, err)) => {
            warn!(transform = %name, error = %err, "content filter failed");
            error_fragment(&format!("{name}: {err}"))
        }
    }
}

fn error_fragment(message: &str) -> String {
    format!(
        "<div class=\"filter-error\"><p><strong>Filter error</strong></p><pre>{}</pre></div>",
        html_escape(message)
    )
}
