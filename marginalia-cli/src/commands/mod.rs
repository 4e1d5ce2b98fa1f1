//! CLI command implementations.

pub mod check_config;
pub mod filters;
pub mod render;
pub mod reputation;

pub use check_config::check_config;
pub use filters::list_filters;
pub use render::render_text;
pub use reputation::{classify_comment, report_spam, verify_key};

use anyhow::{Context, Result};
use marginalia_core::{Config, Environment};
use std::path::PathBuf;

/// Options shared by every subcommand
pub struct GlobalOptions {
    pub config: PathBuf,
    pub environment: Option<Environment>,
}

impl GlobalOptions {
    /// Load the configuration file, applying the environment override.
    ///
    /// With `optional`, a missing file yields the defaults instead of an error.
    pub fn load_config(&self, optional: bool) -> Result<Config> {
        let mut config = if optional && !self.config.exists() {
            tracing::debug!(path = %self.config.display(), "no config file, using defaults");
            Config::default()
        } else {
            Config::from_file(&self.config).with_context(|| {
                format!("Failed to load configuration from {}", self.config.display())
            })?
        };

        if let Some(environment) = self.environment {
            config.environment = environment;
        }
        Ok(config)
    }
}
