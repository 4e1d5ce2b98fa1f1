//! Configuration parsing and management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid value for {field}: {message}")]
    Invalid { field: String, message: String },
}

/// Runtime mode. Only production talks to the reputation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Environment::Development),
            "test" => Some(Environment::Test),
            "production" | "prod" => Some(Environment::Production),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        *self == Environment::Production
    }
}

/// Main configuration struct matching marginalia.yml schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub site: SiteConfig,

    #[serde(default)]
    pub environment: Environment,

    #[serde(default)]
    pub filters: FiltersConfig,

    #[serde(default)]
    pub reputation: ReputationConfig,

    // File the configuration was read from; None for built-in defaults
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub title: String,
    pub author: String,
    pub url: String,

    #[serde(default)]
    pub description: Option<String>,
}

/// Filter chains applied to content that does not carry its own
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiltersConfig {
    #[serde(default = "default_comment_chain")]
    pub comment: Vec<String>,

    #[serde(default = "default_summary_chain")]
    pub summary: Vec<String>,
}

fn default_comment_chain() -> Vec<String> {
    vec!["sanitize".to_string(), "smartify".to_string()]
}

fn default_summary_chain() -> Vec<String> {
    vec!["markdown".to_string()]
}

/// Reputation (spam check) service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReputationConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    /// Override for the service base URL (defaults to the Akismet REST host)
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Age after which the shared client is discarded and rebuilt
    #[serde(default = "default_recycle_secs")]
    pub recycle_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_recycle_secs() -> u64 {
    600
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&contents)?;

        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.reputation.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "reputation.timeout_secs".into(),
                message: "must be greater than zero".into(),
            });
        }
        if self.site.url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "site.url".into(),
                message: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Path the configuration was loaded from, if any
    pub fn path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Get a nested config value using dotted path (e.g., "site.title")
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();
        match parts.as_slice() {
            ["site", "title"] => Some(self.site.title.clone()),
            ["site", "author"] => Some(self.site.author.clone()),
            ["site", "url"] => Some(self.site.url.clone()),
            ["site", "description"] => self.site.description.clone(),
            ["environment"] => Some(self.environment.as_str().to_string()),
            ["filters", "comment"] => Some(self.filters.comment.join(", ")),
            ["filters", "summary"] => Some(self.filters.summary.join(", ")),
            ["reputation", "endpoint"] => self.reputation.endpoint.clone(),
            ["reputation", "timeout_secs"] => Some(self.reputation.timeout_secs.to_string()),
            ["reputation", "recycle_secs"] => Some(self.reputation.recycle_secs.to_string()),
            _ => None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site: SiteConfig {
                title: "marginalia".into(),
                author: "Anonymous".into(),
                url: "http://localhost:4567".into(),
                description: None,
            },
            environment: Environment::default(),
            filters: FiltersConfig::default(),
            reputation: ReputationConfig::default(),
            config_path: None,
        }
    }
}

impl Default for FiltersConfig {
    fn default() -> Self {
        Self {
            comment: default_comment_chain(),
            summary: default_summary_chain(),
        }
    }
}

impl Default for ReputationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: None,
            timeout_secs: default_timeout_secs(),
            recycle_secs: default_recycle_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const MINIMAL: &str = r#"
site:
  title: "Test"
  author: "Tester"
  url: "https://example.com"
"#;

    #[test]
    fn test_default_values() {
        let config = Config::from_yaml(MINIMAL).unwrap();

        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.filters.comment, vec!["sanitize", "smartify"]);
        assert_eq!(config.filters.summary, vec!["markdown"]);
        assert_eq!(config.reputation.timeout_secs, 10);
        assert_eq!(config.reputation.recycle_secs, 600);
        assert!(config.reputation.api_key.is_none());
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
site:
  title: "My Weblog"
  author: "Ada"
  url: "https://blog.example.com"
  description: "Notes"
environment: production
filters:
  comment: [autolink, markdown, sanitize]
reputation:
  api_key: "abc123"
  endpoint: "http://127.0.0.1:9999"
  timeout_secs: 3
  recycle_secs: 60
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert!(config.environment.is_production());
        assert_eq!(config.filters.comment, vec!["autolink", "markdown", "sanitize"]);
        assert_eq!(config.filters.summary, vec!["markdown"]);
        assert_eq!(config.reputation.api_key.as_deref(), Some("abc123"));
        assert_eq!(config.reputation.timeout_secs, 3);
    }

    #[test]
    fn test_get_nested_value() {
        let config = Config::from_yaml(MINIMAL).unwrap();

        assert_eq!(config.get("site.title"), Some("Test".into()));
        assert_eq!(config.get("site.url"), Some("https://example.com".into()));
        assert_eq!(config.get("environment"), Some("development".into()));
        assert_eq!(config.get("filters.comment"), Some("sanitize, smartify".into()));
        assert_eq!(config.get("reputation.recycle_secs"), Some("600".into()));
        assert_eq!(config.get("nonexistent.key"), None);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let yaml = format!("{MINIMAL}reputation:\n  timeout_secs: 0\n");
        match Config::from_yaml(&yaml) {
            Err(ConfigError::Invalid { field, .. }) => {
                assert_eq!(field, "reputation.timeout_secs")
            }
            other => panic!("Expected Invalid error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_file_records_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("marginalia.yml");
        fs::write(&path, MINIMAL).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.path(), Some(path.as_path()));
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(Environment::from_str("PROD"), Some(Environment::Production));
        assert_eq!(Environment::from_str("test"), Some(Environment::Test));
        assert_eq!(Environment::from_str("staging"), None);
        assert!(!Environment::Test.is_production());
    }
}
