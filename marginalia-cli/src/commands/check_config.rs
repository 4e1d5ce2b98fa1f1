//! Validate the configuration file.

use super::GlobalOptions;
use anyhow::{Context, Result};
use marginalia_core::{FilterChain, Renderer};

pub fn check_config(opts: &GlobalOptions) -> Result<()> {
    let config = opts.load_config(false)?;
    let renderer = Renderer::from_config(&config).context("Invalid filter configuration")?;

    let source = config.path().unwrap_or(opts.config.as_path());
    println!("Configuration OK: {}", source.display());
    println!("  site:        {} <{}>", config.site.title, config.site.url);
    println!("  environment: {}", config.environment.as_str());
    println!("  comments:    {}", describe(renderer.comment_chain()));
    println!("  summaries:   {}", describe(renderer.summary_chain()));

    let reputation = &config.reputation;
    if reputation.api_key.is_some() {
        println!(
            "  reputation:  {} (timeout {}s, recycle {}s)",
            reputation.endpoint.as_deref().unwrap_or("akismet"),
            reputation.timeout_secs,
            reputation.recycle_secs
        );
    } else if config.environment.is_production() {
        tracing::warn!("reputation.api_key is not set; every comment will be left check-failed");
        println!("  reputation:  not configured");
    } else {
        println!("  reputation:  not configured");
    }

    Ok(())
}

fn describe(chain: &FilterChain) -> String {
    if chain.is_empty() {
        "(none)".to_string()
    } else {
        chain.names().collect::<Vec<_>>().join(" -> ")
    }
}
