//! Comment screening commands.

use super::GlobalOptions;
use anyhow::{bail, Context, Result};
use marginalia_core::Config;
use marginalia_reputation::{ClientManager, CommentClassifier, JsonFileStore};
use std::path::Path;
use std::sync::Arc;

fn classifier(config: &Config) -> CommentClassifier {
    let manager = ClientManager::from_config(&config.reputation, &config.site.url);
    CommentClassifier::new(Arc::new(manager), config.environment)
}

/// Classify the comment stored at `path` and save the verdict into it.
pub async fn classify_comment(opts: &GlobalOptions, path: &Path, json: bool) -> Result<()> {
    let config = opts.load_config(false)?;
    let store = JsonFileStore::new(path);
    let mut comment = store.load().context("Failed to load comment")?;

    let result = classifier(&config)
        .classify_and_save(&mut comment, &store)
        .await
        .context("Failed to save comment")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}: {}", result.state, result.reason);
    }
    Ok(())
}

pub async fn report_spam(opts: &GlobalOptions, path: &Path) -> Result<()> {
    let config = opts.load_config(false)?;
    let store = JsonFileStore::new(path);
    let mut comment = store.load().context("Failed to load comment")?;

    classifier(&config)
        .report_spam(&mut comment, &store)
        .await
        .context("Failed to save comment")?;

    println!("Marked comment by {} as spam", comment.author());
    Ok(())
}

pub async fn verify_key(opts: &GlobalOptions) -> Result<()> {
    let config = opts.load_config(false)?;
    let valid = classifier(&config)
        .verify_key()
        .await
        .context("Key verification failed")?;

    if !valid {
        bail!("The reputation service rejected the configured API key");
    }
    println!("API key is valid");
    Ok(())
}
