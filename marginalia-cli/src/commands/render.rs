//! Render text through a filter chain.

use super::GlobalOptions;
use anyhow::{Context, Result};
use marginalia_core::Renderer;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

pub fn render_text(opts: &GlobalOptions, filter: &str, input: Option<&Path>) -> Result<()> {
    let config = opts.load_config(true)?;
    let renderer = Renderer::from_config(&config).context("Invalid filter configuration")?;
    let chain = renderer
        .chain(filter)
        .with_context(|| format!("Invalid filter chain `{filter}`"))?;

    let text = match input {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let html = renderer.render(Some(&text), &chain);
    if html.ends_with('\n') {
        print!("{}", html);
    } else {
        println!("{}", html);
    }
    Ok(())
}
