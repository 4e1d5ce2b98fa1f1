//! Markdown rendering with typographic punctuation.

use once_cell::sync::Lazy;
use pulldown_cmark::{html, Options, Parser};

static PROCESSOR: Lazy<MarkdownProcessor> = Lazy::new(MarkdownProcessor::new);

/// Markdown processor with the extensions entries are written against
pub struct MarkdownProcessor {
    options: Options,
}

impl MarkdownProcessor {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        // Curly quotes, en/em dashes and ellipses in the same pass
        options.insert(Options::ENABLE_SMART_PUNCTUATION);

        Self { options }
    }

    /// Convert markdown to HTML
    pub fn convert(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);

        let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut html_output, parser);
        html_output
    }
}

impl Default for MarkdownProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// The `markdown` transform
pub fn markdown(input: &str) -> String {
    PROCESSOR.convert(input)
}
