//! Plain-text transforms: `text` and `autolink`.

use once_cell::sync::Lazy;
use regex::Regex;

use super::html_escape;

static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t]*\n").unwrap());
static BARE_WWW: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)(^|[ \t])(www\.\S+)").unwrap());
static PAREN_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)(^|[^\]])\((https?://[^)\s]+)\)").unwrap());
static BARE_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)(^|[ \t])(https?://\S+)").unwrap());
static ISSUE_REF: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^([ \t]*)(#\d+)").unwrap());

/// The `text` transform: escaped plain text in paragraphs.
///
/// Blank lines separate paragraphs; single newlines become `<br>`.
pub fn text_to_html(input: &str) -> String {
    let normalized = input.replace("\r\n", "\n");
    PARAGRAPH_BREAK
        .split(normalized.trim())
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| format!("<p>{}</p>", html_escape(p).replace('\n', "<br>\n")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The `autolink` transform: prepares free-form comment text for `markdown`.
///
/// Bare `www.` and `http(s)://` addresses become markdown autolinks,
/// parenthesized URLs that are not link targets lose their parentheses, and
/// a line starting with `#123` is escaped so it does not become a heading.
pub fn autolink(input: &str) -> String {
    let text = BARE_WWW.replace_all(input, "${1}<http://${2}>");
    let text = PAREN_URL.replace_all(&text, "${1}<${2}>");
    let text = BARE_URL.replace_all(&text, "${1}<${2}>");
    ISSUE_REF.replace_all(&text, "${1}\\${2}").into_owned()
}
